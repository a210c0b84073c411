use solana_sdk::pubkey::Pubkey;

use super::candy_machine::shorten_address;
use super::constants::{LAMPORTS_PER_SOL, MOBILE_BREAKPOINT_PX, SHORT_ADDRESS_CHARS};
use super::mint_state::MintViewState;

/// The render tree shown for a wallet / viewport combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutBranch {
    ConnectedDesktop,
    ConnectedMobile,
    DisconnectedDesktop,
    DisconnectedMobile,
}

impl LayoutBranch {
    pub fn select(wallet_connected: bool, viewport_width: f64) -> Self {
        let mobile = is_mobile(viewport_width);
        match (wallet_connected, mobile) {
            (true, false) => LayoutBranch::ConnectedDesktop,
            (true, true) => LayoutBranch::ConnectedMobile,
            (false, false) => LayoutBranch::DisconnectedDesktop,
            (false, true) => LayoutBranch::DisconnectedMobile,
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, LayoutBranch::ConnectedMobile | LayoutBranch::DisconnectedMobile)
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, LayoutBranch::ConnectedDesktop | LayoutBranch::ConnectedMobile)
    }
}

pub fn is_mobile(viewport_width: f64) -> bool {
    viewport_width <= MOBILE_BREAKPOINT_PX
}

/// One label/value line of the wallet panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

fn row(label: &'static str, value: String) -> SummaryRow {
    SummaryRow { label, value }
}

/// Wallet panel rows, shared by the desktop and mobile layouts.
///
/// Counters read zero until the first sale snapshot arrives and the price
/// falls back to `display_price_lamports`.
pub fn summary_rows(wallet: &Pubkey, state: &MintViewState, display_price_lamports: u64) -> Vec<SummaryRow> {
    let (total, available, redeemed, price) = match &state.sale {
        Some(sale) => (
            sale.items_available,
            sale.items_remaining,
            sale.items_redeemed,
            sale.price_lamports,
        ),
        None => (0, 0, 0, display_price_lamports),
    };

    vec![
        row("ADDRESS:", shorten_address(&wallet.to_string(), SHORT_ADDRESS_CHARS)),
        row("SOL BALANCE:", format!("{} SOL", format_sol(state.balance.unwrap_or(0.0)))),
        row("TOTAL:", total.to_string()),
        row("AVAILABLE:", available.to_string()),
        row("REDEEMED:", redeemed.to_string()),
        row("PRICE:", format!("{} SOL", format_sol(price as f64 / LAMPORTS_PER_SOL as f64))),
    ]
}

/// What the mint control shows, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintButtonContent {
    SoldOut,
    /// Not yet active and the go-live date is still unknown
    Loading,
    Countdown,
    Minting,
    Ready,
}

impl MintButtonContent {
    pub fn for_state(state: &MintViewState) -> Self {
        if state.flags.is_sold_out {
            MintButtonContent::SoldOut
        } else if !state.flags.is_active && state.sale.is_none() {
            MintButtonContent::Loading
        } else if !state.flags.is_active {
            MintButtonContent::Countdown
        } else if state.flags.is_minting {
            MintButtonContent::Minting
        } else {
            MintButtonContent::Ready
        }
    }
}

/// Grouped thousands, at most three fraction digits, trailing zeros dropped
pub fn format_sol(amount: f64) -> String {
    if !amount.is_finite() {
        return "0".to_string();
    }
    let negative = amount < 0.0;
    let millis = (amount.abs() * 1000.0).round() as u64;
    let whole = group_thousands(millis / 1000);
    let fraction = millis % 1000;

    let mut out = String::new();
    if negative && millis > 0 {
        out.push('-');
    }
    out.push_str(&whole);
    if fraction > 0 {
        let digits = format!("{:03}", fraction);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::candy_machine::CandyMachineHandle;
    use crate::core::mint_state::SaleState;

    #[test]
    fn test_exactly_one_branch_at_any_width() {
        for width in [0.0, 320.0, 849.9, 850.0, 850.5, 1024.0, 3840.0] {
            for connected in [true, false] {
                let branch = LayoutBranch::select(connected, width);
                assert_eq!(branch.is_connected(), connected);
                assert_eq!(branch.is_mobile(), width <= 850.0);
            }
        }
        assert_eq!(LayoutBranch::select(true, 850.0), LayoutBranch::ConnectedMobile);
        assert_eq!(LayoutBranch::select(false, 851.0), LayoutBranch::DisconnectedDesktop);
    }

    #[test]
    fn test_format_sol() {
        assert_eq!(format_sol(0.0), "0");
        assert_eq!(format_sol(0.5), "0.5");
        assert_eq!(format_sol(1.23456), "1.235");
        assert_eq!(format_sol(1234567.1), "1,234,567.1");
        assert_eq!(format_sol(999.9999), "1,000");
        assert_eq!(format_sol(100.0), "100");
    }

    #[test]
    fn test_summary_rows_before_and_after_load() {
        let wallet = Pubkey::new_unique();
        let mut state = MintViewState::new();

        let rows = summary_rows(&wallet, &state, 500_000_000);
        let labels: Vec<_> = rows.iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            ["ADDRESS:", "SOL BALANCE:", "TOTAL:", "AVAILABLE:", "REDEEMED:", "PRICE:"]
        );
        assert_eq!(rows[1].value, "0 SOL");
        assert_eq!(rows[5].value, "0.5 SOL");
        assert!(rows[0].value.contains("..."));

        state.set_balance_lamports(12_345_000_000);
        state.apply_sale_state(SaleState {
            items_available: 1000,
            items_remaining: 600,
            items_redeemed: 400,
            go_live_date_ms: 0,
            price_lamports: 1_500_000_000,
            candy_machine: CandyMachineHandle {
                id: Pubkey::new_unique(),
                authority: Pubkey::new_unique(),
                wallet: Pubkey::new_unique(),
                config: Pubkey::new_unique(),
                price_lamports: 1_500_000_000,
            },
        });

        let values: Vec<_> = summary_rows(&wallet, &state, 500_000_000)
            .into_iter()
            .skip(1)
            .map(|r| r.value)
            .collect();
        assert_eq!(values, ["12.345 SOL", "1000", "600", "400", "1.5 SOL"]);
    }

    fn sale(remaining: u64, go_live_date_ms: i64) -> SaleState {
        SaleState {
            items_available: 10,
            items_remaining: remaining,
            items_redeemed: 10 - remaining,
            go_live_date_ms,
            price_lamports: 1,
            candy_machine: CandyMachineHandle {
                id: Pubkey::new_unique(),
                authority: Pubkey::new_unique(),
                wallet: Pubkey::new_unique(),
                config: Pubkey::new_unique(),
                price_lamports: 1,
            },
        }
    }

    #[test]
    fn test_no_countdown_before_sale_loads() {
        let mut state = MintViewState::new();
        assert_eq!(MintButtonContent::for_state(&state), MintButtonContent::Loading);
        assert!(state.mint_disabled());

        state.apply_sale_state(sale(5, 4_102_444_800_000));
        assert_eq!(MintButtonContent::for_state(&state), MintButtonContent::Countdown);
    }

    #[test]
    fn test_button_content_priority() {
        let mut state = MintViewState::new();
        state.apply_sale_state(sale(5, 0));
        assert_eq!(MintButtonContent::for_state(&state), MintButtonContent::Countdown);

        state.activate();
        assert_eq!(MintButtonContent::for_state(&state), MintButtonContent::Ready);

        state.flags.is_minting = true;
        assert_eq!(MintButtonContent::for_state(&state), MintButtonContent::Minting);

        state.flags.is_sold_out = true;
        assert_eq!(MintButtonContent::for_state(&state), MintButtonContent::SoldOut);
    }
}
