use solana_sdk::pubkey::Pubkey;

use super::candy_machine::{CandyMachineHandle, CandyMachineState};
use super::constants::{LAMPORTS_PER_SOL, MSG_STATE_QUERY_FAILED};
use super::mint_error::{MintError, MintNotice, Severity};

/// Sale counters and the handle needed to mint, replaced wholesale
#[derive(Debug, Clone, PartialEq)]
pub struct SaleState {
    pub items_available: u64,
    pub items_remaining: u64,
    pub items_redeemed: u64,
    /// Unix milliseconds
    pub go_live_date_ms: i64,
    pub price_lamports: u64,
    pub candy_machine: CandyMachineHandle,
}

impl SaleState {
    /// Build from a fresh query; a missing on-chain go-live date falls back to
    /// the configured start date
    pub fn from_query(state: CandyMachineState, fallback_go_live_ms: i64) -> Self {
        Self {
            items_available: state.items_available,
            items_remaining: state.items_remaining,
            items_redeemed: state.items_redeemed,
            go_live_date_ms: state.go_live_date_ms.unwrap_or(fallback_go_live_ms),
            price_lamports: state.candy_machine.price_lamports,
            candy_machine: state.candy_machine,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiFlags {
    pub is_active: bool,
    pub is_sold_out: bool,
    pub is_minting: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertState {
    /// Bumped for every new alert so a stale auto-hide timer can be ignored
    pub id: u64,
    pub open: bool,
    pub message: String,
    pub severity: Option<Severity>,
}

/// Why a mint request was refused before any chain call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintBlocked {
    NoWallet,
    NotLoaded,
    AlreadyMinting,
    NotActive,
    SoldOut,
}

/// Everything the mint view renders, mutated only through these methods.
///
/// `is_active` and `is_sold_out` only ever go from false to true;
/// `is_minting` brackets exactly one `begin_mint` / `finish_mint` pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MintViewState {
    pub sale: Option<SaleState>,
    /// SOL, `None` until the first balance read
    pub balance: Option<f64>,
    pub flags: UiFlags,
    pub alert: AlertState,
}

impl MintViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sale snapshot
    pub fn apply_sale_state(&mut self, sale: SaleState) {
        if sale.items_remaining == 0 {
            self.flags.is_sold_out = true;
        }
        self.sale = Some(sale);
    }

    /// Drop data read for the previous wallet; the one-way flags stay
    pub fn clear_wallet_data(&mut self) {
        self.sale = None;
        self.balance = None;
    }

    pub fn set_balance_lamports(&mut self, lamports: u64) {
        self.balance = Some(lamports as f64 / LAMPORTS_PER_SOL as f64);
    }

    /// Countdown completion; idempotent
    pub fn activate(&mut self) {
        self.flags.is_active = true;
    }

    pub fn mint_blocker(&self, wallet: Option<&Pubkey>) -> Option<MintBlocked> {
        if wallet.is_none() {
            Some(MintBlocked::NoWallet)
        } else if self.sale.is_none() {
            Some(MintBlocked::NotLoaded)
        } else if self.flags.is_minting {
            Some(MintBlocked::AlreadyMinting)
        } else if !self.flags.is_active {
            Some(MintBlocked::NotActive)
        } else if self.flags.is_sold_out {
            Some(MintBlocked::SoldOut)
        } else {
            None
        }
    }

    /// The mint control is disabled exactly when this is true
    pub fn mint_disabled(&self) -> bool {
        self.flags.is_sold_out || self.flags.is_minting || !self.flags.is_active
    }

    /// Enter the minting state; returns the candy machine to mint from
    pub fn begin_mint(&mut self, wallet: Option<&Pubkey>) -> Result<CandyMachineHandle, MintBlocked> {
        if let Some(blocker) = self.mint_blocker(wallet) {
            return Err(blocker);
        }
        let handle = self
            .sale
            .as_ref()
            .map(|sale| sale.candy_machine.clone())
            .ok_or(MintBlocked::NotLoaded)?;
        self.flags.is_minting = true;
        Ok(handle)
    }

    /// Turn the cycle's outcome into its single notification
    pub fn record_mint_outcome(&mut self, outcome: &Result<(), MintError>) {
        let notice = match outcome {
            Ok(()) => MintNotice::succeeded(),
            Err(e) => {
                log::warn!("Mint failed: {}", e);
                e.classify()
            }
        };
        if notice.marks_sold_out {
            self.flags.is_sold_out = true;
        }
        self.show_alert(notice.message, notice.severity);
    }

    pub fn end_mint(&mut self) {
        self.flags.is_minting = false;
    }

    /// Leave the minting state with the cycle's outcome
    pub fn finish_mint(&mut self, outcome: &Result<(), MintError>) {
        self.record_mint_outcome(outcome);
        self.end_mint();
    }

    pub fn report_query_failure(&mut self, error: &MintError) {
        log::error!("Mint state refresh failed: {}", error);
        self.show_alert(MSG_STATE_QUERY_FAILED, Severity::Error);
    }

    pub fn show_alert(&mut self, message: &str, severity: Severity) {
        self.alert = AlertState {
            id: self.alert.id + 1,
            open: true,
            message: message.to_string(),
            severity: Some(severity),
        };
    }

    /// Close the alert if it is still the one `id` refers to
    pub fn dismiss_alert(&mut self, id: u64) {
        if self.alert.id == id {
            self.alert.open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> CandyMachineHandle {
        CandyMachineHandle {
            id: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
            wallet: Pubkey::new_unique(),
            config: Pubkey::new_unique(),
            price_lamports: 500_000_000,
        }
    }

    fn sale(remaining: u64) -> SaleState {
        SaleState {
            items_available: 100,
            items_remaining: remaining,
            items_redeemed: 100 - remaining,
            go_live_date_ms: 0,
            price_lamports: 500_000_000,
            candy_machine: handle(),
        }
    }

    fn ready_state() -> MintViewState {
        let mut state = MintViewState::new();
        state.apply_sale_state(sale(10));
        state.activate();
        state
    }

    #[test]
    fn test_zero_remaining_marks_sold_out() {
        let mut state = MintViewState::new();
        state.apply_sale_state(sale(5));
        assert!(!state.flags.is_sold_out);

        state.apply_sale_state(sale(0));
        assert!(state.flags.is_sold_out);

        // a later refresh reporting stock does not undo it
        state.apply_sale_state(sale(3));
        assert!(state.flags.is_sold_out);
        assert_eq!(state.sale.as_ref().unwrap().items_remaining, 3);
    }

    #[test]
    fn test_query_without_go_live_uses_fallback() {
        let query = CandyMachineState {
            candy_machine: handle(),
            go_live_date_ms: None,
            items_available: 10,
            items_remaining: 4,
            items_redeemed: 6,
        };
        let sale = SaleState::from_query(query.clone(), 42);
        assert_eq!(sale.go_live_date_ms, 42);

        let dated = SaleState::from_query(CandyMachineState { go_live_date_ms: Some(7), ..query }, 42);
        assert_eq!(dated.go_live_date_ms, 7);
    }

    #[test]
    fn test_mint_preconditions() {
        let wallet = Pubkey::new_unique();

        let state = MintViewState::new();
        assert_eq!(state.mint_blocker(None), Some(MintBlocked::NoWallet));
        assert_eq!(state.mint_blocker(Some(&wallet)), Some(MintBlocked::NotLoaded));

        let mut state = MintViewState::new();
        state.apply_sale_state(sale(10));
        assert_eq!(state.mint_blocker(Some(&wallet)), Some(MintBlocked::NotActive));
        assert!(state.mint_disabled());

        let mut state = ready_state();
        assert_eq!(state.mint_blocker(Some(&wallet)), None);
        assert!(!state.mint_disabled());

        state.apply_sale_state(sale(0));
        assert_eq!(state.mint_blocker(Some(&wallet)), Some(MintBlocked::SoldOut));
    }

    #[test]
    fn test_mint_cycles_never_overlap() {
        let wallet = Pubkey::new_unique();
        let mut state = ready_state();

        assert!(state.begin_mint(Some(&wallet)).is_ok());
        assert!(state.flags.is_minting);
        assert!(state.mint_disabled());
        assert_eq!(state.begin_mint(Some(&wallet)), Err(MintBlocked::AlreadyMinting));

        state.finish_mint(&Ok(()));
        assert!(!state.flags.is_minting);
        assert!(state.begin_mint(Some(&wallet)).is_ok());
    }

    #[test]
    fn test_success_alert() {
        let wallet = Pubkey::new_unique();
        let mut state = ready_state();
        state.begin_mint(Some(&wallet)).unwrap();
        state.finish_mint(&Ok(()));

        assert!(state.alert.open);
        assert_eq!(state.alert.message, "Congratulations! Mint succeeded!");
        assert_eq!(state.alert.severity, Some(Severity::Success));
    }

    #[test]
    fn test_sold_out_code_forces_sold_out() {
        let wallet = Pubkey::new_unique();
        let mut state = ready_state();
        state.begin_mint(Some(&wallet)).unwrap();
        state.finish_mint(&Err(MintError::CollaboratorCode(311)));

        assert_eq!(state.alert.message, "SOLD OUT!");
        assert!(state.flags.is_sold_out);
        assert_eq!(state.sale.as_ref().unwrap().items_remaining, 10);
    }

    #[test]
    fn test_not_live_code_leaves_flags() {
        let wallet = Pubkey::new_unique();
        let mut state = ready_state();
        let before = state.flags;
        state.begin_mint(Some(&wallet)).unwrap();
        state.finish_mint(&Err(MintError::CollaboratorCode(312)));

        assert_eq!(state.alert.message, "Minting period hasn't started yet.");
        assert_eq!(state.alert.severity, Some(Severity::Error));
        assert_eq!(state.flags, before);
    }

    #[test]
    fn test_activation_is_monotonic() {
        let mut state = MintViewState::new();
        state.activate();
        state.activate();
        state.apply_sale_state(sale(10));
        state.finish_mint(&Err(MintError::CollaboratorCode(312)));
        assert!(state.flags.is_active);
    }

    #[test]
    fn test_stale_dismiss_is_ignored() {
        let mut state = MintViewState::new();
        state.show_alert("first", Severity::Info);
        let first = state.alert.id;
        state.show_alert("second", Severity::Warning);

        state.dismiss_alert(first);
        assert!(state.alert.open);
        assert_eq!(state.alert.message, "second");

        state.dismiss_alert(state.alert.id);
        assert!(!state.alert.open);
        assert_eq!(state.alert.message, "second");
    }

    #[test]
    fn test_query_failure_is_surfaced() {
        let mut state = MintViewState::new();
        state.report_query_failure(&MintError::QueryFailed("timeout".to_string()));
        assert!(state.alert.open);
        assert_eq!(state.alert.severity, Some(Severity::Error));
        assert_eq!(state.flags, UiFlags::default());
    }

    #[test]
    fn test_wallet_change_clears_read_data() {
        let mut state = ready_state();
        state.set_balance_lamports(2_000_000_000);
        state.apply_sale_state(sale(0));

        state.clear_wallet_data();
        assert_eq!(state.sale, None);
        assert_eq!(state.balance, None);
        assert!(state.flags.is_active);
        assert!(state.flags.is_sold_out);
    }

    #[test]
    fn test_balance_in_sol() {
        let mut state = MintViewState::new();
        assert_eq!(state.balance, None);
        state.set_balance_lamports(2_500_000_000);
        assert_eq!(state.balance, Some(2.5));
    }
}
