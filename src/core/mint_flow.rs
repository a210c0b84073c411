use std::cell::RefCell;

use leptos::{RwSignal, SignalUpdate};
use solana_sdk::pubkey::Pubkey;

use super::candy_machine::{CandyMachineApi, CandyMachineHandle};
use super::mint_config::MintConfig;
use super::mint_error::MintError;
use super::mint_state::{MintBlocked, MintViewState, SaleState};
use super::rpc_base::Commitment;

/// Where the view state lives while async work runs against it
pub trait MintStateStore {
    fn update_state(&self, f: impl FnOnce(&mut MintViewState));
}

impl MintStateStore for RwSignal<MintViewState> {
    fn update_state(&self, f: impl FnOnce(&mut MintViewState)) {
        self.update(f);
    }
}

impl MintStateStore for RefCell<MintViewState> {
    fn update_state(&self, f: impl FnOnce(&mut MintViewState)) {
        f(&mut self.borrow_mut());
    }
}

/// Read the wallet balance into the store.
///
/// `is_current` is asked again once the query settles; a result for a wallet
/// that is no longer bound is dropped.
pub async fn refresh_balance<C, S>(client: &C, store: &S, wallet: Pubkey, is_current: impl Fn(&Pubkey) -> bool)
where
    C: CandyMachineApi,
    S: MintStateStore,
{
    let result = client.get_balance(&wallet).await;
    if !is_current(&wallet) {
        log::debug!("Discarding balance for stale wallet {}", wallet);
        return;
    }
    match result {
        Ok(lamports) => store.update_state(|state| state.set_balance_lamports(lamports)),
        Err(e) => store.update_state(|state| state.report_query_failure(&e)),
    }
}

/// Replace the sale snapshot with a fresh query
pub async fn refresh_sale_state<C, S>(
    client: &C,
    store: &S,
    config: &MintConfig,
    wallet: Pubkey,
    is_current: impl Fn(&Pubkey) -> bool,
) where
    C: CandyMachineApi,
    S: MintStateStore,
{
    let result = client
        .get_candy_machine_state(&wallet, &config.candy_machine_id)
        .await;
    if !is_current(&wallet) {
        log::debug!("Discarding sale state for stale wallet {}", wallet);
        return;
    }
    match result {
        Ok(query) => {
            let sale = SaleState::from_query(query, config.start_date_ms);
            store.update_state(|state| state.apply_sale_state(sale));
        }
        Err(e) => store.update_state(|state| state.report_query_failure(&e)),
    }
}

/// Balance then sale state, the refresh run on mount and on wallet change
pub async fn refresh_all<C, S>(
    client: &C,
    store: &S,
    config: &MintConfig,
    wallet: Pubkey,
    is_current: impl Fn(&Pubkey) -> bool,
) where
    C: CandyMachineApi,
    S: MintStateStore,
{
    refresh_balance(client, store, wallet, &is_current).await;
    refresh_sale_state(client, store, config, wallet, &is_current).await;
}

/// Submit one mint and wait for it to reach `Confirmed`
pub async fn mint_and_confirm<C: CandyMachineApi>(
    client: &C,
    candy_machine: &CandyMachineHandle,
    config: &MintConfig,
    payer: &Pubkey,
) -> Result<(), MintError> {
    let tx_id = client
        .mint_one_token(candy_machine, &config.config, payer, &config.treasury)
        .await?;

    let status = client
        .await_transaction_signature_confirmation(&tx_id, config.tx_timeout_ms, Commitment::Confirmed, false)
        .await?;

    match status.and_then(|status| status.err) {
        Some(err) => Err(MintError::ConfirmationError(err.to_string())),
        // no status at all counts as success
        None => Ok(()),
    }
}

/// One full mint cycle: guard, mint, confirm, notify, then refresh.
///
/// Returns the reason when the cycle was refused before touching the chain.
pub async fn run_mint_cycle<C, S>(
    client: &C,
    store: &S,
    config: &MintConfig,
    wallet: Option<Pubkey>,
    is_current: impl Fn(&Pubkey) -> bool,
) -> Result<(), MintBlocked>
where
    C: CandyMachineApi,
    S: MintStateStore,
{
    let mut begun = Err(MintBlocked::NoWallet);
    store.update_state(|state| begun = state.begin_mint(wallet.as_ref()));
    let candy_machine = begun.map_err(|blocker| {
        log::warn!("Mint request ignored: {:?}", blocker);
        blocker
    })?;
    let payer = wallet.ok_or(MintBlocked::NoWallet)?;

    let outcome = mint_and_confirm(client, &candy_machine, config, &payer).await;
    store.update_state(|state| state.record_mint_outcome(&outcome));

    refresh_balance(client, store, payer, &is_current).await;
    store.update_state(|state| state.end_mint());
    refresh_sale_state(client, store, config, payer, &is_current).await;
    Ok(())
}
