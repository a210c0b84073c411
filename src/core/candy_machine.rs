use borsh::{BorshDeserialize, BorshSerialize};
use gloo_timers::future::TimeoutFuture;
use js_sys::Date;
use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_instruction, system_program, sysvar,
    transaction::Transaction,
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account,
};
use spl_token::solana_program::program_pack::Pack;

use super::constants::*;
use super::mint_config::MintConfig;
use super::mint_error::MintError;
use super::rpc_base::{Commitment, RpcConnection, SignatureStatus};
use super::wallet_bridge::WalletBridge;

/// Candy machine sale data as stored on chain (v1 layout)
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct CandyMachineData {
    pub uuid: String,
    pub price: u64,
    pub items_available: u64,
    /// Unix seconds
    pub go_live_date: Option<i64>,
}

/// Candy machine account body, after the 8-byte discriminator
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct CandyMachineAccount {
    pub authority: [u8; 32],
    pub wallet: [u8; 32],
    pub token_mint: Option<[u8; 32]>,
    pub config: [u8; 32],
    pub data: CandyMachineData,
    pub items_redeemed: u64,
    pub bump: u8,
}

/// What a mint needs to know about the candy machine it targets
#[derive(Debug, Clone, PartialEq)]
pub struct CandyMachineHandle {
    pub id: Pubkey,
    pub authority: Pubkey,
    pub wallet: Pubkey,
    pub config: Pubkey,
    pub price_lamports: u64,
}

/// Snapshot of a sale, replaced wholesale on every refresh
#[derive(Debug, Clone, PartialEq)]
pub struct CandyMachineState {
    pub candy_machine: CandyMachineHandle,
    /// Unix milliseconds, `None` when the machine has no go-live date set
    pub go_live_date_ms: Option<i64>,
    pub items_available: u64,
    pub items_remaining: u64,
    pub items_redeemed: u64,
}

/// The operations the mint page needs from the chain.
///
/// The page is generic over this so the mint cycle can run against an
/// in-memory double.
#[allow(async_fn_in_trait)]
pub trait CandyMachineApi {
    async fn get_candy_machine_state(
        &self,
        wallet: &Pubkey,
        candy_machine_id: &Pubkey,
    ) -> Result<CandyMachineState, MintError>;

    /// Build, sign and submit one mint; returns the transaction signature
    async fn mint_one_token(
        &self,
        candy_machine: &CandyMachineHandle,
        config: &Pubkey,
        payer: &Pubkey,
        treasury: &Pubkey,
    ) -> Result<String, MintError>;

    /// Wait until `tx_id` reaches `commitment` or reports an error.
    ///
    /// With `query_status` the first status check happens immediately instead
    /// of after one poll interval.
    async fn await_transaction_signature_confirmation(
        &self,
        tx_id: &str,
        timeout_ms: u64,
        commitment: Commitment,
        query_status: bool,
    ) -> Result<Option<SignatureStatus>, MintError>;

    /// Lamport balance of `pubkey`
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, MintError>;
}

/// Anchor account discriminator of `CandyMachine`
pub fn candy_machine_account_discriminator() -> [u8; 8] {
    anchor_discriminator(b"account:CandyMachine")
}

/// Anchor instruction discriminator of `mint_nft`
pub fn mint_nft_discriminator() -> [u8; 8] {
    anchor_discriminator(b"global:mint_nft")
}

fn anchor_discriminator(preimage: &[u8]) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(preimage);
    let result = hasher.finalize();
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&result[..8]);
    discriminator
}

/// Decode a candy machine account into a sale snapshot
pub fn decode_candy_machine(id: &Pubkey, data: &[u8]) -> Result<CandyMachineState, MintError> {
    if data.len() < ACCOUNT_DISCRIMINATOR_SIZE {
        return Err(MintError::QueryFailed(format!("Account {} is too short", id)));
    }
    if data[..ACCOUNT_DISCRIMINATOR_SIZE] != candy_machine_account_discriminator() {
        return Err(MintError::QueryFailed(format!("Account {} is not a candy machine", id)));
    }

    // trailing bytes are allowed, the account is allocated with headroom
    let mut body = &data[ACCOUNT_DISCRIMINATOR_SIZE..];
    let account = CandyMachineAccount::deserialize(&mut body)
        .map_err(|e| MintError::QueryFailed(format!("Failed to decode candy machine {}: {}", id, e)))?;

    let items_available = account.data.items_available;
    let items_redeemed = account.items_redeemed;
    let go_live_date_ms = match account.data.go_live_date {
        Some(seconds) => Some(seconds.checked_mul(1000).ok_or_else(|| {
            MintError::QueryFailed(format!("Candy machine {} has an out of range go-live date {}", id, seconds))
        })?),
        None => None,
    };

    Ok(CandyMachineState {
        candy_machine: CandyMachineHandle {
            id: *id,
            authority: Pubkey::new_from_array(account.authority),
            wallet: Pubkey::new_from_array(account.wallet),
            config: Pubkey::new_from_array(account.config),
            price_lamports: account.data.price,
        },
        go_live_date_ms,
        items_available,
        items_remaining: items_available.saturating_sub(items_redeemed),
        items_redeemed,
    })
}

/// Metadata PDA of `mint`
pub fn find_metadata_address(token_metadata_program_id: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[METADATA_SEED, token_metadata_program_id.as_ref(), mint.as_ref()],
        token_metadata_program_id,
    )
    .0
}

/// Master edition PDA of `mint`
pub fn find_master_edition_address(token_metadata_program_id: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[METADATA_SEED, token_metadata_program_id.as_ref(), mint.as_ref(), EDITION_SEED],
        token_metadata_program_id,
    )
    .0
}

/// Accounts and programs a mint transaction refers to
#[derive(Debug, Clone)]
pub struct MintAccounts {
    pub candy_machine_program_id: Pubkey,
    pub token_metadata_program_id: Pubkey,
    pub candy_machine: Pubkey,
    pub config: Pubkey,
    pub payer: Pubkey,
    pub treasury: Pubkey,
    pub mint: Pubkey,
}

/// Instructions of one mint: create and initialize the NFT mint, give the
/// payer a token account holding one token, then let the candy machine attach
/// metadata and a master edition.
pub fn build_mint_instructions(
    accounts: &MintAccounts,
    mint_rent_lamports: u64,
) -> Result<Vec<Instruction>, MintError> {
    let token_program_id = spl_token::id();
    let payer = &accounts.payer;
    let mint = &accounts.mint;
    let token_account = get_associated_token_address(payer, mint);
    let metadata = find_metadata_address(&accounts.token_metadata_program_id, mint);
    let master_edition = find_master_edition_address(&accounts.token_metadata_program_id, mint);

    let initialize_mint = spl_token::instruction::initialize_mint(&token_program_id, mint, payer, Some(payer), 0)
        .map_err(|e| MintError::CollaboratorMessage(format!("Failed to build initialize_mint: {}", e)))?;
    let mint_to = spl_token::instruction::mint_to(&token_program_id, mint, &token_account, payer, &[], 1)
        .map_err(|e| MintError::CollaboratorMessage(format!("Failed to build mint_to: {}", e)))?;

    let mint_nft = Instruction::new_with_bytes(
        accounts.candy_machine_program_id,
        &mint_nft_discriminator(),
        vec![
            AccountMeta::new_readonly(accounts.config, false),
            AccountMeta::new(accounts.candy_machine, false),
            AccountMeta::new(*payer, true),
            AccountMeta::new(accounts.treasury, false),
            AccountMeta::new(metadata, false),
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(*payer, true), // mint authority
            AccountMeta::new_readonly(*payer, true), // update authority
            AccountMeta::new(master_edition, false),
            AccountMeta::new_readonly(accounts.token_metadata_program_id, false),
            AccountMeta::new_readonly(token_program_id, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(sysvar::clock::id(), false),
        ],
    );

    Ok(vec![
        system_instruction::create_account(
            payer,
            mint,
            mint_rent_lamports,
            spl_token::state::Mint::LEN as u64,
            &token_program_id,
        ),
        initialize_mint,
        create_associated_token_account(payer, payer, mint, &token_program_id),
        mint_to,
        mint_nft,
    ])
}

/// `"abcd...wxyz"` form of an address
pub fn shorten_address(address: &str, chars: usize) -> String {
    let count = address.chars().count();
    if count <= chars * 2 {
        return address.to_string();
    }
    let head: String = address.chars().take(chars).collect();
    let tail: String = address.chars().skip(count - chars).collect();
    format!("{}...{}", head, tail)
}

/// Candy machine collaborator backed by JSON-RPC and the browser wallet
pub struct RpcCandyMachine {
    rpc: RpcConnection,
    candy_machine_program_id: Pubkey,
    token_metadata_program_id: Pubkey,
}

impl RpcCandyMachine {
    pub fn new(config: &MintConfig) -> Self {
        log::debug!("Candy machine client using RPC endpoint: {}", config.rpc_endpoint);
        Self {
            rpc: RpcConnection::with_endpoint(&config.rpc_endpoint),
            candy_machine_program_id: config.candy_machine_program_id,
            token_metadata_program_id: config.token_metadata_program_id,
        }
    }
}

impl CandyMachineApi for RpcCandyMachine {
    async fn get_candy_machine_state(
        &self,
        wallet: &Pubkey,
        candy_machine_id: &Pubkey,
    ) -> Result<CandyMachineState, MintError> {
        log::info!("Loading candy machine {} for wallet {}", candy_machine_id, wallet);

        let data = self
            .rpc
            .get_account_data(candy_machine_id)
            .await
            .map_err(|e| MintError::QueryFailed(e.to_string()))?
            .ok_or_else(|| MintError::QueryFailed(format!("Candy machine {} not found", candy_machine_id)))?;

        let state = decode_candy_machine(candy_machine_id, &data)?;
        log::info!(
            "Candy machine state: available={}, redeemed={}, remaining={}",
            state.items_available,
            state.items_redeemed,
            state.items_remaining
        );
        Ok(state)
    }

    async fn mint_one_token(
        &self,
        candy_machine: &CandyMachineHandle,
        config: &Pubkey,
        payer: &Pubkey,
        treasury: &Pubkey,
    ) -> Result<String, MintError> {
        let mint = Keypair::new();
        log::info!("Minting from candy machine {} into new mint {}", candy_machine.id, mint.pubkey());

        let mint_rent = self
            .rpc
            .get_minimum_balance_for_rent_exemption(spl_token::state::Mint::LEN)
            .await?;

        let instructions = build_mint_instructions(
            &MintAccounts {
                candy_machine_program_id: self.candy_machine_program_id,
                token_metadata_program_id: self.token_metadata_program_id,
                candy_machine: candy_machine.id,
                config: *config,
                payer: *payer,
                treasury: *treasury,
                mint: mint.pubkey(),
            },
            mint_rent,
        )?;

        let blockhash = self.rpc.get_latest_blockhash().await?;
        let mut transaction = Transaction::new_unsigned(Message::new(&instructions, Some(payer)));
        transaction
            .try_partial_sign(&[&mint], blockhash)
            .map_err(|e| MintError::CollaboratorMessage(format!("Failed to sign with mint key: {}", e)))?;

        let unsigned = base64::encode(
            bincode::serialize(&transaction)
                .map_err(|e| MintError::CollaboratorMessage(format!("Failed to serialize transaction: {}", e)))?,
        );

        log::info!("Requesting wallet signature...");
        let signed = WalletBridge::sign_transaction(&unsigned).await?;

        let signature = self
            .rpc
            .send_raw_transaction(&signed, false, Commitment::Confirmed)
            .await?;
        log::info!("Mint transaction submitted: {}", signature);
        Ok(signature)
    }

    async fn await_transaction_signature_confirmation(
        &self,
        tx_id: &str,
        timeout_ms: u64,
        commitment: Commitment,
        query_status: bool,
    ) -> Result<Option<SignatureStatus>, MintError> {
        let deadline = Date::now() + timeout_ms as f64;

        if !query_status {
            TimeoutFuture::new(CONFIRMATION_POLL_INTERVAL_MS).await;
        }

        loop {
            match self.rpc.get_signature_status(tx_id).await {
                Ok(Some(status)) if status.err.is_some() => {
                    log::warn!("Transaction {} failed: {:?}", tx_id, status.err);
                    return Ok(Some(status));
                }
                Ok(Some(status)) if status.satisfies(commitment) => {
                    log::info!("Transaction {} reached {} at slot {}", tx_id, commitment.as_str(), status.slot);
                    return Ok(Some(status));
                }
                Ok(_) => log::debug!("Transaction {} not yet {}", tx_id, commitment.as_str()),
                Err(e) => log::warn!("Signature status query failed, retrying: {}", e),
            }

            if Date::now() >= deadline {
                log::error!("Timed out after {} ms awaiting {}", timeout_ms, tx_id);
                return Err(MintError::CollaboratorMessage(format!(
                    "Timed out awaiting confirmation on transaction {}",
                    tx_id
                )));
            }
            TimeoutFuture::new(CONFIRMATION_POLL_INTERVAL_MS).await;
        }
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, MintError> {
        self.rpc
            .get_balance(pubkey)
            .await
            .map_err(|e| MintError::QueryFailed(e.to_string()))
    }
}
