//! Shared constants used across the mint page
//!
//! Program addresses, on-chain error codes and UI thresholds live here so the
//! collaborator, the state model and the components agree on them.

// ============================================================================
// Units
// ============================================================================

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

// ============================================================================
// Program IDs
// ============================================================================

/// Candy machine v1 program
pub const CANDY_MACHINE_PROGRAM_ID: &str = "cndyAnrLdpjq1Ssp1z8xxDsB8dxe7u4HL5Nxi2K5WXZ";

/// Metaplex token metadata program
pub const TOKEN_METADATA_PROGRAM_ID: &str = "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s";

/// Seed prefix for metadata and master edition PDAs
pub const METADATA_SEED: &[u8] = b"metadata";

/// Seed suffix for the master edition PDA
pub const EDITION_SEED: &[u8] = b"edition";

/// Anchor account discriminator length
pub const ACCOUNT_DISCRIMINATOR_SIZE: usize = 8;

// ============================================================================
// Candy machine error codes (Anchor custom errors, offset 300)
// ============================================================================

/// NotEnoughSOL (0x135)
pub const ERROR_NOT_ENOUGH_SOL: u32 = 309;

/// CandyMachineEmpty (0x137)
pub const ERROR_CANDY_MACHINE_EMPTY: u32 = 311;

/// CandyMachineNotLiveYet (0x138)
pub const ERROR_CANDY_MACHINE_NOT_LIVE: u32 = 312;

// ============================================================================
// User-facing messages
// ============================================================================

pub const MSG_MINT_SUCCEEDED: &str = "Congratulations! Mint succeeded!";
pub const MSG_MINT_FAILED: &str = "Mint failed! Please try again!";
pub const MSG_MINTING_FAILED: &str = "Minting failed! Please try again!";
pub const MSG_SOLD_OUT: &str = "SOLD OUT!";
pub const MSG_NOT_LIVE: &str = "Minting period hasn't started yet.";
pub const MSG_INSUFFICIENT_FUNDS: &str = "Insufficient funds to mint. Please fund your wallet.";
pub const MSG_STATE_QUERY_FAILED: &str = "Failed to load mint state. Please refresh the page.";

// ============================================================================
// Timing and layout
// ============================================================================

/// Default wait for a mint transaction to confirm
pub const DEFAULT_TX_TIMEOUT_MS: u64 = 30_000;

/// Interval between getSignatureStatuses polls
pub const CONFIRMATION_POLL_INTERVAL_MS: u32 = 500;

/// Notification auto-hide delay
pub const ALERT_AUTO_HIDE_MS: u32 = 6_000;

/// Viewports at or below this width use the mobile layout
pub const MOBILE_BREAKPOINT_PX: f64 = 850.0;

/// Characters kept on each side when shortening an address
pub const SHORT_ADDRESS_CHARS: usize = 4;
