use std::fmt;

use super::constants::*;
use super::rpc_base::RpcError;
use super::wallet_bridge::WalletBridgeError;

/// Failure surfaced by the candy machine collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum MintError {
    /// Reading sale state or balance failed
    QueryFailed(String),
    /// The transaction landed but the cluster reported an error for it
    ConfirmationError(String),
    /// The candy machine program rejected the mint with a numeric code
    CollaboratorCode(u32),
    /// Anything else, described only by text
    CollaboratorMessage(String),
}

impl fmt::Display for MintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MintError::QueryFailed(msg) => write!(f, "Query failed: {}", msg),
            MintError::ConfirmationError(msg) => write!(f, "Transaction failed on chain: {}", msg),
            MintError::CollaboratorCode(code) => write!(f, "Candy machine error {} (0x{:x})", code, code),
            MintError::CollaboratorMessage(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<RpcError> for MintError {
    fn from(error: RpcError) -> Self {
        match error {
            RpcError::InstructionError { code, .. } => MintError::CollaboratorCode(code),
            other => MintError::CollaboratorMessage(other.to_string()),
        }
    }
}

impl From<WalletBridgeError> for MintError {
    fn from(error: WalletBridgeError) -> Self {
        MintError::CollaboratorMessage(error.to_string())
    }
}

/// Alert severity, mirrors the notification banner's color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// What the user is told about one mint attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintNotice {
    pub message: &'static str,
    pub severity: Severity,
    /// The outcome proves the collection is sold out
    pub marks_sold_out: bool,
}

impl MintNotice {
    const fn error(message: &'static str) -> Self {
        Self {
            message,
            severity: Severity::Error,
            marks_sold_out: false,
        }
    }

    const fn sold_out() -> Self {
        Self {
            message: MSG_SOLD_OUT,
            severity: Severity::Error,
            marks_sold_out: true,
        }
    }

    pub const fn succeeded() -> Self {
        Self {
            message: MSG_MINT_SUCCEEDED,
            severity: Severity::Success,
            marks_sold_out: false,
        }
    }
}

impl MintError {
    /// Map the error to the single notification shown for it
    pub fn classify(&self) -> MintNotice {
        match self {
            MintError::ConfirmationError(_) => MintNotice::error(MSG_MINT_FAILED),
            MintError::CollaboratorCode(ERROR_CANDY_MACHINE_EMPTY) => MintNotice::sold_out(),
            MintError::CollaboratorCode(ERROR_CANDY_MACHINE_NOT_LIVE) => MintNotice::error(MSG_NOT_LIVE),
            MintError::CollaboratorCode(_) => MintNotice::error(MSG_MINTING_FAILED),
            MintError::CollaboratorMessage(text) => classify_message(text),
            MintError::QueryFailed(_) => MintNotice::error(MSG_MINTING_FAILED),
        }
    }
}

/// Recognise program errors that only reached us as text, e.g.
/// "custom program error: 0x137"
fn classify_message(text: &str) -> MintNotice {
    let codes = hex_codes(text);
    let has_code = |code: u32| codes.contains(&code);

    if has_code(ERROR_CANDY_MACHINE_NOT_LIVE) {
        MintNotice::error(MSG_NOT_LIVE)
    } else if has_code(ERROR_CANDY_MACHINE_EMPTY) {
        MintNotice::sold_out()
    } else if has_code(ERROR_NOT_ENOUGH_SOL) {
        MintNotice::error(MSG_INSUFFICIENT_FUNDS)
    } else {
        MintNotice::error(MSG_MINTING_FAILED)
    }
}

/// Every whole `0x`-prefixed hex token in `text`
fn hex_codes(text: &str) -> Vec<u32> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter_map(|token| token.strip_prefix("0x"))
        .filter_map(|digits| u32::from_str_radix(digits, 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_codes() {
        assert_eq!(MintError::CollaboratorCode(311).classify(), MintNotice {
            message: "SOLD OUT!",
            severity: Severity::Error,
            marks_sold_out: true,
        });

        let not_live = MintError::CollaboratorCode(312).classify();
        assert_eq!(not_live.message, "Minting period hasn't started yet.");
        assert!(!not_live.marks_sold_out);

        let other = MintError::CollaboratorCode(309).classify();
        assert_eq!(other.message, "Minting failed! Please try again!");
        assert_eq!(other.severity, Severity::Error);
    }

    #[test]
    fn test_free_text_codes() {
        let sold_out = MintError::CollaboratorMessage(
            "Transaction simulation failed: custom program error: 0x137".to_string(),
        );
        assert!(sold_out.classify().marks_sold_out);
        assert_eq!(sold_out.classify().message, "SOLD OUT!");

        let not_live = MintError::CollaboratorMessage("custom program error: 0x138".to_string());
        assert_eq!(not_live.classify().message, "Minting period hasn't started yet.");
        assert!(!not_live.classify().marks_sold_out);

        let broke = MintError::CollaboratorMessage("custom program error: 0x135".to_string());
        assert_eq!(broke.classify().message, "Insufficient funds to mint. Please fund your wallet.");

        let longer = MintError::CollaboratorMessage("custom program error: 0x1388".to_string());
        assert_eq!(longer.classify().message, "Minting failed! Please try again!");
        let longer = MintError::CollaboratorMessage("custom program error: 0x1370".to_string());
        assert!(!longer.classify().marks_sold_out);

        let unknown = MintError::CollaboratorMessage("User rejected the request.".to_string());
        assert_eq!(unknown.classify().message, "Minting failed! Please try again!");
    }

    #[test]
    fn test_confirmation_error_message() {
        let notice = MintError::ConfirmationError("InstructionError".to_string()).classify();
        assert_eq!(notice.message, "Mint failed! Please try again!");
        assert_eq!(notice.severity, Severity::Error);
    }

    #[test]
    fn test_rpc_errors_convert() {
        let typed: MintError = RpcError::InstructionError { code: 311, message: "sim failed".to_string() }.into();
        assert_eq!(typed, MintError::CollaboratorCode(311));

        let text: MintError = RpcError::ConnectionFailed("offline".to_string()).into();
        assert_eq!(text, MintError::CollaboratorMessage("Connection failed: offline".to_string()));

        let wallet: MintError = WalletBridgeError::SigningFailed("User rejected".to_string()).into();
        assert!(matches!(wallet, MintError::CollaboratorMessage(ref m) if m.contains("User rejected")));
    }
}
