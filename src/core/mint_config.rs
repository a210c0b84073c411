use std::fmt;
use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

use super::constants::DEFAULT_TX_TIMEOUT_MS;
use super::network_config::{NetworkConfig, NetworkType};
use super::settings::{non_empty, UserSettings};

/// Collection title shown in the page header
pub const DEFAULT_COLLECTION_NAME: &str = "WILD WEST VERSE";

/// Price shown until the candy machine account has been read
pub const DEFAULT_DISPLAY_PRICE_LAMPORTS: u64 = 500_000_000;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidAddress(&'static str, String),
    InvalidNumber(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(field) => write!(f, "Missing configuration: {}", field),
            ConfigError::InvalidAddress(field, msg) => write!(f, "Invalid address for {}: {}", field, msg),
            ConfigError::InvalidNumber(field, msg) => write!(f, "Invalid number for {}: {}", field, msg),
        }
    }
}

/// Raw configuration values before validation.
///
/// Each field is resolved from user settings first, then the build-time
/// environment.
#[derive(Debug, Clone, Default)]
pub struct RawMintConfig {
    pub rpc_endpoint: Option<String>,
    pub candy_machine_id: Option<String>,
    pub config_address: Option<String>,
    pub treasury_address: Option<String>,
    pub start_date_ms: Option<String>,
    pub tx_timeout_ms: Option<String>,
}

impl RawMintConfig {
    fn from_env() -> Self {
        Self {
            rpc_endpoint: option_env!("CANDY_RPC_ENDPOINT").and_then(non_empty),
            candy_machine_id: option_env!("CANDY_MACHINE_ID").and_then(non_empty),
            config_address: option_env!("CANDY_MACHINE_CONFIG").and_then(non_empty),
            treasury_address: option_env!("CANDY_MACHINE_TREASURY").and_then(non_empty),
            start_date_ms: option_env!("CANDY_START_DATE").and_then(non_empty),
            tx_timeout_ms: option_env!("CANDY_TX_TIMEOUT").and_then(non_empty),
        }
    }

    /// Settings win over the environment, field by field
    fn overlay(self, settings: &UserSettings) -> Self {
        Self {
            rpc_endpoint: settings.custom_rpc_endpoint().or(self.rpc_endpoint),
            candy_machine_id: non_empty(&settings.candy_machine_id).or(self.candy_machine_id),
            config_address: non_empty(&settings.config_address).or(self.config_address),
            treasury_address: non_empty(&settings.treasury_address).or(self.treasury_address),
            start_date_ms: (settings.start_date_ms > 0)
                .then(|| settings.start_date_ms.to_string())
                .or(self.start_date_ms),
            tx_timeout_ms: (settings.tx_timeout_ms > 0)
                .then(|| settings.tx_timeout_ms.to_string())
                .or(self.tx_timeout_ms),
        }
    }
}

/// Configuration inputs of the mint page, constant for a session
#[derive(Debug, Clone, PartialEq)]
pub struct MintConfig {
    pub network: NetworkType,
    pub rpc_endpoint: String,
    pub candy_machine_program_id: Pubkey,
    pub token_metadata_program_id: Pubkey,
    pub candy_machine_id: Pubkey,
    pub config: Pubkey,
    pub treasury: Pubkey,
    /// Sale start in unix milliseconds, replaced by the on-chain go-live date once loaded
    pub start_date_ms: i64,
    pub tx_timeout_ms: u64,
    pub collection_name: String,
    pub display_price_lamports: u64,
}

impl MintConfig {
    /// Resolve the configuration for `network` from local storage and the build environment
    pub fn load(network: NetworkType) -> Result<Self, ConfigError> {
        let mut raw = RawMintConfig::from_env();
        if let Some(settings) = UserSettings::load(network) {
            raw = raw.overlay(&settings);
        }
        let config = Self::from_raw(network, raw)?;
        log::info!(
            "Mint config loaded: network={}, rpc={}, candy_machine={}",
            network.display_name(),
            config.rpc_endpoint,
            config.candy_machine_id
        );
        Ok(config)
    }

    pub fn from_raw(network: NetworkType, raw: RawMintConfig) -> Result<Self, ConfigError> {
        let network_config = NetworkConfig::for_network(network);

        let start_date_ms = match raw.start_date_ms {
            Some(value) => parse_start_date(&value)?,
            None => 0,
        };
        let tx_timeout_ms = match raw.tx_timeout_ms {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidNumber("tx_timeout_ms", e.to_string()))?,
            None => DEFAULT_TX_TIMEOUT_MS,
        };

        Ok(Self {
            network,
            rpc_endpoint: raw
                .rpc_endpoint
                .unwrap_or_else(|| network_config.default_rpc_endpoint().to_string()),
            candy_machine_program_id: parse_pubkey(
                "candy_machine_program_id",
                Some(network_config.program_ids.candy_machine_program_id.to_string()),
            )?,
            token_metadata_program_id: parse_pubkey(
                "token_metadata_program_id",
                Some(network_config.program_ids.token_metadata_program_id.to_string()),
            )?,
            candy_machine_id: parse_pubkey("candy_machine_id", raw.candy_machine_id)?,
            config: parse_pubkey("config", raw.config_address)?,
            treasury: parse_pubkey("treasury", raw.treasury_address)?,
            start_date_ms,
            tx_timeout_ms,
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            display_price_lamports: DEFAULT_DISPLAY_PRICE_LAMPORTS,
        })
    }
}

fn parse_pubkey(field: &'static str, value: Option<String>) -> Result<Pubkey, ConfigError> {
    let value = value.ok_or(ConfigError::Missing(field))?;
    Pubkey::from_str(value.trim()).map_err(|e| ConfigError::InvalidAddress(field, e.to_string()))
}

/// Start dates are given in unix seconds or milliseconds; values below 10^12
/// are taken as seconds.
fn parse_start_date(value: &str) -> Result<i64, ConfigError> {
    let parsed = value
        .trim()
        .parse::<i64>()
        .map_err(|e| ConfigError::InvalidNumber("start_date", e.to_string()))?;
    if parsed < 1_000_000_000_000 {
        parsed
            .checked_mul(1000)
            .ok_or_else(|| ConfigError::InvalidNumber("start_date", format!("{} is out of range", parsed)))
    } else {
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_addresses() -> RawMintConfig {
        RawMintConfig {
            candy_machine_id: Some(Pubkey::new_unique().to_string()),
            config_address: Some(Pubkey::new_unique().to_string()),
            treasury_address: Some(Pubkey::new_unique().to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_fill_optional_fields() {
        let config = MintConfig::from_raw(NetworkType::Devnet, raw_with_addresses()).unwrap();
        assert_eq!(config.rpc_endpoint, "https://api.devnet.solana.com");
        assert_eq!(config.tx_timeout_ms, DEFAULT_TX_TIMEOUT_MS);
        assert_eq!(config.start_date_ms, 0);
        assert_eq!(config.collection_name, DEFAULT_COLLECTION_NAME);
    }

    #[test]
    fn test_missing_candy_machine_is_reported() {
        let raw = RawMintConfig {
            candy_machine_id: None,
            ..raw_with_addresses()
        };
        assert_eq!(
            MintConfig::from_raw(NetworkType::Mainnet, raw),
            Err(ConfigError::Missing("candy_machine_id"))
        );
    }

    #[test]
    fn test_invalid_treasury_is_reported() {
        let raw = RawMintConfig {
            treasury_address: Some("not-a-key".to_string()),
            ..raw_with_addresses()
        };
        assert!(matches!(
            MintConfig::from_raw(NetworkType::Mainnet, raw),
            Err(ConfigError::InvalidAddress("treasury", _))
        ));
    }

    #[test]
    fn test_start_date_accepts_seconds_and_millis() {
        assert_eq!(parse_start_date("1635000000").unwrap(), 1_635_000_000_000);
        assert_eq!(parse_start_date("1635000000000").unwrap(), 1_635_000_000_000);
        assert!(parse_start_date("tomorrow").is_err());
        assert!(parse_start_date(&(i64::MIN / 10).to_string()).is_err());
    }

    #[test]
    fn test_settings_override_environment() {
        let settings = UserSettings {
            candy_machine_id: "  ".to_string(),
            tx_timeout_ms: 45_000,
            start_date_ms: 1_700_000_000_000,
            ..Default::default()
        };
        let raw = raw_with_addresses();
        let env_id = raw.candy_machine_id.clone();
        let merged = raw.overlay(&settings);

        assert_eq!(merged.candy_machine_id, env_id);
        assert_eq!(merged.tx_timeout_ms.as_deref(), Some("45000"));
        assert_eq!(merged.start_date_ms.as_deref(), Some("1700000000000"));
    }
}
