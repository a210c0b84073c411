use serde::{Deserialize, Serialize};
use web_sys::Storage;

use super::network_config::NetworkType;

const STORAGE_PREFIX: &str = "candy-mint.settings.";
const NETWORK_KEY: &str = "candy-mint.network";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RpcSelection {
    Default,
    Custom,
}

/// Per-network overrides kept in the browser's local storage.
///
/// Empty strings mean "not set" so a partially filled settings blob still
/// falls through to the build-time defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub rpc_selection: RpcSelection,
    pub custom_rpc_url: String,
    pub candy_machine_id: String,
    pub config_address: String,
    pub treasury_address: String,
    /// Sale start as unix milliseconds, 0 = not set
    pub start_date_ms: i64,
    /// Confirmation timeout, 0 = not set
    pub tx_timeout_ms: u64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            rpc_selection: RpcSelection::Default,
            custom_rpc_url: String::new(),
            candy_machine_id: String::new(),
            config_address: String::new(),
            treasury_address: String::new(),
            start_date_ms: 0,
            tx_timeout_ms: 0,
        }
    }
}

impl UserSettings {
    fn local_storage() -> Option<Storage> {
        web_sys::window()
            .and_then(|win| win.local_storage().ok().flatten())
    }

    fn storage_key(network_type: NetworkType) -> String {
        format!("{}{}", STORAGE_PREFIX, network_type.as_str())
    }

    pub fn load(network_type: NetworkType) -> Option<Self> {
        let storage = Self::local_storage()?;
        let value = storage
            .get_item(&Self::storage_key(network_type))
            .ok()
            .flatten()?;

        Self::from_json(&value)
    }

    pub fn save(network_type: NetworkType, settings: &Self) -> Result<(), String> {
        let storage = Self::local_storage().ok_or_else(|| "Local storage not available".to_string())?;
        let serialized = serde_json::to_string(settings)
            .map_err(|e| format!("Failed to serialize settings: {e}"))?;

        storage
            .set_item(&Self::storage_key(network_type), &serialized)
            .map_err(|_| "Failed to write settings to local storage".to_string())
    }

    fn from_json(value: &str) -> Option<Self> {
        match serde_json::from_str(value) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                None
            }
        }
    }

    pub fn custom_rpc_endpoint(&self) -> Option<String> {
        match self.rpc_selection {
            RpcSelection::Custom => non_empty(&self.custom_rpc_url),
            RpcSelection::Default => None,
        }
    }
}

/// Network the user last selected, defaulting to mainnet
pub fn load_selected_network() -> NetworkType {
    web_sys::window()
        .and_then(|win| win.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(NETWORK_KEY).ok().flatten())
        .and_then(|value| NetworkType::parse(&value))
        .unwrap_or_default()
}

pub fn save_selected_network(network_type: NetworkType) -> Result<(), String> {
    let storage = UserSettings::local_storage().ok_or_else(|| "Local storage not available".to_string())?;
    storage
        .set_item(NETWORK_KEY, network_type.as_str())
        .map_err(|_| "Failed to write network to local storage".to_string())
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
