use serde::{Serialize, Deserialize};

use super::constants::{CANDY_MACHINE_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID};

/// Network environment enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkType {
    /// Devnet cluster, used for dry runs of a drop
    Devnet,
    /// Mainnet-beta cluster - real assets
    Mainnet,
}

/// Network configuration including RPC endpoints and program IDs
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub network_type: NetworkType,
    pub rpc_endpoints: &'static [&'static str],
    pub program_ids: ProgramIds,
}

/// Program IDs the mint transaction references
#[derive(Debug, Clone)]
pub struct ProgramIds {
    pub candy_machine_program_id: &'static str,
    pub token_metadata_program_id: &'static str,
}

impl NetworkConfig {
    const DEVNET: NetworkConfig = NetworkConfig {
        network_type: NetworkType::Devnet,
        rpc_endpoints: &[
            "https://api.devnet.solana.com",
        ],
        program_ids: ProgramIds {
            candy_machine_program_id: CANDY_MACHINE_PROGRAM_ID,
            token_metadata_program_id: TOKEN_METADATA_PROGRAM_ID,
        },
    };

    const MAINNET: NetworkConfig = NetworkConfig {
        network_type: NetworkType::Mainnet,
        rpc_endpoints: &[
            "https://api.mainnet-beta.solana.com",
        ],
        program_ids: ProgramIds {
            candy_machine_program_id: CANDY_MACHINE_PROGRAM_ID,
            token_metadata_program_id: TOKEN_METADATA_PROGRAM_ID,
        },
    };

    /// Get network configuration for specific network type
    pub fn for_network(network: NetworkType) -> &'static NetworkConfig {
        match network {
            NetworkType::Devnet => &Self::DEVNET,
            NetworkType::Mainnet => &Self::MAINNET,
        }
    }

    /// First configured endpoint for this network
    pub fn default_rpc_endpoint(&self) -> &'static str {
        self.rpc_endpoints[0]
    }
}

impl NetworkType {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Devnet => "devnet",
            NetworkType::Mainnet => "mainnet",
        }
    }

    /// Parse the representation produced by `as_str`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "devnet" => Some(NetworkType::Devnet),
            "mainnet" | "mainnet-beta" => Some(NetworkType::Mainnet),
            _ => None,
        }
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            NetworkType::Devnet => "Devnet",
            NetworkType::Mainnet => "Mainnet",
        }
    }
}

impl Default for NetworkType {
    fn default() -> Self {
        NetworkType::Mainnet
    }
}
