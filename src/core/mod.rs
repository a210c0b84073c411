pub mod constants;
pub mod network_config;
pub mod settings;
pub mod mint_config;
pub mod rpc_base;
pub mod wallet_bridge;
pub mod candy_machine;
pub mod mint_error;
pub mod countdown;
pub mod mint_state;
pub mod mint_flow;
pub mod layout;
