pub mod home_page;
pub mod countdown_timer;
pub mod mint_button;
pub mod alert_snackbar;
pub mod connect_wallet_button;
pub mod settings_page;

pub use home_page::HomePage;
pub use settings_page::SettingsPage;
