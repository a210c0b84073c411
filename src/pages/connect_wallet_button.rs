use leptos::*;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use crate::core::wallet_bridge::WalletBridge;

/// Connect affordance shown while no wallet is bound
#[component]
pub fn ConnectWalletButton(
    wallet: RwSignal<Option<Pubkey>>,
    #[prop(optional)] mobile: bool,
) -> impl IntoView {
    let (error_message, set_error_message) = create_signal(String::new());
    let (is_connecting, set_is_connecting) = create_signal(false);
    let image_class = if mobile { "mWalletImage" } else { "walletImage" };

    let handle_connect = move |_| {
        if !WalletBridge::is_installed() {
            set_error_message.set("No Solana wallet found. Please install one to continue.".to_string());
            return;
        }

        set_is_connecting.set(true);
        set_error_message.set(String::new());

        spawn_local(async move {
            match WalletBridge::connect().await {
                Ok(address) => match Pubkey::from_str(&address) {
                    Ok(pubkey) => {
                        log::info!("Wallet connected: {}", pubkey);
                        wallet.set(Some(pubkey));
                    }
                    Err(e) => {
                        log::error!("Wallet returned an invalid public key {}: {}", address, e);
                        set_error_message.set(format!("Invalid wallet address: {}", e));
                    }
                },
                Err(e) => {
                    log::error!("Failed to connect wallet: {}", e);
                    set_error_message.set(format!("Failed to connect: {}", e));
                }
            }
            set_is_connecting.set(false);
        });
    };

    view! {
        <div class="wallet-connect">
            <button
                class="walletButton"
                on:click=handle_connect
                disabled=move || is_connecting.get()
            >
                <img src="./connectWallet.png" alt="Connect Your Wallet" class=image_class/>
            </button>
            <Show when=move || !error_message.get().is_empty()>
                <div class="error-message">{move || error_message.get()}</div>
            </Show>
        </div>
    }
}

/// Unbinds the wallet; the page falls back to the disconnected layout
#[component]
pub fn DisconnectWalletButton(wallet: RwSignal<Option<Pubkey>>) -> impl IntoView {
    let handle_disconnect = move |_| {
        spawn_local(async move {
            if let Err(e) = WalletBridge::disconnect().await {
                log::warn!("Wallet disconnect reported an error: {}", e);
            }
            wallet.set(None);
        });
    };

    view! {
        <button class="disconnect-btn" on:click=handle_disconnect>"Disconnect"</button>
    }
}
