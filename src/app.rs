use leptos::*;
use solana_sdk::pubkey::Pubkey;
use std::rc::Rc;

use crate::core::candy_machine::RpcCandyMachine;
use crate::core::mint_config::MintConfig;
use crate::core::settings::load_selected_network;
use crate::pages::{HomePage, SettingsPage};

// main app component
#[component]
pub fn App() -> impl IntoView {
    let network = load_selected_network();
    let (show_settings, set_show_settings) = create_signal(false);

    // the wallet is bound by the connect button and read everywhere else
    let wallet = create_rw_signal(None::<Pubkey>);

    let content = match MintConfig::load(network) {
        Ok(config) => {
            let client = Rc::new(RpcCandyMachine::new(&config));
            view! {
                <Show
                    when=move || show_settings.get()
                    fallback=move || view! {
                        <HomePage config=config.clone() client=client.clone() wallet=wallet/>
                    }
                >
                    <SettingsPage network=network/>
                </Show>
            }
            .into_view()
        }
        Err(e) => {
            log::error!("Invalid mint configuration: {}", e);
            view! {
                <div class="config-error">
                    <h2>"Mint is not configured"</h2>
                    <p class="error-message">{e.to_string()}</p>
                </div>
                <SettingsPage network=network/>
            }
            .into_view()
        }
    };

    view! {
        <div class="container">
            {content}
            <footer class="app-footer">
                <span class="network-badge">{network.display_name()}</span>
                <button
                    class="settings-toggle"
                    on:click=move |_| set_show_settings.update(|shown| *shown = !*shown)
                >
                    {move || if show_settings.get() { "Back to mint" } else { "Settings" }}
                </button>
            </footer>
        </div>
    }
}
