use leptos::*;

use crate::core::network_config::{NetworkConfig, NetworkType};
use crate::core::settings::{save_selected_network, RpcSelection, UserSettings};

/// Per-network drop settings, saved to local storage.
///
/// Configuration is constant for a session, so saving reloads the page.
#[component]
pub fn SettingsPage(network: NetworkType) -> impl IntoView {
    let (selected_network, set_selected_network) = create_signal(network);
    let settings = create_rw_signal(UserSettings::load(network).unwrap_or_default());
    let (status_message, set_status_message) = create_signal(String::new());

    // switching networks shows that network's saved values
    let select_network = move |network: NetworkType| {
        set_selected_network.set(network);
        settings.set(UserSettings::load(network).unwrap_or_default());
    };

    let current_rpc_url = move || {
        let network = selected_network.get();
        settings.with(|s| s.custom_rpc_endpoint())
            .unwrap_or_else(|| NetworkConfig::for_network(network).default_rpc_endpoint().to_string())
    };

    let text_field = move |label: &'static str, getter: fn(&UserSettings) -> String, setter: fn(&mut UserSettings, String)| {
        view! {
            <div class="settings-field">
                <label>{label}</label>
                <input
                    type="text"
                    class="settings-input"
                    prop:value=move || settings.with(getter)
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        settings.update(|s| setter(s, value));
                    }
                />
            </div>
        }
    };

    let handle_save = move |_| {
        let network = selected_network.get_untracked();
        let result = settings
            .with_untracked(|s| UserSettings::save(network, s))
            .and_then(|_| save_selected_network(network));

        match result {
            Ok(()) => {
                log::info!("Saved settings for {}", network.display_name());
                if let Err(e) = window().location().reload() {
                    log::error!("Failed to reload after saving settings: {:?}", e);
                    set_status_message.set("Saved. Reload the page to apply.".to_string());
                }
            }
            Err(e) => {
                log::error!("Failed to save settings: {}", e);
                set_status_message.set(e);
            }
        }
    };

    view! {
        <div class="settings-page">
            <h2>"Settings"</h2>

            <div class="settings-section">
                <h3>"Network"</h3>
                {[NetworkType::Devnet, NetworkType::Mainnet]
                    .into_iter()
                    .map(|network| view! {
                        <div class="radio-option">
                            <input
                                type="radio"
                                id=network.as_str()
                                name="network"
                                checked=move || selected_network.get() == network
                                on:change=move |_| select_network(network)
                            />
                            <label for=network.as_str()>{network.display_name()}</label>
                        </div>
                    })
                    .collect_view()}
            </div>

            <div class="settings-section">
                <h3>"RPC Configuration"</h3>
                <div class="radio-option">
                    <input
                        type="radio"
                        id="rpc-default"
                        name="rpc-selection"
                        checked=move || settings.with(|s| s.rpc_selection == RpcSelection::Default)
                        on:change=move |_| settings.update(|s| s.rpc_selection = RpcSelection::Default)
                    />
                    <label for="rpc-default">
                        {move || format!("Default ({})", NetworkConfig::for_network(selected_network.get()).default_rpc_endpoint())}
                    </label>
                </div>
                <div class="radio-option">
                    <input
                        type="radio"
                        id="rpc-custom"
                        name="rpc-selection"
                        checked=move || settings.with(|s| s.rpc_selection == RpcSelection::Custom)
                        on:change=move |_| settings.update(|s| s.rpc_selection = RpcSelection::Custom)
                    />
                    <label for="rpc-custom">"Custom"</label>
                    <input
                        type="text"
                        class="custom-rpc-input"
                        placeholder="Enter custom RPC URL"
                        prop:value=move || settings.with(|s| s.custom_rpc_url.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            settings.update(|s| s.custom_rpc_url = value);
                        }
                        disabled=move || settings.with(|s| s.rpc_selection != RpcSelection::Custom)
                    />
                </div>
                <div class="current-rpc">
                    <h4>"Current RPC URL:"</h4>
                    <div class="rpc-url">{current_rpc_url}</div>
                </div>
            </div>

            <div class="settings-section">
                <h3>"Drop"</h3>
                {text_field("Candy machine ID", |s| s.candy_machine_id.clone(), |s, v| s.candy_machine_id = v)}
                {text_field("Config address", |s| s.config_address.clone(), |s, v| s.config_address = v)}
                {text_field("Treasury address", |s| s.treasury_address.clone(), |s, v| s.treasury_address = v)}
                {text_field(
                    "Start date (unix ms, 0 = unset)",
                    |s| s.start_date_ms.to_string(),
                    |s, v| s.start_date_ms = v.trim().parse().unwrap_or(0),
                )}
            </div>

            <button class="save-btn" on:click=handle_save>"Save and reload"</button>
            <Show when=move || !status_message.get().is_empty()>
                <p class="status-message">{move || status_message.get()}</p>
            </Show>
        </div>
    }
}
