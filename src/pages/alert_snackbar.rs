use gloo_timers::callback::Timeout;
use leptos::*;

use crate::core::constants::ALERT_AUTO_HIDE_MS;
use crate::core::mint_state::MintViewState;

/// Dismissible notification for the latest alert
#[component]
pub fn AlertSnackbar(state: RwSignal<MintViewState>) -> impl IntoView {
    let alert = create_memo(move |_| state.with(|s| s.alert.clone()));

    // each alert arms its own timer; dismissal is keyed on the id
    create_effect(move |_| {
        let current = alert.get();
        if current.open {
            let id = current.id;
            Timeout::new(ALERT_AUTO_HIDE_MS, move || {
                state.update(|s| s.dismiss_alert(id));
            })
            .forget();
        }
    });

    let close = move |_| {
        let id = alert.get_untracked().id;
        state.update(|s| s.dismiss_alert(id));
    };

    view! {
        <Show when=move || alert.with(|a| a.open)>
            <div class=move || {
                let severity = alert.with(|a| a.severity.map(|s| s.as_str()).unwrap_or("info"));
                format!("snackbar alert-{}", severity)
            }>
                <span class="alert-message">{move || alert.with(|a| a.message.clone())}</span>
                <button class="alert-close" on:click=close>"×"</button>
            </div>
        </Show>
    }
}
