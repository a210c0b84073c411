use leptos::*;
use std::time::Duration;

use crate::core::countdown::{Countdown, RemainingTime};

fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

/// Ticking "{H} hours, {M} minutes, {S} seconds" counter.
///
/// `on_complete` fires once, during setup when the go-live time has already
/// passed, otherwise on the first tick at or after it.
#[component]
pub fn CountdownTimer(
    go_live_ms: i64,
    #[prop(into)] on_complete: Callback<()>,
) -> impl IntoView {
    let countdown = store_value(Countdown::new(go_live_ms));
    let (remaining, set_remaining) = create_signal(None::<RemainingTime>);

    let tick = move || {
        let now = now_ms();
        let mut completed = None;
        countdown.update_value(|c| completed = c.observe(now));
        set_remaining.set(countdown.with_value(|c| c.remaining(now)));

        if completed.is_some() {
            log::info!("Countdown to {} completed", go_live_ms);
            on_complete.call(());
        }
    };

    tick();

    let interval_handle = set_interval_with_handle(tick, Duration::from_secs(1));
    on_cleanup(move || {
        if let Ok(handle) = interval_handle {
            handle.clear();
        }
    });

    view! {
        <span class="counter-text">
            {move || remaining.get().map(|r| r.to_string()).unwrap_or_default()}
        </span>
    }
}
