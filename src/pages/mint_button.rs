use leptos::*;

use crate::core::layout::MintButtonContent;
use crate::core::mint_state::MintViewState;
use crate::pages::countdown_timer::CountdownTimer;

#[component]
pub fn MintButton(
    state: RwSignal<MintViewState>,
    /// Go-live time the countdown runs towards
    #[prop(into)] go_live_ms: Signal<i64>,
    #[prop(into)] on_mint: Callback<()>,
    #[prop(optional)] mobile: bool,
) -> impl IntoView {
    let content = create_memo(move |_| state.with(MintButtonContent::for_state));
    let disabled = create_memo(move |_| state.with(|s| s.mint_disabled()));
    let image_class = if mobile { "mMintImage" } else { "mintImage" };

    let on_activate = move |_: ()| state.update(|s| s.activate());

    view! {
        <div class="mint-container">
            <button
                class="mintButton"
                disabled=move || disabled.get()
                on:click=move |_| on_mint.call(())
            >
                {move || match content.get() {
                    MintButtonContent::SoldOut => view! { <span>"SOLD OUT"</span> }.into_view(),
                    MintButtonContent::Loading | MintButtonContent::Minting => view! {
                        <div class="loading-spinner"></div>
                    }.into_view(),
                    MintButtonContent::Ready => view! {
                        <img src="./mintButton.png" alt="Mint" class=image_class/>
                    }.into_view(),
                    // keyed on the go-live time so a refreshed date restarts the timer
                    MintButtonContent::Countdown => {
                        let go_live = go_live_ms.get();
                        view! {
                            <CountdownTimer go_live_ms=go_live on_complete=on_activate/>
                        }.into_view()
                    }
                }}
            </button>
        </div>
    }
}
