use leptos::*;
use solana_sdk::pubkey::Pubkey;
use std::rc::Rc;

use crate::core::candy_machine::RpcCandyMachine;
use crate::core::layout::{summary_rows, LayoutBranch};
use crate::core::mint_config::MintConfig;
use crate::core::mint_flow::{refresh_all, run_mint_cycle};
use crate::core::mint_state::MintViewState;
use crate::pages::alert_snackbar::AlertSnackbar;
use crate::pages::connect_wallet_button::{ConnectWalletButton, DisconnectWalletButton};
use crate::pages::mint_button::MintButton;

/// Assumed width when the window cannot be measured
const FALLBACK_VIEWPORT_WIDTH: f64 = 1024.0;

pub fn viewport_width() -> f64 {
    web_sys::window()
        .and_then(|win| win.inner_width().ok())
        .and_then(|width| width.as_f64())
        .unwrap_or(FALLBACK_VIEWPORT_WIDTH)
}

/// The mint view: wallet panel, counters, countdown and mint control
#[component]
pub fn HomePage(
    config: MintConfig,
    client: Rc<RpcCandyMachine>,
    wallet: RwSignal<Option<Pubkey>>,
) -> impl IntoView {
    let state = create_rw_signal(MintViewState::new());
    let config = Rc::new(config);

    let (width, set_width) = create_signal(viewport_width());
    let resize_handle = window_event_listener(ev::resize, move |_| set_width.set(viewport_width()));
    on_cleanup(move || resize_handle.remove());

    let branch = create_memo(move |_| LayoutBranch::select(wallet.with(|w| w.is_some()), width.get()));

    // results for a wallet that has since changed are dropped
    let is_current = move |requested: &Pubkey| wallet.with_untracked(|w| w.as_ref() == Some(requested));

    // refresh on mount and whenever the bound wallet changes
    {
        let client = client.clone();
        let config = config.clone();
        create_effect(move |previous: Option<Option<Pubkey>>| {
            let bound = wallet.get();
            if previous.is_some_and(|previous| previous != bound) {
                state.update(|s| s.clear_wallet_data());
            }
            let Some(current) = bound else {
                return bound;
            };
            log::info!("Refreshing mint state for wallet {}", current);
            let client = client.clone();
            let config = config.clone();
            spawn_local(async move {
                refresh_all(client.as_ref(), &state, config.as_ref(), current, is_current).await;
            });
            bound
        });
    }

    let on_mint = {
        let client = client.clone();
        let config = config.clone();
        Callback::new(move |_: ()| {
            let client = client.clone();
            let config = config.clone();
            spawn_local(async move {
                let result = run_mint_cycle(
                    client.as_ref(),
                    &state,
                    config.as_ref(),
                    wallet.get_untracked(),
                    is_current,
                )
                .await;
                if let Err(blocker) = result {
                    log::debug!("Mint not started: {:?}", blocker);
                }
            });
        })
    };

    let start_date_ms = config.start_date_ms;
    let go_live_ms = create_memo(move |_| {
        state.with(|s| s.sale.as_ref().map_or(start_date_ms, |sale| sale.go_live_date_ms))
    });

    let collection_name = config.collection_name.clone();
    let display_price = config.display_price_lamports;

    let rows = move || {
        let rows = wallet.with(|w| {
            w.as_ref()
                .map(|w| state.with(|s| summary_rows(w, s, display_price)))
                .unwrap_or_default()
        });
        rows.into_iter()
            .map(|row| view! {
                <div class="walletInnerTextContainer">
                    <p class="walletInnerTextLeft">{row.label}</p>
                    <p class="walletInnerTextRight">{row.value}</p>
                </div>
            })
            .collect_view()
    };

    let header = move |mobile: bool, title: String| {
        let (container, logo, text) = if mobile {
            ("mHeaderContainer", "mHeaderLogo", "mHeaderText")
        } else {
            ("headerContainer", "headerLogo", "headerText")
        };
        view! {
            <div class=container>
                <div class=logo><img class="imageContainer" src="./favicon.ico" alt=""/></div>
                <div class=text>{title}</div>
            </div>
        }
    };

    let nft_image = move |mobile: bool| {
        let (outer, inner) = if mobile {
            ("mNftImageContainerOuter", "mNftImageContainerInner")
        } else {
            ("nftImageContainerOuter", "nftImageContainerInner")
        };
        view! {
            <div class=outer>
                <div class=inner><img class="imageContainer" src="./nft.gif" alt=""/></div>
            </div>
        }
    };

    view! {
        <main>
            {move || {
                let title = collection_name.clone();
                match branch.get() {
                    LayoutBranch::ConnectedDesktop => view! {
                        <div class="homeContainer">
                            {header(false, title)}
                            <div class="homeGridContainer">
                                {nft_image(false)}
                                <div class="walletContainer">
                                    <div class="walletInnerContainer">
                                        <div class="walletTextAreaContainer">{rows}</div>
                                        <div class="walletButtonContainer">
                                            <MintButton state=state go_live_ms=go_live_ms on_mint=on_mint/>
                                        </div>
                                        <DisconnectWalletButton wallet=wallet/>
                                    </div>
                                </div>
                            </div>
                        </div>
                    }.into_view(),
                    LayoutBranch::ConnectedMobile => view! {
                        <div class="mHomeContainer">
                            {header(true, title)}
                            <div class="mWalletTextAreaContainer">{rows}</div>
                            <div class="mMintContainer">
                                <MintButton state=state go_live_ms=go_live_ms on_mint=on_mint mobile=true/>
                            </div>
                            {nft_image(true)}
                            <DisconnectWalletButton wallet=wallet/>
                        </div>
                    }.into_view(),
                    LayoutBranch::DisconnectedDesktop => view! {
                        <div class="homeContainer">
                            {header(false, title)}
                            <div class="homeGridContainer">
                                {nft_image(false)}
                                <div class="walletContainer">
                                    <ConnectWalletButton wallet=wallet/>
                                </div>
                            </div>
                        </div>
                    }.into_view(),
                    LayoutBranch::DisconnectedMobile => view! {
                        <div class="mHomeContainer">
                            {header(true, title)}
                            <div class="mWalletContainer">
                                <ConnectWalletButton wallet=wallet mobile=true/>
                            </div>
                            {nft_image(true)}
                        </div>
                    }.into_view(),
                }
            }}
            <AlertSnackbar state=state/>
        </main>
    }
}
