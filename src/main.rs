mod app;
mod core;
mod pages;

use app::App;
use leptos::*;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    log::info!("Starting candy mint");

    mount_to_body(|| view! { <App/> });
}
