mod app;
mod chart_view;
mod data;
mod measure;
mod tooltip;

use leptos::mount::mount_to;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_web::MakeWebConsoleWriter;
use wasm_bindgen::JsCast;

/// Route the engine's tracing events to the browser console.
fn init_tracing() {
    let console = tracing_subscriber::fmt::layer()
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(LevelFilter::INFO);
    if tracing_subscriber::registry().with(console).try_init().is_err() {
        web_sys::console::warn_1(&"tracing subscriber already installed".into());
    }
}

fn main() {
    console_error_panic_hook::set_once();
    init_tracing();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let target = document
        .get_element_by_id("app")
        .and_then(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .or_else(|| document.body());
    let Some(target) = target else {
        tracing::warn!("no #app element or body to mount the report into");
        return;
    };

    // The report lives for the whole page.
    mount_to(target, app::App).forget();
}
