#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context as _;
use frame_designer::catalog::StaticCatalog;
use frame_designer::config::DesignerConfig;
use frame_designer::FrameDesignerApp;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = DesignerConfig::discover().context("loading designer config")?;
    let catalog = StaticCatalog::builtin().context("loading product catalog")?;

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Frame Designer",
        native_options,
        Box::new(move |cc| Ok(Box::new(FrameDesignerApp::new(cc, catalog, config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run designer: {}", e))
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Redirect `log` message to `console.log` and friends:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let catalog = match StaticCatalog::builtin().context("loading product catalog") {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("{:#}", e);
                return;
            }
        };
        eframe::WebRunner::new()
            .start(
                "egui_canvas",
                web_options,
                Box::new(move |cc| {
                    Ok(Box::new(FrameDesignerApp::new(
                        cc,
                        catalog,
                        DesignerConfig::default(),
                    )))
                }),
            )
            .await
            .expect("failed to start eframe");
    });
}
