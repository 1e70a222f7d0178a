// src/main.rs
mod config;
mod drivers;
mod engine;
mod gui;
mod owon;
mod simulator;
mod types;
use anyhow::{anyhow, bail};
use config::ScopeConfig;
use eframe::egui;
use log::{error, info};
use types::FatalSlot;
// entry point
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let path = ScopeConfig::default_path();
    let config = match ScopeConfig::load(&path) {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("{err:#}; using defaults");
            ScopeConfig::default()
        }
    };
    info!("starting with {config:?}");
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 720.0])
        .with_min_inner_size([800.0, 480.0])
        .with_title("OwonScope");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let fatal = FatalSlot::default();
    let app_fatal = fatal.clone();
    eframe::run_native(
        "OwonScope",
        options,
        Box::new(|_cc| Box::new(gui::ScopeApp::new(config, app_fatal))),
    )
    .map_err(|e| anyhow!("GUI failed: {e}"))?;
    // A transport failure closed the window; exit with an error.
    let reason = fatal.lock().ok().and_then(|mut slot| slot.take());
    if let Some(reason) = reason {
        bail!("instrument connection failed: {reason}");
    }
    Ok(())
}
