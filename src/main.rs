use backend::impl_fake::BackendFake;
use backend::impl_http::BackendHttp;
use backend::interface::Backend;
use config::Config;
use eframe::egui;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use showroom::app::ShowroomApp;
use std::sync::Arc;

mod backend;
mod catalog;
mod config;
mod library;
mod showroom;
mod upload;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let backend: Arc<dyn Backend + Send + Sync> = if config.use_fake_backend {
        let _ = logger.info("Using fake backend");
        Arc::new(BackendFake::new(logger.clone()))
    } else {
        let _ = logger.info(&format!("Using backend at {}", config.api_base_url));
        Arc::new(BackendHttp::new(config.clone(), logger.clone())?)
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title("Model Showroom"),
        ..Default::default()
    };

    eframe::run_native(
        "Model Showroom",
        options,
        Box::new(move |cc| Box::new(ShowroomApp::new(&cc.egui_ctx, config, logger, backend))),
    )?;

    Ok(())
}
