mod analysis;
mod app;
mod canvas;
mod config;
mod loader;
mod marker;
mod points;
mod state;
mod ui;

use app::FoamAnalyzerApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(1000.0, 800.0)),
        min_window_size: Some(egui::vec2(640.0, 480.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Foam Structure Analyzer",
        native_options,
        Box::new(|cc| Box::new(FoamAnalyzerApp::new(cc)))
    )
}
