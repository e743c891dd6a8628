//! Entry point for the tubegrab GUI binary

use tubegrab::gui::GrabApp;

fn main() -> Result<(), eframe::Error> {
    tubegrab::cli::init_logging();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([640.0, 620.0]),
        ..Default::default()
    };
    eframe::run_native(
        "TubeGrab",
        options,
        Box::new(|cc| Box::new(GrabApp::new(cc))),
    )
}
