mod state;
mod ui;

use eframe::egui;
use fundmap_core::loader::DEFAULT_SOURCE;
use state::AppState;

const SOURCE_KEY: &str = "source";

struct MyApp {
    state: AppState,
}

impl MyApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let source = cc
            .storage
            .and_then(|s| eframe::get_value::<String>(s, SOURCE_KEY))
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
        let mut state = AppState::new(source);
        state.start_load();
        Self { state }
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::draw(&mut self.state, ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, SOURCE_KEY, &self.state.source);
    }
}

fn main() -> eframe::Result<()> {
    fundmap_core::init_logging();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 860.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Fundmap",
        options,
        Box::new(|cc| Ok(Box::new(MyApp::new(cc)))),
    )
}
