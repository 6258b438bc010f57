mod app;
pub mod config;
pub mod resources;
pub mod scene;

pub use app::App;
pub use config::Config;

use flythrough::FlythroughResult;
use log::{error, info};

pub fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("[CUBE_RUSH] MAIN!");
    if let Err(e) = real_main() {
        error!("[CUBE_RUSH] ERROR IN MAIN! {e}");
        std::process::exit(1);
    }
}

/// Run the demo. The first command line argument, if there is one, is the path to a JSON config file.
pub fn real_main() -> FlythroughResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading config from {path}");
            Config::load(path)?
        }
        None => Config::default(),
    };

    let mut app = App::new(config)?;
    app.start()
}
