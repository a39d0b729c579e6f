//! Native viewer binary for the earthglow globe renderer.

use std::path::Path;

use earthglow::{options::Options, Viewer};

fn main() {
    env_logger::init();

    // Optional TOML options file: `earthglow [options.toml]`
    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => {
                log::info!("Loaded options from {path}");
                options
            }
            Err(e) => {
                log::error!("{path}: {e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    if let Err(e) = Viewer::builder().with_options(options).build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
