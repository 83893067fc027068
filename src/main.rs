use voxel_engine::{Cli, Engine};

fn main() {
    env_logger::init();
    voxel_engine::panic_handler::install_panic_handler();

    let cli = Cli::parse_args();
    log::info!("starting voxel_engine with {cli:?}");

    let engine = Engine::new(cli);
    if let Err(e) = engine.run() {
        log::error!("engine exited with error: {e}");
        std::process::exit(1);
    }
}
