mod app;
mod config;
mod feed;
mod render;

fn main() -> anyhow::Result<()> {
    let path = config::config_path();
    let config = config::load(&path)?;
    view_logging::initialize(
        config.log_destination,
        config.log_level(),
        &config.log_file,
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(app::run(config))
}
