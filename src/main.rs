use anyhow::Context;
use clap::Parser;
use log::info;

use spinning_boxes::{app::SpinningBoxesApp, cli::Cli, config::Config};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli
        .scene_config()
        .context("failed to load scene configuration")?;

    if let Some(path) = &cli.dump_config {
        config
            .save_to_file(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote scene configuration to {}", path.display());
        return Ok(());
    }

    let app = SpinningBoxesApp::new(&config, cli.vsync).context("failed to build scene")?;
    app.run().context("application error")?;
    Ok(())
}
