use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use teller::{App, PortalConfig, init_logging};
use teller_core::HttpGateway;

#[derive(Parser, Debug)]
#[command(name = "teller")]
#[command(about = "A terminal banking portal for term deposits")]
struct Args {
    /// Path to the data directory (default: ~/.teller/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Path to the config file (default: <data-dir>/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".teller")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    let _log_guard = init_logging(&data_dir, &args.log_level)?;

    let config_path = args.config.unwrap_or_else(|| data_dir.join("config.yaml"));
    let config = PortalConfig::load(&config_path)
        .wrap_err_with(|| format!("loading config from {}", config_path.display()))?;

    let gateway = HttpGateway::new(&config.endpoint, config.session(), config.timeout())
        .wrap_err("building the transaction gateway")?;

    let mut app = App::new(&config, data_dir, Box::new(gateway));

    ratatui::run(|terminal| app.run(terminal))?;

    tracing::info!("application shutting down");

    if let Err(err) = ratatui::try_restore() {
        tracing::error!("failed to restore terminal: {err}");
    }

    Ok(())
}
