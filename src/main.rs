use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "gaz", about = "gaz — terminal gazetteer for GIS map exports")]
struct Cli {
    /// Map export directory (contains map.toml and the GeoJSON layers).
    #[arg(default_value = ".")]
    map_dir: PathBuf,

    /// Write debug logs to /tmp/gaz-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/gaz-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("gaz debug log started — tail -f /tmp/gaz-debug.log");
    }

    gaz_tui::run(&cli.map_dir)
}
