use clap::Parser;
use presenter::Mode;
use presenter::core::config::{self, CliOverrides};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(
    name = "presenter",
    about = "Nested sheet presentation with ordered dismissal"
)]
struct Args {
    /// Config file to use instead of ~/.presenter/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pause between the first grandchild closing and the second appearing
    #[arg(long)]
    chain_delay_ms: Option<u64>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = match config::load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("presenter: {e}");
            return Err(std::io::Error::other(e));
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            chain_delay_ms: args.chain_delay_ms,
            log_level: args.log_level,
        },
    );

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = LevelFilter::from_str(&resolved.log_level).unwrap_or(LevelFilter::Debug);
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let mode = args.mode.unwrap_or_default();
    log::info!("Presenter starting in {:?} mode", mode);
    log::debug!("Resolved config: {:?}", resolved);

    match mode {
        Mode::Tui => presenter::tui::run(&resolved),
        Mode::Replay => presenter::replay::run(&resolved).await,
    }
}
