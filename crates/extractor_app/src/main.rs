mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use engine_logging::LogDestination;
use log::LevelFilter;

use terminal::{ConfigOverrides, RunMode};

/// Submit a YouTube URL for MP3 extraction and follow the job to completion.
#[derive(Parser, Debug)]
#[command(name = "extractor", version, about = "Audio extraction client")]
struct Cli {
    /// Backend root URL (default http://127.0.0.1:5001).
    #[arg(long)]
    server: Option<String>,
    /// Submit this URL, wait for the outcome and exit instead of reading stdin.
    #[arg(long)]
    url: Option<String>,
    /// With --url: save the MP3 once the job completes.
    #[arg(long, requires = "url")]
    download: bool,
    /// Where downloaded files are written.
    #[arg(long)]
    download_dir: Option<PathBuf>,
    /// Status poll interval in milliseconds.
    #[arg(long)]
    poll_interval_ms: Option<u64>,
    /// RON config file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogArg::File)]
    log: LogArg,
    /// Log file path used by --log file/both.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LogArg {
    File,
    Terminal,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::File => LogDestination::File,
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::Both => LogDestination::Both,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(engine_logging::default_log_path);
    engine_logging::initialize(cli.log.into(), level, &log_path);

    let mut config = terminal::load_config(cli.config.as_deref())?;
    config.apply(ConfigOverrides {
        server: cli.server,
        download_dir: cli.download_dir,
        poll_interval_ms: cli.poll_interval_ms,
    });
    config.validate()?;

    let mode = match cli.url {
        Some(url) => RunMode::OneShot {
            url,
            download: cli.download,
        },
        None => RunMode::Interactive,
    };
    terminal::run_app(config, mode)
}
