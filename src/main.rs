//! CLI entry point for the bikeshare explorer.
//!
//! Runs the interactive prompt loop by default, or a single non-interactive
//! report, raw-data sample or city listing via subcommands.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bikeshare_stats::analyzers::analyze_all;
use bikeshare_stats::{
    config::CityConfig,
    filter::{City, FilterSpec},
    loader::{self, SAMPLE_PAGE_SIZE},
    output::{print_pretty, render_all, render_sample, to_json},
    shell::Shell,
};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory holding the per-city trip exports
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Optional JSON file mapping city names to source files
    #[arg(long, value_name = "FILE")]
    cities: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive prompt loop (default)
    Explore,
    /// Print all four reports for one filter
    Report {
        /// chicago, new york city or washington
        #[arg(short, long)]
        city: String,

        /// Month name or "all"
        #[arg(short, long, default_value = "all")]
        month: String,

        /// Weekday name or "all"
        #[arg(short = 'D', long, default_value = "all")]
        day: String,

        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show raw rows from a city's export
    Sample {
        #[arg(short, long)]
        city: String,

        /// Index of the first row to show
        #[arg(short, long, default_value_t = 0)]
        offset: usize,

        /// Number of rows to show
        #[arg(short, long, default_value_t = SAMPLE_PAGE_SIZE)]
        rows: usize,
    },
    /// List configured cities and their source files
    Cities,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    // stderr stays quiet by default so prompts are not interleaved with logs
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = match &cli.cities {
        Some(path) => CityConfig::load(path, &cli.data_dir)
            .with_context(|| format!("loading city configuration {}", path.display()))?,
        None => CityConfig::with_data_dir(&cli.data_dir),
    };

    match cli.command.unwrap_or(Commands::Explore) {
        Commands::Explore => {
            info!(data_dir = %cli.data_dir.display(), "Starting interactive session");
            let stdin = io::stdin();
            let mut shell = Shell::new(&config, stdin.lock(), io::stdout());
            shell.run()?;
        }
        Commands::Report {
            city,
            month,
            day,
            json,
        } => {
            let spec = FilterSpec::parse(&city, &month, &day)?;
            let dataset = loader::load(&config, &spec)
                .with_context(|| format!("loading trips for {}", spec.city))?;
            let reports = analyze_all(&dataset)?;
            print_pretty(&reports);

            let mut stdout = io::stdout().lock();
            if json {
                writeln!(stdout, "{}", to_json(&reports)?)?;
            } else {
                writeln!(
                    stdout,
                    "{} trips for {} (month: {}, day: {})\n",
                    reports.rows, spec.city, spec.month, spec.day
                )?;
                write!(stdout, "{}", render_all(&reports))?;
            }
        }
        Commands::Sample { city, offset, rows } => {
            let city: City = city.parse()?;
            let page = loader::sample(&config, city, offset, rows)?;
            if page.is_exhausted() {
                info!(offset, "No rows at offset");
            }
            print!("{}", render_sample(&page));
        }
        Commands::Cities => {
            for (city, path) in config.cities() {
                let status = if path.exists() { "found" } else { "missing" };
                println!("{city}: {} ({status})", path.display());
            }
        }
    }

    Ok(())
}
