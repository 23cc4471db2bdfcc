mod batch;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use phdigest_core::{plan_days, validate_export_prefix, DayWindow, RunSettings};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "phdigest-cli")]
#[command(about = "Export the top-voted Product Hunt launches of recent days")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch rankings and write the XLSX and HTML exports (default)
    Run(RunArgs),
    /// Print the planned day range and the UTC window queried for each day
    Days {
        /// Number of days, newest first, starting today (UTC)
        #[arg(long, default_value_t = RunSettings::DEFAULT_DAYS)]
        days: usize,
    },
}

#[derive(Debug, Default, Args)]
pub(crate) struct RunArgs {
    /// Number of days to fetch (overrides PHDIGEST_DAYS)
    #[arg(long)]
    pub days: Option<usize>,
    /// Entries to keep per day, at most 10 (overrides PHDIGEST_TOP_N)
    #[arg(long)]
    pub top: Option<usize>,
    /// Directory for the export files (overrides PHDIGEST_OUTPUT_DIR)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    /// File name prefix (overrides PHDIGEST_EXPORT_PREFIX)
    #[arg(long, value_parser = parse_prefix)]
    pub prefix: Option<String>,
    /// Print the planned days and exit without calling the API
    #[arg(long)]
    pub dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let args = match cli.command {
        Some(Commands::Days { days }) => {
            RunSettings::new(days, RunSettings::DEFAULT_TOP_N)?;
            print_day_windows(days);
            return Ok(());
        }
        Some(Commands::Run(args)) => args,
        None => RunArgs::default(),
    };

    let config = phdigest_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config
        .with_run_overrides(args.days, args.top)?
        .with_export_overrides(args.out_dir.clone(), args.prefix.clone())?;

    if args.dry_run {
        println!(
            "dry-run: would fetch top {} products for {} days",
            config.run.top_n(),
            config.run.days()
        );
        print_day_windows(config.run.days());
        return Ok(());
    }

    tracing::info!(
        days = config.run.days(),
        top_n = config.run.top_n(),
        "starting batch export"
    );

    // Run failures (auth, network, export) are reported once, not propagated.
    if let Err(err) = batch::run_batch(&config).await {
        println!("{}", batch::failure_line(&err));
    }

    Ok(())
}

fn parse_prefix(raw: &str) -> Result<String, String> {
    validate_export_prefix(raw.to_string()).map_err(|e| e.to_string())
}

fn print_day_windows(days: usize) {
    let header = format!("{:<12}{:<22}END", "DATE", "START");
    println!("{header}");
    for day in plan_days(chrono::Utc::now().date_naive(), days) {
        let window = DayWindow::for_date(day);
        println!(
            "{:<12}{:<22}{}",
            day.format("%Y-%m-%d"),
            window.start,
            window.end
        );
    }
}
