use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use initsql::discovery;
use initsql::reader::ReaderConfig;
use initsql::{DryRunExecutor, InitLoader, LoaderConfig, RunStats, SqliteExecutor, StatementExecutor};

#[derive(Parser, Debug)]
#[command(name = "initsql")]
#[command(about = "Split SQL init files into statements and run them in order")]
#[command(version)]
struct Args {
    /// Init files, or directories whose *.sql files run in name order
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// SQLite database URL, e.g. sqlite://app.db
    #[arg(long)]
    database: Option<String>,

    /// Split and print statements without executing them, one `<n>\t<statement>`
    /// line each; `n` counts from 0 across all files of the run
    #[arg(long)]
    dry_run: bool,

    /// Deadline in seconds for all statements of one init file
    #[arg(long, default_value_t = 30)]
    query_timeout_secs: u64,

    /// Use memory-mapped I/O instead of async buffered
    #[arg(long)]
    use_mmap: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Stats output file path
    #[arg(long, default_value = "init_stats.json")]
    stats_out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: logs go to stderr so dry-run output on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting initsql");
    info!(?args, "Parsed CLI arguments");

    if !args.dry_run && args.database.is_none() {
        anyhow::bail!("--database is required unless --dry-run is set");
    }

    let files = discovery::discover_init_files(&args.paths).await?;
    if files.is_empty() {
        info!("No init files found");
    }

    let config = LoaderConfig {
        query_timeout: Duration::from_secs(args.query_timeout_secs),
        ..Default::default()
    };

    match args.database.as_deref() {
        Some(url) if !args.dry_run => {
            let executor = SqliteExecutor::connect(url).await?;
            run(executor, config, &args, &files).await
        }
        _ => run(DryRunExecutor::new(true), config, &args, &files).await,
    }
}

async fn run<E: StatementExecutor>(
    executor: E,
    config: LoaderConfig,
    args: &Args,
    files: &[PathBuf],
) -> Result<()> {
    let progress = if args.no_progress || args.dry_run {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} statements",
        )?);
        bar
    };

    let mut loader = InitLoader::new(executor, config)
        .with_reader_config(ReaderConfig {
            use_mmap: args.use_mmap,
            ..Default::default()
        })
        .with_progress(progress.clone());

    let mut run_stats = RunStats::new();
    let result = loader.load_init_files(files, &mut run_stats).await;
    progress.finish_and_clear();

    // WHY: stats are written on failure too so the failing file is on record
    let written = run_stats.write_json(&args.stats_out).await;

    match (result, written) {
        (Err(e), written) => {
            error!(error = %format!("{e:#}"), "Init run failed");
            if let Err(stats_err) = written {
                error!(error = %format!("{stats_err:#}"), "Run stats not written");
            }
            Err(e)
        }
        (Ok(()), Err(stats_err)) => Err(stats_err),
        (Ok(()), Ok(())) => {
            info!("Run stats written to {}", args.stats_out.display());
            eprintln!(
                "initsql: {} files, {} statements executed",
                run_stats.file_stats.len(),
                run_stats.total_statements_executed
            );
            Ok(())
        }
    }
}
