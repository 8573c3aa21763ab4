use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use file_list_copy::{run_copy, summarize, AppConfig, CopyReport, CopyResult, FileCopyConfig};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env before parsing so FILE_LIST_COPY_* fallbacks are visible to clap
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let matches = build_cli().get_matches();

    // Initialize configuration from command line arguments
    let config = create_app_config(&matches)?;

    // Initialize logging
    initialize_logging(&config.log_level)?;

    if !dotenv_loaded {
        info!("No .env file found, using system environment variables");
    }

    run_application(config)
}

fn build_cli() -> Command {
    Command::new("file-list-copy")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Copy the files named in a list file into a destination folder")
        .arg(
            Arg::new("manifest")
                .value_name("MANIFEST")
                .help("Text file with one file path per line")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("destination")
                .value_name("DESTINATION")
                .help("Directory the files are copied into (created if missing)")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("source-root")
                .long("source-root")
                .value_name("DIR")
                .env("FILE_LIST_COPY_SOURCE_ROOT")
                .help("Directory relative entries are resolved against (default: current directory)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("extension")
                .long("extension")
                .value_name("EXT")
                .env("FILE_LIST_COPY_EXTENSION")
                .help("Extension appended to every entry, e.g. jpg"),
        )
        .arg(
            Arg::new("keep-structure")
                .long("keep-structure")
                .help("Recreate the entries' subdirectories instead of flattening")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-overwrite")
                .long("no-overwrite")
                .help("Skip files that already exist in the destination")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("number-duplicates")
                .long("number-duplicates")
                .help("Write repeated entries as \"name (1).ext\", \"name (2).ext\", ...")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verify")
                .long("verify")
                .help("Compare SHA-256 digests of source and copy")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Report what would be copied without touching the filesystem")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the full report as JSON on stdout")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .env("FILE_LIST_COPY_LOG_LEVEL")
                .help("Set the log level (trace, debug, info, warn, error)")
                .default_value("info"),
        )
}

/// Pure function to create application configuration from CLI arguments
fn create_app_config(matches: &clap::ArgMatches) -> Result<AppConfig> {
    let manifest_path = matches
        .get_one::<PathBuf>("manifest")
        .cloned()
        .context("Missing manifest argument")?;

    let destination_dir = matches
        .get_one::<PathBuf>("destination")
        .cloned()
        .context("Missing destination argument")?;

    let log_level = matches
        .get_one::<String>("log-level")
        .cloned()
        .unwrap_or_else(|| "info".to_string());

    let mut config = AppConfig::new(manifest_path, destination_dir);
    config.file_copy = FileCopyConfig {
        source_root: matches.get_one::<PathBuf>("source-root").cloned(),
        extension: matches.get_one::<String>("extension").cloned(),
        flatten: !matches.get_flag("keep-structure"),
        overwrite: !matches.get_flag("no-overwrite"),
        number_duplicates: matches.get_flag("number-duplicates"),
        verify: matches.get_flag("verify"),
        dry_run: matches.get_flag("dry-run"),
    };
    config.json_output = matches.get_flag("json");
    config.log_level = log_level;

    Ok(config)
}

/// Initialize structured logging with tracing
fn initialize_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

fn run_application(config: AppConfig) -> Result<()> {
    info!("Starting file-list-copy {}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:#?}", config);

    let report = run_copy(
        &config.manifest_path,
        &config.destination_dir,
        &config.file_copy,
    )
    .with_context(|| {
        format!(
            "Copy run from {:?} to {:?} aborted",
            config.manifest_path, config.destination_dir
        )
    })?;

    if config.json_output {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print_copy_report(&report);
    }

    Ok(())
}

fn print_copy_report(report: &CopyReport) {
    for result in report.failures() {
        if let CopyResult::Failed { entry, error, .. } = result {
            println!("FAILED {}: {}", entry, error);
        }
    }

    println!(
        "{} ({} entries, {:.2}% copied)",
        summarize(report),
        report.total_processed(),
        report.success_rate() * 100.0
    );
}
