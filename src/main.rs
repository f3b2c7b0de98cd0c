mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use cli::commands::{Cli, Commands, DistributeArgs, InspectArgs, PartitionArgs};
use cli::progress::CliReporter;
use colored::*;
use dotenv::dotenv;
use podsplit::{
    AppConfig, DistributeEngine, DistributeOutcome, ManifestEngine, ManifestOutcome,
    OversizePolicy, SizeLimit,
};
use tracing::{error, info};

fn main() -> ExitCode {
    dotenv().ok();

    let _guard = cli::logging::init_logger();

    let config = match podsplit::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Distribute(args)) => run_distribute(&config, args),
        Some(Commands::Partition(args)) => run_partition(&config, args),
        Some(Commands::Inspect(args)) => run_inspect(&config, args),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn policy(config: &AppConfig, allow_oversized: bool) -> OversizePolicy {
    if allow_oversized {
        OversizePolicy::AllowAsOwnPartition
    } else {
        config.on_oversized_file
    }
}

fn run_distribute(config: &AppConfig, args: DistributeArgs) -> anyhow::Result<()> {
    let limit = SizeLimit::from_gb(args.size_limit_gb)?;
    info!("=============================================");
    info!("Checking if file distribution is required");
    info!("Directory: {}", args.source_dir.display());
    info!("Size limit per subfolder: {}", limit);
    info!("=============================================");

    let engine = DistributeEngine::new(config.clone())
        .with_policy(policy(config, args.allow_oversized));
    let reporter = CliReporter::new();
    let result = engine
        .run(&args.source_dir, &args.target_dir, limit, &reporter)
        .with_context(|| format!("distribution of {} aborted", args.source_dir.display()))?;

    match &result.outcome {
        DistributeOutcome::WithinLimit => {
            info!("{}", "No distribution needed".green());
        }
        DistributeOutcome::AlreadyOrganized => {
            info!("{}", "Already organized, no files moved".green());
        }
        DistributeOutcome::Distributed(report) => {
            info!(
                "{} file(s) moved into {} subfolder(s) under {}",
                format!("{}", report.moved).green(),
                format!("{}", report.folders.len()).green(),
                result.target.display(),
            );
            if !report.failed.is_empty() {
                info!(
                    "{} file(s) could not be moved and remain in {}",
                    format!("{}", report.failed.len()).red(),
                    result.source.display(),
                );
            }
        }
    }
    info!(
        "Segregated: {}, flattened: {}, empty dirs removed: {}, took {}",
        format!("{}", result.segregated).cyan(),
        format!("{}", result.flattened).cyan(),
        format!("{}", result.removed_dirs).cyan(),
        format!("{:.2}s", result.duration.as_secs_f64()).green(),
    );

    Ok(())
}

fn run_partition(config: &AppConfig, args: PartitionArgs) -> anyhow::Result<()> {
    let limit = SizeLimit::from_gb(args.size_limit_gb)?;
    info!("=============================================");
    info!("Starting file listing and partitioning");
    info!("Source directory: {}", args.source_dir.display());
    info!("Size limit per partition: {}", limit);
    info!("=============================================");

    let engine = ManifestEngine::new(config.clone())
        .with_policy(policy(config, args.allow_oversized));
    let reporter = CliReporter::new();
    let result = engine
        .run(
            &args.source_dir,
            args.output_dir.as_deref(),
            limit,
            &reporter,
        )
        .with_context(|| format!("partitioning of {} aborted", args.source_dir.display()))?;

    match &result.outcome {
        ManifestOutcome::NoFilesFound => {
            info!("{}", "Nothing to partition".yellow());
        }
        ManifestOutcome::Written { path, partitions } => {
            info!(
                "{} file(s) in {} partition(s) written to {} in {}",
                format!("{}", result.total_files).green(),
                format!("{}", partitions.len()).green(),
                path.display(),
                format!("{:.2}s", result.duration.as_secs_f64()).green(),
            );
        }
    }

    Ok(())
}

fn run_inspect(config: &AppConfig, args: InspectArgs) -> anyhow::Result<()> {
    let limit = SizeLimit::from_gb(args.size_limit_gb)?;
    let engine = DistributeEngine::new(config.clone());
    let reporter = CliReporter::new();
    let assessment = engine.inspect(&args.source_dir, limit, &reporter)?;

    let state = match assessment.state {
        Some(state) => state.to_string(),
        None => "WITHIN_LIMIT".to_string(),
    };
    info!(
        "State: {}, action: {:?}",
        state.cyan(),
        assessment.action
    );

    Ok(())
}
