use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use kira_dockstats::input::{ProgramSpec, load_programs};
use kira_dockstats::logging;
use kira_dockstats::model::config::MetricsConfig;
use kira_dockstats::pipeline::stage6_orchestrate::compute_programs;
use kira_dockstats::pipeline::stage7_report::write_reports;

/// ROC, predictiveness-curve, enrichment and BEDROC evaluation of docking scores.
#[derive(Debug, Parser)]
#[command(name = "kira-dockstats", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate one or more scoring programs and write reports.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Program as NAME=LIGANDS,DECOYS (repeatable).
    #[arg(long = "program", value_name = "NAME=LIGANDS,DECOYS", required = true, value_parser = parse_program)]
    programs: Vec<ProgramSpec>,
    /// Output directory.
    #[arg(long)]
    out: PathBuf,
    /// BEDROC early-recognition parameter; overrides the config file.
    #[arg(long)]
    alpha: Option<f64>,
    /// JSON metrics configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Worker threads, 0 for one per core.
    #[arg(long, default_value_t = 0)]
    threads: usize,
    #[arg(long, short)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let Command::Run(args) = cli.command;
    logging::init(args.verbose);

    let config = resolve_config(args.config.as_deref(), args.alpha)?;
    let programs = load_programs(&args.programs).map_err(|e| e.to_string())?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()
        .map_err(|e| format!("failed to start worker pool: {e}"))?;
    info!(
        programs = programs.len(),
        threads = pool.current_num_threads(),
        alpha = config.alpha,
        "evaluating programs"
    );
    let outcomes = pool.install(|| compute_programs(&programs, &config));

    write_reports(&outcomes, &config, &args.out).map_err(|e| e.to_string())?;

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed == outcomes.len() {
        return Err(format!(
            "all {failed} programs failed; see {}",
            args.out.join("summary.json").display()
        ));
    }
    if failed > 0 {
        warn!(failed, "some programs produced no metrics");
    }
    Ok(())
}

fn resolve_config(path: Option<&Path>, alpha: Option<f64>) -> Result<MetricsConfig, String> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
            serde_json::from_str::<MetricsConfig>(&raw)
                .map_err(|e| format!("invalid config {}: {e}", path.display()))?
        }
        None => MetricsConfig::default_v1(),
    };
    if let Some(alpha) = alpha {
        config.alpha = alpha;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn parse_program(raw: &str) -> Result<ProgramSpec, String> {
    ProgramSpec::parse(raw).map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
