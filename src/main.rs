//! Linares-Digital: digital maturity self-assessment CLI

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use linares_digital::assessment::ScoringEngine;
use linares_digital::config::{load_config, starter_config, Config, ProviderKind, CONFIG_FILENAME};
use linares_digital::narrative::NarrativeService;
use linares_digital::questionnaire::Questionnaire;
use linares_digital::reporter::{
    write_report, AssessmentReport, ConsoleReporter, JsonReporter, ReportFormat,
};
use linares_digital::responses::{AnswerSheet, Rating};
use linares_digital::{evaluate_sheet, CompanySize, Profile, Sector};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Linares-Digital: digital maturity self-assessment for small businesses
#[derive(Parser, Debug)]
#[command(name = "linares-digital")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Answer sheet (JSON) to evaluate (omit when using a subcommand)
    #[arg(required = true)]
    answers: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum global index (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<f64>,

    /// Quiet mode (minimal output)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .linaresrc.json next to the answer sheet and in parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a report document to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Report format: html, text or json (default: from the --report extension)
    #[arg(long, value_name = "FORMAT")]
    format: Option<ReportFormat>,

    /// Never call a network narrative provider
    #[arg(long)]
    offline: bool,

    /// Evaluation date printed on the report (default: today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .linaresrc.json with sensible defaults
    Init {
        /// Minimum global index (e.g. 2.5)
        #[arg(long)]
        threshold: Option<f64>,

        /// Narrative provider: template, anthropic, openai-compatible
        #[arg(long)]
        provider: Option<String>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// List the questionnaire: dimensions, weights and items
    Questions {
        /// Print as JSON
        #[arg(long, short)]
        json: bool,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write an answer sheet to fill in
    Template {
        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

/// Logs go to stderr; RUST_LOG wins over the default level
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    if let Some(cmd) = args.command {
        return match cmd {
            Commands::Init {
                threshold,
                provider,
                dir,
            } => run_init(threshold, provider, dir.as_deref()),
            Commands::Questions { json, config } => run_questions(json, config.as_deref()),
            Commands::Template { output, config } => {
                run_template(output.as_deref(), config.as_deref())
            }
        };
    }

    let Some(path) = args.answers.clone() else {
        anyhow::bail!("an answer sheet is required when no subcommand is given");
    };

    // Config is searched from the answer sheet's directory
    let work_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    // Load config (CLI flags override config file)
    let config = load_config(&work_dir, args.config.as_deref())?
        .merge_with_cli(args.threshold, args.offline);
    config.validate()?;

    let engine = ScoringEngine::new(config.questionnaire())
        .context("Invalid questionnaire in config")?;
    let sheet = AnswerSheet::load(&path)?;
    let narrator = NarrativeService::from_config(&config.narrative, engine.questionnaire());
    debug!(
        provider = narrator.provider_name().unwrap_or("none"),
        "evaluating {}",
        path.display()
    );

    let evaluated_on = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let report = evaluate_sheet(&sheet, &engine, &narrator, evaluated_on)?;

    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&report));
    } else if args.quiet {
        ConsoleReporter::new().report_quiet(&report);
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        reporter.report(&report);
    }

    // The results are already on screen; a failed write only warns
    if let Some(ref report_path) = args.report {
        write_report_file(&report, report_path, args.format, &config, args.quiet || args.json);
    }

    if let Some(threshold) = config.threshold {
        if report.result.global_index < threshold {
            if !args.quiet {
                eprintln!(
                    "{}: Global index {:.2} is below threshold {:.2}",
                    "Failed".red().bold(),
                    report.result.global_index,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn write_report_file(
    report: &AssessmentReport,
    path: &Path,
    forced: Option<ReportFormat>,
    config: &Config,
    silent: bool,
) {
    let format = forced
        .or_else(|| ReportFormat::from_path(path))
        .or(config.report.format)
        .unwrap_or_default();

    match write_report(report, path, format) {
        Ok(()) => {
            if !silent {
                eprintln!(
                    "{}: Report written to {} ({})",
                    "Done".green().bold(),
                    path.display(),
                    format
                );
            }
        }
        Err(e) => {
            eprintln!("{}: {}", "Warning".yellow(), e);
        }
    }
}

/// Config for subcommands that run outside any answer sheet
fn load_cwd_config(custom: Option<&Path>) -> Result<Config> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    load_config(&cwd, custom)
}

fn run_init(threshold: Option<f64>, provider: Option<String>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let provider = match provider.as_deref() {
        None => ProviderKind::Template,
        Some(name) => ProviderKind::parse(name).with_context(|| {
            format!(
                "Unknown provider '{}' (expected template, anthropic or openai-compatible)",
                name
            )
        })?,
    };

    if let Some(t) = threshold {
        if !(1.0..=5.0).contains(&t) {
            anyhow::bail!("threshold {} is outside the 1-5 scale", t);
        }
    }

    std::fs::write(&config_path, starter_config(provider, threshold))
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with provider={}, threshold={}",
        "Done".green().bold(),
        config_path.display(),
        provider,
        threshold.map_or_else(|| "none".to_string(), |t| t.to_string())
    );
    if let Some(env) = provider.default_api_key_env() {
        println!(
            "{}: set {} to enable generated narratives (template text is used otherwise)",
            "Info".blue(),
            env
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn run_questions(json: bool, config: Option<&Path>) -> Result<ExitCode> {
    let questionnaire = load_cwd_config(config)?.questionnaire();
    questionnaire
        .validate()
        .context("Invalid questionnaire in config")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&questionnaire).context("Failed to serialize")?
        );
        return Ok(ExitCode::SUCCESS);
    }

    print_questionnaire(&questionnaire);
    Ok(ExitCode::SUCCESS)
}

fn print_questionnaire(questionnaire: &Questionnaire) {
    for (i, dim) in questionnaire.dimensions.iter().enumerate() {
        println!(
            "{} {} ({}), weight {:.0}%",
            format!("{}.", i + 1).dimmed(),
            dim.name.bold(),
            dim.short_name(),
            dim.weight * 100.0
        );
        for (j, item) in dim.items.iter().enumerate() {
            println!("   {}. {}", j + 1, item.prompt);
            if let (Some(low), Some(high)) = (item.scale.first(), item.scale.last()) {
                println!("      {}", format!("1 = {} / 5 = {}", low, high).dimmed());
            }
        }
        println!();
    }
    println!(
        "{} items in {} dimensions. Rate each from 1 (lowest) to 5 (highest).",
        questionnaire.total_items(),
        questionnaire.dimensions.len()
    );
}

fn run_template(output: Option<&Path>, config: Option<&Path>) -> Result<ExitCode> {
    let questionnaire = load_cwd_config(config)?.questionnaire();
    let profile = Profile {
        business_name: "Your business".to_string(),
        sector: Sector::Other,
        size: CompanySize::Micro,
    };
    // Middle of the scale; every value is meant to be edited
    let sheet = AnswerSheet::template(&questionnaire, profile, Rating::try_from(3)?);
    let mut json = serde_json::to_string_pretty(&sheet).context("Failed to serialize")?;
    json.push('\n');

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write template to {}", path.display()))?;
            eprintln!(
                "{}: Answer sheet template written to {}",
                "Done".green().bold(),
                path.display()
            );
        }
        None => print!("{}", json),
    }
    Ok(ExitCode::SUCCESS)
}
