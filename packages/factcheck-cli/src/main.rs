//! `factcheck` - verify claims against live web evidence from the command line.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use veracity::ai::select_model;
use veracity::pipeline::parse_verdict;
use veracity::{Language, VeracityError, VeracityStatus, Verdict, VerificationConfig, Verifier};

#[derive(Parser)]
#[command(name = "factcheck")]
#[command(about = "Evidence-grounded claim verification")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a claim against web search evidence
    Verify {
        claim: String,
        #[arg(long, short, default_value = "en")]
        language: Language,
        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the search queries a claim expands into
    Queries {
        claim: String,
        #[arg(long, short, default_value = "en")]
        language: Language,
    },

    /// Parse a saved model response (file, or stdin when omitted)
    Parse { file: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,veracity=debug,llm_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Verify {
            claim,
            language,
            json,
        } => verify(&claim, language, json).await,
        Commands::Queries { claim, language } => queries(&claim, language),
        Commands::Parse { file } => parse(file),
    }
}

async fn verify(claim: &str, language: Language, json: bool) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let model = select_model(&config.model_settings());
    let searcher = config.searcher()?;
    let verifier = Verifier::new(model, searcher).with_rules(config.query_rules()?);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let verdict = match verifier
        .analyze_veracity_with_cancel(claim, language, cancel)
        .await
    {
        Ok(verdict) => verdict,
        Err(VeracityError::Cancelled) => {
            eprintln!("{}", "Verification cancelled".yellow());
            return Ok(());
        }
        Err(e) => return Err(e).context("Verification failed"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        print_verdict(claim, &verdict);
    }
    Ok(())
}

fn queries(claim: &str, language: Language) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let rules = config.query_rules()?;
    let max_queries = VerificationConfig::default().max_queries;

    for (i, query) in rules.expand(claim, language).iter().enumerate() {
        let line = format!("{:>2}. {}", i + 1, query);
        if i < max_queries {
            println!("{}", line);
        } else {
            println!("{} {}", line.dimmed(), "(not issued)".dimmed());
        }
    }
    Ok(())
}

fn parse(file: Option<PathBuf>) -> Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let verdict = parse_verdict(&raw);
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}

fn print_verdict(claim: &str, verdict: &Verdict) {
    let status = match verdict.status {
        VeracityStatus::FactuallyCorrect => verdict.status.as_str().green().bold(),
        VeracityStatus::Untruth => verdict.status.as_str().red().bold(),
        VeracityStatus::Misleading => verdict.status.as_str().yellow().bold(),
        VeracityStatus::Unverifiable => verdict.status.as_str().bright_black().bold(),
    };

    println!("{} {}", "Claim:".bold(), claim);
    println!("{} {}", "Verdict:".bold(), status);
    println!();
    println!("{}", verdict.justification);
    println!();
    println!("{} {}", "Method:".bold(), verdict.verification_method);

    if verdict.sources.is_empty() {
        println!("{} {}", "Sources:".bold(), "none".dimmed());
        return;
    }

    println!("{}", "Sources:".bold());
    for (i, source) in verdict.sources.iter().enumerate() {
        println!("  [{}] {}", i + 1, source.title);
        println!("      {}", source.url.cyan());
    }
}
