//! `surveypool build` - run the pool build from a pool.toml

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use surveypool_core::ProgressContext;
use surveypool_pool::{BuildSummary, CountryOutcome, PoolConfig, build_pool};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to pool.toml (country list in encoding order)
    pub pool_config: PathBuf,

    /// Override the output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of parallel workers (1 = sequential)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Validate and show the plan without processing anything
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: BuildArgs, config: &Config, progress: &ProgressContext) -> Result<()> {
    let mut pool_config = PoolConfig::from_file(&args.pool_config)?;

    if let Some(output) = args.output {
        pool_config.output = output;
    }
    if pool_config.workers.is_none() {
        let workers = args.workers.unwrap_or(config.workers.default);
        pool_config.workers = Some(workers.min(config.workers.max));
    }

    pool_config.validate()?;

    if args.dry_run {
        println!("=== Pool Plan ===");
        println!("{:<8} {:<10} {}", "Country", "Status", "Source");
        println!("{}", "-".repeat(48));
        for country in &pool_config.countries {
            println!(
                "{:<8} {:<10} {}",
                country.code,
                "PENDING",
                country.path.display()
            );
        }
        println!("\noutput: {}", pool_config.output.display());
        println!("(dry-run mode, no execution)");
        return Ok(());
    }

    let summary = build_pool(&pool_config, progress)?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &BuildSummary) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Country").fg(Color::Cyan),
            Cell::new("Status").fg(Color::Cyan),
            Cell::new("Rows").fg(Color::Cyan),
            Cell::new("ID / Reason").fg(Color::Cyan),
        ]);

    for outcome in &summary.countries {
        match outcome {
            CountryOutcome::Appended {
                code,
                rows,
                country_id,
            } => {
                table.add_row(vec![
                    Cell::new(code),
                    Cell::new("appended").fg(Color::Green),
                    Cell::new(rows.to_string()),
                    Cell::new(country_id.to_string()),
                ]);
            }
            CountryOutcome::Failed { code, reason } => {
                table.add_row(vec![
                    Cell::new(code),
                    Cell::new("failed").fg(Color::Red),
                    Cell::new("-"),
                    Cell::new(reason),
                ]);
            }
        }
    }

    println!("{table}");
    println!(
        "{} rows pooled -> {}",
        summary.total_rows,
        summary.artifact.display()
    );
}
