//! `surveypool extract` - project the core extract from a pooled artifact

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use surveypool_core::read_parquet;
use surveypool_pool::{PoolConfig, write_core_extract};

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Path to the pool.toml the artifact was built from
    pub pool_config: PathBuf,

    /// Pooled artifact to project (default: <output>/pooled.parquet)
    #[arg(long)]
    pub pooled: Option<PathBuf>,

    /// Destination (default: <output>/core_extract.parquet)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let pool_config = PoolConfig::from_file(&args.pool_config)?;

    let pooled_path = args.pooled.unwrap_or_else(|| pool_config.pooled_path());
    let extract_path = args.output.unwrap_or_else(|| pool_config.extract_path());

    let pooled = read_parquet(&pooled_path)
        .with_context(|| format!("cannot read pooled artifact {}", pooled_path.display()))?;
    let rows = write_core_extract(&pooled, &extract_path, pool_config.compression_level)?;

    log::info!("core extract: {rows} rows -> {}", extract_path.display());
    println!("{rows} rows -> {}", extract_path.display());
    Ok(())
}
