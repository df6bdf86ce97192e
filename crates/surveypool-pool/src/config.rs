//! Pool build configuration (pool.toml)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use surveypool_core::{PipelineError, Result};
use surveypool_harmonize::{CountrySource, DeriveParams};

fn default_compression() -> i32 {
    3
}

/// Configuration for one pool build.
///
/// Country order matters: it defines `country_id` encoding order. Example:
///
/// ```toml
/// output = "./data"
///
/// [[country]]
/// code = "IN"
/// path = "raw/in_women.parquet"
///
/// [[country]]
/// code = "KE"
/// path = "raw/ke_women.parquet"
///
/// [params]
/// sample_age_min = 35
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    /// Countries in encoding order.
    #[serde(rename = "country")]
    pub countries: Vec<CountrySource>,
    /// Output directory for the pooled artifacts.
    pub output: PathBuf,
    /// Derivation constants; omitted keys fall back to standard coding.
    #[serde(default)]
    pub params: DeriveParams,
    /// Parallel per-country workers; 1 = sequential. 0/absent = all cores.
    #[serde(default)]
    pub workers: Option<usize>,
    /// ZSTD level for the parquet artifacts.
    #[serde(default = "default_compression")]
    pub compression_level: i32,
}

impl PoolConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            PipelineError::Config(format!("cannot parse {}: {e}", path.display()))
        })?;
        Ok(config)
    }

    /// Pre-flight validation, run before any country is touched.
    pub fn validate(&self) -> Result<()> {
        if self.countries.is_empty() {
            return Err(PipelineError::Config("empty country list".to_string()));
        }
        for (i, country) in self.countries.iter().enumerate() {
            if country.code.trim().is_empty() {
                return Err(PipelineError::Config(format!(
                    "country #{i} has an empty code"
                )));
            }
            if self.countries[..i].iter().any(|c| c.code == country.code) {
                return Err(PipelineError::Config(format!(
                    "duplicate country code: {}",
                    country.code
                )));
            }
        }
        Ok(())
    }

    pub fn pooled_path(&self) -> PathBuf {
        self.output.join("pooled.parquet")
    }

    pub fn extract_path(&self) -> PathBuf {
        self.output.join("core_extract.parquet")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output.join("build_summary.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(toml_str: &str) -> PoolConfig {
        toml::from_str(toml_str).unwrap()
    }

    const MINIMAL: &str = r#"
output = "/tmp/pool"

[[country]]
code = "IN"
path = "in.parquet"

[[country]]
code = "KE"
path = "ke.parquet"
"#;

    #[test]
    fn parses_minimal_config() {
        let config = config_from(MINIMAL);
        assert_eq!(config.countries.len(), 2);
        assert_eq!(config.countries[0].code, "IN");
        assert_eq!(config.compression_level, 3);
        assert_eq!(config.params, DeriveParams::default());
        config.validate().unwrap();
    }

    #[test]
    fn params_override() {
        let config = config_from(&format!("{MINIMAL}\n[params]\nsample_age_max = 54\n"));
        assert_eq!(config.params.sample_age_max, 54);
        assert_eq!(config.params.sample_age_min, 35);
    }

    #[test]
    fn empty_country_list_rejected() {
        let config = config_from("output = \"/tmp/pool\"\ncountry = []\n");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn duplicate_code_rejected() {
        let config = config_from(
            r#"
output = "/tmp/pool"

[[country]]
code = "IN"
path = "a.parquet"

[[country]]
code = "IN"
path = "b.parquet"
"#,
        );
        let err = config.validate().unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        assert!(format!("{err}").contains("IN"));
    }

    #[test]
    fn blank_code_rejected() {
        let config = config_from(
            "output = \"/tmp\"\n\n[[country]]\ncode = \"  \"\npath = \"a.parquet\"\n",
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn artifact_paths_under_output() {
        let config = config_from(MINIMAL);
        assert_eq!(config.pooled_path(), PathBuf::from("/tmp/pool/pooled.parquet"));
        assert_eq!(
            config.extract_path(),
            PathBuf::from("/tmp/pool/core_extract.parquet")
        );
    }
}
