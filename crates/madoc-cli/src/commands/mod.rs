//! CLI subcommands.

pub mod analyze;
pub mod batch;
pub mod convert;
pub mod rates;

use madoc_core::{AnalysisConfig, DocumentAnalyzer};

/// Load configuration from an optional path, falling back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AnalysisConfig> {
    match config_path {
        Some(path) => Ok(AnalysisConfig::from_file(std::path::Path::new(path))?),
        None => Ok(AnalysisConfig::default()),
    }
}

/// Build the analyzer from CLI configuration.
pub fn build_analyzer(config_path: Option<&str>) -> anyhow::Result<DocumentAnalyzer> {
    Ok(DocumentAnalyzer::new(load_config(config_path)?))
}
