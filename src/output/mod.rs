mod cli;
mod cyclonedx;
mod json;

pub use cli::print_cli_table;
pub use cyclonedx::{generate_cyclonedx_string, print_cyclonedx};
pub use json::{generate_json_string, print_json};

use crate::model::ScanResult;
use anyhow::Result;

/// Output format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON format for programmatic use
    Json,
    /// CycloneDX SBOM format
    CycloneDx,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "cyclonedx" | "cdx" | "sbom" => Ok(OutputFormat::CycloneDx),
            _ => Err(format!(
                "Unknown format: {}. Use 'table', 'json', or 'cyclonedx'",
                s
            )),
        }
    }
}

pub fn print_result(result: &ScanResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_cli_table(result),
        OutputFormat::Json => print_json(result),
        OutputFormat::CycloneDx => print_cyclonedx(result),
    }
}

/// Format result to string for file output
pub fn format_result_to_string(result: &ScanResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::CycloneDx => generate_cyclonedx_string(result),
        // Tables are for terminals; files get JSON
        OutputFormat::Json | OutputFormat::Table => generate_json_string(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("TABLE"), Ok(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("json"), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("cdx"), Ok(OutputFormat::CycloneDx));
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_table_file_output_is_json() {
        let result = ScanResult::default();
        let text = format_result_to_string(&result, OutputFormat::Table).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(json["packages"].as_array().unwrap().is_empty());
    }
}
