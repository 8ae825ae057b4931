pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_one_of, validate_path, validate_positive_number,
    validate_unique, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_UNIT: usize = 2000;
pub const INPUT_EXTENSIONS: [&str; 2] = ["csv", "xlsx"];
pub const OUTPUT_FORMATS: [&str; 3] = ["xlsx", "csv", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "card-boxer"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Pack card records into fixed-size boxes per branch")
)]
pub struct CliConfig {
    /// Source file (.csv or .xlsx)
    #[cfg_attr(feature = "cli", arg(long, short))]
    pub input: String,

    /// Worksheet to read from an .xlsx input (defaults to the first one)
    #[cfg_attr(feature = "cli", arg(long))]
    pub sheet: Option<String>,

    /// Cards per box
    #[cfg_attr(feature = "cli", arg(long, short, default_value_t = DEFAULT_UNIT))]
    pub unit: usize,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ',', default_value = "xlsx"))]
    pub output_formats: Vec<String>,

    /// Bundle all outputs into a single ZIP file
    #[cfg_attr(feature = "cli", arg(long))]
    pub zip: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log CPU and memory usage per phase"))]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn sheet_name(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    fn unit(&self) -> usize {
        self.unit
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn compress_output(&self) -> bool {
        self.zip
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_file_extension("input", &self.input, &INPUT_EXTENSIONS)?;
        validate_positive_number("unit", self.unit, 1)?;
        validate_path("output_path", &self.output_path)?;
        validate_one_of("output_formats", &self.output_formats, &OUTPUT_FORMATS)?;
        validate_unique("output_formats", &self.output_formats)?;
        Ok(())
    }
}
