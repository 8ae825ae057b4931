use crate::config::{DEFAULT_UNIT, INPUT_EXTENSIONS, OUTPUT_FORMATS};
use crate::core::ConfigProvider;
use crate::utils::error::{BoxerError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_one_of, validate_path,
    validate_positive_number, validate_unique, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub input: InputConfig,
    #[serde(default)]
    pub boxing: BoxingConfig,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxingConfig {
    pub unit: usize,
}

impl Default for BoxingConfig {
    fn default() -> Self {
        Self { unit: DEFAULT_UNIT }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    /// 檔名主體，`{unit}` 會被替換成每箱張數
    pub filename: Option<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

fn default_formats() -> Vec<String> {
    vec!["xlsx".to_string()]
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BoxerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CARD_INPUT_DIR})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn sheet_name(&self) -> Option<&str> {
        self.input.sheet.as_deref()
    }

    fn unit(&self) -> usize {
        self.boxing.unit
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn compress_output(&self) -> bool {
        self.output
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }

    fn output_stem(&self) -> String {
        match &self.output.filename {
            Some(template) => template.replace("{unit}", &self.boxing.unit.to_string()),
            None => format!("{}_변환엑셀파일", self.boxing.unit),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("job.name", &self.job.name)?;
        validate_path("input.path", &self.input.path)?;
        validate_file_extension("input.path", &self.input.path, &INPUT_EXTENSIONS)?;
        validate_positive_number("boxing.unit", self.boxing.unit, 1)?;
        validate_path("output.path", &self.output.path)?;
        validate_one_of("output.formats", &self.output.formats, &OUTPUT_FORMATS)?;
        validate_unique("output.formats", &self.output.formats)?;
        if let Some(filename) = &self.output.filename {
            validate_non_empty_string("output.filename", filename)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[job]
name = "monthly-gift-cards"

[input]
path = "data/cards.xlsx"
sheet = "발행목록"

[boxing]
unit = 1000

[output]
path = "./boxed"
formats = ["xlsx", "json"]
filename = "박스_{unit}"

[output.compression]
enabled = true
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.job.name, "monthly-gift-cards");
        assert_eq!(config.input_path(), "data/cards.xlsx");
        assert_eq!(config.sheet_name(), Some("발행목록"));
        assert_eq!(config.unit(), 1000);
        assert_eq!(config.output_formats(), ["xlsx", "json"]);
        assert!(config.compress_output());
        assert_eq!(config.output_stem(), "박스_1000");
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_apply() {
        let toml_content = r#"
[job]
name = "defaults"

[input]
path = "cards.csv"

[output]
path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.unit(), DEFAULT_UNIT);
        assert_eq!(config.output_formats(), ["xlsx"]);
        assert!(!config.compress_output());
        assert_eq!(config.output_stem(), "2000_변환엑셀파일");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CARD_BOXER_TEST_INPUT", "/srv/cards/april.csv");

        let toml_content = r#"
[job]
name = "env"

[input]
path = "${CARD_BOXER_TEST_INPUT}"

[output]
path = "${CARD_BOXER_TEST_UNSET_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input_path(), "/srv/cards/april.csv");
        assert_eq!(config.output_path(), "${CARD_BOXER_TEST_UNSET_DIR}");

        std::env::remove_var("CARD_BOXER_TEST_INPUT");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[job]
name = "bad"

[input]
path = "cards.pdf"

[boxing]
unit = 0

[output]
path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_repeated_output_format_fails_validation() {
        let toml_content = r#"
[job]
name = "dup"

[input]
path = "cards.csv"

[output]
path = "./out"
formats = ["xlsx", "csv", "xlsx"]

[output.compression]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        match config.validate() {
            Err(BoxerError::InvalidConfigValueError { field, value, .. }) => {
                assert_eq!(field, "output.formats");
                assert_eq!(value, "xlsx");
            }
            other => panic!("expected InvalidConfigValueError, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[job\nname = ").unwrap_err();
        assert!(matches!(err, BoxerError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "monthly-gift-cards");
    }
}
