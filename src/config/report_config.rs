use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.elsevier.com";
pub const DEFAULT_OUTPUT_FILE: &str = "scopus_data_{years}_updated.xlsx";

/// Profiles processed when the configuration does not list any.
pub const DEFAULT_PROFILE_LINKS: &[&str] = &[
    "https://www.scopus.com/authid/detail.uri?authorId=57223100630",
    "https://www.scopus.com/authid/detail.uri?authorId=55079543700",
    "https://www.scopus.com/authid/detail.uri?authorId=35737586100",
    "https://www.scopus.com/authid/detail.uri?authorId=57189239708",
    "https://www.scopus.com/authid/detail.uri?authorId=55881946700",
    "https://www.scopus.com/authid/detail.uri?authorId=57044254900",
    "https://www.scopus.com/authid/detail.uri?authorId=57055221400",
    "https://www.scopus.com/authid/detail.uri?authorId=59256484700",
    "https://www.scopus.com/authid/detail.uri?authorId=57162822500",
    "https://www.scopus.com/authid/detail.uri?authorId=57205027677",
    "https://www.scopus.com/authid/detail.uri?authorId=57192668092",
    "https://www.scopus.com/authid/detail.uri?authorId=55811681700",
    "https://www.scopus.com/authid/detail.uri?authorId=57205128308",
    "https://www.scopus.com/authid/detail.uri?authorId=57789387000",
    "https://www.scopus.com/authid/detail.uri?authorId=35069671200",
    "https://www.scopus.com/authid/detail.uri?authorId=35332112400",
    "https://www.scopus.com/authid/detail.uri?authorId=58529182900",
    "https://www.scopus.com/authid/detail.uri?authorId=57193578932",
    "https://www.scopus.com/authid/detail.uri?authorId=57212476297",
    "https://www.scopus.com/authid/detail.uri?authorId=57201949000",
    "https://www.scopus.com/authid/detail.uri?authorId=55263618900",
    "https://www.scopus.com/authid/detail.uri?authorId=58244012600",
    "https://www.scopus.com/authid/detail.uri?authorId=57200798153",
    "https://www.scopus.com/authid/detail.uri?authorId=59010451200",
    "https://www.scopus.com/authid/detail.uri?authorId=57201030358",
    "https://www.scopus.com/authid/detail.uri?authorId=57211135848",
    "https://www.scopus.com/authid/detail.uri?authorId=56708741500",
    "https://www.scopus.com/authid/detail.uri?authorId=57209182380",
    "https://www.scopus.com/authid/detail.uri?authorId=56168895700",
    "https://www.scopus.com/authid/detail.uri?authorId=57219413559",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    /// `.csv` selects CSV, anything else the workbook.
    pub fn from_file_name(name: &str) -> Self {
        match Path::new(name).extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::Xlsx,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(alias = "API_KEY", default)]
    pub api_key: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_profile_links")]
    pub profile_links: Vec<String>,
    #[serde(default = "default_target_years")]
    pub target_years: Vec<i32>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_interval_ms")]
    pub min_request_interval_ms: u64,
    #[serde(default = "default_interval_ms")]
    pub author_delay_ms: u64,
    #[serde(default = "default_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default)]
    pub output_format: Option<OutputFormat>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_profile_links() -> Vec<String> {
    DEFAULT_PROFILE_LINKS.iter().map(|s| s.to_string()).collect()
}

fn default_target_years() -> Vec<i32> {
    vec![2023, 2024]
}

fn default_page_size() -> u32 {
    25
}

fn default_sort() -> String {
    "pubyear".to_string()
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_output_path() -> String {
    ".".to_string()
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

impl ReportConfig {
    /// A configuration with every optional key at its default.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: default_api_base_url(),
            profile_links: default_profile_links(),
            target_years: default_target_years(),
            page_size: default_page_size(),
            sort: default_sort(),
            min_request_interval_ms: default_interval_ms(),
            author_delay_ms: default_interval_ms(),
            request_timeout_seconds: default_timeout_seconds(),
            output_path: default_output_path(),
            output_file: default_output_file(),
            output_format: None,
        }
    }

    /// Load from a JSON or TOML file, picked by extension (JSON unless it ends in `.toml`).
    /// Parse failures name the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let parsed = if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        };
        parsed.map_err(|e| ReportError::ConfigError {
            message: format!("{}: {}", path.display(), e),
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(serde_json::from_str(&processed)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// Replace `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    pub fn author_delay(&self) -> Duration {
        Duration::from_millis(self.author_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Output file name with `{years}` and `{timestamp}` expanded.
    pub fn resolved_output_file(&self) -> String {
        let years = self
            .target_years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join("_");
        let mut name = self.output_file.replace("{years}", &years);
        if name.contains("{timestamp}") {
            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
            name = name.replace("{timestamp}", &timestamp);
        }
        name
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
            .unwrap_or_else(|| OutputFormat::from_file_name(&self.output_file))
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ReportError::MissingConfigError {
                field: "api_key".to_string(),
            });
        }
        if self.api_key.starts_with("${") {
            return Err(ReportError::ConfigValidationError {
                field: "api_key".to_string(),
                message: format!("environment variable in '{}' is not set", self.api_key),
            });
        }

        validation::validate_url("api_base_url", &self.api_base_url)?;
        validation::validate_non_empty_list("profile_links", &self.profile_links)?;
        validation::validate_non_empty_list("target_years", &self.target_years)?;
        for year in &self.target_years {
            validation::validate_range("target_years", *year, 1900, 2100)?;
        }
        validation::validate_range("page_size", self.page_size, 1, 200)?;
        validation::validate_non_empty_string("sort", &self.sort)?;
        validation::validate_range("request_timeout_seconds", self.request_timeout_seconds, 1, 600)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_file_name("output_file", &self.output_file)?;

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_minimal_json_config_uses_defaults() {
        let config = ReportConfig::from_json_str(r#"{"API_KEY": "abc123"}"#).unwrap();

        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.profile_links.len(), 30);
        assert_eq!(config.target_years, vec![2023, 2024]);
        assert_eq!(config.page_size, 25);
        assert_eq!(config.sort, "pubyear");
        assert_eq!(config.min_request_interval(), Duration::from_secs(1));
        assert_eq!(config.author_delay(), Duration::from_secs(1));
        assert_eq!(config.resolved_output_file(), "scopus_data_2023_2024_updated.xlsx");
        assert_eq!(config.output_format(), OutputFormat::Xlsx);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_content = r#"
api_key = "key"
target_years = [2021]
page_size = 50
output_file = "report_{years}.csv"
profile_links = ["https://www.scopus.com/authid/detail.uri?authorId=1"]
"#;

        let config = ReportConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.page_size, 50);
        assert_eq!(config.profile_links.len(), 1);
        assert_eq!(config.resolved_output_file(), "report_2021.csv");
        assert_eq!(config.output_format(), OutputFormat::Csv);
    }

    #[test]
    fn test_explicit_format_wins_over_extension() {
        let mut config = ReportConfig::with_api_key("key");
        config.output_file = "report.csv".to_string();
        config.output_format = Some(OutputFormat::Xlsx);
        assert_eq!(config.output_format(), OutputFormat::Xlsx);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SCOPUS_REPORT_TEST_KEY", "from-env");

        let config =
            ReportConfig::from_json_str(r#"{"API_KEY": "${SCOPUS_REPORT_TEST_KEY}"}"#).unwrap();
        assert_eq!(config.api_key, "from-env");

        std::env::remove_var("SCOPUS_REPORT_TEST_KEY");
    }

    #[test]
    fn test_unresolved_env_var_fails_validation() {
        let config =
            ReportConfig::from_json_str(r#"{"API_KEY": "${SCOPUS_REPORT_UNSET_VARIABLE}"}"#)
                .unwrap();
        assert_eq!(config.api_key, "${SCOPUS_REPORT_UNSET_VARIABLE}");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ReportError::ConfigValidationError { ref field, .. } if field == "api_key"));
        assert!(err.to_string().contains("SCOPUS_REPORT_UNSET_VARIABLE"));
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let config = ReportConfig::from_json_str("{}").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ReportError::MissingConfigError { ref field } if field == "api_key"));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let mut config = ReportConfig::with_api_key("key");
        config.target_years = vec![];
        assert!(config.validate().is_err());

        let mut config = ReportConfig::with_api_key("key");
        config.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = ReportConfig::with_api_key("key");
        config.api_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timestamp_placeholder_is_expanded() {
        let mut config = ReportConfig::with_api_key("key");
        config.output_file = "scopus_{timestamp}.xlsx".to_string();
        let name = config.resolved_output_file();
        assert!(!name.contains("{timestamp}"));
        assert!(name.starts_with("scopus_"));
        assert!(name.ends_with(".xlsx"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        temp_file
            .write_all(br#"{"API_KEY": "file-key", "author_delay_ms": 0}"#)
            .unwrap();

        let config = ReportConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api_key, "file-key");
        assert_eq!(config.author_delay(), Duration::ZERO);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            ReportConfig::from_json_str("{not json"),
            Err(ReportError::SerializationError(_))
        ));
    }

    #[test]
    fn test_unparseable_config_file_names_the_file() {
        let mut temp_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        temp_file.write_all(b"api_key = ").unwrap();

        let err = ReportConfig::from_file(temp_file.path()).unwrap_err();
        match err {
            ReportError::ConfigError { message } => {
                assert!(message.contains(&temp_file.path().display().to_string()));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }
}
