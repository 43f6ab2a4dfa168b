use crate::core::normalize::DEFAULT_HEADER_ROWS;
use crate::core::ConfigProvider;
use crate::domain::model::ChartOptions;
use crate::utils::error::{ChartError, Result};
use crate::utils::validation::{self, Validate, SPREADSHEET_EXTENSIONS};
use chrono::format::{Item, StrftimeItems};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub chart: ChartOptions,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub input_path: Option<String>,
    pub header_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: None,
            header_rows: DEFAULT_HEADER_ROWS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub keep_images: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            keep_images: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ChartError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REPORT_DIR})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ChartError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("output.output_path", &self.output.output_path)?;

        if let Some(input) = &self.report.input_path {
            validation::validate_path("report.input_path", input)?;
            validation::validate_file_extension("report.input_path", input, SPREADSHEET_EXTENSIONS)?;
        }

        validation::validate_range("chart.width", self.chart.width, 200, 8000)?;
        validation::validate_range("chart.height", self.chart.height, 150, 8000)?;
        validation::validate_positive_number("chart.tick_stride", self.chart.tick_stride, 1)?;
        validation::validate_range("chart.jpeg_quality", self.chart.jpeg_quality, 1, 100)?;
        validation::validate_non_empty_string("chart.time_format", &self.chart.time_format)?;
        if StrftimeItems::new(&self.chart.time_format).any(|item| matches!(item, Item::Error)) {
            return Err(ChartError::InvalidConfigValueError {
                field: "chart.time_format".to_string(),
                value: self.chart.time_format.clone(),
                reason: "Not a valid strftime format".to_string(),
            });
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> Option<&str> {
        self.report.input_path.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn header_rows(&self) -> usize {
        self.report.header_rows
    }

    fn chart_options(&self) -> ChartOptions {
        self.chart.clone()
    }

    fn keep_images(&self) -> bool {
        self.output.keep_images
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
