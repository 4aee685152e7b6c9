use crate::domain::model::{GroupField, PlotFilter, StatusFilter};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DashError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub dashboard: DashboardInfo,
    pub source: SourceConfig,
    #[serde(default)]
    pub charts: ChartsConfig,
    #[serde(default)]
    pub table: TableConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardInfo {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub survey_file: String,
    pub points_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    #[serde(default = "default_plot_filter")]
    pub plot_filter: String,
    #[serde(default = "default_bar_groups")]
    pub bar_groups: Vec<String>,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            plot_filter: default_plot_filter(),
            bar_groups: default_bar_groups(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    #[serde(default = "default_start_row")]
    pub start_row: i64,
    #[serde(default)]
    pub survey_status: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub hole_id: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            start_row: default_start_row(),
            survey_status: String::new(),
            region: String::new(),
            hole_id: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

fn default_plot_filter() -> String {
    "ORE_READING_DIST".to_string()
}

fn default_bar_groups() -> Vec<String> {
    vec![
        "REGION".to_string(),
        "REGIONPIT".to_string(),
        "SUBREGIONPIT".to_string(),
    ]
}

fn default_page_size() -> i64 {
    20
}

fn default_start_row() -> i64 {
    1
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SURVEY_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern");

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("source.survey_file", &self.source.survey_file)?;
        validation::validate_file_extensions(
            "source.survey_file",
            &[self.source.survey_file.clone()],
            &["csv"],
        )?;
        if let Some(points_file) = &self.source.points_file {
            validation::validate_file_extensions(
                "source.points_file",
                &[points_file.clone()],
                &["csv"],
            )?;
        }
        validation::validate_path("load.output_path", &self.load.output_path)?;

        PlotFilter::from_str(&self.charts.plot_filter)?;
        StatusFilter::from_str(&self.table.survey_status)?;
        for group in &self.charts.bar_groups {
            GroupField::from_str(group)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn survey_file(&self) -> &str {
        &self.source.survey_file
    }

    fn points_file(&self) -> Option<&str> {
        self.source.points_file.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn plot_filter(&self) -> &str {
        &self.charts.plot_filter
    }

    fn bar_groups(&self) -> &[String] {
        &self.charts.bar_groups
    }

    fn page_size(&self) -> i64 {
        self.table.page_size
    }

    fn start_row(&self) -> i64 {
        self.table.start_row
    }

    fn survey_status(&self) -> &str {
        &self.table.survey_status
    }

    fn region_filter(&self) -> &str {
        &self.table.region
    }

    fn hole_id_filter(&self) -> &str {
        &self.table.hole_id
    }
}
