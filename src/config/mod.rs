pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{GroupField, PlotFilter, StatusFilter};
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::str::FromStr;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "survey-dash")]
#[command(about = "Builds dashboard payloads from a LAS survey spreadsheet")]
pub struct CliConfig {
    #[arg(long, default_value = "las_file.csv")]
    pub survey_file: String,

    #[arg(long, help = "Polygon boundary table; overlays are skipped without it")]
    pub points_file: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "ORE_READING_DIST")]
    pub plot_filter: String,

    #[arg(long, value_delimiter = ',', default_value = "REGION,REGIONPIT,SUBREGIONPIT")]
    pub bar_groups: Vec<String>,

    #[arg(long, default_value = "20", allow_negative_numbers = true)]
    pub page_size: i64,

    #[arg(long, default_value = "1", allow_negative_numbers = true, help = "1-indexed first table row")]
    pub start_row: i64,

    #[arg(long, default_value = "")]
    pub survey_status: String,

    #[arg(long, default_value = "")]
    pub region: String,

    #[arg(long, default_value = "")]
    pub hole_id: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log system resource usage per stage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn survey_file(&self) -> &str {
        &self.survey_file
    }

    fn points_file(&self) -> Option<&str> {
        self.points_file.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn plot_filter(&self) -> &str {
        &self.plot_filter
    }

    fn bar_groups(&self) -> &[String] {
        &self.bar_groups
    }

    fn page_size(&self) -> i64 {
        self.page_size
    }

    fn start_row(&self) -> i64 {
        self.start_row
    }

    fn survey_status(&self) -> &str {
        &self.survey_status
    }

    fn region_filter(&self) -> &str {
        &self.region
    }

    fn hole_id_filter(&self) -> &str {
        &self.hole_id
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("survey_file", &self.survey_file)?;
        validation::validate_file_extensions(
            "survey_file",
            &[self.survey_file.clone()],
            &["csv"],
        )?;
        if let Some(points_file) = &self.points_file {
            validation::validate_file_extensions(
                "points_file",
                &[points_file.clone()],
                &["csv"],
            )?;
        }
        validation::validate_path("output_path", &self.output_path)?;

        // 提前解析選擇器，讓錯誤在進入 pipeline 之前就浮現
        PlotFilter::from_str(&self.plot_filter)?;
        StatusFilter::from_str(&self.survey_status)?;
        for group in &self.bar_groups {
            GroupField::from_str(group)?;
        }

        Ok(())
    }
}
