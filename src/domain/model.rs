use crate::utils::error::DashError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of the LAS survey spreadsheet. Field names map onto the exact
/// spreadsheet headers; blank cells deserialize to `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyRow {
    #[serde(rename = "HOLEID")]
    pub hole_id: String,
    #[serde(rename = "EAST")]
    pub east: f64,
    #[serde(rename = "NORTH")]
    pub north: f64,
    #[serde(rename = "RL")]
    pub rl: f64,
    #[serde(rename = "DRILL_DEPTH")]
    pub drill_depth: Option<f64>,
    #[serde(rename = "LAS_READING_DEPTH")]
    pub las_reading_depth: Option<f64>,
    #[serde(rename = "LAS_STOP_DEPTH")]
    pub las_stop_depth: Option<f64>,
    #[serde(rename = "TOO_OREZONE_DRILL")]
    pub too_orezone_drill: Option<f64>,
    #[serde(rename = "ORE_READING_DIST")]
    pub ore_reading_dist: Option<f64>,
    #[serde(rename = "DATE_DRILLED", with = "opt_date")]
    pub date_drilled: Option<NaiveDate>,
    #[serde(rename = "REGION")]
    pub region: String,
    #[serde(rename = "REGIONPIT")]
    pub regionpit: String,
    #[serde(rename = "SUBREGIONPIT")]
    pub subregionpit: String,
    #[serde(rename = "OVERBURDEN")]
    pub overburden: Option<f64>,
    #[serde(rename = "DATE_SURVEYED", with = "opt_date")]
    pub date_surveyed: Option<NaiveDate>,
    #[serde(rename = "DAYS_OUTSTANDING")]
    pub days_outstanding: Option<f64>,
    #[serde(rename = "SHORT_LAS")]
    pub short_las: String,
    #[serde(rename = "OVERBURDEN_CORRECTED")]
    pub overburden_corrected: Option<f64>,
    #[serde(rename = "IS_OUTSTANDING")]
    pub is_outstanding: String,
    #[serde(rename = "SURVEY_STATUS")]
    pub survey_status: String,
}

impl SurveyRow {
    /// The value this row contributes to a 3D plot for the given filter.
    pub fn plot_value(&self, filter: PlotFilter) -> Option<f64> {
        match filter {
            PlotFilter::DrillDepth => self.drill_depth,
            PlotFilter::LasReadingDepth => self.las_reading_depth,
            PlotFilter::TooOrezoneDrill => self.too_orezone_drill,
            PlotFilter::OreReadingDist => self.ore_reading_dist,
            PlotFilter::OverburdenCorrected => self.overburden_corrected,
        }
    }

    pub fn has_reading(&self) -> bool {
        self.las_reading_depth.is_some()
    }
}

/// Serde helper for the spreadsheet's date columns (ISO dates, blank = none).
mod opt_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

/// The five columns the bar charts and the browse table work with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    #[serde(rename = "HOLEID")]
    pub hole_id: String,
    #[serde(rename = "REGION")]
    pub region: String,
    #[serde(rename = "REGIONPIT")]
    pub regionpit: String,
    #[serde(rename = "SUBREGIONPIT")]
    pub subregionpit: String,
    #[serde(rename = "SURVEY_STATUS")]
    pub survey_status: String,
}

impl From<&SurveyRow> for PositionRecord {
    fn from(row: &SurveyRow) -> Self {
        Self {
            hole_id: row.hole_id.clone(),
            region: row.region.clone(),
            regionpit: row.regionpit.clone(),
            subregionpit: row.subregionpit.clone(),
            survey_status: row.survey_status.clone(),
        }
    }
}

impl PositionRecord {
    pub fn field(&self, field: GroupField) -> &str {
        match field {
            GroupField::HoleId => &self.hole_id,
            GroupField::Region => &self.region,
            GroupField::RegionPit => &self.regionpit,
            GroupField::SubRegionPit => &self.subregionpit,
            GroupField::SurveyStatus => &self.survey_status,
        }
    }
}

/// One row of the polygon boundary table, as read from disk. Incomplete rows
/// are dropped during extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPolygonPoint {
    pub region_name: Option<String>,
    pub point_order: Option<i64>,
    #[serde(rename = "X")]
    pub x: Option<f64>,
    #[serde(rename = "Y")]
    pub y: Option<f64>,
}

impl RawPolygonPoint {
    pub fn into_complete(self) -> Option<PolygonPoint> {
        Some(PolygonPoint {
            region_name: self.region_name?,
            point_order: self.point_order?,
            x: self.x?,
            y: self.y?,
        })
    }
}

/// A complete boundary point, ordered within its region polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonPoint {
    pub region_name: String,
    pub point_order: i64,
    pub x: f64,
    pub y: f64,
}

/// One aggregated run of identical category values: which group value closed
/// the run, the category shared by the run, and how many records it held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBucket {
    pub group: String,
    pub category: String,
    pub count: usize,
}

/// The attributes the bar charts can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupField {
    HoleId,
    Region,
    RegionPit,
    SubRegionPit,
    SurveyStatus,
}

/// Selector order of the bar attributes, matching their positions in the
/// dashboard's group-by selector.
pub const BAR_FIELDS: [GroupField; 5] = [
    GroupField::HoleId,
    GroupField::Region,
    GroupField::RegionPit,
    GroupField::SubRegionPit,
    GroupField::SurveyStatus,
];

impl GroupField {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupField::HoleId => "HOLEID",
            GroupField::Region => "REGION",
            GroupField::RegionPit => "REGIONPIT",
            GroupField::SubRegionPit => "SUBREGIONPIT",
            GroupField::SurveyStatus => "SURVEY_STATUS",
        }
    }

    pub fn from_index(index: usize) -> Option<GroupField> {
        BAR_FIELDS.get(index).copied()
    }
}

impl fmt::Display for GroupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupField {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BAR_FIELDS
            .iter()
            .copied()
            .find(|field| field.as_str() == s.to_uppercase())
            .ok_or_else(|| DashError::InvalidFilterValue {
                field: "group_field".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Supported fields: {}",
                    BAR_FIELDS.map(|f| f.as_str()).join(", ")
                ),
            })
    }
}

/// The attributes a 3D plot can chart on its z axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotFilter {
    DrillDepth,
    LasReadingDepth,
    TooOrezoneDrill,
    OreReadingDist,
    OverburdenCorrected,
}

pub const PLOT_FILTERS: [PlotFilter; 5] = [
    PlotFilter::DrillDepth,
    PlotFilter::LasReadingDepth,
    PlotFilter::TooOrezoneDrill,
    PlotFilter::OreReadingDist,
    PlotFilter::OverburdenCorrected,
];

impl PlotFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotFilter::DrillDepth => "DRILL_DEPTH",
            PlotFilter::LasReadingDepth => "LAS_READING_DEPTH",
            PlotFilter::TooOrezoneDrill => "TOO_OREZONE_DRILL",
            PlotFilter::OreReadingDist => "ORE_READING_DIST",
            PlotFilter::OverburdenCorrected => "OVERBURDEN_CORRECTED",
        }
    }
}

impl fmt::Display for PlotFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlotFilter {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PLOT_FILTERS
            .iter()
            .copied()
            .find(|filter| filter.as_str() == s.to_uppercase())
            .ok_or_else(|| DashError::InvalidFilterValue {
                field: "plot_filter".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Supported filters: {}",
                    PLOT_FILTERS.map(|f| f.as_str()).join(", ")
                ),
            })
    }
}

/// The survey-status radio filter of the browse table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    FullSurvey,
    PartialSurvey,
    StoppedShort,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "",
            StatusFilter::FullSurvey => "FULL_SURVEY",
            StatusFilter::PartialSurvey => "PARTIAL_SURVEY",
            StatusFilter::StoppedShort => "STOPPED_SHORT",
        }
    }

    pub fn matches(&self, status: &str) -> bool {
        match self {
            StatusFilter::All => true,
            other => status == other.as_str(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "" | "ALL" => Ok(StatusFilter::All),
            "FULL_SURVEY" => Ok(StatusFilter::FullSurvey),
            "PARTIAL_SURVEY" => Ok(StatusFilter::PartialSurvey),
            "STOPPED_SHORT" => Ok(StatusFilter::StoppedShort),
            _ => Err(DashError::InvalidFilterValue {
                field: "survey_status".to_string(),
                value: s.to_string(),
                reason: "Supported values: ALL, FULL_SURVEY, PARTIAL_SURVEY, STOPPED_SHORT"
                    .to_string(),
            }),
        }
    }
}

/// Everything the extract stage pulls off disk.
#[derive(Debug, Clone)]
pub struct SurveyData {
    pub rows: Vec<SurveyRow>,
    pub points: Vec<PolygonPoint>,
}

/// A chart model a frontend renders. Traces carry their data and styling;
/// nothing here knows how to draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axes: Option<AxisTitles>,
    pub traces: Vec<Trace>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisTitles {
    pub x: String,
    pub y: String,
    pub z: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Scatter3d {
        name: String,
        legend_group: String,
        show_legend: bool,
        mode: String,
        color: String,
        marker_size: u32,
        x: Vec<f64>,
        y: Vec<f64>,
        z: Vec<f64>,
    },
    Bar {
        name: String,
        color: String,
        x: Vec<String>,
        y: Vec<u64>,
    },
}

/// A page of the browse table, or the designated empty response when the
/// filter combination matches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableView {
    Page(TablePage),
    Empty,
}

pub const NO_DATA_MESSAGE: &str = "No data for this filter combination.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePage {
    /// 0-indexed first row of the page.
    pub start_row: usize,
    /// Exclusive end row.
    pub end_row: usize,
    /// Total rows after filtering.
    pub total: usize,
    pub rows: Vec<PositionRecord>,
}

impl TablePage {
    pub fn caption(&self) -> String {
        format!(
            "Showing rows {} - {} out of {} total.",
            self.start_row + 1,
            self.end_row,
            self.total
        )
    }
}

impl TableView {
    pub fn caption(&self) -> String {
        match self {
            TableView::Page(page) => page.caption(),
            TableView::Empty => NO_DATA_MESSAGE.to_string(),
        }
    }
}

/// Transform output: every payload the dashboard renders, plus the flat
/// exports of the position records.
#[derive(Debug, Clone)]
pub struct DashboardBundle {
    pub region_figure: Figure,
    pub survey_figure: Figure,
    pub bar_figures: Vec<Figure>,
    pub table: TableView,
    pub positions_csv: String,
    pub positions_tsv: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_parse_case_insensitively() {
        assert_eq!("region".parse::<GroupField>().unwrap(), GroupField::Region);
        assert_eq!(
            "drill_depth".parse::<PlotFilter>().unwrap(),
            PlotFilter::DrillDepth
        );
        assert!(matches!(
            "EASTING".parse::<PlotFilter>(),
            Err(DashError::InvalidFilterValue { .. })
        ));
    }

    #[test]
    fn test_survey_rows_deserialize_blank_cells() {
        let csv_data = "\
HOLEID,EAST,NORTH,RL,DRILL_DEPTH,LAS_READING_DEPTH,LAS_STOP_DEPTH,TOO_OREZONE_DRILL,ORE_READING_DIST,DATE_DRILLED,REGION,REGIONPIT,SUBREGIONPIT,OVERBURDEN,DATE_SURVEYED,DAYS_OUTSTANDING,SHORT_LAS,OVERBURDEN_CORRECTED,IS_OUTSTANDING,SURVEY_STATUS
DH001,100.0,200.0,420.0,,115.5,,,,2021-03-15,NORTH,N_PIT1,N_SUB1,,,,,,,FULL_SURVEY
";
        let mut reader = csv::Reader::from_reader(csv_data.as_bytes());
        let row: SurveyRow = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.hole_id, "DH001");
        assert_eq!(row.drill_depth, None);
        assert_eq!(row.las_reading_depth, Some(115.5));
        assert_eq!(
            row.date_drilled,
            NaiveDate::from_ymd_opt(2021, 3, 15)
        );
        assert_eq!(row.date_surveyed, None);
        assert!(row.has_reading());
    }

    #[test]
    fn test_position_record_projects_bar_columns() {
        let csv_data = "\
HOLEID,EAST,NORTH,RL,DRILL_DEPTH,LAS_READING_DEPTH,LAS_STOP_DEPTH,TOO_OREZONE_DRILL,ORE_READING_DIST,DATE_DRILLED,REGION,REGIONPIT,SUBREGIONPIT,OVERBURDEN,DATE_SURVEYED,DAYS_OUTSTANDING,SHORT_LAS,OVERBURDEN_CORRECTED,IS_OUTSTANDING,SURVEY_STATUS
DH001,100.0,200.0,420.0,120.0,115.5,114.0,4.5,2.0,,NORTH,N_PIT1,N_SUB1,30.0,,5,N,31.0,N,FULL_SURVEY
";
        let mut reader = csv::Reader::from_reader(csv_data.as_bytes());
        let row: SurveyRow = reader.deserialize().next().unwrap().unwrap();
        let position = PositionRecord::from(&row);
        assert_eq!(position.field(GroupField::Region), "NORTH");
        assert_eq!(position.field(GroupField::SurveyStatus), "FULL_SURVEY");
    }
}
