use crate::core::{figures, table};
use crate::domain::model::{
    DashboardBundle, PlotFilter, PositionRecord, PolygonPoint, RawPolygonPoint, StatusFilter,
    SurveyData, SurveyRow, GroupField,
};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::{DashError, Result};
use crate::utils::validation;
use std::io::Write;
use std::str::FromStr;
use zip::write::{FileOptions, ZipWriter};

/// Header row the survey spreadsheet must carry.
pub const SURVEY_COLUMNS: [&str; 20] = [
    "HOLEID",
    "EAST",
    "NORTH",
    "RL",
    "DRILL_DEPTH",
    "LAS_READING_DEPTH",
    "LAS_STOP_DEPTH",
    "TOO_OREZONE_DRILL",
    "ORE_READING_DIST",
    "DATE_DRILLED",
    "REGION",
    "REGIONPIT",
    "SUBREGIONPIT",
    "OVERBURDEN",
    "DATE_SURVEYED",
    "DAYS_OUTSTANDING",
    "SHORT_LAS",
    "OVERBURDEN_CORRECTED",
    "IS_OUTSTANDING",
    "SURVEY_STATUS",
];

/// Header row of the polygon boundary table.
pub const POINT_COLUMNS: [&str; 4] = ["region_name", "point_order", "X", "Y"];

pub struct DashboardPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> DashboardPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn parse_survey_rows(&self, bytes: &[u8], file: &str) -> Result<Vec<SurveyRow>> {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        validation::validate_columns(file, &headers, &SURVEY_COLUMNS)?;

        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let row: SurveyRow = result?;
            rows.push(row);
        }
        Ok(rows)
    }

    fn parse_points(&self, bytes: &[u8], file: &str) -> Result<Vec<PolygonPoint>> {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        validation::validate_columns(file, &headers, &POINT_COLUMNS)?;

        let mut points = Vec::new();
        let mut dropped = 0usize;
        for result in reader.deserialize() {
            let raw: RawPolygonPoint = result?;
            match raw.into_complete() {
                Some(point) => points.push(point),
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::debug!("Dropped {} incomplete boundary rows from {}", dropped, file);
        }
        Ok(points)
    }

    fn export_positions(&self, records: &[PositionRecord], delimiter: u8) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(vec![]);
        for record in records {
            writer.serialize(record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| DashError::ProcessingError {
                message: format!("Failed to flush position export: {}", e),
            })?;
        String::from_utf8(bytes).map_err(|e| DashError::ProcessingError {
            message: format!("Position export is not valid UTF-8: {}", e),
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DashboardPipeline<S, C> {
    async fn extract(&self) -> Result<SurveyData> {
        let survey_file = self.config.survey_file();
        tracing::debug!("Reading survey spreadsheet: {}", survey_file);
        let survey_bytes = self.storage.read_file(survey_file).await?;
        let rows = self.parse_survey_rows(&survey_bytes, survey_file)?;
        tracing::debug!("Parsed {} survey rows", rows.len());

        let points = match self.config.points_file() {
            Some(points_file) => {
                tracing::debug!("Reading boundary table: {}", points_file);
                let point_bytes = self.storage.read_file(points_file).await?;
                self.parse_points(&point_bytes, points_file)?
            }
            None => {
                tracing::debug!("No boundary table configured, skipping overlays");
                Vec::new()
            }
        };

        Ok(SurveyData { rows, points })
    }

    async fn transform(&self, data: SurveyData) -> Result<DashboardBundle> {
        let plot_filter = PlotFilter::from_str(self.config.plot_filter())?;

        // 只保留有 LAS 讀數的鑽孔，其他列對任何圖表都沒有用處
        let readings: Vec<SurveyRow> = data
            .rows
            .iter()
            .filter(|row| row.has_reading())
            .cloned()
            .collect();
        tracing::debug!(
            "{} of {} rows have a LAS reading",
            readings.len(),
            data.rows.len()
        );

        let mut positions: Vec<PositionRecord> =
            readings.iter().map(PositionRecord::from).collect();
        positions.sort_by(|a, b| {
            a.region
                .cmp(&b.region)
                .then_with(|| a.regionpit.cmp(&b.regionpit))
                .then_with(|| a.subregionpit.cmp(&b.subregionpit))
                .then_with(|| a.survey_status.cmp(&b.survey_status))
        });

        let region_figure = figures::region_figure(&readings, &data.points, plot_filter);
        let survey_figure = figures::survey_status_figure(&readings, plot_filter);

        let mut bar_figures = Vec::new();
        for group_name in self.config.bar_groups() {
            let group = GroupField::from_str(group_name)?;
            bar_figures.push(figures::stopped_position_figure(&positions, group));
        }

        let filter = table::TableFilter {
            survey_status: StatusFilter::from_str(self.config.survey_status())?,
            region: self.config.region_filter().to_string(),
            hole_id: self.config.hole_id_filter().to_string(),
        };
        let table = table::page(
            &positions,
            &filter,
            self.config.start_row(),
            self.config.page_size(),
        );

        let positions_csv = self.export_positions(&positions, b',')?;
        let positions_tsv = self.export_positions(&positions, b'\t')?;

        Ok(DashboardBundle {
            region_figure,
            survey_figure,
            bar_figures,
            table,
            positions_csv,
            positions_tsv,
        })
    }

    async fn load(&self, bundle: DashboardBundle) -> Result<String> {
        let output_path = format!("{}/dashboard_bundle.zip", self.config.output_path());

        let figures_json = serde_json::to_vec_pretty(&serde_json::json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "region_figure": bundle.region_figure,
            "survey_figure": bundle.survey_figure,
            "bar_figures": bundle.bar_figures,
        }))?;

        let table_json = serde_json::to_vec_pretty(&serde_json::json!({
            "caption": bundle.table.caption(),
            "view": bundle.table,
        }))?;

        self.storage.write_file("figures.json", &figures_json).await?;
        self.storage.write_file("table.json", &table_json).await?;
        self.storage
            .write_file("positions.csv", bundle.positions_csv.as_bytes())
            .await?;
        self.storage
            .write_file("positions.tsv", bundle.positions_tsv.as_bytes())
            .await?;

        // 打包一份壓縮 bundle，方便一次下載
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>("figures.json", FileOptions::default())?;
            zip.write_all(&figures_json)?;

            zip.start_file::<_, ()>("table.json", FileOptions::default())?;
            zip.write_all(&table_json)?;

            zip.start_file::<_, ()>("positions.csv", FileOptions::default())?;
            zip.write_all(bundle.positions_csv.as_bytes())?;

            zip.start_file::<_, ()>("positions.tsv", FileOptions::default())?;
            zip.write_all(bundle.positions_tsv.as_bytes())?;

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing bundle ({} bytes) to storage", zip_data.len());
        self.storage
            .write_file("dashboard_bundle.zip", &zip_data)
            .await?;

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{TableView, Trace};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put_file(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files
                .get(path)
                .cloned()
                .ok_or_else(|| DashError::FileNotFound {
                    path: path.to_string(),
                })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        survey_file: String,
        points_file: Option<String>,
        plot_filter: String,
        bar_groups: Vec<String>,
        survey_status: String,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                survey_file: "las_file.csv".to_string(),
                points_file: Some("points.csv".to_string()),
                plot_filter: "ORE_READING_DIST".to_string(),
                bar_groups: vec!["REGION".to_string()],
                survey_status: "".to_string(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn survey_file(&self) -> &str {
            &self.survey_file
        }

        fn points_file(&self) -> Option<&str> {
            self.points_file.as_deref()
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn plot_filter(&self) -> &str {
            &self.plot_filter
        }

        fn bar_groups(&self) -> &[String] {
            &self.bar_groups
        }

        fn page_size(&self) -> i64 {
            20
        }

        fn start_row(&self) -> i64 {
            1
        }

        fn survey_status(&self) -> &str {
            &self.survey_status
        }

        fn region_filter(&self) -> &str {
            ""
        }

        fn hole_id_filter(&self) -> &str {
            ""
        }
    }

    const SURVEY_CSV: &str = "\
HOLEID,EAST,NORTH,RL,DRILL_DEPTH,LAS_READING_DEPTH,LAS_STOP_DEPTH,TOO_OREZONE_DRILL,ORE_READING_DIST,DATE_DRILLED,REGION,REGIONPIT,SUBREGIONPIT,OVERBURDEN,DATE_SURVEYED,DAYS_OUTSTANDING,SHORT_LAS,OVERBURDEN_CORRECTED,IS_OUTSTANDING,SURVEY_STATUS
DH001,100.0,200.0,420.0,120.0,115.5,114.0,4.5,2.0,2021-03-15,NORTH,N_PIT1,N_SUB1,30.0,2021-03-20,5,N,31.0,N,FULL_SURVEY
DH002,101.0,201.0,421.0,118.0,,113.0,3.0,1.5,2021-03-16,NORTH,N_PIT1,N_SUB1,28.0,,,Y,29.0,Y,PARTIAL_SURVEY
DH003,150.0,250.0,430.0,130.0,90.0,89.0,2.0,3.5,2021-04-01,SOUTH,S_PIT1,S_SUB1,35.0,2021-04-05,4,N,36.0,N,STOPPED_SHORT
";

    const POINTS_CSV: &str = "\
region_name,point_order,X,Y
N_PIT,1,0.0,0.0
N_PIT,2,1.0,0.0
S_PIT,1,10.0,10.0
,2,,
";

    #[tokio::test]
    async fn test_extract_parses_rows_and_drops_incomplete_points() {
        let storage = MockStorage::new();
        storage.put_file("las_file.csv", SURVEY_CSV.as_bytes()).await;
        storage.put_file("points.csv", POINTS_CSV.as_bytes()).await;

        let pipeline = DashboardPipeline::new(storage, MockConfig::new());
        let data = pipeline.extract().await.unwrap();

        assert_eq!(data.rows.len(), 3);
        assert_eq!(data.rows[0].hole_id, "DH001");
        assert_eq!(data.rows[1].las_reading_depth, None);
        assert_eq!(
            data.rows[0].date_drilled.map(|d| d.to_string()),
            Some("2021-03-15".to_string())
        );
        // the blank boundary row is dropped
        assert_eq!(data.points.len(), 3);
    }

    #[tokio::test]
    async fn test_extract_missing_column_fails() {
        let storage = MockStorage::new();
        storage
            .put_file("las_file.csv", b"HOLEID,EAST\nDH001,100.0\n")
            .await;

        let pipeline = DashboardPipeline::new(storage, MockConfig::new());
        let err = pipeline.extract().await.unwrap_err();
        match err {
            DashError::MissingColumn { column, file } => {
                assert_eq!(column, "NORTH");
                assert_eq!(file, "las_file.csv");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extract_missing_file_fails() {
        let pipeline = DashboardPipeline::new(MockStorage::new(), MockConfig::new());
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, DashError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_transform_filters_unread_rows_and_builds_payloads() {
        let storage = MockStorage::new();
        storage.put_file("las_file.csv", SURVEY_CSV.as_bytes()).await;
        storage.put_file("points.csv", POINTS_CSV.as_bytes()).await;

        let pipeline = DashboardPipeline::new(storage, MockConfig::new());
        let data = pipeline.extract().await.unwrap();
        let bundle = pipeline.transform(data).await.unwrap();

        // DH002 has no LAS reading and must not appear anywhere
        match &bundle.table {
            TableView::Page(page) => {
                assert_eq!(page.total, 2);
                assert!(page.rows.iter().all(|r| r.hole_id != "DH002"));
            }
            TableView::Empty => panic!("expected a page"),
        }

        assert_eq!(bundle.bar_figures.len(), 1);
        let counts: u64 = bundle.bar_figures[0]
            .traces
            .iter()
            .map(|t| match t {
                Trace::Bar { y, .. } => y.iter().sum::<u64>(),
                _ => 0,
            })
            .sum();
        assert_eq!(counts, 2);

        assert!(bundle.positions_csv.starts_with(
            "HOLEID,REGION,REGIONPIT,SUBREGIONPIT,SURVEY_STATUS"
        ));
        assert!(bundle.positions_tsv.contains("DH003\tSOUTH"));
    }

    #[tokio::test]
    async fn test_transform_rejects_unknown_plot_filter() {
        let storage = MockStorage::new();
        storage.put_file("las_file.csv", SURVEY_CSV.as_bytes()).await;
        storage.put_file("points.csv", POINTS_CSV.as_bytes()).await;

        let mut config = MockConfig::new();
        config.plot_filter = "NOT_A_FILTER".to_string();
        let pipeline = DashboardPipeline::new(storage, config);
        let data = pipeline.extract().await.unwrap();
        let err = pipeline.transform(data).await.unwrap_err();
        assert!(matches!(err, DashError::InvalidFilterValue { .. }));
    }

    #[tokio::test]
    async fn test_load_writes_payloads_and_bundle() {
        let storage = MockStorage::new();
        storage.put_file("las_file.csv", SURVEY_CSV.as_bytes()).await;
        storage.put_file("points.csv", POINTS_CSV.as_bytes()).await;

        let pipeline = DashboardPipeline::new(storage.clone(), MockConfig::new());
        let data = pipeline.extract().await.unwrap();
        let bundle = pipeline.transform(data).await.unwrap();
        let output_path = pipeline.load(bundle).await.unwrap();

        assert!(output_path.contains("dashboard_bundle.zip"));
        let figures_json = storage.get_file("figures.json").await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&figures_json).unwrap();
        assert!(payload["region_figure"]["title"]
            .as_str()
            .unwrap()
            .contains("Coloured by Region"));
        assert!(storage.get_file("dashboard_bundle.zip").await.is_some());
    }
}
