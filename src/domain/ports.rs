use crate::domain::model::{DashboardBundle, SurveyData};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn survey_file(&self) -> &str;
    fn points_file(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    /// Name of the z-axis attribute for the 3D plots.
    fn plot_filter(&self) -> &str;
    /// Names of the attributes the bar charts group by, in display order.
    fn bar_groups(&self) -> &[String];
    fn page_size(&self) -> i64;
    /// 1-indexed first row of the browse table.
    fn start_row(&self) -> i64;
    fn survey_status(&self) -> &str;
    fn region_filter(&self) -> &str;
    fn hole_id_filter(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SurveyData>;
    async fn transform(&self, data: SurveyData) -> Result<DashboardBundle>;
    async fn load(&self, bundle: DashboardBundle) -> Result<String>;
}
