pub mod aggregate;
pub mod engine;
pub mod figures;
pub mod pipeline;
pub mod table;

pub use crate::domain::model::{CountBucket, DashboardBundle, SurveyData};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
