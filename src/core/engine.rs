use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives a pipeline through its three stages. Every run recomputes the
/// whole bundle from the input files; runs are independent and reentrant.
pub struct DashEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> DashEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting dashboard build...");

        tracing::info!("Extracting survey data...");
        let data = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} survey rows and {} boundary points",
            data.rows.len(),
            data.points.len()
        );
        self.monitor.log_stage("Extract");

        tracing::info!("Building figures and table...");
        let bundle = self.pipeline.transform(data).await?;
        tracing::info!(
            "Built {} figures ({})",
            2 + bundle.bar_figures.len(),
            bundle.table.caption()
        );
        self.monitor.log_stage("Transform");

        tracing::info!("Writing dashboard payloads...");
        let output_path = self.pipeline.load(bundle).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stage("Load");

        if self.monitor.is_enabled() {
            self.monitor.log_final_stats();
        }

        Ok(output_path)
    }
}
