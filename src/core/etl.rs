use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract, transform and load in order; the first error aborts the run.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting report charting run...");

        // Extract
        tracing::info!("Reading report...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", records.len());
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("Rendering charts...");
        let transformed = self.pipeline.transform(records).await?;
        tracing::info!("Rendered {} charts", transformed.artifacts.len());
        self.monitor.log_stats("Transform");

        // Load
        tracing::info!("Packaging archive...");
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
