use crate::domain::model::{ChartArtifact, ChartOptions, MetricSeries, NormalizedRecord, TransformResult};
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
    fn input_path(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn header_rows(&self) -> usize;
    fn chart_options(&self) -> ChartOptions;
    fn keep_images(&self) -> bool;
}

/// Turns one series into an image. Implementations keep no state between calls.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, series: &MetricSeries) -> Result<ChartArtifact>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<NormalizedRecord>>;
    async fn transform(&self, data: Vec<NormalizedRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
