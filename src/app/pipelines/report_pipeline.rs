use crate::adapters::xlsx;
use crate::core::{archive, bundle, normalize, partition};
use crate::core::{ChartRenderer, ConfigProvider, NormalizedRecord, Pipeline, Storage, TransformResult};
use crate::utils::error::{ChartError, Result};
use chrono::{Local, NaiveDateTime};

/// Report workbook in, zip of per-metric charts out.
pub struct ReportPipeline<S: Storage, C: ConfigProvider, R: ChartRenderer> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) renderer: R,
    generated_at: Option<NaiveDateTime>,
}

impl<S: Storage, C: ConfigProvider, R: ChartRenderer> ReportPipeline<S, C, R> {
    pub fn new(storage: S, config: C, renderer: R) -> Self {
        Self {
            storage,
            config,
            renderer,
            generated_at: None,
        }
    }

    /// Pins the generation time instead of reading the clock at load.
    pub fn with_generated_at(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    fn generation_time(&self) -> NaiveDateTime {
        self.generated_at
            .unwrap_or_else(|| Local::now().naive_local())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, R: ChartRenderer> Pipeline for ReportPipeline<S, C, R> {
    async fn extract(&self) -> Result<Vec<NormalizedRecord>> {
        let input = self.config.input_path().ok_or(ChartError::MissingInput)?;
        tracing::info!("📥 Reading report from: {}", input);

        let bytes = self.storage.read_file(input).await?;
        if bytes.is_empty() {
            return Err(ChartError::MissingInput);
        }
        tracing::debug!("Report file size: {} bytes", bytes.len());

        let report = xlsx::read_report(bytes)?;
        let records = normalize::normalize(&report, self.config.header_rows())?;

        tracing::info!("📊 Normalized {} data rows", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<NormalizedRecord>) -> Result<TransformResult> {
        let series = partition::partition(&data);

        for s in &series {
            if s.is_empty() {
                tracing::warn!("No rows for '{}', its chart will be empty", s.metric);
            } else {
                tracing::debug!("'{}': {} points", s.metric, s.points.len());
            }
        }

        // 依固定順序逐一繪圖
        let artifacts = bundle::render_all(&self.renderer, &series)?;

        tracing::info!("🖼️ Rendered {} charts", artifacts.len());
        Ok(TransformResult { series, artifacts })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let generated_at = self.generation_time();
        let bundle = archive::package(&result.artifacts, generated_at)?;

        tracing::debug!("Writing ZIP file ({} bytes) to storage", bundle.bytes.len());
        self.storage.write_file(&bundle.name, &bundle.bytes).await?;

        // 壓縮檔寫入成功後才留下個別圖檔
        if self.config.keep_images() {
            for artifact in &result.artifacts {
                let path = format!("{}/{}", bundle.stamp(), artifact.file_name());
                self.storage.write_file(&path, &artifact.bytes).await?;
            }
            tracing::debug!("Wrote {} images under {}/", result.artifacts.len(), bundle.stamp());
        }

        let output_path = format!("{}/{}", self.config.output_path(), bundle.name);
        tracing::info!("📦 Archive saved: {}", output_path);
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metric::Metric;
    use crate::domain::model::{ChartArtifact, ChartOptions, MetricSeries};
    use chrono::NaiveDate;
    use rust_xlsxwriter::Workbook;
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

        async fn put_file(&self, path: &str, data: Vec<u8>) {
            self.files.lock().await.insert(path.to_string(), data);
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn paths(&self) -> Vec<String> {
            let mut paths: Vec<String> = self.files.lock().await.keys().cloned().collect();
            paths.sort();
            paths
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ChartError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    /// Refuses archive writes, accepts everything else.
    struct ZipRejectingStorage {
        inner: MockStorage,
    }

    impl Storage for ZipRejectingStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.inner.read_file(path).await
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if path.ends_with(".zip") {
                return Err(ChartError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("Read-only: {}", path),
                )));
            }
            self.inner.write_file(path, data).await
        }
    }

    struct MockConfig {
        input_path: Option<String>,
        keep_images: bool,
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> Option<&str> {
            self.input_path.as_deref()
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn header_rows(&self) -> usize {
            4
        }

        fn chart_options(&self) -> ChartOptions {
            ChartOptions::default()
        }

        fn keep_images(&self) -> bool {
            self.keep_images
        }
    }

    /// Writes the point count instead of an image.
    struct CountingRenderer;

    impl ChartRenderer for CountingRenderer {
        fn render(&self, series: &MetricSeries) -> Result<ChartArtifact> {
            Ok(ChartArtifact {
                metric: series.metric,
                bytes: series.points.len().to_string().into_bytes(),
            })
        }
    }

    fn workbook_bytes(data_rows: &[[&str; 5]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Throughput Report").unwrap();
        worksheet.write_string(1, 0, "Site: 42").unwrap();
        worksheet.write_string(2, 0, "Legend: values as reported").unwrap();
        for (col, name) in ["Group", "Code", "Value", "Start", "End"].iter().enumerate() {
            worksheet.write_string(3, col as u16, *name).unwrap();
        }
        for (i, row) in data_rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                worksheet.write_string(4 + i as u32, col as u16, *value).unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn pipeline(
        storage: MockStorage,
        input_path: Option<&str>,
        keep_images: bool,
    ) -> ReportPipeline<MockStorage, MockConfig, CountingRenderer> {
        let config = MockConfig {
            input_path: input_path.map(str::to_string),
            keep_images,
        };
        ReportPipeline::new(storage, config, CountingRenderer).with_generated_at(generated_at())
    }

    #[tokio::test]
    async fn test_extract_without_input_is_missing_input() {
        let pipeline = pipeline(MockStorage::new(), None, false);
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, ChartError::MissingInput));
    }

    #[tokio::test]
    async fn test_extract_empty_upload_is_missing_input() {
        let storage = MockStorage::new();
        storage.put_file("report.xlsx", Vec::new()).await;

        let pipeline = pipeline(storage, Some("report.xlsx"), false);
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, ChartError::MissingInput));
    }

    #[tokio::test]
    async fn test_extract_normalizes_data_rows() {
        let storage = MockStorage::new();
        storage
            .put_file(
                "report.xlsx",
                workbook_bytes(&[
                    ["LTE", "UP Speed", "10 Mbps", "2024-03-01 10:00:00", ""],
                    ["LTE", "SINR", "12 dB", "2024-03-01 10:00:00", ""],
                ]),
            )
            .await;

        let pipeline = pipeline(storage, Some("report.xlsx"), false);
        let records = pipeline.extract().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].numeric_value, Some(10.0));
        assert_eq!(records[1].code, "SINR");
    }

    #[tokio::test]
    async fn test_full_run_writes_bundle_and_images() {
        let storage = MockStorage::new();
        storage
            .put_file(
                "report.xlsx",
                workbook_bytes(&[
                    ["LTE", "Tx_power", "23 dBm", "2024-03-01 10:05:00", ""],
                    ["LTE", "Tx_power", "22 dBm", "2024-03-01 10:00:00", ""],
                ]),
            )
            .await;

        let pipeline = pipeline(storage.clone(), Some("report.xlsx"), true);
        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();

        let tx = result
            .series
            .iter()
            .find(|s| s.metric == Metric::TxPower)
            .unwrap();
        assert_eq!(tx.points[0].value, Some(22.0));
        assert_eq!(tx.points[1].value, Some(23.0));

        let output = pipeline.load(result).await.unwrap();
        assert_eq!(output, "test_output/20240301_120000.zip");

        let paths = storage.paths().await;
        assert!(paths.contains(&"20240301_120000.zip".to_string()));
        assert!(paths.contains(&"20240301_120000/Tx_power.jpeg".to_string()));
        assert_eq!(
            storage.get_file("20240301_120000/Tx_power.jpeg").await.unwrap(),
            b"2"
        );
        // 6 張圖 + 壓縮檔 + 原始報表
        assert_eq!(paths.len(), 8);
    }

    #[tokio::test]
    async fn test_failed_archive_write_leaves_no_images() {
        let inner = MockStorage::new();
        let config = MockConfig {
            input_path: None,
            keep_images: true,
        };
        let pipeline = ReportPipeline::new(
            ZipRejectingStorage {
                inner: inner.clone(),
            },
            config,
            CountingRenderer,
        )
        .with_generated_at(generated_at());

        let series = partition::partition(&[]);
        let artifacts = bundle::render_all(&CountingRenderer, &series).unwrap();
        let err = pipeline
            .load(TransformResult { series, artifacts })
            .await
            .unwrap_err();

        assert!(matches!(err, ChartError::IoError(_)));
        assert!(inner.paths().await.is_empty());
    }
}
