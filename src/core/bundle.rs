use crate::core::{archive, normalize, partition};
use crate::domain::model::{ChartArtifact, MetricSeries, OutputBundle, RawReport};
use crate::domain::ports::ChartRenderer;
use crate::utils::error::Result;
use chrono::NaiveDateTime;

/// Renders every series in order. The first failure aborts the whole batch.
pub fn render_all<R: ChartRenderer + ?Sized>(
    renderer: &R,
    series: &[MetricSeries],
) -> Result<Vec<ChartArtifact>> {
    series.iter().map(|s| renderer.render(s)).collect()
}

/// The whole transform in one call: report in, zip bundle out.
pub fn generate_bundle<R: ChartRenderer + ?Sized>(
    report: &RawReport,
    header_rows: usize,
    renderer: &R,
    generated_at: NaiveDateTime,
) -> Result<OutputBundle> {
    let records = normalize::normalize(report, header_rows)?;
    let series = partition::partition(&records);
    let artifacts = render_all(renderer, &series)?;
    archive::package(&artifacts, generated_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Cell;
    use crate::utils::error::ChartError;
    use chrono::NaiveDate;

    struct SizeRenderer;

    impl ChartRenderer for SizeRenderer {
        fn render(&self, series: &MetricSeries) -> Result<ChartArtifact> {
            Ok(ChartArtifact {
                metric: series.metric,
                bytes: series.points.len().to_string().into_bytes(),
            })
        }
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn report(width: usize) -> RawReport {
        let mut rows = vec![vec![Cell::text("title")]; 4];
        let mut data = vec![
            Cell::text("LTE"),
            Cell::text("UP Speed"),
            Cell::text("10 Mbps"),
            Cell::text("2024-03-01 08:00"),
            Cell::Empty,
        ];
        data.resize(width, Cell::text("x"));
        rows.push(data);
        RawReport::new(rows)
    }

    #[test]
    fn test_generate_bundle_has_all_metrics() {
        let bundle = generate_bundle(&report(5), 4, &SizeRenderer, generated_at()).unwrap();
        assert_eq!(bundle.entries.len(), 6);
        assert_eq!(bundle.name, "20240301_090000.zip");
    }

    #[test]
    fn test_generate_bundle_stops_on_structure() {
        let err = generate_bundle(&report(6), 4, &SizeRenderer, generated_at()).unwrap_err();
        assert!(matches!(err, ChartError::StructuralMismatch { found: 6, .. }));
    }
}
