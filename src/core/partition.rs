use crate::domain::metric::Metric;
use crate::domain::model::{MetricSeries, NormalizedRecord, SeriesPoint};
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Groups records into one series per known metric, in [`Metric::ALL`] order.
///
/// Records with an unknown code are skipped. Every metric gets a series, even
/// when no record matched it.
pub fn partition(records: &[NormalizedRecord]) -> Vec<MetricSeries> {
    let mut groups: HashMap<Metric, Vec<SeriesPoint>> = HashMap::new();
    let mut dropped = 0usize;

    for record in records {
        match Metric::from_code(&record.code) {
            Some(metric) => groups.entry(metric).or_default().push(SeriesPoint {
                start: record.start,
                value: record.numeric_value,
            }),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!("Skipped {} records with unrecognised codes", dropped);
    }

    Metric::ALL
        .into_iter()
        .map(|metric| {
            let mut points = groups.remove(&metric).unwrap_or_default();
            // sort_by is stable: equal and undated points keep sheet order
            points.sort_by(|a, b| compare_start(a.start, b.start));
            MetricSeries { metric, points }
        })
        .collect()
}

fn compare_start(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
    }

    fn record(code: &str, value: Option<f64>, start: Option<NaiveDateTime>) -> NormalizedRecord {
        NormalizedRecord {
            group: "LTE".to_string(),
            code: code.to_string(),
            raw_value: value.map(|v| v.to_string()).unwrap_or_default(),
            numeric_value: value,
            start,
            end: String::new(),
        }
    }

    #[test]
    fn test_always_six_series_in_order() {
        let series = partition(&[]);
        let metrics: Vec<Metric> = series.iter().map(|s| s.metric).collect();
        assert_eq!(metrics, Metric::ALL.to_vec());
        assert!(series.iter().all(MetricSeries::is_empty));
    }

    #[test]
    fn test_unknown_codes_are_dropped() {
        let records = vec![
            record("SINR", Some(1.0), at(10, 0)),
            record("up speed", Some(2.0), at(10, 0)),
            record("Tx_power", Some(3.0), at(10, 0)),
        ];
        let series = partition(&records);
        let total: usize = series.iter().map(|s| s.points.len()).sum();
        assert_eq!(total, 1);
        assert_eq!(series[4].metric, Metric::TxPower);
        assert_eq!(series[4].points[0].value, Some(3.0));
    }

    #[test]
    fn test_sorted_by_start_with_undated_last_and_stable() {
        let records = vec![
            record("UP Speed", Some(1.0), None),
            record("UP Speed", Some(2.0), at(12, 0)),
            record("UP Speed", Some(3.0), None),
            record("UP Speed", Some(4.0), at(9, 0)),
            record("UP Speed", Some(5.0), at(12, 0)),
        ];
        let series = partition(&records);
        let up = &series[0];

        let values: Vec<Option<f64>> = up.points.iter().map(|p| p.value).collect();
        assert_eq!(
            values,
            vec![Some(4.0), Some(2.0), Some(5.0), Some(1.0), Some(3.0)]
        );

        let dated: Vec<NaiveDateTime> = up.points.iter().filter_map(|p| p.start).collect();
        assert!(dated.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_partition_is_idempotent() {
        let records = vec![
            record("Rx_power", Some(-90.0), at(11, 0)),
            record("Down Speed", None, at(10, 0)),
            record("Rx_power", Some(-95.0), at(10, 30)),
            record("Unknown", Some(0.0), None),
        ];
        assert_eq!(partition(&records), partition(&records));
    }
}
