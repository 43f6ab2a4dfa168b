use crate::domain::metric::Metric;
use crate::domain::model::{ChartArtifact, OutputBundle};
use crate::utils::error::{ChartError, Result};
use chrono::NaiveDateTime;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

/// Second-resolution stamp used for the bundle and its image folder.
pub fn bundle_stamp(generated_at: NaiveDateTime) -> String {
    generated_at.format("%Y%m%d_%H%M%S").to_string()
}

pub fn bundle_name(generated_at: NaiveDateTime) -> String {
    format!("{}.zip", bundle_stamp(generated_at))
}

/// Zips one chart per known metric, in [`Metric::ALL`] order.
///
/// The artifact set must cover every metric exactly once; a short or
/// duplicated set is rejected instead of producing a partial archive.
pub fn package(artifacts: &[ChartArtifact], generated_at: NaiveDateTime) -> Result<OutputBundle> {
    let mut ordered = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let mut matching = artifacts.iter().filter(|a| a.metric == metric);
        match (matching.next(), matching.next()) {
            (Some(artifact), None) => ordered.push(artifact),
            (None, _) => {
                return Err(ChartError::ProcessingError {
                    message: format!("No chart was rendered for '{}'", metric),
                })
            }
            (Some(_), Some(_)) => {
                return Err(ChartError::ProcessingError {
                    message: format!("More than one chart was rendered for '{}'", metric),
                })
            }
        }
    }

    let mut entries = Vec::with_capacity(ordered.len());

    let bytes = {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        for artifact in ordered {
            let name = artifact.file_name();
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&artifact.bytes)?;
            entries.push(name);
        }

        // 完成並取回底層 Vec<u8>
        let cursor = zip.finish()?;
        cursor.into_inner()
    };

    let name = bundle_name(generated_at);
    tracing::debug!("Packed {} charts into {} ({} bytes)", entries.len(), name, bytes.len());

    Ok(OutputBundle {
        name,
        generated_at,
        entries,
        bytes,
    })
}
