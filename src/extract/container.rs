//! Container field downloads.
//!
//! A container field holds a URL referencing binary content served by the
//! FileMaker host. This extractor resolves that URL for each record, fetches
//! the bytes, and writes them to a local directory, reporting success or
//! failure per record.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::clients::errors::NormalizedError;
use crate::clients::response::Record;
use crate::DataClient;

/// FileMaker's "unable to create file on disk" code, used when a downloaded
/// container cannot be written locally.
const FILE_WRITE_ERROR_CODE: &str = "800";

/// The per-record outcome of a container download.
///
/// Exactly one of `path` and `error` is populated.
#[derive(Clone, Debug)]
pub struct ContainerResult {
    /// The record the container belongs to.
    pub record_id: String,
    /// Where the content was written, on success.
    pub path: Option<PathBuf>,
    /// The normalized failure, when this record's download failed.
    pub error: Option<NormalizedError>,
}

impl ContainerResult {
    fn success(record_id: String, path: PathBuf) -> Self {
        Self {
            record_id,
            path: Some(path),
            error: None,
        }
    }

    fn failure(record_id: String, error: NormalizedError) -> Self {
        Self {
            record_id,
            path: None,
            error: Some(error),
        }
    }
}

/// Downloads the container referenced at `field_path` for every record,
/// naming each saved file from the value at `name_path`.
///
/// Paths are dotted, rooted at the record: `fieldData.image`,
/// `fieldData.imageName`, or a portal path under `portalData`. One record's
/// failure is captured in its [`ContainerResult`] and does not abort the
/// remaining records.
pub async fn container_data(
    client: &DataClient,
    records: &[Record],
    field_path: &str,
    destination: impl AsRef<Path>,
    name_path: &str,
) -> Vec<ContainerResult> {
    let destination = destination.as_ref();
    let mut results = Vec::with_capacity(records.len());

    for record in records {
        let result = download_one(client, record, field_path, destination, name_path).await;
        if let Some(error) = &result.error {
            tracing::warn!(
                record_id = %result.record_id,
                code = %error.code,
                "container download failed"
            );
        }
        results.push(result);
    }

    results
}

async fn download_one(
    client: &DataClient,
    record: &Record,
    field_path: &str,
    destination: &Path,
    name_path: &str,
) -> ContainerResult {
    let record_id = record.record_id.clone();

    let Some(url) = lookup(record, field_path).and_then(Value::as_str) else {
        return ContainerResult::failure(
            record_id,
            missing_value_error(field_path, "container URL"),
        );
    };
    let Some(name) = lookup(record, name_path).and_then(Value::as_str) else {
        return ContainerResult::failure(record_id, missing_value_error(name_path, "file name"));
    };

    let bytes = match client.http().download(url).await {
        Ok(bytes) => bytes,
        Err(error) => return ContainerResult::failure(record_id, error.normalized()),
    };

    // File names come from record data; keep them inside the destination.
    let name = name.replace(['/', '\\'], "_");
    let path = destination.join(name);

    if let Err(error) = tokio::fs::create_dir_all(destination).await {
        return ContainerResult::failure(record_id, write_error(&path, &error));
    }
    if let Err(error) = tokio::fs::write(&path, bytes).await {
        return ContainerResult::failure(record_id, write_error(&path, &error));
    }

    ContainerResult::success(record_id, path)
}

fn missing_value_error(path: &str, what: &str) -> NormalizedError {
    NormalizedError {
        code: crate::clients::errors::MISSING_DATA_ERROR_CODE.to_string(),
        message: format!("No {what} found at '{path}'"),
        token: None,
    }
}

fn write_error(path: &Path, error: &std::io::Error) -> NormalizedError {
    NormalizedError {
        code: FILE_WRITE_ERROR_CODE.to_string(),
        message: format!("Unable to write container to '{}': {error}", path.display()),
        token: None,
    }
}

/// Resolves a dotted path rooted at the record.
fn lookup<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let root = segments.next()?;
    let map = match root {
        "fieldData" => &record.field_data,
        "portalData" => &record.portal_data,
        _ => return None,
    };

    let mut current = map.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(entries) => entries.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> Record {
        serde_json::from_value(json!({
            "recordId": "7",
            "modId": "0",
            "fieldData": {
                "image": "https://fms.example.com/Streaming_SSL/image.png",
                "imageName": "falcon.png"
            },
            "portalData": {
                "Gallery": [
                    {"recordId": "1", "Gallery::thumb": "https://fms.example.com/thumb.png"}
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_lookup_field_data_path() {
        let record = sample_record();
        assert_eq!(
            lookup(&record, "fieldData.imageName").and_then(Value::as_str),
            Some("falcon.png")
        );
    }

    #[test]
    fn test_lookup_portal_path_with_index() {
        let record = sample_record();
        assert_eq!(
            lookup(&record, "portalData.Gallery.0.Gallery::thumb").and_then(Value::as_str),
            Some("https://fms.example.com/thumb.png")
        );
    }

    #[test]
    fn test_lookup_missing_path_is_none() {
        let record = sample_record();
        assert!(lookup(&record, "fieldData.missing").is_none());
        assert!(lookup(&record, "metadata.image").is_none());
    }

    #[test]
    fn test_container_result_shapes() {
        let success = ContainerResult::success("1".to_string(), PathBuf::from("./assets/a.png"));
        assert!(success.path.is_some());
        assert!(success.error.is_none());

        let failure = ContainerResult::failure(
            "2".to_string(),
            missing_value_error("fieldData.image", "container URL"),
        );
        assert!(failure.path.is_none());
        assert_eq!(failure.error.unwrap().code, "10");
    }
}
