use crate::config::{Config, FailurePolicy, DESTINATION_BUCKET, RESIZED_PREFIX};
use crate::error::ResizeError;
use crate::resize::resize_image;
use aws_lambda_events::event::s3::{S3Event, S3EventRecord};
use lambda_runtime::{Error, LambdaEvent};
use shared::s3::{ObjectStore, StoredObject};
use tracing::{debug, error, info, warn};

pub struct ResizeHandler<S> {
    store: S,
    config: Config,
}

impl<S: ObjectStore> ResizeHandler<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    pub async fn handle(&self, event: LambdaEvent<S3Event>) -> Result<(), Error> {
        let records = event.payload.records;
        if records.is_empty() {
            warn!("No records found in S3 event");
            return Ok(());
        }

        self.process_records(&records).await?;
        Ok(())
    }

    async fn process_records(&self, records: &[S3EventRecord]) -> Result<(), ResizeError> {
        let mut failed = Vec::new();

        for record in records {
            if let Err(err) = self.process_record(record).await {
                let key = display_key(record);
                error!("Error processing {}: {}", key, err);
                match self.config.failure_policy {
                    FailurePolicy::Abort => return Err(err),
                    FailurePolicy::Continue => failed.push(key),
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(ResizeError::RecordsFailed {
                failed: failed.len(),
                total: records.len(),
                keys: failed,
            })
        }
    }

    async fn process_record(&self, record: &S3EventRecord) -> Result<(), ResizeError> {
        let (bucket, key) = source_location(record)?;

        let StoredObject { body, content_type } = self
            .store
            .get(&bucket, &key)
            .await
            .map_err(|source| ResizeError::StorageRead {
                bucket: bucket.clone(),
                key: key.clone(),
                source,
            })?;

        let resized = tokio::task::spawn_blocking(move || resize_image(&body)).await??;
        debug!(
            "Encoded {} as {:?} at {}x{}",
            key, resized.output, resized.width, resized.height
        );

        let resized_key = destination_key(RESIZED_PREFIX, &key);
        self.store
            .put(
                DESTINATION_BUCKET,
                &resized_key,
                resized.bytes,
                content_type.as_deref(),
            )
            .await
            .map_err(|source| ResizeError::StorageWrite {
                bucket: DESTINATION_BUCKET.to_string(),
                key: resized_key.clone(),
                source,
            })?;

        info!(
            "Successfully resized {} and saved to {}/{}",
            key, DESTINATION_BUCKET, resized_key
        );

        Ok(())
    }
}

fn source_location(record: &S3EventRecord) -> Result<(String, String), ResizeError> {
    let bucket = record
        .s3
        .bucket
        .name
        .clone()
        .ok_or_else(|| ResizeError::invalid_record("no bucket name found in S3 event record"))?;
    let raw_key = record
        .s3
        .object
        .key
        .as_deref()
        .ok_or_else(|| ResizeError::invalid_record("no object key found in S3 event record"))?;

    Ok((bucket, decode_key(raw_key)?))
}

/// Key used in failure logs: decoded when possible, otherwise as it arrived.
fn display_key(record: &S3EventRecord) -> String {
    match record.s3.object.key.as_deref() {
        Some(raw) => decode_key(raw).unwrap_or_else(|_| raw.to_string()),
        None => "<missing key>".to_string(),
    }
}

/// Keys in S3 notifications are form-encoded: spaces arrive as `+`, everything else as `%XX`.
pub fn decode_key(raw: &str) -> Result<String, ResizeError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|e| ResizeError::invalid_record(format!("object key {raw:?} is not valid UTF-8: {e}")))
}

pub fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// `<prefix>/<basename(key)>`. Keys sharing a basename map to the same destination.
pub fn destination_key(prefix: &str, key: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), basename(key))
}
