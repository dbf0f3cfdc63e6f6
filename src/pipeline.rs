//! Image download pipeline
//!
//! Producer-consumer stage that turns fetched listings into saved photo
//! files. The producer derives one [`DownloadTask`] per record and fills a
//! channel sized to the record count, so enqueuing never blocks; dropping
//! the sender closes the channel, which is the sole termination signal for
//! the workers. A fixed pool of workers shares the receiving end, downloads
//! through the retrying transport, and persists each photo with a single
//! whole-content write, so no partial file is left behind on failure.
//!
//! Individual failures (non-2xx status, transport exhaustion, write error)
//! are logged and the task abandoned; they never abort the pipeline or
//! affect other images. The call returns only after every worker has been
//! joined, so by then each image is either saved or logged as failed.

use crate::client::{RetryingClient, SendRequest};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{DownloadTask, House};
use crate::utils::{image_file_name, sanitize_address};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use url::Url;

/// Outcome counts for one pipeline run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageReport {
    /// Images downloaded and written to disk
    pub saved: usize,
    /// Images that failed at any step and were abandoned
    pub failed: usize,
}

/// Download and persist the photo of every listing
///
/// Spawns `config.image_workers` workers (capped at the record count) and
/// blocks until all of them have drained the task queue. Failures are
/// counted in the returned [`ImageReport`], never propagated per-image.
///
/// # Errors
///
/// Fails only if a worker task panics.
pub async fn process_images<S>(
    client: &RetryingClient<S>,
    houses: &[House],
    config: &Config,
) -> Result<ImageReport>
where
    S: SendRequest + Clone + Send + Sync + 'static,
{
    if houses.is_empty() {
        return Ok(ImageReport::default());
    }

    let workers = config.image_workers.clamp(1, houses.len());
    let (tx, rx) = mpsc::channel::<DownloadTask>(houses.len());
    let rx = Arc::new(Mutex::new(rx));

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let client = client.clone();
        let rx = Arc::clone(&rx);
        let dir = config.download_dir.clone();
        handles.push(tokio::spawn(async move {
            let mut report = ImageReport::default();
            loop {
                // Hold the lock only for the dequeue itself
                let task = { rx.lock().await.recv().await };
                let Some(task) = task else { break };

                match download_and_save(&client, &task, &dir).await {
                    Ok(path) => {
                        tracing::info!(id = task.id, path = %path.display(), "Image saved");
                        report.saved += 1;
                    }
                    Err(error) => {
                        tracing::warn!(id = task.id, url = %task.url, error = %error, "Image abandoned");
                        report.failed += 1;
                    }
                }
            }
            report
        }));
    }

    // Channel capacity equals the record count, so the producer never blocks
    for house in houses {
        let task = DownloadTask {
            id: house.id,
            stem: sanitize_address(&house.address),
            url: house.photo_url.clone(),
        };
        if tx.send(task).await.is_err() {
            // Only reachable if every worker died; the join below reports it
            break;
        }
    }
    drop(tx);

    let mut total = ImageReport::default();
    for handle in handles {
        let report = handle.await?;
        total.saved += report.saved;
        total.failed += report.failed;
    }

    tracing::info!(saved = total.saved, failed = total.failed, "Image pipeline complete");
    Ok(total)
}

/// Download one photo and write it to disk in a single operation
async fn download_and_save<S: SendRequest>(
    client: &RetryingClient<S>,
    task: &DownloadTask,
    dir: &Path,
) -> Result<PathBuf> {
    let url = Url::parse(&task.url)?;
    let response = client.get(&url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::ImageStatus {
            url: task.url.clone(),
            status: status.as_u16(),
        });
    }

    let content = response.bytes().await?;
    let path = dir.join(image_file_name(task.id, &task.stem, &task.url));
    tokio::fs::write(&path, &content)
        .await
        .map_err(|source| Error::Persist {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
