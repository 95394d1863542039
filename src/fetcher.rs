//! # Image Fetcher
//!
//! Downloads the located image into the destination folder under a
//! timestamped name (`NOAA_FullDisk_YYYYMMDD_HHMMSS.jpg`). Full-disk images
//! run to hundreds of megabytes, so the body is streamed to disk rather than
//! buffered.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::http;

/// Size of each write to the destination file.
const CHUNK_SIZE: usize = 1024;

/// Builds the on-disk filename for an image downloaded at `at`.
///
/// ```ignore
/// image_filename("NOAA_FullDisk", at) // → "NOAA_FullDisk_20240601_134507.jpg"
/// ```
pub fn image_filename(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}.jpg", prefix, at.format("%Y%m%d_%H%M%S"))
}

/// Downloads `image_url` into `dir`, named after the current UTC time.
///
/// # Arguments
/// * `image_url` - Full URL returned by the locator
/// * `dir` - Destination folder (created recursively if it doesn't exist)
/// * `prefix` - Filename prefix, see [`image_filename`]
///
/// # Returns
/// * `Ok(PathBuf)` - Absolute path of the written file
/// * `Err(_)` - Directory creation, request, status or write failure
///
/// A failure part-way through the body leaves the partial file in place.
/// It is never handed on, and the next successful run's cleanup removes it.
pub async fn download_image(
    client: &reqwest::Client,
    image_url: &str,
    dir: &Path,
    prefix: &str,
) -> Result<PathBuf> {
    download_image_at(client, image_url, dir, prefix, Utc::now()).await
}

pub(crate) async fn download_image_at(
    client: &reqwest::Client,
    image_url: &str,
    dir: &Path,
    prefix: &str,
    at: DateTime<Utc>,
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(Error::io("create", dir))?;
    let dir = tokio::fs::canonicalize(dir)
        .await
        .map_err(Error::io("resolve", dir))?;
    let image_path = dir.join(image_filename(prefix, at));

    // Status is checked before the file exists so an error page never lands on disk
    let mut response = http::get_checked(client, image_url).await?;

    let mut file = tokio::fs::File::create(&image_path)
        .await
        .map_err(Error::io("create", &image_path))?;

    while let Some(chunk) = response.chunk().await.map_err(|source| Error::Request {
        url: image_url.to_string(),
        source,
    })? {
        for piece in chunk.chunks(CHUNK_SIZE) {
            file.write_all(piece)
                .await
                .map_err(Error::io("write", &image_path))?;
        }
    }

    file.flush().await.map_err(Error::io("write", &image_path))?;

    Ok(image_path)
}
