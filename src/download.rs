//! Saving generated images to disk
//!
//! Writes each image under the output directory as
//! `imaginai-{unix_millis}-{n}.{ext}`, numbering from 1 in result order.

use crate::ai::mime::{detect_image_mime, extension_for_mime};
use crate::models::GeneratedImage;
use crate::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct ImageDownloader {
    output_dir: PathBuf,
}

impl ImageDownloader {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Save images using the current time for the file names.
    pub async fn save_all_now(&self, images: &[GeneratedImage]) -> Result<Vec<PathBuf>> {
        self.save_all(images, Utc::now().timestamp_millis()).await
    }

    /// Save images and return their paths in the same order.
    ///
    /// Every payload is decoded before anything is written, so a bad image
    /// leaves no partial set behind.
    pub async fn save_all(
        &self,
        images: &[GeneratedImage],
        timestamp_millis: i64,
    ) -> Result<Vec<PathBuf>> {
        let decoded = images
            .iter()
            .map(GeneratedImage::decode)
            .collect::<Result<Vec<_>>>()?;

        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut paths = Vec::with_capacity(decoded.len());
        for (index, bytes) in decoded.iter().enumerate() {
            let ext = extension_for_mime(detect_image_mime(bytes));
            let path = self
                .output_dir
                .join(download_file_name(timestamp_millis, index, ext));
            tokio::fs::write(&path, bytes).await?;
            info!("Saved image to {}", path.display());
            paths.push(path);
        }

        Ok(paths)
    }
}

pub fn download_file_name(timestamp_millis: i64, index: usize, ext: &str) -> String {
    format!("imaginai-{}-{}.{}", timestamp_millis, index + 1, ext)
}
