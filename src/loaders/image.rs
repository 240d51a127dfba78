use std::fs;
use std::path::PathBuf;

use futures::future::{FutureExt, LocalBoxFuture};
use log::debug;

use crate::error::ImageError;
use crate::traits::ImageFetcher;
use crate::types::TextureData;

/// Reads images from the local filesystem; accepts plain paths and `file://` urls
#[derive(Debug, Clone, Default)]
pub struct FileImageFetcher;

impl FileImageFetcher {
    pub fn new() -> Self {
        Self
    }

    fn local_path(url: &str) -> Result<PathBuf, ImageError> {
        if let Some(path) = url.strip_prefix("file://") {
            return Ok(PathBuf::from(path));
        }
        if url.contains("://") {
            return Err(ImageError::Unsupported(url.to_string()));
        }
        Ok(PathBuf::from(url))
    }
}

/// Decodes any format the `image` crate recognizes into RGBA8
pub fn decode_texture(url: &str, bytes: &[u8]) -> Result<TextureData, ImageError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ImageError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        .to_rgba8();

    Ok(TextureData {
        width: img.width(),
        height: img.height(),
        data: img.into_raw(),
    })
}

impl ImageFetcher for FileImageFetcher {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<TextureData, ImageError>> {
        let url = url.to_string();

        async move {
            let path = Self::local_path(&url)?;
            debug!(target: "museum::images", "reading image {:?}", path);
            let bytes = fs::read(&path).map_err(|e| ImageError::Fetch {
                url: url.clone(),
                reason: e.to_string(),
            })?;
            decode_texture(&url, &bytes)
        }
        .boxed_local()
    }
}
