use futures::future::LocalBoxFuture;

use crate::error::ImageError;
use crate::types::TextureData;

/// Image fetcher - resolves an image location into decoded RGBA8 pixels
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<TextureData, ImageError>>;
}
