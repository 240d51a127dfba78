use std::fs;
use std::path::PathBuf;

use futures::future::{FutureExt, LocalBoxFuture};
use log::{debug, info};

use crate::error::MetadataError;
use crate::traits::{MetadataService, MuseumList, MuseumRecord};
use crate::types::SceneId;

/// Serves `<dir>/<scene id>.json` metadata lists; a missing file means no records
#[derive(Debug, Clone)]
pub struct JsonMetadataService {
    dir: PathBuf,
}

impl JsonMetadataService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, scene: &SceneId) -> PathBuf {
        self.dir.join(format!("{}.json", scene))
    }
}

impl MetadataService for JsonMetadataService {
    fn fetch_list(&self, scene: &SceneId) -> LocalBoxFuture<'static, Result<Vec<MuseumRecord>, MetadataError>> {
        let path = self.path_for(scene);

        async move {
            if !path.exists() {
                debug!(target: "museum::metadata", "no metadata at {:?}", path);
                return Ok::<_, MetadataError>(Vec::new());
            }

            let raw = fs::read_to_string(&path).map_err(|source| MetadataError::Read {
                path: path.clone(),
                source,
            })?;
            let list: MuseumList = serde_json::from_str(&raw).map_err(|source| MetadataError::Parse {
                path: path.clone(),
                source,
            })?;

            info!(target: "museum::metadata", "{} records in {:?}", list.data.len(), path);
            Ok(list.data)
        }
        .boxed_local()
    }
}
