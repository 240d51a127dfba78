use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::MetadataError;
use crate::types::SceneId;

/// One artwork entry of a scene's metadata list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuseumRecord {
    /// Annotation slot the record belongs to
    #[serde(rename = "img_id")]
    pub slot_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Image reference appended to the configured image base
    #[serde(rename = "img_cid", default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(rename = "name", default)]
    pub owner_name: String,
}

/// Envelope of the metadata list: `{ "data": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MuseumList {
    #[serde(default)]
    pub data: Vec<MuseumRecord>,
}

/// Content submitted through the upload UI for one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadEvent {
    #[serde(rename = "img_id")]
    pub slot_id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "img_url")]
    pub image_url: String,
    #[serde(rename = "name", default)]
    pub owner_name: String,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
}

/// Metadata service - lists the artwork records published for a scene
pub trait MetadataService {
    fn fetch_list(&self, scene: &SceneId) -> LocalBoxFuture<'static, Result<Vec<MuseumRecord>, MetadataError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_field_names() {
        let json = r#"{"data":[{"img_id":"ImageMesh1","title":"Dawn","description":"Oil","img_cid":"Qm1","price":"0.5","name":"Ada"}]}"#;
        let list: MuseumList = serde_json::from_str(json).unwrap();
        let record = &list.data[0];
        assert_eq!(record.slot_id, "ImageMesh1");
        assert_eq!(record.image_ref.as_deref(), Some("Qm1"));
        assert_eq!(record.owner_name, "Ada");
    }

    #[test]
    fn test_record_optional_fields() {
        let record: MuseumRecord = serde_json::from_str(r#"{"img_id":"ImageMesh2"}"#).unwrap();
        assert_eq!(record.image_ref, None);
        assert!(record.title.is_empty());
    }
}
