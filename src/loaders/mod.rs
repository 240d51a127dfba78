pub mod gltf;
pub mod image;
pub mod metadata;

pub use self::gltf::{load_gltf_scene, GltfLoader};
pub use self::image::{decode_texture, FileImageFetcher};
pub use self::metadata::JsonMetadataService;
