use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use futures::future::{FutureExt, LocalBoxFuture};
use glam::{Mat4, Vec3};
use log::{debug, info, warn};

use crate::animation::AnimationClip;
use crate::error::LoadError;
use crate::math::AABB;
use crate::scene::{SceneGraph, Surface};
use crate::traits::{AssetLoader, LoadProgress, LoadedScene, ProgressSender};
use crate::types::{Material, NodeId, SceneDescriptor, TextureData};

/// Loads `.gltf`/`.glb` scenes from below an assets root
#[derive(Debug, Clone)]
pub struct GltfLoader {
    root: PathBuf,
}

impl GltfLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, descriptor: &SceneDescriptor) -> PathBuf {
        self.root.join(&descriptor.asset_path)
    }
}

impl AssetLoader for GltfLoader {
    /// The import itself is synchronous: the file is read and parsed during the
    /// first poll, so that frame takes as long as the import does. Imported
    /// textures are `Rc`-shared, which keeps the work on the polling thread.
    fn load(
        &self,
        descriptor: &SceneDescriptor,
        progress: ProgressSender,
    ) -> LocalBoxFuture<'static, Result<LoadedScene, LoadError>> {
        let path = self.path_for(descriptor);

        async move {
            let total = fs::metadata(&path).ok().map(|m| m.len());
            // Receiver may already be gone; progress is advisory
            let _ = progress.unbounded_send(LoadProgress { loaded: 0, total });

            let scene = load_gltf_scene(&path).map_err(|e| LoadError::Asset {
                path: path.clone(),
                reason: format!("{e:#}"),
            })?;

            let size = total.unwrap_or(0);
            let _ = progress.unbounded_send(LoadProgress {
                loaded: size,
                total: Some(size),
            });
            Ok::<_, LoadError>(scene)
        }
        .boxed_local()
    }
}

/// Imports a glTF file into a flattened scene graph plus its animation clips
pub fn load_gltf_scene(path: impl AsRef<Path>) -> Result<LoadedScene> {
    let path = path.as_ref();
    debug!(target: "museum::loader", "loading glTF file {:?}", path);

    let (document, buffers, images) =
        gltf::import(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    info!(
        target: "museum::loader",
        "glTF loaded: {} nodes, {} meshes, {} animations, {} images",
        document.nodes().count(),
        document.meshes().count(),
        document.animations().count(),
        images.len()
    );

    let textures: Vec<Rc<TextureData>> = images.iter().map(|image| Rc::new(convert_image(image))).collect();

    let mut graph = SceneGraph::new();
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("glTF file contains no scene")?;

    for node in scene.nodes() {
        process_node(&node, &buffers, &textures, None, &Mat4::IDENTITY, &mut graph)?;
    }

    let clips: Vec<AnimationClip> = document
        .animations()
        .map(|animation| {
            let name = animation
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("animation_{}", animation.index()));
            AnimationClip::new(name, calculate_animation_duration(&animation, &buffers))
        })
        .collect();

    if graph.surfaces().next().is_none() {
        warn!(target: "museum::loader", "no geometry found in {:?}", path);
    }

    Ok(LoadedScene { graph, clips })
}

/// Recursively flattens glTF nodes, depth first
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    textures: &[Rc<TextureData>],
    parent: Option<NodeId>,
    parent_transform: &Mat4,
    graph: &mut SceneGraph,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));

    let id = match node.mesh() {
        Some(mesh) => {
            let primitives: Vec<gltf::Primitive> = mesh.primitives().collect();
            if let [primitive] = primitives.as_slice() {
                let surface = primitive_surface(primitive, buffers, textures, &global_transform);
                graph.add_node(name, parent, global_transform, Some(surface))
            } else {
                // Multi-material mesh: a group with one child surface per primitive
                let group = graph.add_node(name.clone(), parent, global_transform, None);
                for primitive in &primitives {
                    let surface = primitive_surface(primitive, buffers, textures, &global_transform);
                    graph.add_node(name.clone(), Some(group), global_transform, Some(surface));
                }
                group
            }
        }
        None => graph.add_node(name, parent, global_transform, None),
    };

    for child in node.children() {
        process_node(&child, buffers, textures, Some(id), &global_transform, graph)?;
    }

    Ok(())
}

fn primitive_surface(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    textures: &[Rc<TextureData>],
    transform: &Mat4,
) -> Surface {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
    let bounds = reader.read_positions().and_then(|positions| {
        AABB::from_points(positions.map(|p| transform.transform_point3(Vec3::from_array(p))))
    });

    Surface::new(bounds, convert_material(&primitive.material(), textures))
}

fn convert_material(material: &gltf::Material, textures: &[Rc<TextureData>]) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let mut converted = Material::standard(
        pbr.base_color_factor(),
        pbr.metallic_factor(),
        pbr.roughness_factor(),
    );
    converted.double_sided = material.double_sided();
    converted.texture = pbr
        .base_color_texture()
        .and_then(|info| textures.get(info.texture().source().index()))
        .cloned();
    converted
}

/// Expands glTF image data to RGBA8
fn convert_image(image: &gltf::image::Data) -> TextureData {
    let data = match image.format {
        gltf::image::Format::R8G8B8A8 => image.pixels.clone(),
        gltf::image::Format::R8G8B8 => image
            .pixels
            .chunks(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect(),
        gltf::image::Format::R8G8 => image
            .pixels
            .chunks(2)
            .flat_map(|rg| [rg[0], rg[1], 0, 255])
            .collect(),
        gltf::image::Format::R8 => image.pixels.iter().flat_map(|&r| [r, r, r, 255]).collect(),
        other => {
            warn!(target: "museum::loader", "unsupported texture format {:?}, using white", other);
            vec![255; (image.width * image.height * 4) as usize]
        }
    };

    TextureData {
        width: image.width,
        height: image.height,
        data,
    }
}

/// Last keyframe time across all channels
fn calculate_animation_duration(animation: &gltf::Animation, buffers: &[gltf::buffer::Data]) -> f32 {
    animation
        .channels()
        .filter_map(|channel| {
            let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
            reader.read_inputs().map(|inputs| inputs.fold(0.0f32, f32::max))
        })
        .fold(0.0, f32::max)
}
