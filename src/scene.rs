use glam::{Mat4, Vec3};

use crate::math::{Ray, AABB};
use crate::types::{Material, NodeId, SurfaceRole};

/// Renderable part of a node
#[derive(Clone, Debug)]
pub struct Surface {
    /// World-space bounds, `None` when the mesh has no usable positions
    pub bounds: Option<AABB>,
    pub material: Material,
    pub roles: Vec<SurfaceRole>,
}

impl Surface {
    pub fn new(bounds: Option<AABB>, material: Material) -> Self {
        Self {
            bounds,
            material,
            roles: Vec::new(),
        }
    }

    pub fn has_role(&self, role: SurfaceRole) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub world_transform: Mat4,
    pub surface: Option<Surface>,
}

impl SceneNode {
    pub fn world_position(&self) -> Vec3 {
        self.world_transform.w_axis.truncate()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vec3,
}

/// Resources released by [`SceneGraph::dispose`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisposeStats {
    pub nodes: usize,
    pub surfaces: usize,
    pub textures: usize,
}

/// Flattened scene graph; nodes are stored in depth-first traversal order
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node; parents must be added before their children
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        world_transform: Mat4,
        surface: Option<Surface>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            id,
            name: name.into(),
            parent,
            world_transform,
            surface,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn parent_name(&self, id: NodeId) -> Option<&str> {
        let parent = self.node(id)?.parent?;
        self.node(parent).map(|p| p.name.as_str())
    }

    pub fn surface(&self, id: NodeId) -> Option<&Surface> {
        self.node(id)?.surface.as_ref()
    }

    pub fn surface_mut(&mut self, id: NodeId) -> Option<&mut Surface> {
        self.nodes.get_mut(id.0)?.surface.as_mut()
    }

    /// Every node carrying a surface, in traversal order
    pub fn surfaces(&self) -> impl Iterator<Item = (&SceneNode, &Surface)> {
        self.nodes
            .iter()
            .filter_map(|n| n.surface.as_ref().map(|s| (n, s)))
    }

    pub fn surfaces_with_role(&self, role: SurfaceRole) -> impl Iterator<Item = (&SceneNode, &Surface)> {
        self.surfaces().filter(move |(_, s)| s.has_role(role))
    }

    pub fn has_role(&self, id: NodeId, role: SurfaceRole) -> bool {
        self.surface(id).is_some_and(|s| s.has_role(role))
    }

    pub fn add_role(&mut self, id: NodeId, role: SurfaceRole) {
        if let Some(surface) = self.surface_mut(id) {
            if !surface.has_role(role) {
                surface.roles.push(role);
            }
        }
    }

    /// Replaces a surface's material, returns false when `id` has no surface
    pub fn set_material(&mut self, id: NodeId, material: Material) -> bool {
        match self.surface_mut(id) {
            Some(surface) => {
                surface.material = material;
                true
            }
            None => false,
        }
    }

    /// Nearest surface hit by `ray`
    pub fn raycast(&self, ray: &Ray) -> Option<SurfaceHit> {
        self.surfaces()
            .filter_map(|(node, surface)| {
                let distance = ray.intersect(surface.bounds.as_ref()?)?;
                Some(SurfaceHit {
                    node: node.id,
                    distance,
                    point: ray.point_at(distance),
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Union of all surface bounds
    pub fn bounds(&self) -> Option<AABB> {
        self.surfaces()
            .filter_map(|(_, s)| s.bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Releases every node, surface and texture; the graph is empty afterwards
    pub fn dispose(&mut self) -> DisposeStats {
        let mut stats = DisposeStats {
            nodes: self.nodes.len(),
            ..DisposeStats::default()
        };

        for node in self.nodes.drain(..) {
            if let Some(surface) = node.surface {
                stats.surfaces += 1;
                if surface.material.texture.is_some() {
                    stats.textures += 1;
                }
            }
        }

        stats
    }
}
