use log::debug;
use serde::{Deserialize, Serialize};

use crate::scene::SceneGraph;
use crate::types::{NodeId, SurfaceRole};

/// Naming conventions mapped to surface roles once per load
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceRules {
    /// Case-insensitive substring marking floors
    pub floor_keyword: String,
    /// Name of the group whose direct children form the door
    pub door_parent: String,
    /// Annotation surfaces are named `<prefix><digits>`
    pub annotation_prefix: String,
    pub handle_name: String,
}

impl Default for SurfaceRules {
    fn default() -> Self {
        Self {
            floor_keyword: "floor".to_string(),
            door_parent: "Door001".to_string(),
            annotation_prefix: "ImageMesh".to_string(),
            handle_name: "Handle".to_string(),
        }
    }
}

impl SurfaceRules {
    /// Roles for a surface called `name` whose parent is called `parent`
    pub fn roles_for(&self, name: &str, parent: Option<&str>) -> Vec<SurfaceRole> {
        let mut roles = Vec::new();

        if !self.floor_keyword.is_empty()
            && name.to_lowercase().contains(&self.floor_keyword.to_lowercase())
        {
            roles.push(SurfaceRole::Floor);
        }
        if parent == Some(self.door_parent.as_str()) {
            roles.push(SurfaceRole::Door);
        }
        if self.is_annotation_name(name) {
            roles.push(SurfaceRole::Annotation);
        }
        if name == self.handle_name {
            roles.push(SurfaceRole::Handle);
        }

        roles
    }

    fn is_annotation_name(&self, name: &str) -> bool {
        name.strip_prefix(self.annotation_prefix.as_str())
            .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
    }

    /// Tags every surface of `graph` and returns how many received a role
    pub fn classify(&self, graph: &mut SceneGraph) -> usize {
        let assignments: Vec<(NodeId, Vec<SurfaceRole>)> = graph
            .surfaces()
            .map(|(node, _)| (node.id, self.roles_for(&node.name, graph.parent_name(node.id))))
            .filter(|(_, roles)| !roles.is_empty())
            .collect();

        for (id, roles) in &assignments {
            debug!(target: "museum::classify", "surface {:?} tagged {:?}", id, roles);
            for role in roles {
                graph.add_role(*id, *role);
            }
        }

        assignments.len()
    }
}
