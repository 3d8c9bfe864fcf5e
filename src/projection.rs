//! # Visual Projection
//!
//! Read-only snapshot of a session's entities for an external renderer. The
//! renderer owns cameras, lights and draw calls; the engine only reports what
//! each named entity looks like this frame.
//!
//! ## Usage
//!
//! ```no_run
//! use labsim::prelude::*;
//!
//! let mut session = registry().launch(ExperimentKind::Pendulum, &ExperimentParams::new())?;
//! session.tick(1.0 / 60.0)?;
//! for view in session.projection().snapshot()? {
//!     println!("{} at {:?}", view.name, view.position);
//! }
//! # Ok::<(), labsim::LabError>(())
//! ```

use std::collections::HashSet;

use bytemuck::{Pod, Zeroable};
use cgmath::{Matrix4, Vector3};

use crate::error::Result;
use crate::scene::{Color, EntityStore, Model};

/// Primitive the renderer substitutes when a named mesh is missing
pub const FALLBACK_MESH: &str = "cube";

/// One entity as the renderer sees it
#[derive(Debug, Clone)]
pub struct EntityView<'a> {
    pub name: &'a str,
    pub model: &'a Model,
    pub world_transform: Matrix4<f32>,
    pub position: Vector3<f32>,
    pub color: Color,
    /// Effective visibility: the entity and all its ancestors are enabled
    pub enabled: bool,
}

/// GPU-ready per-instance record
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct InstanceData {
    /// World transform (column-major 4x4)
    pub transform: [[f32; 4]; 4],
    /// RGBA color
    pub color: [f32; 4],
}

impl InstanceData {
    pub fn from_transform(transform: Matrix4<f32>, color: Color) -> Self {
        Self {
            transform: transform.into(),
            color: color.to_array(),
        }
    }
}

/// Renderer-side mesh availability, queried by logical name
pub trait MeshLookup {
    fn has_mesh(&self, name: &str) -> bool;
}

impl MeshLookup for HashSet<String> {
    fn has_mesh(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl MeshLookup for [&str] {
    fn has_mesh(&self, name: &str) -> bool {
        self.iter().any(|mesh| *mesh == name)
    }
}

/// Mesh to draw for a model after lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshChoice<'a> {
    /// Grouping node, nothing to draw
    Nothing,
    Found(&'a str),
    /// Named mesh missing; draw the default primitive at the same transform
    Fallback(&'static str),
}

/// Resolve a model against the renderer's meshes, never failing the frame
pub fn resolve_mesh<'a, L: MeshLookup + ?Sized>(model: &'a Model, lookup: &L) -> MeshChoice<'a> {
    match model.mesh_name() {
        None => MeshChoice::Nothing,
        Some(name) if lookup.has_mesh(name) => MeshChoice::Found(name),
        Some(name) => {
            log::debug!("no mesh named `{}`, falling back to {}", name, FALLBACK_MESH);
            MeshChoice::Fallback(FALLBACK_MESH)
        }
    }
}

/// Borrowed, read-only view over one session's entity store
pub struct VisualProjection<'a> {
    store: &'a EntityStore,
}

impl<'a> VisualProjection<'a> {
    pub fn new(store: &'a EntityStore) -> Self {
        Self { store }
    }

    /// Every entity in creation order, with world transforms resolved
    pub fn snapshot(&self) -> Result<Vec<EntityView<'a>>> {
        self.store
            .iter()
            .map(|(handle, entity)| {
                let world_transform = self.store.resolve_world_transform(handle)?;
                Ok(EntityView {
                    name: &entity.name,
                    model: &entity.model,
                    world_transform,
                    position: world_transform.w.truncate(),
                    color: entity.color,
                    enabled: self.store.is_visible(handle)?,
                })
            })
            .collect()
    }

    /// Alias of [`snapshot`](Self::snapshot)
    pub fn list_entities(&self) -> Result<Vec<EntityView<'a>>> {
        self.snapshot()
    }

    /// Instance records for visible entities that have geometry
    pub fn instances(&self) -> Result<Vec<InstanceData>> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|view| view.enabled && *view.model != Model::Empty)
            .map(|view| InstanceData::from_transform(view.world_transform, view.color))
            .collect())
    }

    /// Instance records as raw bytes for a vertex buffer upload
    pub fn instance_bytes(&self) -> Result<Vec<u8>> {
        let instances = self.instances()?;
        Ok(bytemuck::cast_slice(&instances).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EntityDesc;

    fn store() -> EntityStore {
        let mut store = EntityStore::new();
        let pivot = store
            .create("pivot", EntityDesc::new(Model::Empty).at(0.0, 5.0, 0.0))
            .unwrap();
        store
            .create(
                "beaker",
                EntityDesc::new(Model::asset("beaker"))
                    .at(1.0, 0.0, 0.0)
                    .parent(pivot)
                    .color(Color::WHITE.with_alpha(0.5)),
            )
            .unwrap();
        let hidden = store.create("flame", EntityDesc::new(Model::Sphere)).unwrap();
        store.set_enabled(hidden, false).unwrap();
        store
    }

    #[test]
    fn test_snapshot_resolves_world_positions() {
        let store = store();
        let views = VisualProjection::new(&store).snapshot().unwrap();
        assert_eq!(views.len(), 3);
        assert_eq!(views[1].name, "beaker");
        assert_eq!(views[1].position, Vector3::new(1.0, 5.0, 0.0));
        assert_eq!(views[1].color.a, 0.5);
        assert!(!views[2].enabled);
    }

    #[test]
    fn test_instances_skip_hidden_and_empty() {
        let store = store();
        let projection = VisualProjection::new(&store);
        let instances = projection.instances().unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].transform[3], [1.0, 5.0, 0.0, 1.0]);
        assert_eq!(
            projection.instance_bytes().unwrap().len(),
            std::mem::size_of::<InstanceData>()
        );
    }

    #[test]
    fn test_mesh_fallback() {
        let meshes: &[&str] = &["flask", "sphere"];
        assert_eq!(
            resolve_mesh(&Model::asset("flask"), meshes),
            MeshChoice::Found("flask")
        );
        assert_eq!(
            resolve_mesh(&Model::asset("beaker"), meshes),
            MeshChoice::Fallback(FALLBACK_MESH)
        );
        assert_eq!(resolve_mesh(&Model::Empty, meshes), MeshChoice::Nothing);
    }
}
