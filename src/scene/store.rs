use std::collections::HashMap;

use cgmath::{Matrix4, Vector3};

use crate::error::{LabError, Result};

use super::{
    color::Color,
    entity::{Entity, EntityDesc, EntityHandle, Transform},
};

/// Owns every entity of one session, indexed by handle and by name
///
/// Parents are stored as handles, never as owned children. A parent must exist
/// before its child is created, so the hierarchy is acyclic by construction.
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    names: HashMap<String, EntityHandle>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new named entity
    ///
    /// Fails with `AlreadyExists` for a duplicate name and `NotFound` if the
    /// parent handle does not belong to this store.
    pub fn create(&mut self, name: &str, desc: EntityDesc) -> Result<EntityHandle> {
        if self.names.contains_key(name) {
            return Err(LabError::AlreadyExists(name.to_string()));
        }
        if let Some(parent) = desc.parent {
            self.entity(parent)?;
        }

        let handle = EntityHandle(self.entities.len());
        self.entities.push(Entity {
            name: name.to_string(),
            model: desc.model,
            transform: desc.transform,
            color: desc.color,
            enabled: true,
            parent: desc.parent,
        });
        self.names.insert(name.to_string(), handle);
        Ok(handle)
    }

    /// Look up a handle by entity name
    pub fn handle(&self, name: &str) -> Result<EntityHandle> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| LabError::NotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Result<&Entity> {
        let handle = self.handle(name)?;
        self.entity(handle)
    }

    pub fn entity(&self, handle: EntityHandle) -> Result<&Entity> {
        self.entities
            .get(handle.0)
            .ok_or_else(|| LabError::NotFound(format!("#{}", handle.0)))
    }

    fn entity_mut(&mut self, handle: EntityHandle) -> Result<&mut Entity> {
        self.entities
            .get_mut(handle.0)
            .ok_or_else(|| LabError::NotFound(format!("#{}", handle.0)))
    }

    pub fn transform(&self, handle: EntityHandle) -> Result<Transform> {
        Ok(self.entity(handle)?.transform)
    }

    pub fn set_transform(&mut self, handle: EntityHandle, transform: Transform) -> Result<()> {
        self.entity_mut(handle)?.transform = transform;
        Ok(())
    }

    /// Modify a local transform in place
    pub fn update_transform<F>(&mut self, handle: EntityHandle, f: F) -> Result<()>
    where
        F: FnOnce(&mut Transform),
    {
        f(&mut self.entity_mut(handle)?.transform);
        Ok(())
    }

    pub fn set_position(&mut self, handle: EntityHandle, position: Vector3<f32>) -> Result<()> {
        self.update_transform(handle, |t| t.position = position)
    }

    pub fn set_color(&mut self, handle: EntityHandle, color: Color) -> Result<()> {
        self.entity_mut(handle)?.color = color;
        Ok(())
    }

    /// Disabling is the only way to remove an entity from view
    pub fn set_enabled(&mut self, handle: EntityHandle, enabled: bool) -> Result<()> {
        self.entity_mut(handle)?.enabled = enabled;
        Ok(())
    }

    /// World matrix composed through the parent chain
    pub fn resolve_world_transform(&self, handle: EntityHandle) -> Result<Matrix4<f32>> {
        let entity = self.entity(handle)?;
        let local = entity.transform.matrix();
        match entity.parent {
            Some(parent) => Ok(self.resolve_world_transform(parent)? * local),
            None => Ok(local),
        }
    }

    pub fn world_position(&self, handle: EntityHandle) -> Result<Vector3<f32>> {
        let world = self.resolve_world_transform(handle)?;
        Ok(world.w.truncate())
    }

    /// Enabled, and every ancestor enabled
    pub fn is_visible(&self, handle: EntityHandle) -> Result<bool> {
        let entity = self.entity(handle)?;
        if !entity.enabled {
            return Ok(false);
        }
        match entity.parent {
            Some(parent) => self.is_visible(parent),
            None => Ok(true),
        }
    }

    /// Entities paired with their handles, in creation order
    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, entity)| (EntityHandle(i), entity))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::entity::Model;

    fn approx(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4 && (a.z - b.z).abs() < 1e-4
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut store = EntityStore::new();
        store.create("bob", EntityDesc::new(Model::Sphere)).unwrap();
        let err = store.create("bob", EntityDesc::new(Model::Cube)).unwrap_err();
        assert_eq!(err, LabError::AlreadyExists("bob".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_name_not_found() {
        let store = EntityStore::new();
        assert_eq!(
            store.handle("ghost").unwrap_err(),
            LabError::NotFound("ghost".to_string())
        );
    }

    #[test]
    fn test_foreign_parent_rejected() {
        let mut store = EntityStore::new();
        let desc = EntityDesc::new(Model::Cube).parent(EntityHandle(3));
        assert!(matches!(
            store.create("child", desc),
            Err(LabError::NotFound(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_world_transform_composes_parents() {
        let mut store = EntityStore::new();
        let pivot = store
            .create("pivot", EntityDesc::new(Model::Empty).at(0.0, 5.0, 0.0))
            .unwrap();
        let planet = store
            .create(
                "planet",
                EntityDesc::new(Model::Sphere).at(5.0, 0.0, 0.0).parent(pivot),
            )
            .unwrap();

        assert!(approx(
            store.world_position(planet).unwrap(),
            Vector3::new(5.0, 5.0, 0.0)
        ));

        store
            .update_transform(pivot, |t| t.rotation.y = 90.0)
            .unwrap();
        // +90 degrees about y carries +x onto -z
        assert!(approx(
            store.world_position(planet).unwrap(),
            Vector3::new(0.0, 5.0, -5.0)
        ));
    }

    #[test]
    fn test_parent_scale_applies_to_children() {
        let mut store = EntityStore::new();
        let beaker = store
            .create("beaker", EntityDesc::new(Model::asset("beaker")).scale(0.5))
            .unwrap();
        let fluid = store
            .create(
                "fluid",
                EntityDesc::new(Model::Cube).at(0.0, 1.0, 0.0).parent(beaker),
            )
            .unwrap();
        assert!(approx(
            store.world_position(fluid).unwrap(),
            Vector3::new(0.0, 0.5, 0.0)
        ));
    }

    #[test]
    fn test_disabled_parent_hides_children() {
        let mut store = EntityStore::new();
        let candle = store.create("candle", EntityDesc::new(Model::Cylinder)).unwrap();
        let flame = store
            .create("flame", EntityDesc::new(Model::Sphere).parent(candle))
            .unwrap();
        assert!(store.is_visible(flame).unwrap());

        store.set_enabled(candle, false).unwrap();
        assert!(!store.is_visible(flame).unwrap());
        assert!(store.entity(flame).unwrap().enabled);
    }
}
