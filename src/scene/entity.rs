//! Entities: named, optionally parented visual objects

use cgmath::{Deg, Matrix4, Vector3};

use super::color::Color;

/// Stable index of an entity inside its [`EntityStore`](super::EntityStore)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(pub(crate) usize);

impl EntityHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Logical model the renderer should draw for an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Model {
    /// Grouping node with no geometry (orbital pivots, helix centers)
    Empty,
    Cube,
    Sphere,
    Cylinder,
    Cone,
    /// Generated lab glassware looked up by name ("beaker", "flask", "test_tube")
    Asset(String),
}

impl Model {
    pub fn asset(name: &str) -> Self {
        Model::Asset(name.to_string())
    }

    /// Name used by the renderer's mesh lookup
    pub fn mesh_name(&self) -> Option<&str> {
        match self {
            Model::Empty => None,
            Model::Cube => Some("cube"),
            Model::Sphere => Some("sphere"),
            Model::Cylinder => Some("cylinder"),
            Model::Cone => Some("cone"),
            Model::Asset(name) => Some(name),
        }
    }
}

/// Local position, Euler rotation in degrees, and non-uniform scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::default()
        }
    }

    /// Set uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    /// Set non-uniform scale
    pub fn with_scale_xyz(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vector3::new(scale, scale, scale);
    }

    /// Local matrix, composed as T * R * S with R = Ry * Rx * Rz
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_x(Deg(self.rotation.x))
            * Matrix4::from_angle_z(Deg(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// A visual object whose state the engine computes but never renders
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub model: Model,
    pub transform: Transform,
    pub color: Color,
    pub enabled: bool,
    pub parent: Option<EntityHandle>,
}

/// Creation parameters for an entity, built fluently
#[derive(Debug, Clone)]
pub struct EntityDesc {
    pub model: Model,
    pub transform: Transform,
    pub color: Color,
    pub parent: Option<EntityHandle>,
}

impl EntityDesc {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            transform: Transform::default(),
            color: Color::WHITE,
            parent: None,
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vector3::new(x, y, z);
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.transform.set_uniform_scale(scale);
        self
    }

    pub fn scale_xyz(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.scale = Vector3::new(x, y, z);
        self
    }

    pub fn rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn parent(mut self, parent: EntityHandle) -> Self {
        self.parent = Some(parent);
        self
    }
}
