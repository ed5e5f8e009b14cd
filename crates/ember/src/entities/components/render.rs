use crate::entities::Component;
use glam::Vec4;

/// Marks an entity as drawable with a flat RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderComponent {
    pub color: Vec4,
}

impl Component for RenderComponent {}

impl RenderComponent {
    pub fn new(color: Vec4) -> Self {
        Self { color }
    }
}

impl Default for RenderComponent {
    fn default() -> Self {
        Self::new(Vec4::ONE)
    }
}

/// Names the material a drawable entity is rendered with. Takes precedence over the flat color
/// of [`RenderComponent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialComponent {
    pub material: String,
}

impl Component for MaterialComponent {}

impl MaterialComponent {
    pub fn new(material: impl ToString) -> Self {
        Self {
            material: material.to_string(),
        }
    }
}
