use crate::entities::{Component, Entity};

/// Places an entity in the scene hierarchy.
///
/// The parent handle is a plain, non-owning reference. Nothing stops a chain from looping back on
/// itself; [`LinkSystem`](crate::systems::LinkSystem) detects such loops when walking it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkComponent {
    pub parent: Option<Entity>,
}

impl Component for LinkComponent {}

impl LinkComponent {
    /// A link without a parent, making the entity a hierarchy root.
    pub fn root() -> Self {
        Self { parent: None }
    }

    pub fn child_of(parent: Entity) -> Self {
        Self {
            parent: Some(parent),
        }
    }
}
