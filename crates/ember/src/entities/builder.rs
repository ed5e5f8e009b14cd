use super::{Component, Entity};
use crate::registry::Registry;

/// Enrolls an entity and attaches components to it in one expression.
///
/// Every component goes through [`Registry::add_component`], so systems pick the entity up
/// exactly as if the components were added one by one.
pub struct EntityBuilder<'reg> {
    registry: &'reg mut Registry,
    entity: Entity,
}

impl<'reg> EntityBuilder<'reg> {
    pub fn new(registry: &'reg mut Registry) -> Self {
        Self {
            entity: registry.enroll_entity(),
            registry,
        }
    }

    pub fn with_component(&mut self, value: impl Component) -> &mut Self {
        self.registry.add_component(self.entity, value);
        self
    }

    pub fn finish(&mut self) -> Entity {
        self.entity
    }
}
