use super::{Component, Entity, Universe};
use std::cell::{Ref, RefMut};

/// Wrapper for accessing components of a single entity inside a universe.
/// The entity handle is validated once, when the accessor is created.
#[derive(Clone, Copy)]
pub struct EntityAccessor<'uni> {
    pub(super) universe: &'uni Universe,
    pub(super) entity: Entity,
}

impl<'uni> EntityAccessor<'uni> {
    pub fn universe(&self) -> &'uni Universe {
        self.universe
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn get_component<T: Component>(&self) -> Option<Ref<'uni, T>> {
        self.universe.get_component(self.entity)
    }

    pub fn get_component_mut<T: Component>(&self) -> Option<RefMut<'uni, T>> {
        self.universe.get_component_mut(self.entity)
    }

    pub fn has_component<T: Component>(&self) -> bool {
        self.universe.has_component::<T>(self.entity)
    }

    /// Number of distinct component types owned by the entity.
    pub fn component_count(&self) -> usize {
        self.universe
            .record(self.entity)
            .map(|record| record.mask.count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use crate::entities::components::{InfoComponent, LinkComponent};
    use crate::entities::Universe;

    #[test]
    fn accessor_views_a_single_entity() {
        let mut universe = Universe::new();
        let named = universe.enroll_entity();
        let other = universe.enroll_entity();
        universe.add_component(named, InfoComponent::new("Player"));
        universe.add_component(named, LinkComponent::root());
        universe.add_component(other, InfoComponent::default());

        let accessor = universe.access_entity(named);
        assert_eq!(accessor.entity(), named);
        assert_eq!(accessor.component_count(), 2);
        assert!(accessor.has_component::<LinkComponent>());
        assert_eq!(accessor.get_component::<InfoComponent>().unwrap().tag, "Player");

        accessor.get_component_mut::<InfoComponent>().unwrap().tag.push_str("One");
        assert_eq!(
            universe.get_component::<InfoComponent>(named).unwrap().tag,
            "PlayerOne"
        );

        let other = universe.access_entity(other);
        assert_eq!(other.get_component::<InfoComponent>().unwrap().tag, "UnnamedEntity");
        assert!(!other.has_component::<LinkComponent>());
    }
}
