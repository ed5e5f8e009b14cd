use super::accessor::EntityAccessor;
use super::{Component, ComponentId, ComponentMask, Entity};
use ahash::AHashMap;
use log::*;
use std::{
    any::{type_name, Any, TypeId},
    cell::{Ref, RefCell, RefMut},
};

/// Storage of all entities and components of a single simulation.
///
/// The universe knows nothing about systems. The [`Registry`](crate::registry::Registry) wraps
/// it and keeps system membership in sync with every component insertion.
#[derive(Default)]
pub struct Universe {
    entities: Vec<EntityRecord>,
    type_ids: AHashMap<TypeId, ComponentId>,
    stores: Vec<Box<dyn AnyComponentStore>>,
}

/// Per-entity index of owned component types.
#[derive(Debug, Default)]
pub(crate) struct EntityRecord {
    pub mask: ComponentMask,
    pub slots: AHashMap<ComponentId, usize>,
}

impl Universe {
    /// Creates a blank, empty universe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next entity handle and records it.
    pub fn enroll_entity(&mut self) -> Entity {
        let index = u32::try_from(self.entities.len()).expect("entity index overflow");
        self.entities.push(EntityRecord::default());

        let entity = Entity { index };
        trace!("Enrolled entity {entity}");
        entity
    }

    /// Returns the id assigned to component type `T`, assigning a new one if `T` was never seen.
    pub fn component_id<T: Component>(&mut self) -> ComponentId {
        if let Some(&id) = self.type_ids.get(&TypeId::of::<T>()) {
            return id;
        }

        let id = ComponentId(u32::try_from(self.stores.len()).expect("component id overflow"));
        self.type_ids.insert(TypeId::of::<T>(), id);
        self.stores.push(Box::new(ComponentStore::<T>::new()));

        debug!("Assigned {id:?} to component `{}`", type_name::<T>());
        id
    }

    /// Returns the id of component type `T`, if it was ever used in this universe.
    pub fn try_component_id<T: Component>(&self) -> Option<ComponentId> {
        self.type_ids.get(&TypeId::of::<T>()).copied()
    }

    /// Stores a component for the given entity, and returns a reference to the stored value.
    ///
    /// If the entity already owns a `T`, the value in its existing slot is overwritten, so any
    /// handles to that slot observe the new value.
    ///
    /// ## Panics
    /// - if the entity was not enrolled in this universe
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> &mut T {
        assert!(self.validate_entity(entity), "invalid entity access");

        let id = self.component_id::<T>();
        let record = &mut self.entities[entity.index as usize];
        let store = self.stores[id.index()]
            .try_cast_mut::<T>()
            .expect("invalid internal ecs type mapping");

        let slot = match record.slots.get(&id) {
            Some(&slot) => {
                trace!("Overwriting `{}` of entity {entity}", type_name::<T>());
                *store.values[slot].get_mut() = value;
                slot
            }
            None => {
                let slot = store.push(entity, value);
                record.slots.insert(id, slot);
                record.mask.insert(id);
                slot
            }
        };

        store.values[slot].get_mut()
    }

    /// Checks whether provided [`Entity`] was enrolled in this universe.
    #[inline]
    pub fn validate_entity(&self, entity: Entity) -> bool {
        (entity.index as usize) < self.entities.len()
    }

    /// Checks if the entity has a specified component. Unknown entities have no components.
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.slot_of::<T>(entity).is_some()
    }

    /// Returns an optional component reference of the specified entity.
    ///
    /// ## Panics
    /// - if the component is currently borrowed mutably
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<Ref<'_, T>> {
        self.cell_of::<T>(entity).map(RefCell::borrow)
    }

    /// Returns an optional mutable component reference of the specified entity. Like every other
    /// component access, this only requires a shared borrow of the universe.
    ///
    /// ## Panics
    /// - if the component is currently borrowed
    pub fn get_component_mut<T: Component>(&self, entity: Entity) -> Option<RefMut<'_, T>> {
        self.cell_of::<T>(entity).map(RefCell::borrow_mut)
    }

    /// Like [`Universe::get_component_mut`], but uses the exclusive borrow to skip the runtime
    /// borrow tracking.
    pub fn get_component_exclusive<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let (id, slot) = self.slot_of::<T>(entity)?;
        self.stores[id.index()]
            .try_cast_mut::<T>()
            .map(|store| store.values[slot].get_mut())
    }

    /// Returns the typed store of `T`, if any component of that type was ever added.
    pub fn store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        let id = self.try_component_id::<T>()?;
        self.stores[id.index()].try_cast()
    }

    /// Number of enrolled entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterates over all enrolled entities, in enrollment order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        (0..self.entities.len() as u32).map(|index| Entity { index })
    }

    pub fn access_entity(&self, entity: Entity) -> EntityAccessor<'_> {
        assert!(self.validate_entity(entity), "invalid entity access");
        EntityAccessor {
            universe: self,
            entity,
        }
    }

    pub(crate) fn record(&self, entity: Entity) -> Option<&EntityRecord> {
        self.entities.get(entity.index as usize)
    }

    /// Resolves a cached `(id, slot)` handle into the component cell.
    ///
    /// ## Panics
    /// - if the handle wasn't produced by this universe for type `T`
    pub(crate) fn cell<T: Component>(&self, id: ComponentId, slot: usize) -> &RefCell<T> {
        let store = self.stores[id.index()]
            .try_cast::<T>()
            .expect("invalid internal ecs type mapping");
        &store.values[slot]
    }

    fn slot_of<T: Component>(&self, entity: Entity) -> Option<(ComponentId, usize)> {
        let id = self.try_component_id::<T>()?;
        let slot = *self.record(entity)?.slots.get(&id)?;
        Some((id, slot))
    }

    fn cell_of<T: Component>(&self, entity: Entity) -> Option<&RefCell<T>> {
        let (id, slot) = self.slot_of::<T>(entity)?;
        Some(self.cell::<T>(id, slot))
    }
}

/// Dense, append-only storage of all components of one type.
///
/// Slots are never removed or reordered, so a slot index stays valid forever.
pub struct ComponentStore<T: Component> {
    values: Vec<RefCell<T>>,
    owners: AHashMap<Entity, usize>,
}

impl<T: Component> ComponentStore<T> {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            owners: AHashMap::default(),
        }
    }

    /// Appends a value and returns its slot.
    pub(crate) fn push(&mut self, entity: Entity, value: T) -> usize {
        let slot = self.values.len();
        self.values.push(RefCell::new(value));
        self.owners.insert(entity, slot);
        slot
    }

    /// Returns the cell at `slot`, or [`None`] if it is out of range.
    pub fn get(&self, slot: usize) -> Option<&RefCell<T>> {
        self.values.get(slot)
    }

    /// Returns the slot owned by `entity`.
    pub fn slot_of(&self, entity: Entity) -> Option<usize> {
        self.owners.get(&entity).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased [`ComponentStore`], letting the universe keep stores of every type in one vector.
pub(crate) trait AnyComponentStore: Any {
    // This may be unnecessary if rust#65991 (dyn upcasting) gets stabilized
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn AnyComponentStore {
    pub fn try_cast<T: Component>(&self) -> Option<&ComponentStore<T>> {
        self.as_any().downcast_ref()
    }

    pub fn try_cast_mut<T: Component>(&mut self) -> Option<&mut ComponentStore<T>> {
        self.as_any_mut().downcast_mut()
    }
}

impl<T: Component> AnyComponentStore for ComponentStore<T> {
    fn as_any(&self) -> &dyn Any {
        self as &dyn Any
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self as &mut dyn Any
    }
}
