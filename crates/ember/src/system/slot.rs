use super::{Commands, Context, Filter, FilterIds, FilterSlots, System, SystemId, SystemState};
use crate::entities::{ComponentMask, Entity, Universe};
use ahash::AHashSet;
use itertools::Itertools;
use log::*;
use std::any::Any;

/// Type-erased [`SystemSlot`], letting the registry keep systems of every type in one vector.
pub(crate) trait AnySystem: Any {
    fn label(&self) -> &'static str;
    fn state(&self) -> SystemState;
    fn set_state(&mut self, state: SystemState);

    /// Adds the entity to the cache if it matches the filter and isn't cached yet.
    fn filter_entity(&mut self, entity: Entity, universe: &Universe);

    /// Fires `on_create` for all cached entities, unless it already fired once.
    fn run_create(&mut self, id: SystemId, universe: &Universe, commands: &mut Commands);
    fn run_update(&mut self, id: SystemId, ts: f32, universe: &Universe, commands: &mut Commands);

    fn matched_entities(&self) -> &[Entity];

    // This may be unnecessary if rust#65991 (dyn upcasting) gets stabilized
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn AnySystem {
    pub fn try_cast<S: System>(&self) -> Option<&SystemSlot<S>> {
        self.as_any().downcast_ref()
    }

    pub fn try_cast_mut<S: System>(&mut self) -> Option<&mut SystemSlot<S>> {
        self.as_any_mut().downcast_mut()
    }
}

/// A registered system, along with its lifecycle state and the cache of matched entities.
pub(crate) struct SystemSlot<S: System> {
    pub system: S,
    state: SystemState,
    created: bool,

    ids: FilterIds,
    mask: ComponentMask,

    // `entities` and `slots` are kept in lock-step
    entities: Vec<Entity>,
    slots: Vec<FilterSlots>,
    members: AHashSet<Entity>,
}

impl<S: System> SystemSlot<S> {
    /// Wraps the system and seeds its cache by scanning all entities of the universe.
    ///
    /// ## Panics
    /// - if the filter lists the same component type twice
    pub fn new(system: S, universe: &mut Universe) -> Self {
        let ids = S::Filter::component_ids(universe);
        assert!(
            ids.iter().all_unique(),
            "filter of system `{}` lists a component type twice",
            system.label(),
        );

        let mut slot = Self {
            system,
            state: SystemState::default(),
            created: false,
            mask: ComponentMask::from_ids(ids.iter().copied()),
            ids,
            entities: vec![],
            slots: vec![],
            members: AHashSet::default(),
        };

        for entity in universe.entities() {
            slot.filter_entity(entity, universe);
        }

        slot
    }
}

impl<S: System> AnySystem for SystemSlot<S> {
    fn label(&self) -> &'static str {
        self.system.label()
    }

    fn state(&self) -> SystemState {
        self.state
    }

    fn set_state(&mut self, state: SystemState) {
        if self.state != state {
            debug!(
                "System `{}` transitioning {:?} -> {:?}",
                self.label(),
                self.state,
                state
            );
            self.state = state;
        }
    }

    fn filter_entity(&mut self, entity: Entity, universe: &Universe) {
        if self.members.contains(&entity) {
            return;
        }

        let Some(record) = universe.record(entity) else {
            return;
        };

        if !record.mask.contains_all(&self.mask) {
            return;
        }

        // The mask check guarantees every id has a slot
        let slots = self
            .ids
            .iter()
            .map(|id| record.slots[id])
            .collect::<FilterSlots>();

        trace!("Entity {entity} now matches system `{}`", self.label());
        self.entities.push(entity);
        self.slots.push(slots);
        self.members.insert(entity);
    }

    fn run_create(&mut self, id: SystemId, universe: &Universe, commands: &mut Commands) {
        if self.created {
            return;
        }
        self.created = true;

        if self.state != SystemState::Play {
            debug!(
                "Skipping creation of system `{}`, its state is {:?}",
                self.label(),
                self.state
            );
            return;
        }

        for (&entity, slots) in self.entities.iter().zip(&self.slots) {
            let components = S::Filter::fetch(universe, &self.ids, slots);
            let mut ctx = Context::new(universe, commands, id, 0.0);
            self.system.on_create(&mut ctx, entity, components);
        }
    }

    fn run_update(&mut self, id: SystemId, ts: f32, universe: &Universe, commands: &mut Commands) {
        if self.state != SystemState::Play {
            return;
        }

        for (&entity, slots) in self.entities.iter().zip(&self.slots) {
            let components = S::Filter::fetch(universe, &self.ids, slots);
            let mut ctx = Context::new(universe, commands, id, ts);
            self.system.on_update(ts, &mut ctx, entity, components);
        }
    }

    fn matched_entities(&self) -> &[Entity] {
        &self.entities
    }

    fn as_any(&self) -> &dyn Any {
        self as &dyn Any
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self as &mut dyn Any
    }
}
