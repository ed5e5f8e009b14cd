//! The registry ties component storage and systems together
//!
//! It owns a [`Universe`] and the list of registered systems, and is the only way components get
//! added while systems exist: every [`Registry::add_component`] call re-evaluates the affected
//! entity against every registered system, so all system caches are consistent with the storage
//! before the next update. That costs one mask comparison per system, per call.

use crate::entities::{Component, Entity, EntityBuilder, Universe};
use crate::system::{AnySystem, Commands, System, SystemId, SystemSlot, SystemState};
use log::*;
use std::cell::{Ref, RefMut};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown system handle ({0})")]
    UnknownSystem(SystemId),
}

#[derive(Default)]
pub struct Registry {
    universe: Universe,
    systems: Vec<Box<dyn AnySystem>>,
    is_running: bool,
    quit_requested: bool,
}

impl Registry {
    /// Creates an empty registry, with no entities and no systems.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Whether [`Registry::start`] was already called.
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Allocates a new entity.
    pub fn enroll_entity(&mut self) -> Entity {
        self.universe.enroll_entity()
    }

    /// Starts building a new entity, see [`EntityBuilder`].
    pub fn build_entity(&mut self) -> EntityBuilder<'_> {
        EntityBuilder::new(self)
    }

    /// Adds a component to the entity, and updates the membership of the entity in every
    /// registered system. Returns the stored component.
    ///
    /// Adding a component of a type the entity already owns overwrites the previous value.
    ///
    /// ## Panics
    ///  - if the entity wasn't enrolled in this registry
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> &mut T {
        self.universe.add_component(entity, value);

        for system in &mut self.systems {
            system.filter_entity(entity, &self.universe);
        }

        self.universe
            .get_component_exclusive(entity)
            .expect("component missing right after insertion")
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.universe.has_component::<T>(entity)
    }

    /// Returns the component of the entity, or [`None`] if it doesn't own one.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<Ref<'_, T>> {
        self.universe.get_component(entity)
    }

    pub fn get_component_mut<T: Component>(&self, entity: Entity) -> Option<RefMut<'_, T>> {
        self.universe.get_component_mut(entity)
    }

    /// Registers a system at the end of the update order.
    ///
    /// The system's cache is seeded with all entities it currently matches. If the simulation is
    /// already running, the system's `on_create` fires right away, without affecting any other
    /// system.
    pub fn register_system<S: System>(&mut self, system: S) -> SystemId {
        let id = SystemId(u32::try_from(self.systems.len()).expect("system id overflow"));
        let slot = SystemSlot::new(system, &mut self.universe);

        debug!(
            "Registered system `{}` as {id}, matching {} entities",
            slot.system.label(),
            slot.matched_entities().len()
        );
        self.systems.push(Box::new(slot));

        if self.is_running {
            debug!("Hot-attaching {id} to a running simulation");
            self.dispatch(id.index(), None);
        }

        id
    }

    /// Marks the simulation as running and fires `on_create` of every system, in registration
    /// order. Calling it more than once has no further effect.
    pub fn start(&mut self) {
        if self.is_running {
            warn!("Registry already started");
            return;
        }

        self.is_running = true;
        trace!("Creating {} systems", self.systems.len());

        let mut index = 0;
        while index < self.systems.len() {
            self.dispatch(index, None);
            index += 1;
        }
    }

    /// Runs a single frame, calling `on_update` of every system in registration order.
    pub fn update(&mut self, ts: f32) {
        // Systems registered by other systems mid-frame also get to run this frame
        let mut index = 0;
        while index < self.systems.len() {
            self.dispatch(index, Some(ts));
            index += 1;
        }
    }

    /// Runs one hook of one system, then applies whatever the system queued.
    fn dispatch(&mut self, index: usize, ts: Option<f32>) {
        let id = SystemId(index as u32);
        let mut commands = Commands::default();
        let system = &mut self.systems[index];

        match ts {
            Some(ts) => system.run_update(id, ts, &self.universe, &mut commands),
            None => system.run_create(id, &self.universe, &mut commands),
        }

        if !commands.is_empty() {
            trace!("Applying commands queued by `{}`", system.label());
            commands.apply(self);
        }
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn system_state(&self, id: SystemId) -> Result<SystemState, RegistryError> {
        self.systems
            .get(id.index())
            .map(|system| system.state())
            .ok_or(RegistryError::UnknownSystem(id))
    }

    pub fn set_system_state(
        &mut self,
        id: SystemId,
        state: SystemState,
    ) -> Result<(), RegistryError> {
        self.systems
            .get_mut(id.index())
            .map(|system| system.set_state(state))
            .ok_or(RegistryError::UnknownSystem(id))
    }

    /// Sets the state of every registered system at once.
    pub fn set_all_system_states(&mut self, state: SystemState) {
        for system in &mut self.systems {
            system.set_state(state);
        }
    }

    /// Entities cached by a system, in the order they first matched it.
    pub fn matched_entities(&self, id: SystemId) -> Result<&[Entity], RegistryError> {
        self.systems
            .get(id.index())
            .map(|system| system.matched_entities())
            .ok_or(RegistryError::UnknownSystem(id))
    }

    /// Returns a registered system, if `id` refers to a system of type `S`.
    pub fn system<S: System>(&self, id: SystemId) -> Option<&S> {
        let slot = self.systems.get(id.index())?.try_cast::<S>()?;
        Some(&slot.system)
    }

    pub fn system_mut<S: System>(&mut self, id: SystemId) -> Option<&mut S> {
        let slot = self.systems.get_mut(id.index())?.try_cast_mut::<S>()?;
        Some(&mut slot.system)
    }

    /// Flags the simulation for shutdown, see [`Registry::take_quit_request`].
    pub fn request_quit(&mut self) {
        debug!("Quit requested");
        self.quit_requested = true;
    }

    /// Returns whether a quit was requested since the last call, and resets the flag.
    pub fn take_quit_request(&mut self) -> bool {
        std::mem::take(&mut self.quit_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::{Registry, RegistryError};
    use crate::entities::{Component, Entity};
    use crate::system::{Context, FilterItem, System, SystemId, SystemState};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    struct Position(f32);
    impl Component for Position {}

    #[derive(Debug, PartialEq)]
    struct Velocity(f32);
    impl Component for Velocity {}

    #[derive(Debug, PartialEq)]
    struct Frozen;
    impl Component for Frozen {}

    type Log = Rc<RefCell<Vec<String>>>;

    /// Moves positions by their velocity, logging every hook call.
    struct Movement {
        log: Log,
    }

    impl System for Movement {
        type Filter = (Position, Velocity);

        fn on_create<'a>(&mut self, _: &mut Context<'a>, entity: Entity, _: FilterItem<'a, Self>) {
            self.log.borrow_mut().push(format!("create movement {entity}"));
        }

        fn on_update<'a>(
            &mut self,
            ts: f32,
            _: &mut Context<'a>,
            entity: Entity,
            (mut position, velocity): FilterItem<'a, Self>,
        ) {
            position.0 += velocity.0 * ts;
            self.log.borrow_mut().push(format!("update movement {entity}"));
        }
    }

    /// Single component filter, receives the component unwrapped.
    struct Counter {
        log: Log,
    }

    impl System for Counter {
        type Filter = (Position,);

        fn on_create<'a>(&mut self, _: &mut Context<'a>, entity: Entity, _: FilterItem<'a, Self>) {
            self.log.borrow_mut().push(format!("create counter {entity}"));
        }

        fn on_update<'a>(
            &mut self,
            _: f32,
            _: &mut Context<'a>,
            entity: Entity,
            position: FilterItem<'a, Self>,
        ) {
            self.log
                .borrow_mut()
                .push(format!("update counter {entity} at {}", position.0));
        }
    }

    fn init() -> (Registry, Log) {
        let _ = pretty_env_logger::try_init();
        (Registry::new(), Log::default())
    }

    fn take(log: &Log) -> Vec<String> {
        log.borrow_mut().drain(..).collect()
    }

    #[test]
    fn component_lookup() {
        let (mut registry, _) = init();
        let entity = registry.enroll_entity();

        assert!(!registry.has_component::<Position>(entity));
        assert!(registry.get_component::<Position>(entity).is_none());

        registry.add_component(entity, Position(1.0)).0 = 2.0;

        assert!(registry.has_component::<Position>(entity));
        assert_eq!(*registry.get_component::<Position>(entity).unwrap(), Position(2.0));
    }

    #[test]
    fn filter_matches_only_full_component_sets() {
        let (mut registry, log) = init();
        let both = registry.enroll_entity();
        let only_position = registry.enroll_entity();
        let only_velocity = registry.enroll_entity();

        registry.add_component(both, Velocity(1.0));
        registry.add_component(both, Position(0.0));
        registry.add_component(only_position, Position(0.0));
        registry.add_component(only_velocity, Velocity(0.0));

        let movement = registry.register_system(Movement { log });
        assert_eq!(registry.matched_entities(movement).unwrap(), &[both]);

        // Tuples follow filter order, even though velocity was added first
        registry.start();
        registry.update(0.5);
        assert_eq!(registry.get_component::<Position>(both).unwrap().0, 0.5);
    }

    #[test]
    fn membership_follows_component_insertion() {
        let (mut registry, log) = init();
        let movement = registry.register_system(Movement { log });
        let entity = registry.enroll_entity();

        registry.add_component(entity, Position(0.0));
        assert!(registry.matched_entities(movement).unwrap().is_empty());

        registry.add_component(entity, Velocity(2.0));
        assert_eq!(registry.matched_entities(movement).unwrap(), &[entity]);

        // Re-adding never duplicates the cache entry, and the cache sees the new value
        registry.add_component(entity, Velocity(4.0));
        registry.add_component(entity, Frozen);
        assert_eq!(registry.matched_entities(movement).unwrap(), &[entity]);

        registry.start();
        registry.update(1.0);
        assert_eq!(registry.get_component::<Position>(entity).unwrap().0, 4.0);
    }

    #[test]
    fn cache_order_is_first_match_order() {
        let (mut registry, log) = init();
        let counter = registry.register_system(Counter { log });

        let a = registry.enroll_entity();
        let b = registry.enroll_entity();
        let c = registry.enroll_entity();
        registry.add_component(c, Position(0.0));
        registry.add_component(a, Position(0.0));
        registry.add_component(b, Position(0.0));

        assert_eq!(registry.matched_entities(counter).unwrap(), &[c, a, b]);
    }

    #[test]
    fn systems_run_in_registration_order() {
        let (mut registry, log) = init();
        let entity = registry.enroll_entity();
        registry.add_component(entity, Position(0.0));
        registry.add_component(entity, Velocity(1.0));

        registry.register_system(Movement { log: log.clone() });
        registry.register_system(Counter { log: log.clone() });

        registry.start();
        assert_eq!(
            take(&log),
            vec!["create movement #0", "create counter #0"]
        );

        registry.update(1.0);
        registry.update(1.0);
        assert_eq!(
            take(&log),
            vec![
                "update movement #0",
                "update counter #0 at 1",
                "update movement #0",
                "update counter #0 at 2",
            ]
        );
    }

    #[test]
    fn hot_attached_systems_are_created_once() {
        let (mut registry, log) = init();
        let entity = registry.enroll_entity();
        registry.add_component(entity, Position(0.0));
        registry.add_component(entity, Velocity(1.0));

        registry.register_system(Movement { log: log.clone() });
        registry.start();
        assert_eq!(take(&log), vec!["create movement #0"]);

        registry.register_system(Counter { log: log.clone() });
        assert_eq!(take(&log), vec!["create counter #0"]);

        registry.start();
        registry.update(1.0);
        assert_eq!(
            take(&log),
            vec!["update movement #0", "update counter #0 at 1"]
        );
    }

    #[test]
    fn paused_systems_do_nothing() {
        let (mut registry, log) = init();
        let entity = registry.enroll_entity();
        registry.add_component(entity, Position(0.0));
        registry.add_component(entity, Velocity(1.0));

        let movement = registry.register_system(Movement { log: log.clone() });
        let counter = registry.register_system(Counter { log: log.clone() });
        registry.start();
        take(&log);

        registry.set_all_system_states(SystemState::Pause);
        registry.update(1.0);
        registry.update(1.0);
        assert!(take(&log).is_empty());
        assert_eq!(registry.get_component::<Position>(entity).unwrap().0, 0.0);

        // Resuming processes the current frame only
        registry.set_system_state(movement, SystemState::Play).unwrap();
        registry.update(1.0);
        assert_eq!(take(&log), vec!["update movement #0"]);
        assert_eq!(registry.get_component::<Position>(entity).unwrap().0, 1.0);

        assert_eq!(registry.system_state(counter), Ok(SystemState::Pause));
        assert_eq!(
            registry.set_system_state(SystemId(9), SystemState::Play),
            Err(RegistryError::UnknownSystem(SystemId(9)))
        );
    }

    #[test]
    fn systems_paused_before_start_are_never_created() {
        let (mut registry, log) = init();
        let entity = registry.enroll_entity();
        registry.add_component(entity, Position(0.0));

        let counter = registry.register_system(Counter { log: log.clone() });
        registry.set_system_state(counter, SystemState::None).unwrap();
        registry.start();
        registry.set_system_state(counter, SystemState::Play).unwrap();
        registry.update(1.0);

        assert_eq!(take(&log), vec!["update counter #0 at 0"]);
    }

    /// Gives every positioned entity a velocity, and pauses itself afterwards.
    struct Accelerator {
        id: Option<SystemId>,
    }

    impl System for Accelerator {
        type Filter = (Position,);

        fn on_update<'a>(
            &mut self,
            _: f32,
            ctx: &mut Context<'a>,
            entity: Entity,
            _: FilterItem<'a, Self>,
        ) {
            ctx.add_component(entity, Velocity(10.0));
            if let Some(id) = self.id {
                ctx.set_system_state(id, SystemState::Pause);
            }
        }
    }

    #[test]
    fn queued_changes_are_visible_to_later_systems_only() {
        let (mut registry, log) = init();
        let early = registry.register_system(Movement { log: log.clone() });
        let accelerator = registry.register_system(Accelerator { id: None });
        let late = registry.register_system(Movement { log: log.clone() });
        registry.system_mut::<Accelerator>(accelerator).unwrap().id = Some(accelerator);

        let entity = registry.enroll_entity();
        registry.add_component(entity, Position(0.0));
        registry.start();

        registry.update(1.0);
        // The early system had already finished when the velocity got added
        assert_eq!(take(&log), vec!["update movement #0"]);
        assert_eq!(registry.matched_entities(early).unwrap(), &[entity]);
        assert_eq!(registry.matched_entities(late).unwrap(), &[entity]);
        assert_eq!(registry.get_component::<Position>(entity).unwrap().0, 10.0);
        assert_eq!(registry.system_state(accelerator), Ok(SystemState::Pause));

        registry.update(1.0);
        assert_eq!(take(&log), vec!["update movement #0", "update movement #0"]);
        assert_eq!(registry.get_component::<Position>(entity).unwrap().0, 30.0);
    }

    struct Quitter;

    impl System for Quitter {
        type Filter = (Frozen,);

        fn on_update<'a>(
            &mut self,
            _: f32,
            ctx: &mut Context<'a>,
            _: Entity,
            _: FilterItem<'a, Self>,
        ) {
            ctx.request_quit();
        }
    }

    #[test]
    fn quit_requests_are_taken_once() {
        let (mut registry, _) = init();
        registry.register_system(Quitter);
        let entity = registry.enroll_entity();
        registry.add_component(entity, Frozen);

        registry.start();
        assert!(!registry.take_quit_request());
        registry.update(0.1);
        assert!(registry.take_quit_request());
        assert!(!registry.take_quit_request());
    }

    #[test]
    fn built_entities_join_systems() {
        let (mut registry, log) = init();
        let movement = registry.register_system(Movement { log });

        let entity = registry
            .build_entity()
            .with_component(Position(3.0))
            .with_component(Velocity(1.0))
            .finish();

        assert_eq!(registry.matched_entities(movement).unwrap(), &[entity]);
        assert_eq!(registry.system::<Movement>(movement).map(|_| ()), Some(()));
        assert!(registry.system::<Counter>(movement).is_none());
    }
}
