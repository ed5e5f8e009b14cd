use super::{System, SystemId, SystemState};
use crate::entities::{Component, Entity, Universe};
use crate::registry::Registry;
use log::*;
use std::cell::{Ref, RefMut};
use std::fmt;

/// What a system can see and do while one of its hooks runs.
///
/// Components are read and written directly through the universe. Structural changes (adding
/// components, registering systems, changing system states) need the registry exclusively, so
/// they're queued and applied as soon as the current system finishes processing all of its
/// entities. Systems registered after it observe them in the same frame, systems that already
/// ran observe them in the next one.
pub struct Context<'a> {
    universe: &'a Universe,
    commands: &'a mut Commands,
    system: SystemId,
    timestep: f32,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        universe: &'a Universe,
        commands: &'a mut Commands,
        system: SystemId,
        timestep: f32,
    ) -> Self {
        Self {
            universe,
            commands,
            system,
            timestep,
        }
    }

    /// The universe the running system operates on.
    pub fn universe(&self) -> &'a Universe {
        self.universe
    }

    /// Id of the system the hook belongs to.
    pub fn system_id(&self) -> SystemId {
        self.system
    }

    /// Duration of the current frame in seconds. Zero during `on_create`.
    pub fn timestep(&self) -> f32 {
        self.timestep
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.universe.has_component::<T>(entity)
    }

    /// See [`Universe::get_component`]. Note that the components passed to the running hook are
    /// already borrowed mutably, so reading them again through here panics.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<Ref<'a, T>> {
        self.universe.get_component(entity)
    }

    pub fn get_component_mut<T: Component>(&self, entity: Entity) -> Option<RefMut<'a, T>> {
        self.universe.get_component_mut(entity)
    }

    /// Queues a component insertion.
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) {
        self.commands.push(move |registry| {
            registry.add_component(entity, value);
        });
    }

    /// Queues registration of a new system. It gets created immediately once applied, as the
    /// simulation is already running.
    pub fn register_system<S: System>(&mut self, system: S) {
        self.commands.push(move |registry| {
            registry.register_system(system);
        });
    }

    /// Queues a state change of any system, including the running one.
    pub fn set_system_state(&mut self, id: SystemId, state: SystemState) {
        self.commands.push(move |registry| {
            if let Err(error) = registry.set_system_state(id, state) {
                warn!("Dropping a queued state change: {error}");
            }
        });
    }

    /// Asks whoever drives the frame loop to stop after the current frame.
    pub fn request_quit(&mut self) {
        self.commands.push(Registry::request_quit);
    }
}

/// Registry changes queued by a running system.
#[derive(Default)]
pub(crate) struct Commands {
    queue: Vec<Box<dyn FnOnce(&mut Registry)>>,
}

impl Commands {
    pub fn push(&mut self, command: impl FnOnce(&mut Registry) + 'static) {
        self.queue.push(Box::new(command));
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn apply(self, registry: &mut Registry) {
        for command in self.queue {
            command(registry);
        }
    }
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commands")
            .field("queued", &self.queue.len())
            .finish()
    }
}
