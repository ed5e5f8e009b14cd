//! Scenes, self-contained simulation contexts
//!
//! A [`Scene`] is a thin wrapper over its own [`Registry`], so entities, components and systems
//! of different scenes never see each other. The [`SceneManager`] keeps every scene alive, but
//! only forwards the frame lifecycle to the active one.

use crate::entities::{Component, Entity, EntityBuilder};
use crate::registry::Registry;
use crate::system::{System, SystemId};
use std::cell::Ref;
use std::fmt;
use thiserror::Error;

#[doc(inline)]
pub use manager::*;
mod manager;

/// Handle of a scene added to a [`SceneManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneId(pub(crate) u32);

impl SceneId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene #{}", self.0)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    #[error("unknown scene handle ({0})")]
    UnknownScene(SceneId),
}

#[derive(Default)]
pub struct Scene {
    name: Option<String>,
    registry: Registry,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl ToString) -> Self {
        Self {
            name: Some(name.to_string()),
            registry: Registry::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn enroll_entity(&mut self) -> Entity {
        self.registry.enroll_entity()
    }

    pub fn build_entity(&mut self) -> EntityBuilder<'_> {
        self.registry.build_entity()
    }

    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> &mut T {
        self.registry.add_component(entity, value)
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.registry.has_component::<T>(entity)
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<Ref<'_, T>> {
        self.registry.get_component(entity)
    }

    pub fn register_system<S: System>(&mut self, system: S) -> SystemId {
        self.registry.register_system(system)
    }

    /// Whether the scene was already started.
    pub fn is_running(&self) -> bool {
        self.registry.is_running()
    }

    /// Starts the scene, see [`Registry::start`].
    pub fn on_create(&mut self) {
        self.registry.start();
    }

    /// Runs a single frame of the scene, see [`Registry::update`].
    pub fn on_update(&mut self, ts: f32) {
        self.registry.update(ts);
    }

    /// See [`Registry::take_quit_request`].
    pub fn take_quit_request(&mut self) -> bool {
        self.registry.take_quit_request()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("entities", &self.registry.universe().entity_count())
            .field("systems", &self.registry.system_count())
            .finish()
    }
}
