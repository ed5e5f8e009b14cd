//! # Ember
//! The entity component system core of a small real-time rendering framework.
//!
//! Components live in a [`Universe`](entities::Universe), owned by a
//! [`Registry`](registry::Registry) together with the list of systems operating on them. Systems
//! declare the component types they need, and the registry keeps track of which entities match
//! which systems as components get added. A [`Scene`](scene::Scene) bundles one registry, and an
//! [`Application`](app::Application) drives the active scene of a
//! [`SceneManager`](scene::SceneManager) frame by frame.
//!
//! Windowing, GPU resources and asset management are outside of this crate. They're reached
//! through the [`Window`](app::Window) and [`Renderer`](systems::Renderer) traits.

pub mod app;
pub mod entities;
pub mod registry;
pub mod scene;
pub mod system;
pub mod systems;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
