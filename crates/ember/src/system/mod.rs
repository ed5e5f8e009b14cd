//! The system engine
//!
//! A system declares the component types it operates on as its [`System::Filter`], a tuple like
//! `(LinkComponent, TransformComponent)`. The registry keeps, for every system, a cache of the
//! entities whose component set covers the filter, along with the store slots of their matching
//! components. The cache is updated incrementally, one entity at a time, whenever a component is
//! added.
//!
//! Each frame, every system's [`System::on_update`] is called once per cached entity, in the
//! order the entities first matched. Systems themselves run strictly in registration order,
//! which is the only ordering guarantee there is. If a system depends on results of another one
//! (like the link system consuming local matrices of the transform system), it must be
//! registered after it.
//!
//! ## Calling convention
//! The components are passed to the hooks as live [`RefMut`](std::cell::RefMut) borrows, in
//! filter order. A single-element filter `(T,)` passes the one component unwrapped, rather than
//! as a one-element tuple.

use crate::entities::Entity;
use std::any::{type_name, Any};
use std::fmt;

#[doc(inline)]
pub use context::*;
mod context;

#[doc(inline)]
pub use filter::*;
mod filter;

mod slot;
pub(crate) use slot::*;

/// Lifecycle state of a registered system. Systems only run while they're in [`SystemState::Play`].
///
/// There are no automatic transitions, the state only changes when explicitly set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SystemState {
    None,
    #[default]
    Play,
    Pause,
}

/// Handle of a system registered in a [`Registry`](crate::registry::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SystemId(pub(crate) u32);

impl SystemId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "system #{}", self.0)
    }
}

/// Shorthand for the component borrows a system receives for one entity.
pub type FilterItem<'a, S> = <<S as System>::Filter as Filter>::Item<'a>;

/// Trait implemented by all systems, see module docs for details.
///
/// Both hooks have empty default implementations, so a system only implements the ones it needs.
pub trait System: Any {
    /// Component types an entity must own for the system to process it.
    type Filter: Filter;

    /// The system's label, used in diagnostics.
    fn label(&self) -> &'static str {
        let name = type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name)
    }

    /// Called once over the system's lifetime, for every entity it matches at the time the
    /// simulation starts (or at the time the system is registered, if it already started).
    fn on_create<'a>(
        &mut self,
        ctx: &mut Context<'a>,
        entity: Entity,
        components: FilterItem<'a, Self>,
    ) {
        let _ = (ctx, entity, components);
    }

    /// Called every frame, for every entity the system matches.
    fn on_update<'a>(
        &mut self,
        ts: f32,
        ctx: &mut Context<'a>,
        entity: Entity,
        components: FilterItem<'a, Self>,
    ) {
        let _ = (ts, ctx, entity, components);
    }
}
