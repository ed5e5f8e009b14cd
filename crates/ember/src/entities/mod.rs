//! Entities, components and their storage
//!
//! ## Implementation details
//! Every component type gets a dense [`ComponentId`] the first time a [`Universe`] sees it. The
//! id indexes a vector of type-erased, append-only [`ComponentStore`]s. Stores never remove or
//! move values, so a `(ComponentId, slot)` pair handed out once stays valid for the lifetime of
//! the universe. Systems rely on that to cache component handles instead of references.
//!
//! Components are wrapped in [`RefCell`](std::cell::RefCell)s, which lets a system mutate the
//! components of one entity while reading the components of another (like the parent chain
//! walked by the link system), all through a shared borrow of the universe.

use std::{any::Any, fmt};

pub mod components;

#[doc(inline)]
pub use accessor::*;
mod accessor;

#[doc(inline)]
pub use builder::*;
mod builder;

#[doc(inline)]
pub use mask::*;
mod mask;

#[doc(inline)]
pub use universe::*;
mod universe;

/// An entity handle. It's very cheap to copy (a single 32-bit value).
///
/// Handles are assigned monotonically by [`Universe::enroll_entity`] and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    /// The entity's index within the universe entity list.
    pub(crate) index: u32,
}

impl Entity {
    /// The entity's index within its universe.
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// Marker trait for components.
pub trait Component: Any {}

/// Dense per-universe identifier of a component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(pub(crate) u32);

impl ComponentId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
