//! Built-in components used by the built-in systems

#[doc(inline)]
pub use info::*;
mod info;

#[doc(inline)]
pub use link::*;
mod link;

#[doc(inline)]
pub use render::*;
mod render;

#[doc(inline)]
pub use transform::*;
mod transform;
