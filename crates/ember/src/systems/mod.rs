//! Built-in systems
//!
//! The hierarchy systems depend on each other's output within a single frame, so they have to be
//! registered in this order:
//!  1. [`TransformSystem`] - local matrices out of translation/rotation/scale
//!  2. [`LinkSystem`] - world matrices out of local matrices and the parent chain
//!  3. [`RenderingSystem`] - draw calls out of world matrices

#[doc(inline)]
pub use link::*;
mod link;

#[doc(inline)]
pub use rendering::*;
mod rendering;

#[doc(inline)]
pub use transform::*;
mod transform;
