use crate::entities::{Component, ComponentId, Universe};
use smallvec::{smallvec, SmallVec};
use std::cell::RefMut;

/// Component ids of a filter, in declaration order.
pub type FilterIds = SmallVec<[ComponentId; 4]>;

/// Store slots of one matched entity, parallel to [`FilterIds`].
pub type FilterSlots = SmallVec<[usize; 4]>;

/// An ordered list of required component types. Implemented for tuples of 1 to 8 components.
///
/// Matching is AND-only: an entity matches if it owns every listed type. The listed types must be
/// distinct, as each one is borrowed mutably during dispatch.
pub trait Filter: 'static {
    /// What a system receives for one entity. Always in declaration order, regardless of the
    /// order the components were added in.
    type Item<'a>;

    /// Resolves the ids of the filter's component types, assigning new ones where needed.
    fn component_ids(universe: &mut Universe) -> FilterIds;

    /// Borrows the components at the given slots.
    ///
    /// ## Panics
    /// - if any of the components is already borrowed
    fn fetch<'a>(universe: &'a Universe, ids: &[ComponentId], slots: &[usize]) -> Self::Item<'a>;
}

impl<A: Component> Filter for (A,) {
    type Item<'a> = RefMut<'a, A>;

    fn component_ids(universe: &mut Universe) -> FilterIds {
        smallvec![universe.component_id::<A>()]
    }

    fn fetch<'a>(universe: &'a Universe, ids: &[ComponentId], slots: &[usize]) -> Self::Item<'a> {
        universe.cell::<A>(ids[0], slots[0]).borrow_mut()
    }
}

macro_rules! impl_filter_tuple {
    ($($ty:ident: $index:tt),+) => {
        impl<$($ty: Component),+> Filter for ($($ty,)+) {
            type Item<'a> = ($(RefMut<'a, $ty>,)+);

            fn component_ids(universe: &mut Universe) -> FilterIds {
                smallvec![$(universe.component_id::<$ty>()),+]
            }

            fn fetch<'a>(
                universe: &'a Universe,
                ids: &[ComponentId],
                slots: &[usize],
            ) -> Self::Item<'a> {
                ($(universe.cell::<$ty>(ids[$index], slots[$index]).borrow_mut(),)+)
            }
        }
    };
}

impl_filter_tuple!(A: 0, B: 1);
impl_filter_tuple!(A: 0, B: 1, C: 2);
impl_filter_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_filter_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_filter_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_filter_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_filter_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
