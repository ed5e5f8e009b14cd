use super::ComponentId;
use bitvec::prelude::BitVec;

/// A set of component types, stored as one bit per [`ComponentId`].
///
/// Entities carry one describing what they own, systems carry one describing what they require.
/// Matching a filter is then a word-wise `and` instead of a lookup per required type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentMask {
    bits: BitVec,
}

impl ComponentMask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mask out of a list of ids.
    pub fn from_ids(ids: impl IntoIterator<Item = ComponentId>) -> Self {
        let mut mask = Self::new();
        for id in ids {
            mask.insert(id);
        }
        mask
    }

    /// Sets the bit of `id`, growing the mask if necessary.
    pub fn insert(&mut self, id: ComponentId) {
        let index = id.index();
        if index >= self.bits.len() {
            self.bits.resize(index + 1, false);
            // `contains_all` compares whole words, dead bits included
            self.bits.set_uninitialized(false);
        }
        self.bits.set(index, true);
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.bits
            .get(id.index())
            .map(|bit| *bit)
            .unwrap_or(false)
    }

    /// Checks whether every bit set in `required` is also set in `self`.
    pub fn contains_all(&self, required: &ComponentMask) -> bool {
        let ours = self.bits.as_raw_slice();
        required
            .bits
            .as_raw_slice()
            .iter()
            .enumerate()
            .all(|(i, &word)| word & ours.get(i).copied().unwrap_or(0) == word)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }
}
