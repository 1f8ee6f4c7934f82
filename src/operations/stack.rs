use crate::operations::{Operation, OperationCategory, downcast_mut, downcast_ref};

/// Operations in render order.
///
/// Entries are grouped by [`OperationCategory`] (geometric, then colour, then
/// post-processing); within a category they keep insertion order. Identifiers are unique.
#[derive(Clone, Debug, Default)]
pub struct OperationStack {
    ops: Vec<Box<dyn Operation>>,
}

impl OperationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    fn category_block(&self, category: OperationCategory) -> (usize, usize) {
        let start = self.ops.iter().filter(|o| o.category() < category).count();
        let len = self.ops.iter().filter(|o| o.category() == category).count();
        (start, start + len)
    }

    /// Adds `op` and returns the entry it replaced.
    ///
    /// An operation with the same identifier is replaced in place. Otherwise `op` goes to
    /// `preferred_index` clamped into its category block, or to the end of that block.
    pub fn insert(
        &mut self,
        op: Box<dyn Operation>,
        preferred_index: Option<usize>,
    ) -> Option<Box<dyn Operation>> {
        if let Some(i) = self.index_of(op.identifier()) {
            return Some(std::mem::replace(&mut self.ops[i], op));
        }
        let (start, end) = self.category_block(op.category());
        let at = preferred_index.map_or(end, |i| i.clamp(start, end));
        self.ops.insert(at, op);
        None
    }

    pub fn remove(&mut self, identifier: &str) -> Option<Box<dyn Operation>> {
        let i = self.index_of(identifier)?;
        Some(self.ops.remove(i))
    }

    pub fn index_of(&self, identifier: &str) -> Option<usize> {
        self.ops.iter().position(|o| o.identifier() == identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index_of(identifier).is_some()
    }

    pub fn get(&self, identifier: &str) -> Option<&(dyn Operation + 'static)> {
        self.ops
            .iter()
            .find(|o| o.identifier() == identifier)
            .map(|o| o.as_ref())
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut (dyn Operation + 'static)> {
        self.ops
            .iter_mut()
            .find(|o| o.identifier() == identifier)
            .map(|o| o.as_mut())
    }

    /// Typed view of the entry registered under `identifier`.
    pub fn get_as<T: Operation>(&self, identifier: &str) -> Option<&T> {
        downcast_ref::<T>(self.get(identifier)?)
    }

    pub fn get_as_mut<T: Operation>(&mut self, identifier: &str) -> Option<&mut T> {
        downcast_mut::<T>(self.get_mut(identifier)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Operation + 'static)> {
        self.ops.iter().map(|o| o.as_ref())
    }

    pub fn identifiers(&self) -> Vec<&'static str> {
        self.ops.iter().map(|o| o.identifier()).collect()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operations/stack.rs"]
mod tests;
