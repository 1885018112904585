/// Identifier of an [`ImageDisplay`](crate::ImageDisplay) instance.
///
/// Ids are always handed in by the caller; rasterfx keeps no process-wide counter.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct DisplayId(pub u32);

/// Monotonic id generator owned by whoever creates displays.
#[derive(Clone, Debug, Default)]
pub struct IdSequence {
    next: u32,
}

impl IdSequence {
    /// Start a sequence whose first id is `seed`.
    pub fn starting_at(seed: u32) -> Self {
        Self { next: seed }
    }

    /// Return the next id and advance. Wraps at `u32::MAX`.
    pub fn next_id(&mut self) -> DisplayId {
        let id = DisplayId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
