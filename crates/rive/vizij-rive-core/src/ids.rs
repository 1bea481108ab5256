//! Identifiers and simple allocators for runtime entities.

use serde::{Deserialize, Serialize};

/// Index of an object inside its artboard. Id 0 is the artboard itself.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    pub const ARTBOARD: ObjectId = ObjectId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle for an animation or state machine playing on an artboard.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Monotonic allocator for PlayerId.
#[derive(Default, Debug, Clone)]
pub struct IdAllocator {
    next_player: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_player(&mut self) -> PlayerId {
        let id = PlayerId(self.next_player);
        self.next_player = self.next_player.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_player(), PlayerId(0));
        assert_eq!(alloc.alloc_player(), PlayerId(1));
        assert_eq!(alloc.alloc_player(), PlayerId(2));
    }
}
