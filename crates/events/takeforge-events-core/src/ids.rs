//! Identifiers and simple allocators for resolution.

use serde::{Deserialize, Serialize};

/// `(group, name)` reference to an authored animation.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimKey {
    pub group: String,
    pub name: String,
}

impl AnimKey {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for AnimKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.group, self.name)
    }
}

/// One pass over one child event group. Two events in a take never share an
/// id, because a pass spawns at most one event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupInstanceId(pub u32);

/// Monotonic allocator for GroupInstanceId, scoped to a single resolution.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_group: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_group(&mut self) -> GroupInstanceId {
        let id = GroupInstanceId(self.next_group);
        self.next_group = self.next_group.wrapping_add(1);
        id
    }

    #[inline]
    pub fn allocated(&self) -> u32 {
        self.next_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_group(), GroupInstanceId(0));
        assert_eq!(alloc.alloc_group(), GroupInstanceId(1));
        assert_eq!(alloc.allocated(), 2);
    }

    #[test]
    fn anim_key_display() {
        assert_eq!(AnimKey::new("_HeadGestureLib", "_Blink").to_string(), "_HeadGestureLib/_Blink");
    }
}
