use std::collections::HashMap;

/// Scroll and focus state remembered per logical modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessibilityState {
    pub scroll_offset: u16,
    pub last_focused_field: Option<String>,
}

/// Key-value store for [`AccessibilityState`], keyed by the logical modal
/// identifier (the storage key), not by instance id.
pub trait AccessibilityStore {
    fn get(&self, key: &str) -> Option<AccessibilityState>;

    fn put(&mut self, key: &str, state: AccessibilityState);
}

/// In-memory store that lives as long as its owner.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, AccessibilityState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccessibilityStore for MemoryStore {
    fn get(&self, key: &str) -> Option<AccessibilityState> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, state: AccessibilityState) {
        self.entries.insert(key.to_string(), state);
    }
}
