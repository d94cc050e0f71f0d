use alloc::string::String;

use crate::*;

/// Persistence collaborator for [`SessionState`].
///
/// How and where the record is physically kept is up to the implementation.
pub trait SessionStore {
    fn save(&mut self, state: &SessionState) -> core::result::Result<(), StoreError>;

    /// `Ok(None)` when nothing was saved.
    fn load(&mut self) -> core::result::Result<Option<SessionState>, StoreError>;

    fn delete(&mut self);
}

/// Keeps the saved session as a JSON string in memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with an arbitrary payload, which need not be a valid record.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Some(raw.into()),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    pub fn has_saved(&self) -> bool {
        self.slot.is_some()
    }
}

impl SessionStore for MemoryStore {
    fn save(&mut self, state: &SessionState) -> core::result::Result<(), StoreError> {
        let raw = serde_json::to_string(state).map_err(StoreError::Encode)?;
        self.slot = Some(raw);
        Ok(())
    }

    fn load(&mut self) -> core::result::Result<Option<SessionState>, StoreError> {
        let Some(raw) = self.slot.as_deref() else {
            return Ok(None);
        };
        let state: SessionState = serde_json::from_str(raw).map_err(StoreError::Decode)?;
        state.validate()?;
        Ok(Some(state))
    }

    fn delete(&mut self) {
        self.slot = None;
    }
}
