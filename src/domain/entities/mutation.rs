use std::fmt;

/// Row key used for the create slot, which has no persisted id yet.
pub const NEW_ROW_KEY: &str = "new";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    Toggle,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
            MutationKind::Toggle => "toggle",
        };
        f.write_str(label)
    }
}

/// Which single row is mid-flight for each operation kind.
///
/// One slot per kind: a second delete cannot start while another row is
/// being deleted, but a delete and a toggle on different rows can overlap.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MutationState {
    pub creating_id: Option<String>,
    pub updating_id: Option<String>,
    pub deleting_id: Option<String>,
    pub toggling_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("another {kind} is still in progress (row {busy_id})")]
    Busy { kind: MutationKind, busy_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowActionState {
    /// Operation currently running on this row, shown as a spinner.
    pub busy: Option<MutationKind>,
    pub disabled: bool,
}

impl MutationState {
    fn slot(&self, kind: MutationKind) -> &Option<String> {
        match kind {
            MutationKind::Create => &self.creating_id,
            MutationKind::Update => &self.updating_id,
            MutationKind::Delete => &self.deleting_id,
            MutationKind::Toggle => &self.toggling_id,
        }
    }

    fn slot_mut(&mut self, kind: MutationKind) -> &mut Option<String> {
        match kind {
            MutationKind::Create => &mut self.creating_id,
            MutationKind::Update => &mut self.updating_id,
            MutationKind::Delete => &mut self.deleting_id,
            MutationKind::Toggle => &mut self.toggling_id,
        }
    }

    pub fn in_flight(&self, kind: MutationKind) -> Option<&str> {
        self.slot(kind).as_deref()
    }

    pub fn claim(&mut self, kind: MutationKind, row_key: &str) -> Result<(), SlotError> {
        let slot = self.slot_mut(kind);
        if let Some(busy_id) = slot {
            return Err(SlotError::Busy {
                kind,
                busy_id: busy_id.clone(),
            });
        }
        *slot = Some(row_key.to_string());
        Ok(())
    }

    /// Clears the slot if it still belongs to `row_key`.
    pub fn release(&mut self, kind: MutationKind, row_key: &str) {
        let slot = self.slot_mut(kind);
        if slot.as_deref() == Some(row_key) {
            *slot = None;
        }
    }

    pub fn busy_kind(&self, row_key: &str) -> Option<MutationKind> {
        [
            MutationKind::Delete,
            MutationKind::Update,
            MutationKind::Toggle,
            MutationKind::Create,
        ]
        .into_iter()
        .find(|kind| self.slot(*kind).as_deref() == Some(row_key))
    }

    pub fn row_busy(&self, row_key: &str) -> bool {
        self.busy_kind(row_key).is_some()
    }

    pub fn row_action_state(&self, row_key: &str) -> RowActionState {
        let busy = self.busy_kind(row_key);
        RowActionState {
            busy,
            disabled: busy.is_some(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.creating_id.is_none()
            && self.updating_id.is_none()
            && self.deleting_id.is_none()
            && self.toggling_id.is_none()
    }
}
