use tracing::debug;

use crate::domain::entities::mutation::{
    MutationKind, MutationState, RowActionState, SlotError, NEW_ROW_KEY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogTarget {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageMode {
    #[default]
    Idle,
    DialogOpen(DialogTarget),
    ConfirmDelete {
        id: i64,
        label: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Idle,
    DialogOpen,
    ConfirmOpen,
    Updating,
    Deleting,
    Toggling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Slot(#[from] SlotError),
    #[error("no dialog is open")]
    NoDialog,
    #[error("no delete is awaiting confirmation")]
    NotConfirming,
    #[error("row {0} has an operation in progress")]
    RowBusy(String),
}

/// Claim on one mutation slot; hand it back to [`EntityPageState::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTicket {
    pub kind: MutationKind,
    pub row_key: String,
    pub id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityPageState {
    pub mode: PageMode,
    pub mutations: MutationState,
    pub notice: Option<Notice>,
}

impl EntityPageState {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_row_free(&self, id: i64) -> Result<(), PageError> {
        let key = id.to_string();
        if self.mutations.row_busy(&key) {
            return Err(PageError::RowBusy(key));
        }
        Ok(())
    }

    pub fn open_create(&mut self) {
        self.mode = PageMode::DialogOpen(DialogTarget::Create);
    }

    pub fn open_edit(&mut self, id: i64) -> Result<(), PageError> {
        self.ensure_row_free(id)?;
        self.mode = PageMode::DialogOpen(DialogTarget::Edit(id));
        Ok(())
    }

    pub fn request_delete(&mut self, id: i64, label: impl Into<String>) -> Result<(), PageError> {
        self.ensure_row_free(id)?;
        self.mode = PageMode::ConfirmDelete {
            id,
            label: label.into(),
        };
        Ok(())
    }

    /// Closes any dialog. In-flight mutations keep their slot.
    pub fn cancel(&mut self) {
        self.mode = PageMode::Idle;
    }

    pub fn dialog_target(&self) -> Option<DialogTarget> {
        match self.mode {
            PageMode::DialogOpen(target) => Some(target),
            _ => None,
        }
    }

    pub fn begin_submit(&mut self) -> Result<MutationTicket, PageError> {
        let target = self.dialog_target().ok_or(PageError::NoDialog)?;
        let ticket = match target {
            DialogTarget::Create => MutationTicket {
                kind: MutationKind::Create,
                row_key: NEW_ROW_KEY.to_string(),
                id: None,
            },
            DialogTarget::Edit(id) => {
                self.ensure_row_free(id)?;
                MutationTicket {
                    kind: MutationKind::Update,
                    row_key: id.to_string(),
                    id: Some(id),
                }
            }
        };
        self.mutations.claim(ticket.kind, &ticket.row_key)?;
        debug!(kind = %ticket.kind, row = %ticket.row_key, "mutation started");
        Ok(ticket)
    }

    pub fn confirm_delete(&mut self) -> Result<MutationTicket, PageError> {
        let PageMode::ConfirmDelete { id, .. } = self.mode else {
            return Err(PageError::NotConfirming);
        };
        self.ensure_row_free(id)?;
        let ticket = MutationTicket {
            kind: MutationKind::Delete,
            row_key: id.to_string(),
            id: Some(id),
        };
        self.mutations.claim(ticket.kind, &ticket.row_key)?;
        debug!(kind = %ticket.kind, row = %ticket.row_key, "mutation started");
        Ok(ticket)
    }

    pub fn begin_toggle(&mut self, id: i64) -> Result<MutationTicket, PageError> {
        self.ensure_row_free(id)?;
        let ticket = MutationTicket {
            kind: MutationKind::Toggle,
            row_key: id.to_string(),
            id: Some(id),
        };
        self.mutations.claim(ticket.kind, &ticket.row_key)?;
        Ok(ticket)
    }

    /// Releases the ticket's slot whatever the outcome and records the notice.
    /// Returns whether the table should refetch.
    pub fn finish(&mut self, ticket: &MutationTicket, result: Result<String, String>) -> bool {
        self.mutations.release(ticket.kind, &ticket.row_key);

        let owns_mode = match (&self.mode, ticket.kind) {
            (PageMode::DialogOpen(DialogTarget::Create), MutationKind::Create) => true,
            (PageMode::DialogOpen(DialogTarget::Edit(id)), MutationKind::Update) => {
                ticket.id == Some(*id)
            }
            (PageMode::ConfirmDelete { id, .. }, MutationKind::Delete) => ticket.id == Some(*id),
            _ => false,
        };
        if owns_mode {
            self.mode = PageMode::Idle;
        }

        match result {
            Ok(message) => {
                self.notice = Some(Notice::success(message));
                true
            }
            Err(message) => {
                self.notice = Some(Notice::error(message));
                false
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn is_submitting(&self) -> bool {
        match self.dialog_target() {
            Some(DialogTarget::Create) => self.mutations.creating_id.is_some(),
            Some(DialogTarget::Edit(id)) => {
                self.mutations.updating_id.as_deref() == Some(id.to_string().as_str())
            }
            None => false,
        }
    }

    pub fn is_deleting(&self) -> bool {
        match &self.mode {
            PageMode::ConfirmDelete { id, .. } => {
                self.mutations.deleting_id.as_deref() == Some(id.to_string().as_str())
            }
            _ => false,
        }
    }

    pub fn row_action_state(&self, id: i64) -> RowActionState {
        self.mutations.row_action_state(&id.to_string())
    }

    pub fn row_state(&self, id: i64) -> RowState {
        let key = id.to_string();
        match self.mutations.busy_kind(&key) {
            Some(MutationKind::Delete) => return RowState::Deleting,
            Some(MutationKind::Update) => return RowState::Updating,
            Some(MutationKind::Toggle) => return RowState::Toggling,
            Some(MutationKind::Create) | None => {}
        }
        match &self.mode {
            PageMode::DialogOpen(DialogTarget::Edit(open)) if *open == id => RowState::DialogOpen,
            PageMode::ConfirmDelete { id: open, .. } if *open == id => RowState::ConfirmOpen,
            _ => RowState::Idle,
        }
    }
}
