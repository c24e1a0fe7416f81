//! services/client/src/app/notices.rs
//!
//! User-facing notifications. A notice stays on the board until it is
//! explicitly dismissed; a later successful operation never clears an
//! earlier error.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub id: Uuid,
    pub level: NoticeLevel,
    pub message: String,
}

/// The ordered list of notices currently shown to the user.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_success(&mut self, message: impl Into<String>) -> Uuid {
        self.post(NoticeLevel::Success, message.into())
    }

    pub fn post_error(&mut self, message: impl Into<String>) -> Uuid {
        self.post(NoticeLevel::Error, message.into())
    }

    fn post(&mut self, level: NoticeLevel, message: String) -> Uuid {
        let id = Uuid::new_v4();
        self.notices.push(Notice { id, level, message });
        id
    }

    /// Removes the notice with the given id; the only removal path.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.notices.len();
        self.notices.retain(|notice| notice.id != id);
        self.notices.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }
}
