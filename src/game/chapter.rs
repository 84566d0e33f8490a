//! Journal chapters.

use serde::{Deserialize, Serialize};

/// Persisted chapter flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterData {
    /// Chapter may be opened.
    pub unlocked: bool,
    /// Chapter has been opened at least once.
    pub read: bool,
}

/// One unit of narrative gating a location/puzzle pair.
#[derive(Clone, Debug)]
pub struct Chapter {
    /// Position in the quest.
    pub index: usize,
    /// Heading shown in the journal index.
    pub title: String,
    data: ChapterData,
}

impl Chapter {
    /// Create a locked, unread chapter.
    pub fn new(index: usize, title: impl Into<String>) -> Self {
        Self { index, title: title.into(), data: ChapterData::default() }
    }

    pub fn is_unlocked(&self) -> bool {
        self.data.unlocked
    }

    pub fn is_read(&self) -> bool {
        self.data.read
    }

    /// Returns true if the chapter was locked before.
    pub fn unlock(&mut self) -> bool {
        !std::mem::replace(&mut self.data.unlocked, true)
    }

    /// Returns true on the first read.
    pub fn mark_read(&mut self) -> bool {
        !std::mem::replace(&mut self.data.read, true)
    }

    pub fn reset(&mut self) {
        self.data = ChapterData::default();
    }

    /// Snapshot for persistence.
    pub fn data(&self) -> ChapterData {
        self.data
    }

    /// Restore from a snapshot.
    pub fn apply(&mut self, data: ChapterData) {
        self.data = data;
    }
}
