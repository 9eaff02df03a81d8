//! Discussion Entity
//!
//! Threads and replies share the table; a reply has a parent and
//! inherits the parent's batch and lesson.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{BatchId, DiscussionId, LessonId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionType {
    Question,
    #[default]
    Discussion,
    Announcement,
}

impl DiscussionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DiscussionType::Question => "question",
            DiscussionType::Discussion => "discussion",
            DiscussionType::Announcement => "announcement",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "question" => Ok(DiscussionType::Question),
            "discussion" => Ok(DiscussionType::Discussion),
            "announcement" => Ok(DiscussionType::Announcement),
            _ => Err(AppError::bad_request(format!(
                "Invalid discussion type: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Discussion {
    pub discussion_id: DiscussionId,
    pub batch_id: Option<BatchId>,
    pub lesson_id: Option<LessonId>,
    pub user_id: UserId,
    pub parent_id: Option<DiscussionId>,
    pub title: Option<String>,
    pub content: String,
    pub discussion_type: DiscussionType,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub is_approved: bool,
    pub replies_count: i32,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Discussion {
    pub fn new_thread(
        user_id: UserId,
        title: String,
        content: String,
        discussion_type: DiscussionType,
    ) -> Self {
        let now = Utc::now();
        Self {
            discussion_id: DiscussionId::new(),
            batch_id: None,
            lesson_id: None,
            user_id,
            parent_id: None,
            title: Some(title),
            content,
            discussion_type,
            is_pinned: false,
            is_locked: false,
            is_approved: true,
            replies_count: 0,
            views_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// A reply inherits the parent's batch and lesson placement
    pub fn new_reply(user_id: UserId, parent: &Discussion, content: String) -> Self {
        let now = Utc::now();
        Self {
            discussion_id: DiscussionId::new(),
            batch_id: parent.batch_id,
            lesson_id: parent.lesson_id,
            user_id,
            parent_id: Some(parent.discussion_id),
            title: None,
            content,
            discussion_type: parent.discussion_type,
            is_pinned: false,
            is_locked: false,
            is_approved: true,
            replies_count: 0,
            views_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_inherits_placement() {
        let mut thread = Discussion::new_thread(
            UserId::new(),
            "Stuck on lesson 3".into(),
            "How does borrowing work here?".into(),
            DiscussionType::Question,
        );
        thread.batch_id = Some(BatchId::new());
        thread.lesson_id = Some(LessonId::new());

        let reply = Discussion::new_reply(UserId::new(), &thread, "Check the docs".into());
        assert_eq!(reply.batch_id, thread.batch_id);
        assert_eq!(reply.lesson_id, thread.lesson_id);
        assert_eq!(reply.parent_id, Some(thread.discussion_id));
        assert!(reply.is_reply());
        assert!(reply.title.is_none());
    }
}
