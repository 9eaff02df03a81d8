//! Course Entity
//!
//! Courses move through a review workflow before they appear in the
//! public catalog:
//!
//! ```text
//! draft -> pending_review -> published -> archived
//!                         -> rejected  -> (back to pending_review)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{CategoryId, CourseId, UserId};
use rust_decimal::Decimal;

/// Course delivery type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    #[default]
    SelfPaced,
    Structured,
}

impl CourseType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CourseType::SelfPaced => "self_paced",
            CourseType::Structured => "structured",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "self_paced" => Ok(CourseType::SelfPaced),
            "structured" => Ok(CourseType::Structured),
            _ => Err(AppError::bad_request(format!("Invalid course type: {}", s))),
        }
    }
}

/// Course difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
    #[default]
    AllLevels,
}

impl CourseLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "beginner",
            CourseLevel::Intermediate => "intermediate",
            CourseLevel::Advanced => "advanced",
            CourseLevel::AllLevels => "all_levels",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "beginner" => Ok(CourseLevel::Beginner),
            "intermediate" => Ok(CourseLevel::Intermediate),
            "advanced" => Ok(CourseLevel::Advanced),
            "all_levels" => Ok(CourseLevel::AllLevels),
            _ => Err(AppError::bad_request(format!(
                "Invalid course level: {}",
                s
            ))),
        }
    }
}

/// Course review workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    #[default]
    Draft,
    PendingReview,
    Published,
    Rejected,
    Archived,
}

impl CourseStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "draft",
            CourseStatus::PendingReview => "pending_review",
            CourseStatus::Published => "published",
            CourseStatus::Rejected => "rejected",
            CourseStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "draft" => Ok(CourseStatus::Draft),
            "pending_review" => Ok(CourseStatus::PendingReview),
            "published" => Ok(CourseStatus::Published),
            "rejected" => Ok(CourseStatus::Rejected),
            "archived" => Ok(CourseStatus::Archived),
            _ => Err(AppError::bad_request(format!(
                "Invalid course status: {}",
                s
            ))),
        }
    }

    /// Check if a transition to `next` is allowed
    pub fn can_transition_to(&self, next: CourseStatus) -> bool {
        use CourseStatus::*;
        matches!(
            (self, next),
            (Draft, PendingReview)
                | (Rejected, PendingReview)
                | (PendingReview, Published)
                | (PendingReview, Rejected)
                | (Published, Archived)
        )
    }
}

/// Course entity
#[derive(Debug, Clone)]
pub struct Course {
    pub course_id: CourseId,
    pub instructor_id: UserId,
    pub category_id: CategoryId,
    pub title: String,
    pub slug: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub course_type: CourseType,
    pub level: CourseLevel,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub status: CourseStatus,
    pub published_at: Option<DateTime<Utc>>,
    /// Cached counters, maintained by the store
    pub total_lessons: i32,
    pub total_enrollments: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn new(
        instructor_id: UserId,
        category_id: CategoryId,
        title: String,
        course_type: CourseType,
        level: CourseLevel,
        price: Decimal,
    ) -> Self {
        let now = Utc::now();
        let slug = platform::code::slugify_unique(&title);

        Self {
            course_id: CourseId::new(),
            instructor_id,
            category_id,
            title,
            slug,
            subtitle: None,
            description: None,
            course_type,
            level,
            price,
            discount_price: None,
            status: CourseStatus::default(),
            published_at: None,
            total_lessons: 0,
            total_enrollments: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Price a buyer currently pays
    ///
    /// The discount only applies while it undercuts the list price.
    pub fn effective_price(&self) -> Decimal {
        match self.discount_price {
            Some(discount) if discount < self.price => discount,
            _ => self.price,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == CourseStatus::Published
    }

    /// Apply a status transition, validating the workflow
    pub fn transition_to(&mut self, next: CourseStatus) -> AppResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::unprocessable(format!(
                "Cannot move course from {} to {}",
                self.status.as_str(),
                next.as_str()
            )));
        }

        self.status = next;
        if next == CourseStatus::Published {
            self.published_at = Some(Utc::now());
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_course() -> Course {
        Course::new(
            UserId::new(),
            CategoryId::new(),
            "Rust for Beginners".to_string(),
            CourseType::SelfPaced,
            CourseLevel::Beginner,
            dec!(49.99),
        )
    }

    #[test]
    fn test_new_course_defaults() {
        let course = sample_course();
        assert_eq!(course.status, CourseStatus::Draft);
        assert!(course.slug.starts_with("rust-for-beginners-"));
        assert!(course.published_at.is_none());
    }

    #[test]
    fn test_effective_price() {
        let mut course = sample_course();
        assert_eq!(course.effective_price(), dec!(49.99));

        course.discount_price = Some(dec!(29.99));
        assert_eq!(course.effective_price(), dec!(29.99));

        // A "discount" above the list price is ignored
        course.discount_price = Some(dec!(59.99));
        assert_eq!(course.effective_price(), dec!(49.99));
    }

    #[test]
    fn test_review_workflow() {
        let mut course = sample_course();

        course.transition_to(CourseStatus::PendingReview).unwrap();
        course.transition_to(CourseStatus::Published).unwrap();
        assert!(course.published_at.is_some());
        course.transition_to(CourseStatus::Archived).unwrap();
    }

    #[test]
    fn test_rejected_can_resubmit() {
        let mut course = sample_course();
        course.transition_to(CourseStatus::PendingReview).unwrap();
        course.transition_to(CourseStatus::Rejected).unwrap();
        course.transition_to(CourseStatus::PendingReview).unwrap();
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let mut course = sample_course();
        assert!(course.transition_to(CourseStatus::Published).is_err());
        assert!(course.transition_to(CourseStatus::Archived).is_err());

        course.transition_to(CourseStatus::PendingReview).unwrap();
        assert!(course.transition_to(CourseStatus::Draft).is_err());
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            CourseStatus::Draft,
            CourseStatus::PendingReview,
            CourseStatus::Published,
            CourseStatus::Rejected,
            CourseStatus::Archived,
        ] {
            assert_eq!(CourseStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(CourseStatus::parse("deleted").is_err());
    }
}
