//! Enrollment Entity
//!
//! Created inactive (`enrolled_at` NULL) at checkout and activated by
//! the payment webhook. Classroom enrollments have no course and no
//! order; batch attachment happens later in both flows.

use chrono::{DateTime, Utc};
use kernel::id::{BatchId, CourseId, EnrollmentId, OrderItemId, UserId};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Enrollment {
    pub enrollment_id: EnrollmentId,
    pub user_id: UserId,
    /// None for classroom enrollments
    pub course_id: Option<CourseId>,
    pub order_item_id: Option<OrderItemId>,
    pub batch_id: Option<BatchId>,
    /// None until payment settles
    pub enrolled_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub progress: Decimal,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    /// Inactive purchase enrollment, created at checkout
    pub fn for_purchase(user_id: UserId, course_id: CourseId, order_item_id: OrderItemId) -> Self {
        let now = Utc::now();
        Self {
            enrollment_id: EnrollmentId::new(),
            user_id,
            course_id: Some(course_id),
            order_item_id: Some(order_item_id),
            batch_id: None,
            enrolled_at: None,
            expires_at: None,
            progress: Decimal::ZERO,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Active course-less enrollment for joining a classroom by code
    pub fn for_classroom(user_id: UserId, batch_id: BatchId) -> Self {
        let now = Utc::now();
        Self {
            enrollment_id: EnrollmentId::new(),
            user_id,
            course_id: None,
            order_item_id: None,
            batch_id: Some(batch_id),
            enrolled_at: Some(now),
            expires_at: None,
            progress: Decimal::ZERO,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        match self.enrolled_at {
            None => false,
            Some(_) => self
                .expires_at
                .map(|expires| expires > Utc::now())
                .unwrap_or(true),
        }
    }

    pub fn activate(&mut self) {
        self.enrolled_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.enrolled_at = None;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_purchase_enrollment_starts_inactive() {
        let enrollment =
            Enrollment::for_purchase(UserId::new(), CourseId::new(), OrderItemId::new());
        assert!(!enrollment.is_active());
        assert!(enrollment.enrolled_at.is_none());
    }

    #[test]
    fn test_activation() {
        let mut enrollment =
            Enrollment::for_purchase(UserId::new(), CourseId::new(), OrderItemId::new());
        enrollment.activate();
        assert!(enrollment.is_active());

        enrollment.deactivate();
        assert!(!enrollment.is_active());
    }

    #[test]
    fn test_classroom_enrollment_is_immediately_active() {
        let enrollment = Enrollment::for_classroom(UserId::new(), BatchId::new());
        assert!(enrollment.is_active());
        assert!(enrollment.course_id.is_none());
    }

    #[test]
    fn test_expired_enrollment_is_inactive() {
        let mut enrollment = Enrollment::for_classroom(UserId::new(), BatchId::new());
        enrollment.expires_at = Some(Utc::now() - Duration::days(1));
        assert!(!enrollment.is_active());
    }
}
