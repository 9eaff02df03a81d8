//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities.

use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type CourseId = Id<markers::Course>;
/// ```
pub struct Id<T> {
    value: Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random ID (UUID v4)
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4(),
            _marker: PhantomData,
        }
    }

    /// Create from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid,
            _marker: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }

    /// Convert to UUID
    pub fn into_uuid(self) -> Uuid {
        self.value
    }
}

// Manual impls so markers never need to implement the traits themselves.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<Uuid> for Id<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<T> From<Id<T>> for Uuid {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

/// Marker types for entity IDs
pub mod markers {
    pub struct User;
    pub struct Session;
    pub struct Category;
    pub struct Course;
    pub struct Section;
    pub struct Lesson;
    pub struct Cart;
    pub struct CartItem;
    pub struct Order;
    pub struct OrderItem;
    pub struct Payment;
    pub struct Enrollment;
    pub struct Batch;
    pub struct Assignment;
    pub struct Submission;
    pub struct Grade;
    pub struct Discussion;
}

/// Type aliases for common IDs
pub type UserId = Id<markers::User>;
pub type SessionId = Id<markers::Session>;
pub type CategoryId = Id<markers::Category>;
pub type CourseId = Id<markers::Course>;
pub type SectionId = Id<markers::Section>;
pub type LessonId = Id<markers::Lesson>;
pub type CartId = Id<markers::Cart>;
pub type CartItemId = Id<markers::CartItem>;
pub type OrderId = Id<markers::Order>;
pub type OrderItemId = Id<markers::OrderItem>;
pub type PaymentId = Id<markers::Payment>;
pub type EnrollmentId = Id<markers::Enrollment>;
pub type BatchId = Id<markers::Batch>;
pub type AssignmentId = Id<markers::Assignment>;
pub type SubmissionId = Id<markers::Submission>;
pub type GradeId = Id<markers::Grade>;
pub type DiscussionId = Id<markers::Discussion>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_type_safety() {
        let course_id: CourseId = Id::new();
        let batch_id: BatchId = Id::new();

        // Different marker types, cannot be mixed
        let _c: Uuid = course_id.into_uuid();
        let _b: Uuid = batch_id.into_uuid();
    }

    #[test]
    fn test_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id: CourseId = Id::from_uuid(uuid);
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn test_id_display_roundtrip() {
        let id: UserId = Id::new();
        let parsed: Uuid = id.to_string().parse().unwrap();
        assert_eq!(UserId::from_uuid(parsed), id);
    }
}
