//! Catalog DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Category, Course, CourseLevel, CourseStatus, CourseType, Lesson, LessonType, Section,
};
use crate::infra::postgres::CourseCard;

// ---------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.category_id.into_uuid(),
            name: category.name,
            slug: category.slug,
            description: category.description,
            sort_order: category.sort_order,
            is_active: category.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCardResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub subtitle: Option<String>,
    pub course_type: CourseType,
    pub level: CourseLevel,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub effective_price: Decimal,
    pub category_name: String,
    pub instructor_name: String,
    pub total_lessons: i32,
    pub total_enrollments: i32,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<CourseCard> for CourseCardResponse {
    fn from(card: CourseCard) -> Self {
        let effective_price = card.course.effective_price();
        Self {
            id: card.course.course_id.into_uuid(),
            title: card.course.title,
            slug: card.course.slug,
            subtitle: card.course.subtitle,
            course_type: card.course.course_type,
            level: card.course.level,
            price: card.course.price,
            discount_price: card.course.discount_price,
            effective_price,
            category_name: card.category_name,
            instructor_name: card.instructor_name,
            total_lessons: card.course.total_lessons,
            total_enrollments: card.course.total_enrollments,
            published_at: card.course.published_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub card: CourseCardResponse,
    pub description: Option<String>,
    pub sections: Vec<SectionResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub lessons: Vec<LessonResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonResponse {
    pub id: Uuid,
    pub title: String,
    pub lesson_type: LessonType,
    pub video_url: Option<String>,
    pub video_duration_secs: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub is_free: bool,
    pub is_published: bool,
    pub sort_order: i32,
}

impl LessonResponse {
    /// Public view. Content is withheld unless the lesson is a free preview.
    pub fn public(lesson: Lesson) -> Self {
        let content = if lesson.is_free { lesson.content } else { None };
        Self {
            id: lesson.lesson_id.into_uuid(),
            title: lesson.title,
            lesson_type: lesson.lesson_type,
            video_url: if lesson.is_free { lesson.video_url } else { None },
            video_duration_secs: lesson.video_duration_secs,
            content,
            is_free: lesson.is_free,
            is_published: lesson.is_published,
            sort_order: lesson.sort_order,
        }
    }

    /// Full view for the owning instructor.
    pub fn full(lesson: Lesson) -> Self {
        Self {
            id: lesson.lesson_id.into_uuid(),
            title: lesson.title,
            lesson_type: lesson.lesson_type,
            video_url: lesson.video_url,
            video_duration_secs: lesson.video_duration_secs,
            content: lesson.content,
            is_free: lesson.is_free,
            is_published: lesson.is_published,
            sort_order: lesson.sort_order,
        }
    }
}

/// Group lessons under their sections, both already sorted.
/// `view` projects each lesson into the appropriate response shape.
pub fn build_sections(
    sections: Vec<Section>,
    lessons: Vec<Lesson>,
    view: impl Fn(Lesson) -> LessonResponse,
) -> Vec<SectionResponse> {
    let mut lessons_by_section: std::collections::HashMap<Uuid, Vec<LessonResponse>> =
        std::collections::HashMap::new();
    for lesson in lessons {
        let key = lesson.section_id.into_uuid();
        lessons_by_section.entry(key).or_default().push(view(lesson));
    }

    sections
        .into_iter()
        .map(|section| {
            let key = section.section_id.into_uuid();
            SectionResponse {
                id: key,
                title: section.title,
                description: section.description,
                sort_order: section.sort_order,
                lessons: lessons_by_section.remove(&key).unwrap_or_default(),
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorCourseResponse {
    pub id: Uuid,
    pub category_id: Uuid,
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
    pub total_lessons: i32,
    pub total_enrollments: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Course> for InstructorCourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.course_id.into_uuid(),
            category_id: course.category_id.into_uuid(),
            title: course.title,
            slug: course.slug,
            subtitle: course.subtitle,
            description: course.description,
            course_type: course.course_type,
            level: course.level,
            price: course.price,
            discount_price: course.discount_price,
            status: course.status,
            published_at: course.published_at,
            total_lessons: course.total_lessons,
            total_enrollments: course.total_enrollments,
            created_at: course.created_at,
        }
    }
}

// ---------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListQuery {
    pub category: Option<String>,
    pub level: Option<String>,
    #[serde(rename = "type")]
    pub course_type: Option<String>,
    pub instructor: Option<Uuid>,
    pub search: Option<String>,
    pub sort: Option<String>,
    #[serde(flatten)]
    pub page: kernel::page::PageParams,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub category_id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub course_type: CourseType,
    pub level: CourseLevel,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub category_id: Option<Uuid>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub course_type: Option<CourseType>,
    pub level: Option<CourseLevel>,
    pub price: Option<Decimal>,
    pub discount_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionRequest {
    pub title: String,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSectionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonRequest {
    pub title: String,
    pub lesson_type: LessonType,
    pub video_url: Option<String>,
    pub video_duration_secs: Option<i32>,
    pub content: Option<String>,
    #[serde(default)]
    pub is_free: bool,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLessonRequest {
    pub title: Option<String>,
    pub lesson_type: Option<LessonType>,
    pub video_url: Option<String>,
    pub video_duration_secs: Option<i32>,
    pub content: Option<String>,
    pub is_free: Option<bool>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub items: Vec<ReorderItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderItem {
    pub id: Uuid,
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
