//! Catalog HTTP Handlers
//!
//! Three route groups share these handlers: the public catalog, the
//! instructor course builder, and admin category management. Ownership
//! of courses is enforced here; role gating happens in the auth
//! middleware layers.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use auth::CurrentUser;
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{CategoryId, CourseId, LessonId, SectionId};
use kernel::page::Page;

use crate::domain::{Category, Course, CourseLevel, CourseStatus, CourseType, Lesson, Section};
use crate::infra::postgres::{CourseFilter, CourseSort, PgCatalogStore};
use crate::presentation::dto::{
    CategoryResponse, CourseCardResponse, CourseDetailResponse, CourseListQuery,
    CreateCategoryRequest, CreateCourseRequest, CreateLessonRequest, CreateSectionRequest,
    InstructorCourseResponse, LessonResponse, ReorderRequest, SectionResponse,
    UpdateCategoryRequest, UpdateCourseRequest, UpdateLessonRequest, UpdateSectionRequest,
    build_sections,
};

// ---------------------------------------------------------------------
// Public catalog
// ---------------------------------------------------------------------

/// GET /api/v1/public/courses
pub async fn list_courses(
    State(store): State<PgCatalogStore>,
    Query(query): Query<CourseListQuery>,
) -> AppResult<Json<Page<CourseCardResponse>>> {
    let filter = CourseFilter {
        category_slug: query.category,
        level: query.level.as_deref().map(CourseLevel::parse).transpose()?,
        course_type: query
            .course_type
            .as_deref()
            .map(CourseType::parse)
            .transpose()?,
        instructor_id: query.instructor,
        search: query.search,
        sort: parse_sort(query.sort.as_deref())?,
    };

    let (cards, total) = store.list_published(&filter, &query.page).await?;
    let page = Page::new(cards, &query.page, total).map(CourseCardResponse::from);

    Ok(Json(page))
}

fn parse_sort(s: Option<&str>) -> AppResult<CourseSort> {
    match s {
        None | Some("latest") => Ok(CourseSort::Latest),
        Some("price_low") => Ok(CourseSort::PriceLow),
        Some("price_high") => Ok(CourseSort::PriceHigh),
        Some("popularity") => Ok(CourseSort::Popularity),
        Some(other) => Err(AppError::bad_request(format!("Invalid sort: {}", other))),
    }
}

/// GET /api/v1/public/courses/{slug}
pub async fn show_course(
    State(store): State<PgCatalogStore>,
    Path(slug): Path<String>,
) -> AppResult<Json<CourseDetailResponse>> {
    let (card, sections, lessons) = store
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

    let description = card.course.description.clone();
    let published_lessons: Vec<Lesson> =
        lessons.into_iter().filter(|l| l.is_published).collect();

    Ok(Json(CourseDetailResponse {
        description,
        sections: build_sections(sections, published_lessons, LessonResponse::public),
        card: card.into(),
    }))
}

/// GET /api/v1/public/courses/{id}/related
pub async fn related_courses(
    State(store): State<PgCatalogStore>,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<Vec<CourseCardResponse>>> {
    let cards = store
        .related_courses(CourseId::from_uuid(course_id), 4)
        .await?;

    Ok(Json(cards.into_iter().map(CourseCardResponse::from).collect()))
}

/// GET /api/v1/public/categories
pub async fn list_public_categories(
    State(store): State<PgCatalogStore>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    let categories = store.list_categories(true).await?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

// ---------------------------------------------------------------------
// Instructor course builder
// ---------------------------------------------------------------------

/// Load a course and verify the caller owns it. Admins bypass the check.
async fn owned_course(
    store: &PgCatalogStore,
    current: &CurrentUser,
    course_id: CourseId,
) -> AppResult<Course> {
    let course = store
        .find_course(course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

    if course.instructor_id != current.user_id && !current.is_admin() {
        return Err(AppError::forbidden("You do not own this course"));
    }

    Ok(course)
}

async fn owned_section(
    store: &PgCatalogStore,
    current: &CurrentUser,
    section_id: SectionId,
) -> AppResult<(Course, Section)> {
    let section = store
        .find_section(section_id)
        .await?
        .ok_or_else(|| AppError::not_found("Section not found"))?;

    let course = owned_course(store, current, section.course_id).await?;
    Ok((course, section))
}

/// GET /api/v1/instructor/courses
pub async fn list_my_courses(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<InstructorCourseResponse>>> {
    let courses = store.list_by_instructor(current.user_id).await?;
    Ok(Json(
        courses.into_iter().map(InstructorCourseResponse::from).collect(),
    ))
}

/// POST /api/v1/instructor/courses
pub async fn create_course(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateCourseRequest>,
) -> AppResult<(StatusCode, Json<InstructorCourseResponse>)> {
    let category = store
        .find_category(CategoryId::from_uuid(req.category_id))
        .await?
        .ok_or_else(|| AppError::unprocessable("Unknown category"))?;

    let mut course = Course::new(
        current.user_id,
        category.category_id,
        req.title,
        req.course_type,
        req.level,
        req.price,
    );
    course.subtitle = req.subtitle;
    course.description = req.description;
    course.discount_price = req.discount_price;

    store.create_course(&course).await?;

    Ok((StatusCode::CREATED, Json(course.into())))
}

/// GET /api/v1/instructor/courses/{id}
pub async fn show_my_course(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<InstructorCourseResponse>> {
    let course = owned_course(&store, &current, CourseId::from_uuid(course_id)).await?;
    Ok(Json(course.into()))
}

/// PUT /api/v1/instructor/courses/{id}
pub async fn update_course(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Path(course_id): Path<Uuid>,
    Json(req): Json<UpdateCourseRequest>,
) -> AppResult<Json<InstructorCourseResponse>> {
    let mut course = owned_course(&store, &current, CourseId::from_uuid(course_id)).await?;

    if let Some(category_id) = req.category_id {
        store
            .find_category(CategoryId::from_uuid(category_id))
            .await?
            .ok_or_else(|| AppError::unprocessable("Unknown category"))?;
        course.category_id = CategoryId::from_uuid(category_id);
    }
    if let Some(title) = req.title {
        course.title = title;
    }
    if req.subtitle.is_some() {
        course.subtitle = req.subtitle;
    }
    if req.description.is_some() {
        course.description = req.description;
    }
    if let Some(course_type) = req.course_type {
        course.course_type = course_type;
    }
    if let Some(level) = req.level {
        course.level = level;
    }
    if let Some(price) = req.price {
        course.price = price;
    }
    if req.discount_price.is_some() {
        course.discount_price = req.discount_price;
    }
    course.updated_at = chrono::Utc::now();

    store.update_course(&course).await?;
    Ok(Json(course.into()))
}

/// DELETE /api/v1/instructor/courses/{id}
pub async fn delete_course(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Path(course_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let course = owned_course(&store, &current, CourseId::from_uuid(course_id)).await?;

    if course.total_enrollments > 0 {
        return Err(AppError::conflict(
            "Course has enrollments and cannot be deleted",
        ));
    }

    store.delete_course(course.course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/instructor/courses/{id}/submit-review
///
/// A course needs at least one lesson before review.
pub async fn submit_for_review(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<InstructorCourseResponse>> {
    let mut course = owned_course(&store, &current, CourseId::from_uuid(course_id)).await?;

    if store.count_lessons(course.course_id).await? == 0 {
        return Err(AppError::unprocessable(
            "Add at least one lesson before submitting for review",
        ));
    }

    course.transition_to(CourseStatus::PendingReview)?;
    store.update_course(&course).await?;

    Ok(Json(course.into()))
}

// ---------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------

/// GET /api/v1/instructor/courses/{id}/sections
pub async fn list_sections(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<Vec<SectionResponse>>> {
    let course = owned_course(&store, &current, CourseId::from_uuid(course_id)).await?;

    let sections = store.list_sections(course.course_id).await?;
    let mut out = Vec::with_capacity(sections.len());
    for section in sections {
        let lessons = store.list_lessons(section.section_id).await?;
        out.push(SectionResponse {
            id: section.section_id.into_uuid(),
            title: section.title,
            description: section.description,
            sort_order: section.sort_order,
            lessons: lessons.into_iter().map(LessonResponse::full).collect(),
        });
    }

    Ok(Json(out))
}

/// POST /api/v1/instructor/courses/{id}/sections
pub async fn create_section(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Path(course_id): Path<Uuid>,
    Json(req): Json<CreateSectionRequest>,
) -> AppResult<(StatusCode, Json<SectionResponse>)> {
    let course = owned_course(&store, &current, CourseId::from_uuid(course_id)).await?;

    let sort_order = match req.sort_order {
        Some(order) => order,
        None => store.list_sections(course.course_id).await?.len() as i32,
    };

    let mut section = Section::new(course.course_id, req.title, sort_order);
    section.description = req.description;

    store.create_section(&section).await?;

    Ok((
        StatusCode::CREATED,
        Json(SectionResponse {
            id: section.section_id.into_uuid(),
            title: section.title,
            description: section.description,
            sort_order: section.sort_order,
            lessons: Vec::new(),
        }),
    ))
}

/// PUT /api/v1/instructor/sections/{id}
pub async fn update_section(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Path(section_id): Path<Uuid>,
    Json(req): Json<UpdateSectionRequest>,
) -> AppResult<StatusCode> {
    let (_, mut section) =
        owned_section(&store, &current, SectionId::from_uuid(section_id)).await?;

    if let Some(title) = req.title {
        section.title = title;
    }
    if req.description.is_some() {
        section.description = req.description;
    }
    section.updated_at = chrono::Utc::now();

    store.update_section(&section).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/instructor/sections/{id}
pub async fn delete_section(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Path(section_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let (_, section) = owned_section(&store, &current, SectionId::from_uuid(section_id)).await?;
    store.delete_section(&section).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/instructor/courses/{id}/sections/reorder
pub async fn reorder_sections(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Path(course_id): Path<Uuid>,
    Json(req): Json<ReorderRequest>,
) -> AppResult<StatusCode> {
    let course = owned_course(&store, &current, CourseId::from_uuid(course_id)).await?;

    let order: Vec<(SectionId, i32)> = req
        .items
        .iter()
        .map(|item| (SectionId::from_uuid(item.id), item.sort_order))
        .collect();

    store.reorder_sections(course.course_id, &order).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------
// Lessons
// ---------------------------------------------------------------------

/// POST /api/v1/instructor/sections/{id}/lessons
pub async fn create_lesson(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Path(section_id): Path<Uuid>,
    Json(req): Json<CreateLessonRequest>,
) -> AppResult<(StatusCode, Json<LessonResponse>)> {
    let (course, section) =
        owned_section(&store, &current, SectionId::from_uuid(section_id)).await?;

    let sort_order = match req.sort_order {
        Some(order) => order,
        None => store.list_lessons(section.section_id).await?.len() as i32,
    };

    let mut lesson = Lesson::new(section.section_id, req.title, req.lesson_type, sort_order);
    lesson.video_url = req.video_url;
    lesson.video_duration_secs = req.video_duration_secs;
    lesson.content = req.content;
    lesson.is_free = req.is_free;

    store.create_lesson(course.course_id, &lesson).await?;

    Ok((StatusCode::CREATED, Json(LessonResponse::full(lesson))))
}

/// PUT /api/v1/instructor/lessons/{id}
pub async fn update_lesson(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Path(lesson_id): Path<Uuid>,
    Json(req): Json<UpdateLessonRequest>,
) -> AppResult<Json<LessonResponse>> {
    let mut lesson = store
        .find_lesson(LessonId::from_uuid(lesson_id))
        .await?
        .ok_or_else(|| AppError::not_found("Lesson not found"))?;

    owned_section(&store, &current, lesson.section_id).await?;

    if let Some(title) = req.title {
        lesson.title = title;
    }
    if let Some(lesson_type) = req.lesson_type {
        lesson.lesson_type = lesson_type;
    }
    if req.video_url.is_some() {
        lesson.video_url = req.video_url;
    }
    if req.video_duration_secs.is_some() {
        lesson.video_duration_secs = req.video_duration_secs;
    }
    if req.content.is_some() {
        lesson.content = req.content;
    }
    if let Some(is_free) = req.is_free {
        lesson.is_free = is_free;
    }
    if let Some(is_published) = req.is_published {
        lesson.is_published = is_published;
    }
    lesson.updated_at = chrono::Utc::now();

    store.update_lesson(&lesson).await?;
    Ok(Json(LessonResponse::full(lesson)))
}

/// DELETE /api/v1/instructor/lessons/{id}
pub async fn delete_lesson(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Path(lesson_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let lesson = store
        .find_lesson(LessonId::from_uuid(lesson_id))
        .await?
        .ok_or_else(|| AppError::not_found("Lesson not found"))?;

    let (course, _) = owned_section(&store, &current, lesson.section_id).await?;
    store.delete_lesson(course.course_id, lesson.lesson_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/instructor/sections/{id}/lessons/reorder
pub async fn reorder_lessons(
    State(store): State<PgCatalogStore>,
    Extension(current): Extension<CurrentUser>,
    Path(section_id): Path<Uuid>,
    Json(req): Json<ReorderRequest>,
) -> AppResult<StatusCode> {
    let (_, section) =
        owned_section(&store, &current, SectionId::from_uuid(section_id)).await?;

    let order: Vec<(LessonId, i32)> = req
        .items
        .iter()
        .map(|item| (LessonId::from_uuid(item.id), item.sort_order))
        .collect();

    store.reorder_lessons(section.section_id, &order).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------
// Admin: categories and course review
// ---------------------------------------------------------------------

/// GET /api/v1/admin/categories
pub async fn list_all_categories(
    State(store): State<PgCatalogStore>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    let categories = store.list_categories(false).await?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

/// POST /api/v1/admin/categories
pub async fn create_category(
    State(store): State<PgCatalogStore>,
    Json(req): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
    let category = Category::new(req.name, req.description);
    store.create_category(&category).await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

/// PUT /api/v1/admin/categories/{id}
pub async fn update_category(
    State(store): State<PgCatalogStore>,
    Path(category_id): Path<Uuid>,
    Json(req): Json<UpdateCategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    let mut category = store
        .find_category(CategoryId::from_uuid(category_id))
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    if let Some(name) = req.name {
        category.slug = platform::code::slugify(&name);
        category.name = name;
    }
    if req.description.is_some() {
        category.description = req.description;
    }
    if let Some(is_active) = req.is_active {
        category.is_active = is_active;
    }
    category.updated_at = chrono::Utc::now();

    store.update_category(&category).await?;
    Ok(Json(category.into()))
}

/// DELETE /api/v1/admin/categories/{id}
pub async fn delete_category(
    State(store): State<PgCatalogStore>,
    Path(category_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    store.delete_category(CategoryId::from_uuid(category_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/categories/reorder
pub async fn reorder_categories(
    State(store): State<PgCatalogStore>,
    Json(req): Json<ReorderRequest>,
) -> AppResult<StatusCode> {
    let order: Vec<(CategoryId, i32)> = req
        .items
        .iter()
        .map(|item| (CategoryId::from_uuid(item.id), item.sort_order))
        .collect();

    store.reorder_categories(&order).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, serde::Deserialize)]
pub struct ReviewDecisionRequest {
    pub approve: bool,
}

/// POST /api/v1/admin/courses/{id}/review
pub async fn review_course(
    State(store): State<PgCatalogStore>,
    Path(course_id): Path<Uuid>,
    Json(req): Json<ReviewDecisionRequest>,
) -> AppResult<Json<InstructorCourseResponse>> {
    let mut course = store
        .find_course(CourseId::from_uuid(course_id))
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

    let next = if req.approve {
        CourseStatus::Published
    } else {
        CourseStatus::Rejected
    };
    course.transition_to(next)?;

    store.update_course(&course).await?;
    Ok(Json(course.into()))
}

/// GET /api/v1/admin/courses/pending
pub async fn list_pending_courses(
    State(store): State<PgCatalogStore>,
) -> AppResult<Json<Vec<InstructorCourseResponse>>> {
    let courses = store.list_by_status(CourseStatus::PendingReview).await?;
    Ok(Json(
        courses.into_iter().map(InstructorCourseResponse::from).collect(),
    ))
}
