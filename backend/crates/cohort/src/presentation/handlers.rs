//! Cohort HTTP Handlers

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use auth::CurrentUser;
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{BatchId, CourseId, UserId};

use crate::domain::{Batch, BatchCourse, BatchInstructor, BatchStatus, BatchType, InstructorRole};
use crate::infra::postgres::{BatchFilter, EnrollResult, PgCohortStore};
use crate::presentation::dto::{
    AssignInstructorRequest, AttachCourseRequest, BatchListQuery, BatchResponse,
    BatchStatsResponse, ClassworkTopicResponse, CourseBatchesQuery, CourseBatchesResponse,
    CreateBatchRequest, CreateClassRequest, CreateStreamPostRequest, EnrollResponse,
    JoinClassRequest, PeopleResponse, PersonResponse, StreamPostResponse, UpdateBatchRequest,
};

async fn batch_or_404(store: &PgCohortStore, batch_id: Uuid) -> AppResult<Batch> {
    store
        .find_batch(BatchId::from_uuid(batch_id))
        .await?
        .ok_or_else(|| AppError::not_found("Batch not found"))
}

/// Instructor pivot, classroom ownership, or admin role
async fn require_batch_instructor(
    store: &PgCohortStore,
    current: &CurrentUser,
    batch: &Batch,
) -> AppResult<()> {
    if current.is_admin() {
        return Ok(());
    }
    if store
        .is_batch_instructor(batch.batch_id, current.user_id)
        .await?
    {
        return Ok(());
    }
    Err(AppError::forbidden("You do not manage this batch"))
}

// ---------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------

/// POST /api/v1/admin/batches
pub async fn create_batch(
    State(store): State<PgCohortStore>,
    Json(req): Json<CreateBatchRequest>,
) -> AppResult<(StatusCode, Json<BatchResponse>)> {
    let mut batch = Batch::new_structured(req.name);
    batch.description = req.description;
    batch.start_date = req.start_date;
    batch.end_date = req.end_date;
    batch.enrollment_start = req.enrollment_start;
    batch.enrollment_end = req.enrollment_end;
    batch.max_students = req.max_students;

    store.create_batch(&mut batch).await?;

    for (i, course_id) in req.course_ids.iter().enumerate() {
        store
            .attach_course(&BatchCourse::new(
                batch.batch_id,
                CourseId::from_uuid(*course_id),
                i as i32,
                true,
            ))
            .await?;
    }

    Ok((StatusCode::CREATED, Json(BatchResponse::for_instructor(batch))))
}

/// GET /api/v1/admin/batches
pub async fn list_batches(
    State(store): State<PgCohortStore>,
    Query(query): Query<BatchListQuery>,
) -> AppResult<Json<Vec<BatchResponse>>> {
    let filter = BatchFilter {
        batch_type: query.batch_type.as_deref().map(BatchType::parse).transpose()?,
        status: query.status.as_deref().map(BatchStatus::parse).transpose()?,
        search: query.search,
    };

    let batches = store.list_batches(&filter).await?;
    Ok(Json(
        batches.into_iter().map(BatchResponse::for_instructor).collect(),
    ))
}

/// POST /api/v1/admin/batches/{id}/courses
pub async fn attach_course(
    State(store): State<PgCohortStore>,
    Path(batch_id): Path<Uuid>,
    Json(req): Json<AttachCourseRequest>,
) -> AppResult<StatusCode> {
    let batch = batch_or_404(&store, batch_id).await?;

    store
        .attach_course(&BatchCourse::new(
            batch.batch_id,
            CourseId::from_uuid(req.course_id),
            req.sort_order,
            req.is_required,
        ))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/batches/{id}/courses/{course_id}
pub async fn detach_course(
    State(store): State<PgCohortStore>,
    Path((batch_id, course_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    let batch = batch_or_404(&store, batch_id).await?;
    store
        .detach_course(batch.batch_id, CourseId::from_uuid(course_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/batches/{id}/instructors
pub async fn list_batch_instructors(
    State(store): State<PgCohortStore>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<Vec<PersonResponse>>> {
    let batch = batch_or_404(&store, batch_id).await?;
    let instructors = store.list_instructors(batch.batch_id).await?;
    Ok(Json(instructors.into_iter().map(PersonResponse::from).collect()))
}

/// POST /api/v1/admin/batches/{id}/instructors
pub async fn assign_instructor(
    State(store): State<PgCohortStore>,
    Path(batch_id): Path<Uuid>,
    Json(req): Json<AssignInstructorRequest>,
) -> AppResult<StatusCode> {
    let batch = batch_or_404(&store, batch_id).await?;

    store
        .assign_instructor(&BatchInstructor::new(
            batch.batch_id,
            UserId::from_uuid(req.user_id),
            req.role,
        ))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/batches/{id}/instructors/{user_id}
pub async fn remove_instructor(
    State(store): State<PgCohortStore>,
    Path((batch_id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    let batch = batch_or_404(&store, batch_id).await?;
    store
        .remove_instructor(batch.batch_id, UserId::from_uuid(user_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------
// Instructor
// ---------------------------------------------------------------------

/// GET /api/v1/instructor/batches
pub async fn list_my_batches(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<BatchResponse>>> {
    let batches = store.list_batches_for_instructor(current.user_id).await?;
    Ok(Json(
        batches.into_iter().map(BatchResponse::for_instructor).collect(),
    ))
}

/// GET /api/v1/instructor/batches/{id}
pub async fn show_my_batch(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<BatchResponse>> {
    let batch = batch_or_404(&store, batch_id).await?;
    require_batch_instructor(&store, &current, &batch).await?;
    Ok(Json(BatchResponse::for_instructor(batch)))
}

/// GET /api/v1/instructor/batches/{id}/stats
pub async fn batch_stats(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<BatchStatsResponse>> {
    let batch = batch_or_404(&store, batch_id).await?;
    require_batch_instructor(&store, &current, &batch).await?;

    let stats = store.batch_stats(&batch).await?;
    Ok(Json(stats.into()))
}

/// PUT /api/v1/instructor/batches/{id}
pub async fn update_batch(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
    Path(batch_id): Path<Uuid>,
    Json(req): Json<UpdateBatchRequest>,
) -> AppResult<Json<BatchResponse>> {
    let mut batch = batch_or_404(&store, batch_id).await?;
    require_batch_instructor(&store, &current, &batch).await?;

    if let Some(name) = req.name {
        batch.name = name;
    }
    if req.description.is_some() {
        batch.description = req.description;
    }
    if req.start_date.is_some() {
        batch.start_date = req.start_date;
    }
    if req.end_date.is_some() {
        batch.end_date = req.end_date;
    }
    if req.enrollment_start.is_some() {
        batch.enrollment_start = req.enrollment_start;
    }
    if req.enrollment_end.is_some() {
        batch.enrollment_end = req.enrollment_end;
    }
    if req.max_students.is_some() {
        batch.max_students = req.max_students;
    }
    if let Some(status) = req.status {
        batch.status = status;
    }
    if let Some(is_public) = req.is_public {
        batch.is_public = is_public;
    }
    batch.updated_at = chrono::Utc::now();

    store.update_batch(&batch).await?;
    Ok(Json(BatchResponse::for_instructor(batch)))
}

/// DELETE /api/v1/instructor/batches/{id}
pub async fn delete_batch(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let batch = batch_or_404(&store, batch_id).await?;
    require_batch_instructor(&store, &current, &batch).await?;

    store.delete_batch(batch.batch_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------
// Student: structured batches
// ---------------------------------------------------------------------

/// GET /api/v1/student/courses/{course_id}/batches
pub async fn course_batches(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
    Path(course_id): Path<Uuid>,
    Query(query): Query<CourseBatchesQuery>,
) -> AppResult<Json<CourseBatchesResponse>> {
    let course_id = CourseId::from_uuid(course_id);

    let batches = store
        .batches_for_course(course_id, query.include_all)
        .await?;
    let current_batch = store
        .current_batch_for_course(current.user_id, course_id)
        .await?;

    Ok(Json(CourseBatchesResponse {
        batches: batches.into_iter().map(BatchResponse::public).collect(),
        current_batch_id: current_batch.map(|id| id.into_uuid()),
    }))
}

/// GET /api/v1/student/batches/{id}
pub async fn show_batch(
    State(store): State<PgCohortStore>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<BatchResponse>> {
    let batch = batch_or_404(&store, batch_id).await?;
    if batch.status == BatchStatus::Draft {
        return Err(AppError::not_found("Batch not found"));
    }
    Ok(Json(BatchResponse::public(batch)))
}

/// POST /api/v1/student/batches/{id}/enroll
pub async fn enroll_in_batch(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<EnrollResponse>> {
    let result = store
        .enroll_in_batch(current.user_id, BatchId::from_uuid(batch_id))
        .await?;

    Ok(Json(EnrollResponse {
        batch_id,
        already_enrolled: result == EnrollResult::AlreadyInThisBatch,
    }))
}

// ---------------------------------------------------------------------
// Classrooms
// ---------------------------------------------------------------------

/// GET /api/v1/classes
pub async fn list_classes(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<BatchResponse>>> {
    if current.is_instructor_or_higher() {
        let classes = store.list_classrooms_for_instructor(current.user_id).await?;
        return Ok(Json(
            classes.into_iter().map(BatchResponse::for_instructor).collect(),
        ));
    }

    let classes = store.list_classrooms_for_student(current.user_id).await?;
    Ok(Json(classes.into_iter().map(BatchResponse::public).collect()))
}

/// POST /api/v1/classes
pub async fn create_class(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateClassRequest>,
) -> AppResult<(StatusCode, Json<BatchResponse>)> {
    if !current.is_instructor_or_higher() {
        return Err(AppError::forbidden("Only instructors can create classes"));
    }

    let mut class = Batch::new_classroom(current.user_id, req.name);
    class.description = req.description;

    store.create_batch(&mut class).await?;
    Ok((StatusCode::CREATED, Json(BatchResponse::for_instructor(class))))
}

/// POST /api/v1/classes/join
pub async fn join_class(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<JoinClassRequest>,
) -> AppResult<Json<BatchResponse>> {
    let batch = store.join_classroom(current.user_id, &req.code).await?;
    Ok(Json(BatchResponse::public(batch)))
}

/// GET /api/v1/classes/{id}
pub async fn show_class(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<BatchResponse>> {
    let batch = batch_or_404(&store, batch_id).await?;

    if !store.can_view_batch(batch.batch_id, current.user_id).await? {
        return Err(AppError::forbidden("You are not a member of this class"));
    }

    if store
        .is_batch_instructor(batch.batch_id, current.user_id)
        .await?
    {
        Ok(Json(BatchResponse::for_instructor(batch)))
    } else {
        Ok(Json(BatchResponse::public(batch)))
    }
}

/// GET /api/v1/classes/{id}/people
pub async fn class_people(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<PeopleResponse>> {
    let batch = batch_or_404(&store, batch_id).await?;

    if !store.can_view_batch(batch.batch_id, current.user_id).await? {
        return Err(AppError::forbidden("You are not a member of this class"));
    }

    let mut instructors: Vec<PersonResponse> = store
        .list_instructors(batch.batch_id)
        .await?
        .into_iter()
        .map(PersonResponse::from)
        .collect();

    // The classroom owner may not be in the pivot
    if let Some(owner_id) = batch.owner_id {
        if !instructors.iter().any(|i| i.id == *owner_id.as_uuid()) {
            if let Some(name) = store.user_name(owner_id).await? {
                instructors.insert(
                    0,
                    PersonResponse {
                        id: owner_id.into_uuid(),
                        name,
                        role: Some(InstructorRole::Primary),
                    },
                );
            }
        }
    }

    let students = store
        .roster(batch.batch_id)
        .await?
        .into_iter()
        .map(PersonResponse::from)
        .collect();

    Ok(Json(PeopleResponse {
        instructors,
        students,
    }))
}

/// GET /api/v1/classes/{id}/stream
pub async fn class_stream(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<Vec<StreamPostResponse>>> {
    let batch = batch_or_404(&store, batch_id).await?;

    if !store.can_view_batch(batch.batch_id, current.user_id).await? {
        return Err(AppError::forbidden("You are not a member of this class"));
    }

    let posts = store.list_stream(batch.batch_id).await?;
    Ok(Json(posts.into_iter().map(StreamPostResponse::from).collect()))
}

/// POST /api/v1/classes/{id}/stream
pub async fn post_to_stream(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
    Path(batch_id): Path<Uuid>,
    Json(req): Json<CreateStreamPostRequest>,
) -> AppResult<(StatusCode, Json<StreamPostResponse>)> {
    let batch = batch_or_404(&store, batch_id).await?;

    if !store.can_view_batch(batch.batch_id, current.user_id).await? {
        return Err(AppError::forbidden("You are not a member of this class"));
    }

    let post = store
        .create_stream_post(batch.batch_id, current.user_id, req.title, req.content)
        .await?;

    Ok((StatusCode::CREATED, Json(post.into())))
}

/// GET /api/v1/classes/{id}/classwork
pub async fn class_classwork(
    State(store): State<PgCohortStore>,
    Extension(current): Extension<CurrentUser>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<Vec<ClassworkTopicResponse>>> {
    let batch = batch_or_404(&store, batch_id).await?;

    if !store.can_view_batch(batch.batch_id, current.user_id).await? {
        return Err(AppError::forbidden("You are not a member of this class"));
    }

    let topics = store.classwork(batch.batch_id).await?;
    Ok(Json(topics.into_iter().map(ClassworkTopicResponse::from).collect()))
}
