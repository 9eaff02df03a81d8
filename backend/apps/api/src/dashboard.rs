//! Role Dashboards
//!
//! Read-only aggregates queried straight off the pool; none of the
//! feature crates own these cross-context numbers.

use axum::extract::{Extension, State};
use axum::{Json, Router, routing::get};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use auth::CurrentUser;
use auth::domain::value_object::user_role::UserRole;
use kernel::error::app_error::AppResult;

pub fn admin_router(pool: PgPool) -> Router {
    Router::new()
        .route("/dashboard", get(admin_dashboard))
        .with_state(pool)
}

pub fn instructor_router(pool: PgPool) -> Router {
    Router::new()
        .route("/dashboard", get(instructor_dashboard))
        .with_state(pool)
}

pub fn student_router(pool: PgPool) -> Router {
    Router::new()
        .route("/dashboard", get(student_dashboard))
        .with_state(pool)
}

// ---------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub users_by_role: Vec<CountByLabel>,
    pub courses_by_status: Vec<CountByLabel>,
    pub total_orders: i64,
    pub paid_orders: i64,
    pub total_revenue: Decimal,
    pub total_batches: i64,
    pub active_enrollments: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountByLabel {
    pub label: String,
    pub count: i64,
}

/// GET /api/v1/admin/dashboard
pub async fn admin_dashboard(State(pool): State<PgPool>) -> AppResult<Json<AdminDashboard>> {
    let role_rows = sqlx::query("SELECT role, COUNT(*) AS count FROM users GROUP BY role")
        .fetch_all(&pool)
        .await?;
    let users_by_role = role_rows
        .into_iter()
        .map(|row| {
            let role = UserRole::from_id(row.try_get::<i16, _>("role")?)?;
            Ok(CountByLabel {
                label: role.code().to_string(),
                count: row.try_get("count")?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let status_rows = sqlx::query("SELECT status, COUNT(*) AS count FROM courses GROUP BY status")
        .fetch_all(&pool)
        .await?;
    let courses_by_status = status_rows
        .into_iter()
        .map(|row| {
            Ok(CountByLabel {
                label: row.try_get("status")?,
                count: row.try_get("count")?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let orders = sqlx::query(
        r#"
        SELECT COUNT(*) AS total,
               COUNT(*) FILTER (WHERE status = 'paid') AS paid,
               COALESCE(SUM(total) FILTER (WHERE status = 'paid'), 0) AS revenue
        FROM orders
        "#,
    )
    .fetch_one(&pool)
    .await?;

    let total_batches = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM batches")
        .fetch_one(&pool)
        .await?;

    let active_enrollments = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM enrollments WHERE enrolled_at IS NOT NULL",
    )
    .fetch_one(&pool)
    .await?;

    Ok(Json(AdminDashboard {
        users_by_role,
        courses_by_status,
        total_orders: orders.try_get("total")?,
        paid_orders: orders.try_get("paid")?,
        total_revenue: orders.try_get("revenue")?,
        total_batches,
        active_enrollments,
    }))
}

// ---------------------------------------------------------------------
// Instructor
// ---------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorDashboard {
    pub course_count: i64,
    pub published_course_count: i64,
    pub batch_count: i64,
    pub assignment_count: i64,
    pub total_students: i64,
    pub pending_submissions: Vec<PendingSubmission>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSubmission {
    pub submission_id: Uuid,
    pub assignment_title: String,
    pub student_name: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// GET /api/v1/instructor/dashboard
pub async fn instructor_dashboard(
    State(pool): State<PgPool>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<InstructorDashboard>> {
    let user_id = current.user_id.as_uuid();

    let courses = sqlx::query(
        r#"
        SELECT COUNT(*) AS total,
               COUNT(*) FILTER (WHERE status = 'published') AS published
        FROM courses
        WHERE instructor_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await?;

    let batch_count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(DISTINCT b.batch_id) FROM batches b
        LEFT JOIN batch_instructors bi
               ON bi.batch_id = b.batch_id AND bi.user_id = $1
        WHERE b.owner_id = $1 OR bi.user_id IS NOT NULL
        "#,
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await?;

    let assignment_count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM assignments a
        WHERE a.batch_id IN (
            SELECT b.batch_id FROM batches b
            LEFT JOIN batch_instructors bi
                   ON bi.batch_id = b.batch_id AND bi.user_id = $1
            WHERE b.owner_id = $1 OR bi.user_id IS NOT NULL
        )
        "#,
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await?;

    let total_students = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(DISTINCT e.user_id) FROM enrollments e
        WHERE e.enrolled_at IS NOT NULL
          AND e.batch_id IN (
            SELECT b.batch_id FROM batches b
            LEFT JOIN batch_instructors bi
                   ON bi.batch_id = b.batch_id AND bi.user_id = $1
            WHERE b.owner_id = $1 OR bi.user_id IS NOT NULL
        )
        "#,
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await?;

    let pending_rows = sqlx::query(
        r#"
        SELECT s.submission_id, s.submitted_at, a.title AS assignment_title,
               u.name AS student_name
        FROM submissions s
        JOIN assignments a ON a.assignment_id = s.assignment_id
        JOIN users u ON u.user_id = s.user_id
        JOIN batches b ON b.batch_id = a.batch_id
        LEFT JOIN batch_instructors bi
               ON bi.batch_id = b.batch_id AND bi.user_id = $1
        WHERE s.status IN ('submitted', 'late')
          AND a.is_gradable
          AND (b.owner_id = $1 OR bi.user_id IS NOT NULL)
        ORDER BY s.submitted_at DESC NULLS LAST
        LIMIT 10
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    let pending_submissions = pending_rows
        .into_iter()
        .map(|row| {
            Ok(PendingSubmission {
                submission_id: row.try_get("submission_id")?,
                assignment_title: row.try_get("assignment_title")?,
                student_name: row.try_get("student_name")?,
                submitted_at: row.try_get("submitted_at")?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(InstructorDashboard {
        course_count: courses.try_get("total")?,
        published_course_count: courses.try_get("published")?,
        batch_count,
        assignment_count,
        total_students,
        pending_submissions,
    }))
}

// ---------------------------------------------------------------------
// Student
// ---------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub enrollments: Vec<EnrollmentProgress>,
    pub upcoming_deadlines: Vec<UpcomingDeadline>,
    pub recent_grades: Vec<RecentGrade>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentProgress {
    pub course_id: Option<Uuid>,
    pub course_title: Option<String>,
    pub batch_id: Option<Uuid>,
    pub batch_name: Option<String>,
    pub progress: Decimal,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDeadline {
    pub assignment_id: Uuid,
    pub title: String,
    pub batch_name: String,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentGrade {
    pub batch_name: String,
    pub score: Option<Decimal>,
    pub letter: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// GET /api/v1/student/dashboard
pub async fn student_dashboard(
    State(pool): State<PgPool>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<StudentDashboard>> {
    let user_id = current.user_id.as_uuid();

    let enrollment_rows = sqlx::query(
        r#"
        SELECT e.course_id, c.title AS course_title, e.batch_id,
               b.name AS batch_name, e.progress, e.completed_at
        FROM enrollments e
        LEFT JOIN courses c ON c.course_id = e.course_id
        LEFT JOIN batches b ON b.batch_id = e.batch_id
        WHERE e.user_id = $1 AND e.enrolled_at IS NOT NULL
          AND (e.expires_at IS NULL OR e.expires_at > NOW())
        ORDER BY e.enrolled_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    let enrollments = enrollment_rows
        .into_iter()
        .map(|row| {
            Ok(EnrollmentProgress {
                course_id: row.try_get("course_id")?,
                course_title: row.try_get("course_title")?,
                batch_id: row.try_get("batch_id")?,
                batch_name: row.try_get("batch_name")?,
                progress: row.try_get("progress")?,
                completed_at: row.try_get("completed_at")?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let deadline_rows = sqlx::query(
        r#"
        SELECT a.assignment_id, a.title, a.due_date, b.name AS batch_name
        FROM assignments a
        JOIN batches b ON b.batch_id = a.batch_id
        JOIN enrollments e ON e.batch_id = a.batch_id
             AND e.user_id = $1 AND e.enrolled_at IS NOT NULL
        LEFT JOIN submissions s
               ON s.assignment_id = a.assignment_id AND s.user_id = $1
        WHERE a.is_published
          AND a.due_date > NOW()
          AND (s.submission_id IS NULL OR s.status = 'draft')
        ORDER BY a.due_date
        LIMIT 5
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    let upcoming_deadlines = deadline_rows
        .into_iter()
        .map(|row| {
            Ok(UpcomingDeadline {
                assignment_id: row.try_get("assignment_id")?,
                title: row.try_get("title")?,
                batch_name: row.try_get("batch_name")?,
                due_date: row.try_get("due_date")?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let grade_rows = sqlx::query(
        r#"
        SELECT b.name AS batch_name, g.score, g.letter, g.updated_at
        FROM grades g
        JOIN batches b ON b.batch_id = g.batch_id
        WHERE g.user_id = $1
        ORDER BY g.updated_at DESC
        LIMIT 5
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    let recent_grades = grade_rows
        .into_iter()
        .map(|row| {
            Ok(RecentGrade {
                batch_name: row.try_get("batch_name")?,
                score: row.try_get("score")?,
                letter: row.try_get("letter")?,
                updated_at: row.try_get("updated_at")?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(StudentDashboard {
        enrollments,
        upcoming_deadlines,
        recent_grades,
    }))
}
