//! PostgreSQL Cohort Store
//!
//! Seat-limited enrollment and classroom joins lock the batch row
//! (`SELECT ... FOR UPDATE`) before re-checking capacity, so the
//! `current_students` counter can never pass `max_students` under
//! concurrent requests.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{BatchId, CourseId, UserId};
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use commerce::domain::Enrollment;

use crate::domain::{Batch, BatchCourse, BatchInstructor, BatchStatus, BatchType, InstructorRole};

const CLASS_CODE_RETRIES: usize = 3;

fn is_class_code_collision(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            unique_violation(db_err.code().as_deref(), db_err.constraint())
        }
        _ => false,
    }
}

fn unique_violation(code: Option<&str>, constraint: Option<&str>) -> bool {
    code == Some("23505") && constraint == Some("batches_class_code_key")
}

/// Filters for the admin batch list
#[derive(Debug, Clone, Default)]
pub struct BatchFilter {
    pub batch_type: Option<BatchType>,
    pub status: Option<BatchStatus>,
    pub search: Option<String>,
}

/// Enrollment statistics for an instructor's batch view
#[derive(Debug, Clone)]
pub struct BatchStats {
    pub enrolled: i64,
    pub max_students: Option<i32>,
    pub capacity_pct: Option<f64>,
    pub assignments: i64,
    pub published_assignments: i64,
}

/// Result of a structured batch enrollment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollResult {
    Enrolled,
    /// The student was already in this batch; not an error
    AlreadyInThisBatch,
}

#[derive(Debug, Clone)]
pub struct PersonSummary {
    pub user_id: UserId,
    pub name: String,
    pub role: Option<InstructorRole>,
}

#[derive(Debug, Clone)]
pub struct StreamPost {
    pub discussion_id: Uuid,
    pub author_name: String,
    pub title: Option<String>,
    pub content: String,
    pub is_pinned: bool,
    pub replies_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct PgCohortStore {
    pool: PgPool,
}

impl PgCohortStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ------------------------------------------------------------------
    // Batches
    // ------------------------------------------------------------------

    /// Insert the batch, regenerating the class code on a unique
    /// collision (bounded retries; other errors pass through).
    pub async fn create_batch(&self, batch: &mut Batch) -> AppResult<()> {
        let mut attempts = 0;
        loop {
            match self.insert_batch(batch).await {
                Ok(()) => return Ok(()),
                Err(e) if attempts < CLASS_CODE_RETRIES && is_class_code_collision(&e) => {
                    attempts += 1;
                    batch.class_code = platform::code::generate_class_code();
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn insert_batch(&self, batch: &Batch) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO batches (
                batch_id, batch_type, name, slug, description, class_code,
                start_date, end_date, enrollment_start, enrollment_end,
                max_students, current_students, status, is_public, owner_id,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                      $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(batch.batch_id.as_uuid())
        .bind(batch.batch_type.as_str())
        .bind(&batch.name)
        .bind(&batch.slug)
        .bind(&batch.description)
        .bind(&batch.class_code)
        .bind(batch.start_date)
        .bind(batch.end_date)
        .bind(batch.enrollment_start)
        .bind(batch.enrollment_end)
        .bind(batch.max_students)
        .bind(batch.current_students)
        .bind(batch.status.as_str())
        .bind(batch.is_public)
        .bind(batch.owner_id.map(|id| id.into_uuid()))
        .bind(batch.created_at)
        .bind(batch.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_batch(&self, batch_id: BatchId) -> AppResult<Option<Batch>> {
        let row = sqlx::query_as::<_, BatchRow>("SELECT * FROM batches WHERE batch_id = $1")
            .bind(batch_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(BatchRow::into_batch).transpose()
    }

    pub async fn list_batches(&self, filter: &BatchFilter) -> AppResult<Vec<Batch>> {
        let mut qb = QueryBuilder::new("SELECT * FROM batches WHERE TRUE");

        if let Some(batch_type) = filter.batch_type {
            qb.push(" AND batch_type = ");
            qb.push_bind(batch_type.as_str());
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status.as_str());
        }
        if let Some(search) = &filter.search {
            qb.push(" AND name ILIKE ");
            qb.push_bind(format!("%{}%", search));
        }
        qb.push(" ORDER BY created_at DESC");

        let rows = qb.build_query_as::<BatchRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(BatchRow::into_batch).collect()
    }

    pub async fn update_batch(&self, batch: &Batch) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE batches SET
                name = $2, description = $3, start_date = $4, end_date = $5,
                enrollment_start = $6, enrollment_end = $7, max_students = $8,
                status = $9, is_public = $10, updated_at = $11
            WHERE batch_id = $1
            "#,
        )
        .bind(batch.batch_id.as_uuid())
        .bind(&batch.name)
        .bind(&batch.description)
        .bind(batch.start_date)
        .bind(batch.end_date)
        .bind(batch.enrollment_start)
        .bind(batch.enrollment_end)
        .bind(batch.max_students)
        .bind(batch.status.as_str())
        .bind(batch.is_public)
        .bind(batch.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_batch(&self, batch_id: BatchId) -> AppResult<()> {
        let enrolled = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments WHERE batch_id = $1",
        )
        .bind(batch_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        if enrolled > 0 {
            return Err(AppError::conflict(
                "Batch has enrolled students and cannot be deleted",
            ));
        }

        let result = sqlx::query("DELETE FROM batches WHERE batch_id = $1")
            .bind(batch_id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Batch not found"));
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Batch courses
    // ------------------------------------------------------------------

    pub async fn attach_course(&self, pivot: &BatchCourse) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO batch_courses (batch_id, course_id, sort_order, is_required, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (batch_id, course_id) DO UPDATE SET
                sort_order = EXCLUDED.sort_order,
                is_required = EXCLUDED.is_required
            "#,
        )
        .bind(pivot.batch_id.as_uuid())
        .bind(pivot.course_id.as_uuid())
        .bind(pivot.sort_order)
        .bind(pivot.is_required)
        .bind(pivot.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn detach_course(&self, batch_id: BatchId, course_id: CourseId) -> AppResult<()> {
        sqlx::query("DELETE FROM batch_courses WHERE batch_id = $1 AND course_id = $2")
            .bind(batch_id.as_uuid())
            .bind(course_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn list_batch_course_ids(&self, batch_id: BatchId) -> AppResult<Vec<CourseId>> {
        let rows = sqlx::query_scalar::<_, Uuid>(
            "SELECT course_id FROM batch_courses WHERE batch_id = $1 ORDER BY sort_order",
        )
        .bind(batch_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CourseId::from_uuid).collect())
    }

    // ------------------------------------------------------------------
    // Batch instructors
    // ------------------------------------------------------------------

    pub async fn assign_instructor(&self, pivot: &BatchInstructor) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO batch_instructors (batch_id, user_id, role, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (batch_id, user_id) DO NOTHING
            "#,
        )
        .bind(pivot.batch_id.as_uuid())
        .bind(pivot.user_id.as_uuid())
        .bind(pivot.role.as_str())
        .bind(pivot.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(
                "Instructor is already assigned to this batch",
            ));
        }

        Ok(())
    }

    pub async fn remove_instructor(&self, batch_id: BatchId, user_id: UserId) -> AppResult<()> {
        let result =
            sqlx::query("DELETE FROM batch_instructors WHERE batch_id = $1 AND user_id = $2")
                .bind(batch_id.as_uuid())
                .bind(user_id.as_uuid())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Instructor is not assigned to this batch"));
        }

        Ok(())
    }

    pub async fn list_instructors(&self, batch_id: BatchId) -> AppResult<Vec<PersonSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT bi.user_id, bi.role, u.name
            FROM batch_instructors bi
            JOIN users u ON u.user_id = bi.user_id
            WHERE bi.batch_id = $1
            ORDER BY bi.created_at
            "#,
        )
        .bind(batch_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(PersonSummary {
                    user_id: UserId::from_uuid(row.try_get("user_id")?),
                    name: row.try_get("name")?,
                    role: Some(InstructorRole::parse(
                        row.try_get::<String, _>("role")?.as_str(),
                    )?),
                })
            })
            .collect()
    }

    /// Assigned via the pivot, or the owning instructor of a classroom
    pub async fn is_batch_instructor(&self, batch_id: BatchId, user_id: UserId) -> AppResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM batches b
            LEFT JOIN batch_instructors bi
                   ON bi.batch_id = b.batch_id AND bi.user_id = $2
            WHERE b.batch_id = $1 AND (b.owner_id = $2 OR bi.user_id IS NOT NULL)
            "#,
        )
        .bind(batch_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn list_batches_for_instructor(&self, user_id: UserId) -> AppResult<Vec<Batch>> {
        let rows = sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT DISTINCT b.* FROM batches b
            LEFT JOIN batch_instructors bi ON bi.batch_id = b.batch_id
            WHERE b.owner_id = $1 OR bi.user_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BatchRow::into_batch).collect()
    }

    pub async fn batch_stats(&self, batch: &Batch) -> AppResult<BatchStats> {
        let enrolled = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments WHERE batch_id = $1 AND enrolled_at IS NOT NULL",
        )
        .bind(batch.batch_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        let (assignments, published_assignments) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE is_published)
            FROM assignments WHERE batch_id = $1
            "#,
        )
        .bind(batch.batch_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        let capacity_pct = batch.max_students.map(|max| {
            if max == 0 {
                0.0
            } else {
                (enrolled as f64 / max as f64) * 100.0
            }
        });

        Ok(BatchStats {
            enrolled,
            max_students: batch.max_students,
            capacity_pct,
            assignments,
            published_assignments,
        })
    }

    // ------------------------------------------------------------------
    // Structured enrollment
    // ------------------------------------------------------------------

    /// Structured, non-draft batches containing a course
    pub async fn batches_for_course(
        &self,
        course_id: CourseId,
        include_all: bool,
    ) -> AppResult<Vec<Batch>> {
        let mut qb = QueryBuilder::new(
            "SELECT b.* FROM batches b \
             JOIN batch_courses bc ON bc.batch_id = b.batch_id \
             WHERE bc.course_id = ",
        );
        qb.push_bind(course_id.as_uuid());
        qb.push(" AND b.batch_type = 'structured' AND b.status != 'draft'");
        if !include_all {
            qb.push(" AND b.is_public");
        }
        qb.push(" ORDER BY b.start_date NULLS LAST");

        let rows = qb.build_query_as::<BatchRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(BatchRow::into_batch).collect()
    }

    /// The batch the student is already in for this course, if any
    pub async fn current_batch_for_course(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> AppResult<Option<BatchId>> {
        let row = sqlx::query_scalar::<_, Option<Uuid>>(
            r#"
            SELECT batch_id FROM enrollments
            WHERE user_id = $1 AND course_id = $2 AND batch_id IS NOT NULL
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.flatten().map(BatchId::from_uuid))
    }

    /// Attach the student's purchased enrollment to a structured batch,
    /// taking a seat under the batch row lock.
    pub async fn enroll_in_batch(
        &self,
        user_id: UserId,
        batch_id: BatchId,
    ) -> AppResult<EnrollResult> {
        let mut tx = self.pool.begin().await?;

        let batch = sqlx::query_as::<_, BatchRow>(
            "SELECT * FROM batches WHERE batch_id = $1 FOR UPDATE",
        )
        .bind(batch_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Batch not found"))?
        .into_batch()?;

        if batch.batch_type != BatchType::Structured {
            return Err(AppError::unprocessable("This batch is joined by class code"));
        }

        // Active purchased enrollment for one of the batch's courses
        let enrollment_row = sqlx::query(
            r#"
            SELECT e.enrollment_id, e.course_id, e.batch_id
            FROM enrollments e
            JOIN batch_courses bc ON bc.course_id = e.course_id
            WHERE e.user_id = $1 AND bc.batch_id = $2
              AND e.enrolled_at IS NOT NULL
              AND (e.expires_at IS NULL OR e.expires_at > NOW())
            ORDER BY bc.sort_order
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(batch_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::unprocessable("Purchase the batch's course before joining")
        })?;

        let enrollment_id: Uuid = enrollment_row.try_get("enrollment_id")?;
        let course_id: Uuid = enrollment_row.try_get("course_id")?;

        // Already batched for this course?
        let existing_batch = sqlx::query_scalar::<_, Option<Uuid>>(
            r#"
            SELECT batch_id FROM enrollments
            WHERE user_id = $1 AND course_id = $2 AND batch_id IS NOT NULL
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(course_id)
        .fetch_optional(&mut *tx)
        .await?
        .flatten();

        if let Some(existing) = existing_batch {
            if existing == *batch_id.as_uuid() {
                return Ok(EnrollResult::AlreadyInThisBatch);
            }
            return Err(AppError::conflict(
                "You are already in another batch for this course",
            ));
        }

        if !batch.is_open_for_enrollment() {
            if batch.is_full() {
                return Err(AppError::unprocessable("This batch is full"));
            }
            return Err(AppError::unprocessable("This batch is not open for enrollment"));
        }

        sqlx::query("UPDATE enrollments SET batch_id = $2, updated_at = NOW() WHERE enrollment_id = $1")
            .bind(enrollment_id)
            .bind(batch_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE batches SET current_students = current_students + 1, updated_at = NOW() \
             WHERE batch_id = $1",
        )
        .bind(batch_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(EnrollResult::Enrolled)
    }

    // ------------------------------------------------------------------
    // Classrooms
    // ------------------------------------------------------------------

    pub async fn list_classrooms_for_student(&self, user_id: UserId) -> AppResult<Vec<Batch>> {
        let rows = sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT b.* FROM batches b
            JOIN enrollments e ON e.batch_id = b.batch_id
            WHERE e.user_id = $1 AND e.enrolled_at IS NOT NULL
              AND b.batch_type = 'classroom'
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BatchRow::into_batch).collect()
    }

    pub async fn list_classrooms_for_instructor(&self, user_id: UserId) -> AppResult<Vec<Batch>> {
        let rows = sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT DISTINCT b.* FROM batches b
            LEFT JOIN batch_instructors bi ON bi.batch_id = b.batch_id
            WHERE b.batch_type = 'classroom' AND (b.owner_id = $1 OR bi.user_id = $1)
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BatchRow::into_batch).collect()
    }

    /// Join a classroom by its 6-character code, creating an active
    /// course-less enrollment under the batch row lock.
    pub async fn join_classroom(&self, user_id: UserId, code: &str) -> AppResult<Batch> {
        let code = code.trim().to_uppercase();
        let mut tx = self.pool.begin().await?;

        let batch = sqlx::query_as::<_, BatchRow>(
            "SELECT * FROM batches WHERE class_code = $1 AND batch_type = 'classroom' FOR UPDATE",
        )
        .bind(&code)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("No class with that code"))?
        .into_batch()?;

        let already_joined = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments WHERE user_id = $1 AND batch_id = $2",
        )
        .bind(user_id.as_uuid())
        .bind(batch.batch_id.as_uuid())
        .fetch_one(&mut *tx)
        .await?;

        if already_joined > 0 {
            return Err(AppError::conflict("You have already joined this class"));
        }

        if !batch.is_open_for_enrollment() {
            if batch.is_full() {
                return Err(AppError::unprocessable("This class is full"));
            }
            return Err(AppError::unprocessable("This class is not accepting joins"));
        }

        let enrollment = Enrollment::for_classroom(user_id, batch.batch_id);
        sqlx::query(
            r#"
            INSERT INTO enrollments (
                enrollment_id, user_id, course_id, order_item_id, batch_id,
                enrolled_at, expires_at, progress, completed_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(enrollment.enrollment_id.as_uuid())
        .bind(enrollment.user_id.as_uuid())
        .bind(enrollment.course_id.map(|id| id.into_uuid()))
        .bind(enrollment.order_item_id.map(|id| id.into_uuid()))
        .bind(enrollment.batch_id.map(|id| id.into_uuid()))
        .bind(enrollment.enrolled_at)
        .bind(enrollment.expires_at)
        .bind(enrollment.progress)
        .bind(enrollment.completed_at)
        .bind(enrollment.created_at)
        .bind(enrollment.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE batches SET current_students = current_students + 1, updated_at = NOW() \
             WHERE batch_id = $1",
        )
        .bind(batch.batch_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(batch)
    }

    /// Active member of the batch, or one of its instructors
    pub async fn can_view_batch(&self, batch_id: BatchId, user_id: UserId) -> AppResult<bool> {
        if self.is_batch_instructor(batch_id, user_id).await? {
            return Ok(true);
        }

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments \
             WHERE batch_id = $1 AND user_id = $2 AND enrolled_at IS NOT NULL",
        )
        .bind(batch_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn user_name(&self, user_id: UserId) -> AppResult<Option<String>> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM users WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(name)
    }

    pub async fn roster(&self, batch_id: BatchId) -> AppResult<Vec<PersonSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT u.user_id, u.name
            FROM enrollments e
            JOIN users u ON u.user_id = e.user_id
            WHERE e.batch_id = $1 AND e.enrolled_at IS NOT NULL
            ORDER BY u.name
            "#,
        )
        .bind(batch_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(PersonSummary {
                    user_id: UserId::from_uuid(row.try_get("user_id")?),
                    name: row.try_get("name")?,
                    role: None,
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Stream and classwork
    // ------------------------------------------------------------------

    /// Top-level batch discussions, pinned posts first
    pub async fn list_stream(&self, batch_id: BatchId) -> AppResult<Vec<StreamPost>> {
        let rows = sqlx::query(
            r#"
            SELECT d.discussion_id, d.title, d.content, d.is_pinned,
                   d.replies_count, d.created_at, u.name AS author_name
            FROM discussions d
            JOIN users u ON u.user_id = d.user_id
            WHERE d.batch_id = $1 AND d.parent_id IS NULL
            ORDER BY d.is_pinned DESC, d.created_at DESC
            "#,
        )
        .bind(batch_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(StreamPost {
                    discussion_id: row.try_get("discussion_id")?,
                    author_name: row.try_get("author_name")?,
                    title: row.try_get("title")?,
                    content: row.try_get("content")?,
                    is_pinned: row.try_get("is_pinned")?,
                    replies_count: row.try_get("replies_count")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }

    /// Post a top-level message to the class stream
    pub async fn create_stream_post(
        &self,
        batch_id: BatchId,
        user_id: UserId,
        title: Option<String>,
        content: String,
    ) -> AppResult<StreamPost> {
        let discussion_id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO discussions (
                discussion_id, batch_id, lesson_id, user_id, parent_id,
                title, content, discussion_type, is_pinned, is_locked,
                is_approved, replies_count, views_count, created_at, updated_at
            ) VALUES ($1, $2, NULL, $3, NULL, $4, $5, 'discussion',
                      FALSE, FALSE, TRUE, 0, 0, $6, $6)
            "#,
        )
        .bind(discussion_id)
        .bind(batch_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(&title)
        .bind(&content)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let author_name =
            sqlx::query_scalar::<_, String>("SELECT name FROM users WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(StreamPost {
            discussion_id,
            author_name,
            title,
            content,
            is_pinned: false,
            replies_count: 0,
            created_at: now,
        })
    }

    /// Sections and lesson titles across the class's courses
    pub async fn classwork(&self, batch_id: BatchId) -> AppResult<Vec<ClassworkTopic>> {
        let rows = sqlx::query(
            r#"
            SELECT s.section_id, s.title AS section_title, c.title AS course_title,
                   l.lesson_id, l.title AS lesson_title, l.lesson_type
            FROM batch_courses bc
            JOIN courses c ON c.course_id = bc.course_id
            JOIN course_sections s ON s.course_id = c.course_id
            LEFT JOIN lessons l ON l.section_id = s.section_id AND l.is_published
            WHERE bc.batch_id = $1
            ORDER BY bc.sort_order, s.sort_order, l.sort_order
            "#,
        )
        .bind(batch_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut topics: Vec<ClassworkTopic> = Vec::new();
        for row in rows {
            let section_id: Uuid = row.try_get("section_id")?;
            if topics.last().map(|t| t.section_id) != Some(section_id) {
                topics.push(ClassworkTopic {
                    section_id,
                    course_title: row.try_get("course_title")?,
                    section_title: row.try_get("section_title")?,
                    materials: Vec::new(),
                });
            }

            let lesson_id: Option<Uuid> = row.try_get("lesson_id")?;
            if let Some(lesson_id) = lesson_id {
                if let Some(topic) = topics.last_mut() {
                    topic.materials.push(ClassworkMaterial {
                        lesson_id,
                        title: row.try_get("lesson_title")?,
                        lesson_type: row.try_get("lesson_type")?,
                    });
                }
            }
        }

        Ok(topics)
    }
}

#[derive(Debug, Clone)]
pub struct ClassworkTopic {
    pub section_id: Uuid,
    pub course_title: String,
    pub section_title: String,
    pub materials: Vec<ClassworkMaterial>,
}

#[derive(Debug, Clone)]
pub struct ClassworkMaterial {
    pub lesson_id: Uuid,
    pub title: String,
    pub lesson_type: String,
}

#[derive(sqlx::FromRow)]
struct BatchRow {
    batch_id: Uuid,
    batch_type: String,
    name: String,
    slug: String,
    description: Option<String>,
    class_code: String,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    enrollment_start: Option<DateTime<Utc>>,
    enrollment_end: Option<DateTime<Utc>>,
    max_students: Option<i32>,
    current_students: i32,
    status: String,
    is_public: bool,
    owner_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BatchRow {
    fn into_batch(self) -> AppResult<Batch> {
        Ok(Batch {
            batch_id: BatchId::from_uuid(self.batch_id),
            batch_type: BatchType::parse(&self.batch_type)?,
            name: self.name,
            slug: self.slug,
            description: self.description,
            class_code: self.class_code,
            start_date: self.start_date,
            end_date: self.end_date,
            enrollment_start: self.enrollment_start,
            enrollment_end: self.enrollment_end,
            max_students: self.max_students,
            current_students: self.current_students,
            status: BatchStatus::parse(&self.status)?,
            is_public: self.is_public,
            owner_id: self.owner_id.map(UserId::from_uuid),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::unique_violation;

    #[test]
    fn test_class_code_unique_violation_detected() {
        assert!(unique_violation(
            Some("23505"),
            Some("batches_class_code_key")
        ));
    }

    #[test]
    fn test_other_errors_not_treated_as_code_collision() {
        assert!(!unique_violation(Some("23505"), Some("batches_slug_key")));
        assert!(!unique_violation(Some("23503"), Some("batches_class_code_key")));
        assert!(!unique_violation(None, Some("batches_class_code_key")));
        assert!(!unique_violation(Some("23505"), None));
    }
}
