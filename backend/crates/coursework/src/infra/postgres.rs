//! PostgreSQL Coursework Store

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppResult;
use kernel::id::{AssignmentId, BatchId, DiscussionId, GradeId, LessonId, SubmissionId, UserId};
use rust_decimal::Decimal;
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use crate::domain::{
    Assignment, AssignmentType, Discussion, DiscussionType, Grade, GradeStatus, Submission,
    SubmissionStatus,
};

/// Assignment with the student's own submission state attached
#[derive(Debug, Clone)]
pub struct StudentAssignment {
    pub assignment: Assignment,
    pub batch_name: String,
    pub submission_status: Option<SubmissionStatus>,
}

#[derive(Debug, Clone)]
pub struct SubmissionWithStudent {
    pub submission: Submission,
    pub student_name: String,
}

#[derive(Debug, Clone)]
pub struct GradeWithBatch {
    pub grade: Grade,
    pub batch_name: String,
}

#[derive(Debug, Clone)]
pub struct DiscussionWithAuthor {
    pub discussion: Discussion,
    pub author_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct DiscussionFilter {
    pub batch_id: Option<BatchId>,
    pub lesson_id: Option<LessonId>,
    pub discussion_type: Option<DiscussionType>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct PgCourseworkStore {
    pool: PgPool,
}

impl PgCourseworkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ------------------------------------------------------------------
    // Access checks
    // ------------------------------------------------------------------

    /// Assigned via the instructor pivot, or owner of the classroom
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

    pub async fn is_enrolled(&self, batch_id: BatchId, user_id: UserId) -> AppResult<bool> {
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

    // ------------------------------------------------------------------
    // Assignments
    // ------------------------------------------------------------------

    pub async fn create_assignment(&self, assignment: &Assignment) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO assignments (
                assignment_id, batch_id, lesson_id, title, description,
                instructions, assignment_type, content, available_from,
                due_date, max_points, is_gradable, allow_multiple_submissions,
                is_published, is_required, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                      $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(assignment.assignment_id.as_uuid())
        .bind(assignment.batch_id.as_uuid())
        .bind(assignment.lesson_id.map(|id| id.into_uuid()))
        .bind(&assignment.title)
        .bind(&assignment.description)
        .bind(&assignment.instructions)
        .bind(assignment.assignment_type.as_str())
        .bind(&assignment.content)
        .bind(assignment.available_from)
        .bind(assignment.due_date)
        .bind(assignment.max_points)
        .bind(assignment.is_gradable)
        .bind(assignment.allow_multiple_submissions)
        .bind(assignment.is_published)
        .bind(assignment.is_required)
        .bind(assignment.created_at)
        .bind(assignment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> AppResult<Option<Assignment>> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            "SELECT * FROM assignments WHERE assignment_id = $1",
        )
        .bind(assignment_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AssignmentRow::into_assignment).transpose()
    }

    pub async fn update_assignment(&self, assignment: &Assignment) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE assignments SET
                lesson_id = $2, title = $3, description = $4, instructions = $5,
                assignment_type = $6, content = $7, available_from = $8,
                due_date = $9, max_points = $10, is_gradable = $11,
                allow_multiple_submissions = $12, is_published = $13,
                is_required = $14, updated_at = $15
            WHERE assignment_id = $1
            "#,
        )
        .bind(assignment.assignment_id.as_uuid())
        .bind(assignment.lesson_id.map(|id| id.into_uuid()))
        .bind(&assignment.title)
        .bind(&assignment.description)
        .bind(&assignment.instructions)
        .bind(assignment.assignment_type.as_str())
        .bind(&assignment.content)
        .bind(assignment.available_from)
        .bind(assignment.due_date)
        .bind(assignment.max_points)
        .bind(assignment.is_gradable)
        .bind(assignment.allow_multiple_submissions)
        .bind(assignment.is_published)
        .bind(assignment.is_required)
        .bind(assignment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_assignment(&self, assignment_id: AssignmentId) -> AppResult<()> {
        sqlx::query("DELETE FROM assignments WHERE assignment_id = $1")
            .bind(assignment_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn list_for_batch(&self, batch_id: BatchId) -> AppResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            "SELECT * FROM assignments WHERE batch_id = $1 ORDER BY due_date NULLS LAST, created_at",
        )
        .bind(batch_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AssignmentRow::into_assignment).collect()
    }

    /// Published assignments across the student's enrolled batches,
    /// with the student's own submission state
    pub async fn list_for_student(&self, user_id: UserId) -> AppResult<Vec<StudentAssignment>> {
        let rows = sqlx::query(
            r#"
            SELECT a.*, b.name AS batch_name, s.status AS submission_status
            FROM assignments a
            JOIN batches b ON b.batch_id = a.batch_id
            JOIN enrollments e ON e.batch_id = a.batch_id
                 AND e.user_id = $1 AND e.enrolled_at IS NOT NULL
            LEFT JOIN submissions s ON s.assignment_id = a.assignment_id AND s.user_id = $1
            WHERE a.is_published
              AND (a.available_from IS NULL OR a.available_from <= NOW())
            ORDER BY a.due_date NULLS LAST, a.created_at
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let assignment = assignment_from_row(&row)?;
                let submission_status: Option<String> = row.try_get("submission_status")?;
                Ok(StudentAssignment {
                    assignment,
                    batch_name: row.try_get("batch_name")?,
                    submission_status: submission_status
                        .as_deref()
                        .map(SubmissionStatus::parse)
                        .transpose()?,
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Submissions
    // ------------------------------------------------------------------

    pub async fn find_submission(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> AppResult<Option<Submission>> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            "SELECT * FROM submissions WHERE assignment_id = $1 AND user_id = $2",
        )
        .bind(assignment_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(SubmissionRow::into_submission).transpose()
    }

    pub async fn find_submission_by_id(
        &self,
        submission_id: SubmissionId,
    ) -> AppResult<Option<Submission>> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            "SELECT * FROM submissions WHERE submission_id = $1",
        )
        .bind(submission_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(SubmissionRow::into_submission).transpose()
    }

    /// Insert or update in place; the unique key is assignment+user
    pub async fn save_submission(&self, submission: &Submission) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO submissions (
                submission_id, assignment_id, user_id, content, answers, files,
                status, submitted_at, points, feedback, graded_by, graded_at,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (assignment_id, user_id) DO UPDATE SET
                content = EXCLUDED.content,
                answers = EXCLUDED.answers,
                files = EXCLUDED.files,
                status = EXCLUDED.status,
                submitted_at = EXCLUDED.submitted_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(submission.submission_id.as_uuid())
        .bind(submission.assignment_id.as_uuid())
        .bind(submission.user_id.as_uuid())
        .bind(&submission.content)
        .bind(&submission.answers)
        .bind(&submission.files)
        .bind(submission.status.as_str())
        .bind(submission.submitted_at)
        .bind(submission.points)
        .bind(&submission.feedback)
        .bind(submission.graded_by.map(|id| id.into_uuid()))
        .bind(submission.graded_at)
        .bind(submission.created_at)
        .bind(submission.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn save_grading(&self, submission: &Submission) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE submissions SET
                status = $2, points = $3, feedback = $4,
                graded_by = $5, graded_at = $6, updated_at = $7
            WHERE submission_id = $1
            "#,
        )
        .bind(submission.submission_id.as_uuid())
        .bind(submission.status.as_str())
        .bind(submission.points)
        .bind(&submission.feedback)
        .bind(submission.graded_by.map(|id| id.into_uuid()))
        .bind(submission.graded_at)
        .bind(submission.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_submissions(
        &self,
        assignment_id: AssignmentId,
    ) -> AppResult<Vec<SubmissionWithStudent>> {
        let rows = sqlx::query(
            r#"
            SELECT s.*, u.name AS student_name
            FROM submissions s
            JOIN users u ON u.user_id = s.user_id
            WHERE s.assignment_id = $1
            ORDER BY s.submitted_at NULLS LAST
            "#,
        )
        .bind(assignment_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(SubmissionWithStudent {
                    submission: submission_from_row(&row)?,
                    student_name: row.try_get("student_name")?,
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Grades
    // ------------------------------------------------------------------

    /// Insert or update the batch+user grade
    pub async fn upsert_grade(&self, grade: &Grade) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO grades (
                grade_id, batch_id, user_id, score, letter, breakdown,
                status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (batch_id, user_id) DO UPDATE SET
                score = EXCLUDED.score,
                letter = EXCLUDED.letter,
                breakdown = EXCLUDED.breakdown,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(grade.grade_id.as_uuid())
        .bind(grade.batch_id.as_uuid())
        .bind(grade.user_id.as_uuid())
        .bind(grade.score)
        .bind(&grade.letter)
        .bind(&grade.breakdown)
        .bind(grade.status.as_str())
        .bind(grade.created_at)
        .bind(grade.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_grades(&self, user_id: UserId) -> AppResult<Vec<GradeWithBatch>> {
        let rows = sqlx::query(
            r#"
            SELECT g.*, b.name AS batch_name
            FROM grades g
            JOIN batches b ON b.batch_id = g.batch_id
            WHERE g.user_id = $1
            ORDER BY g.updated_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(GradeWithBatch {
                    grade: Grade {
                        grade_id: GradeId::from_uuid(row.try_get("grade_id")?),
                        batch_id: BatchId::from_uuid(row.try_get("batch_id")?),
                        user_id: UserId::from_uuid(row.try_get("user_id")?),
                        score: row.try_get("score")?,
                        letter: row.try_get("letter")?,
                        breakdown: row.try_get("breakdown")?,
                        status: GradeStatus::parse(row.try_get::<String, _>("status")?.as_str())?,
                        created_at: row.try_get("created_at")?,
                        updated_at: row.try_get("updated_at")?,
                    },
                    batch_name: row.try_get("batch_name")?,
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Discussions
    // ------------------------------------------------------------------

    /// Top-level threads, pinned first
    pub async fn list_discussions(
        &self,
        filter: &DiscussionFilter,
    ) -> AppResult<Vec<DiscussionWithAuthor>> {
        let mut qb = QueryBuilder::new(
            "SELECT d.*, u.name AS author_name FROM discussions d \
             JOIN users u ON u.user_id = d.user_id \
             WHERE d.parent_id IS NULL",
        );

        if let Some(batch_id) = filter.batch_id {
            qb.push(" AND d.batch_id = ");
            qb.push_bind(*batch_id.as_uuid());
        }
        if let Some(lesson_id) = filter.lesson_id {
            qb.push(" AND d.lesson_id = ");
            qb.push_bind(*lesson_id.as_uuid());
        }
        if let Some(discussion_type) = filter.discussion_type {
            qb.push(" AND d.discussion_type = ");
            qb.push_bind(discussion_type.as_str());
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            qb.push(" AND (d.title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR d.content ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        qb.push(" ORDER BY d.is_pinned DESC, d.created_at DESC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| {
                Ok(DiscussionWithAuthor {
                    discussion: discussion_from_row(&row)?,
                    author_name: row.try_get("author_name")?,
                })
            })
            .collect()
    }

    pub async fn find_discussion(
        &self,
        discussion_id: DiscussionId,
    ) -> AppResult<Option<Discussion>> {
        let row = sqlx::query_as::<_, DiscussionRow>(
            "SELECT * FROM discussions WHERE discussion_id = $1",
        )
        .bind(discussion_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(DiscussionRow::into_discussion).transpose()
    }

    /// Insert a thread or reply; replies bump the parent's counter in
    /// the same transaction.
    pub async fn create_discussion(&self, discussion: &Discussion) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO discussions (
                discussion_id, batch_id, lesson_id, user_id, parent_id,
                title, content, discussion_type, is_pinned, is_locked,
                is_approved, replies_count, views_count, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(discussion.discussion_id.as_uuid())
        .bind(discussion.batch_id.map(|id| id.into_uuid()))
        .bind(discussion.lesson_id.map(|id| id.into_uuid()))
        .bind(discussion.user_id.as_uuid())
        .bind(discussion.parent_id.map(|id| id.into_uuid()))
        .bind(&discussion.title)
        .bind(&discussion.content)
        .bind(discussion.discussion_type.as_str())
        .bind(discussion.is_pinned)
        .bind(discussion.is_locked)
        .bind(discussion.is_approved)
        .bind(discussion.replies_count)
        .bind(discussion.views_count)
        .bind(discussion.created_at)
        .bind(discussion.updated_at)
        .execute(&mut *tx)
        .await?;

        if let Some(parent_id) = discussion.parent_id {
            sqlx::query(
                "UPDATE discussions SET replies_count = replies_count + 1 \
                 WHERE discussion_id = $1",
            )
            .bind(parent_id.as_uuid())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn increment_views(&self, discussion_id: DiscussionId) -> AppResult<()> {
        sqlx::query(
            "UPDATE discussions SET views_count = views_count + 1 WHERE discussion_id = $1",
        )
        .bind(discussion_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_replies(
        &self,
        parent_id: DiscussionId,
    ) -> AppResult<Vec<DiscussionWithAuthor>> {
        let rows = sqlx::query(
            r#"
            SELECT d.*, u.name AS author_name
            FROM discussions d
            JOIN users u ON u.user_id = d.user_id
            WHERE d.parent_id = $1
            ORDER BY d.created_at
            "#,
        )
        .bind(parent_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(DiscussionWithAuthor {
                    discussion: discussion_from_row(&row)?,
                    author_name: row.try_get("author_name")?,
                })
            })
            .collect()
    }

    pub async fn update_discussion(&self, discussion: &Discussion) -> AppResult<()> {
        sqlx::query(
            "UPDATE discussions SET title = $2, content = $3, updated_at = $4 \
             WHERE discussion_id = $1",
        )
        .bind(discussion.discussion_id.as_uuid())
        .bind(&discussion.title)
        .bind(&discussion.content)
        .bind(discussion.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a thread or reply; deleting a reply decrements the
    /// parent's counter in the same transaction.
    pub async fn delete_discussion(&self, discussion: &Discussion) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM discussions WHERE discussion_id = $1")
            .bind(discussion.discussion_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        if let Some(parent_id) = discussion.parent_id {
            sqlx::query(
                "UPDATE discussions SET replies_count = GREATEST(replies_count - 1, 0) \
                 WHERE discussion_id = $1",
            )
            .bind(parent_id.as_uuid())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn set_pinned(&self, discussion_id: DiscussionId, pinned: bool) -> AppResult<()> {
        sqlx::query(
            "UPDATE discussions SET is_pinned = $2, updated_at = NOW() WHERE discussion_id = $1",
        )
        .bind(discussion_id.as_uuid())
        .bind(pinned)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_locked(&self, discussion_id: DiscussionId, locked: bool) -> AppResult<()> {
        sqlx::query(
            "UPDATE discussions SET is_locked = $2, updated_at = NOW() WHERE discussion_id = $1",
        )
        .bind(discussion_id.as_uuid())
        .bind(locked)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// Row types for sqlx mapping

#[derive(sqlx::FromRow)]
struct AssignmentRow {
    assignment_id: Uuid,
    batch_id: Uuid,
    lesson_id: Option<Uuid>,
    title: String,
    description: Option<String>,
    instructions: Option<String>,
    assignment_type: String,
    content: Option<serde_json::Value>,
    available_from: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
    max_points: Option<Decimal>,
    is_gradable: bool,
    allow_multiple_submissions: bool,
    is_published: bool,
    is_required: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AssignmentRow {
    fn into_assignment(self) -> AppResult<Assignment> {
        Ok(Assignment {
            assignment_id: AssignmentId::from_uuid(self.assignment_id),
            batch_id: BatchId::from_uuid(self.batch_id),
            lesson_id: self.lesson_id.map(LessonId::from_uuid),
            title: self.title,
            description: self.description,
            instructions: self.instructions,
            assignment_type: AssignmentType::parse(&self.assignment_type)?,
            content: self.content,
            available_from: self.available_from,
            due_date: self.due_date,
            max_points: self.max_points,
            is_gradable: self.is_gradable,
            allow_multiple_submissions: self.allow_multiple_submissions,
            is_published: self.is_published,
            is_required: self.is_required,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn assignment_from_row(row: &sqlx::postgres::PgRow) -> AppResult<Assignment> {
    Ok(Assignment {
        assignment_id: AssignmentId::from_uuid(row.try_get("assignment_id")?),
        batch_id: BatchId::from_uuid(row.try_get("batch_id")?),
        lesson_id: row
            .try_get::<Option<Uuid>, _>("lesson_id")?
            .map(LessonId::from_uuid),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        instructions: row.try_get("instructions")?,
        assignment_type: AssignmentType::parse(
            row.try_get::<String, _>("assignment_type")?.as_str(),
        )?,
        content: row.try_get("content")?,
        available_from: row.try_get("available_from")?,
        due_date: row.try_get("due_date")?,
        max_points: row.try_get("max_points")?,
        is_gradable: row.try_get("is_gradable")?,
        allow_multiple_submissions: row.try_get("allow_multiple_submissions")?,
        is_published: row.try_get("is_published")?,
        is_required: row.try_get("is_required")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    submission_id: Uuid,
    assignment_id: Uuid,
    user_id: Uuid,
    content: Option<String>,
    answers: Option<serde_json::Value>,
    files: Option<serde_json::Value>,
    status: String,
    submitted_at: Option<DateTime<Utc>>,
    points: Option<Decimal>,
    feedback: Option<String>,
    graded_by: Option<Uuid>,
    graded_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SubmissionRow {
    fn into_submission(self) -> AppResult<Submission> {
        Ok(Submission {
            submission_id: SubmissionId::from_uuid(self.submission_id),
            assignment_id: AssignmentId::from_uuid(self.assignment_id),
            user_id: UserId::from_uuid(self.user_id),
            content: self.content,
            answers: self.answers,
            files: self.files,
            status: SubmissionStatus::parse(&self.status)?,
            submitted_at: self.submitted_at,
            points: self.points,
            feedback: self.feedback,
            graded_by: self.graded_by.map(UserId::from_uuid),
            graded_at: self.graded_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn submission_from_row(row: &sqlx::postgres::PgRow) -> AppResult<Submission> {
    Ok(Submission {
        submission_id: SubmissionId::from_uuid(row.try_get("submission_id")?),
        assignment_id: AssignmentId::from_uuid(row.try_get("assignment_id")?),
        user_id: UserId::from_uuid(row.try_get("user_id")?),
        content: row.try_get("content")?,
        answers: row.try_get("answers")?,
        files: row.try_get("files")?,
        status: SubmissionStatus::parse(row.try_get::<String, _>("status")?.as_str())?,
        submitted_at: row.try_get("submitted_at")?,
        points: row.try_get("points")?,
        feedback: row.try_get("feedback")?,
        graded_by: row
            .try_get::<Option<Uuid>, _>("graded_by")?
            .map(UserId::from_uuid),
        graded_at: row.try_get("graded_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[derive(sqlx::FromRow)]
struct DiscussionRow {
    discussion_id: Uuid,
    batch_id: Option<Uuid>,
    lesson_id: Option<Uuid>,
    user_id: Uuid,
    parent_id: Option<Uuid>,
    title: Option<String>,
    content: String,
    discussion_type: String,
    is_pinned: bool,
    is_locked: bool,
    is_approved: bool,
    replies_count: i32,
    views_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DiscussionRow {
    fn into_discussion(self) -> AppResult<Discussion> {
        Ok(Discussion {
            discussion_id: DiscussionId::from_uuid(self.discussion_id),
            batch_id: self.batch_id.map(BatchId::from_uuid),
            lesson_id: self.lesson_id.map(LessonId::from_uuid),
            user_id: UserId::from_uuid(self.user_id),
            parent_id: self.parent_id.map(DiscussionId::from_uuid),
            title: self.title,
            content: self.content,
            discussion_type: DiscussionType::parse(&self.discussion_type)?,
            is_pinned: self.is_pinned,
            is_locked: self.is_locked,
            is_approved: self.is_approved,
            replies_count: self.replies_count,
            views_count: self.views_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn discussion_from_row(row: &sqlx::postgres::PgRow) -> AppResult<Discussion> {
    Ok(Discussion {
        discussion_id: DiscussionId::from_uuid(row.try_get("discussion_id")?),
        batch_id: row
            .try_get::<Option<Uuid>, _>("batch_id")?
            .map(BatchId::from_uuid),
        lesson_id: row
            .try_get::<Option<Uuid>, _>("lesson_id")?
            .map(LessonId::from_uuid),
        user_id: UserId::from_uuid(row.try_get("user_id")?),
        parent_id: row
            .try_get::<Option<Uuid>, _>("parent_id")?
            .map(DiscussionId::from_uuid),
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        discussion_type: DiscussionType::parse(
            row.try_get::<String, _>("discussion_type")?.as_str(),
        )?,
        is_pinned: row.try_get("is_pinned")?,
        is_locked: row.try_get("is_locked")?,
        is_approved: row.try_get("is_approved")?,
        replies_count: row.try_get("replies_count")?,
        views_count: row.try_get("views_count")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
