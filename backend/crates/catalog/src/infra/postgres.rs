//! PostgreSQL Catalog Store

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{CategoryId, CourseId, LessonId, SectionId, UserId};
use kernel::page::PageParams;
use rust_decimal::Decimal;
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use crate::domain::{
    Category, Course, CourseLevel, CourseStatus, CourseType, Lesson, LessonType, Section,
};

/// Sort orders for the public course list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CourseSort {
    #[default]
    Latest,
    PriceLow,
    PriceHigh,
    Popularity,
}

/// Filters for the public course list
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub category_slug: Option<String>,
    pub level: Option<CourseLevel>,
    pub course_type: Option<CourseType>,
    pub instructor_id: Option<Uuid>,
    pub search: Option<String>,
    pub sort: CourseSort,
}

/// Course joined with category and instructor names for list views
#[derive(Debug, Clone)]
pub struct CourseCard {
    pub course: Course,
    pub category_name: String,
    pub instructor_name: String,
}

/// PostgreSQL-backed catalog store
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub async fn list_categories(&self, only_active: bool) -> AppResult<Vec<Category>> {
        let rows = if only_active {
            sqlx::query_as::<_, CategoryRow>(
                "SELECT * FROM categories WHERE is_active ORDER BY sort_order, name",
            )
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, CategoryRow>("SELECT * FROM categories ORDER BY sort_order, name")
                .fetch_all(&self.pool)
                .await?
        };

        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }

    pub async fn find_category(&self, category_id: CategoryId) -> AppResult<Option<Category>> {
        let row =
            sqlx::query_as::<_, CategoryRow>("SELECT * FROM categories WHERE category_id = $1")
                .bind(category_id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(CategoryRow::into_category))
    }

    pub async fn create_category(&self, category: &Category) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (
                category_id, name, slug, description, sort_order,
                is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(category.category_id.as_uuid())
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.sort_order)
        .bind(category.is_active)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_category(&self, category: &Category) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE categories SET
                name = $2, slug = $3, description = $4,
                sort_order = $5, is_active = $6, updated_at = $7
            WHERE category_id = $1
            "#,
        )
        .bind(category.category_id.as_uuid())
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.sort_order)
        .bind(category.is_active)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a category. Refuses when courses still reference it.
    pub async fn delete_category(&self, category_id: CategoryId) -> AppResult<()> {
        let course_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM courses WHERE category_id = $1",
        )
        .bind(category_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        if course_count > 0 {
            return Err(AppError::conflict(
                "Category still has courses and cannot be deleted",
            ));
        }

        let result = sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(category_id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Category not found"));
        }

        Ok(())
    }

    pub async fn reorder_categories(&self, order: &[(CategoryId, i32)]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for (category_id, sort_order) in order {
            sqlx::query("UPDATE categories SET sort_order = $2 WHERE category_id = $1")
                .bind(category_id.as_uuid())
                .bind(sort_order)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Public catalog
    // ------------------------------------------------------------------

    /// Published courses with filters, sorting, and pagination
    pub async fn list_published(
        &self,
        filter: &CourseFilter,
        page: &PageParams,
    ) -> AppResult<(Vec<CourseCard>, i64)> {
        let mut count_qb = QueryBuilder::new(
            "SELECT COUNT(*) FROM courses c \
             JOIN categories cat ON cat.category_id = c.category_id \
             JOIN users u ON u.user_id = c.instructor_id \
             WHERE c.status = 'published'",
        );
        push_course_filters(&mut count_qb, filter);

        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new(
            "SELECT c.*, cat.name AS category_name, u.name AS instructor_name \
             FROM courses c \
             JOIN categories cat ON cat.category_id = c.category_id \
             JOIN users u ON u.user_id = c.instructor_id \
             WHERE c.status = 'published'",
        );
        push_course_filters(&mut qb, filter);

        match filter.sort {
            CourseSort::Latest => qb.push(" ORDER BY c.published_at DESC NULLS LAST"),
            CourseSort::PriceLow => {
                qb.push(" ORDER BY COALESCE(c.discount_price, c.price) ASC")
            }
            CourseSort::PriceHigh => {
                qb.push(" ORDER BY COALESCE(c.discount_price, c.price) DESC")
            }
            CourseSort::Popularity => qb.push(" ORDER BY c.total_enrollments DESC"),
        };

        qb.push(" LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows = qb.build().fetch_all(&self.pool).await?;

        let cards = rows
            .into_iter()
            .map(|row| {
                let course = course_from_row(&row)?;
                Ok(CourseCard {
                    course,
                    category_name: row.try_get("category_name")?,
                    instructor_name: row.try_get("instructor_name")?,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok((cards, total))
    }

    /// Published course by slug, with its sections and lessons
    pub async fn find_published_by_slug(
        &self,
        slug: &str,
    ) -> AppResult<Option<(CourseCard, Vec<Section>, Vec<Lesson>)>> {
        let row = sqlx::query(
            r#"
            SELECT c.*, cat.name AS category_name, u.name AS instructor_name
            FROM courses c
            JOIN categories cat ON cat.category_id = c.category_id
            JOIN users u ON u.user_id = c.instructor_id
            WHERE c.slug = $1 AND c.status = 'published'
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let course = course_from_row(&row)?;
        let card = CourseCard {
            category_name: row.try_get("category_name")?,
            instructor_name: row.try_get("instructor_name")?,
            course,
        };

        let sections = self.list_sections(card.course.course_id).await?;
        let lessons = self.list_lessons_for_course(card.course.course_id).await?;

        Ok(Some((card, sections, lessons)))
    }

    /// Published courses in the same category, excluding the course itself
    pub async fn related_courses(
        &self,
        course_id: CourseId,
        limit: i64,
    ) -> AppResult<Vec<CourseCard>> {
        let rows = sqlx::query(
            r#"
            SELECT c.*, cat.name AS category_name, u.name AS instructor_name
            FROM courses c
            JOIN categories cat ON cat.category_id = c.category_id
            JOIN users u ON u.user_id = c.instructor_id
            WHERE c.status = 'published'
              AND c.course_id != $1
              AND c.category_id = (SELECT category_id FROM courses WHERE course_id = $1)
            ORDER BY c.total_enrollments DESC
            LIMIT $2
            "#,
        )
        .bind(course_id.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let course = course_from_row(&row)?;
                Ok(CourseCard {
                    category_name: row.try_get("category_name")?,
                    instructor_name: row.try_get("instructor_name")?,
                    course,
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Courses (instructor)
    // ------------------------------------------------------------------

    pub async fn find_course(&self, course_id: CourseId) -> AppResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>("SELECT * FROM courses WHERE course_id = $1")
            .bind(course_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(CourseRow::into_course).transpose()
    }

    pub async fn list_by_instructor(&self, instructor_id: UserId) -> AppResult<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(
            "SELECT * FROM courses WHERE instructor_id = $1 ORDER BY created_at DESC",
        )
        .bind(instructor_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CourseRow::into_course).collect()
    }

    pub async fn list_by_status(&self, status: CourseStatus) -> AppResult<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(
            "SELECT * FROM courses WHERE status = $1 ORDER BY updated_at",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CourseRow::into_course).collect()
    }

    pub async fn create_course(&self, course: &Course) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO courses (
                course_id, instructor_id, category_id, title, slug,
                subtitle, description, course_type, level, price,
                discount_price, status, published_at, total_lessons,
                total_enrollments, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                      $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(course.course_id.as_uuid())
        .bind(course.instructor_id.as_uuid())
        .bind(course.category_id.as_uuid())
        .bind(&course.title)
        .bind(&course.slug)
        .bind(&course.subtitle)
        .bind(&course.description)
        .bind(course.course_type.as_str())
        .bind(course.level.as_str())
        .bind(course.price)
        .bind(course.discount_price)
        .bind(course.status.as_str())
        .bind(course.published_at)
        .bind(course.total_lessons)
        .bind(course.total_enrollments)
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_course(&self, course: &Course) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE courses SET
                category_id = $2, title = $3, subtitle = $4,
                description = $5, course_type = $6, level = $7,
                price = $8, discount_price = $9, status = $10,
                published_at = $11, updated_at = $12
            WHERE course_id = $1
            "#,
        )
        .bind(course.course_id.as_uuid())
        .bind(course.category_id.as_uuid())
        .bind(&course.title)
        .bind(&course.subtitle)
        .bind(&course.description)
        .bind(course.course_type.as_str())
        .bind(course.level.as_str())
        .bind(course.price)
        .bind(course.discount_price)
        .bind(course.status.as_str())
        .bind(course.published_at)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_course(&self, course_id: CourseId) -> AppResult<()> {
        sqlx::query("DELETE FROM courses WHERE course_id = $1")
            .bind(course_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count_lessons(&self, course_id: CourseId) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM lessons l
            JOIN course_sections s ON s.section_id = l.section_id
            WHERE s.course_id = $1
            "#,
        )
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // ------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------

    pub async fn list_sections(&self, course_id: CourseId) -> AppResult<Vec<Section>> {
        let rows = sqlx::query_as::<_, SectionRow>(
            "SELECT * FROM course_sections WHERE course_id = $1 ORDER BY sort_order",
        )
        .bind(course_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SectionRow::into_section).collect())
    }

    pub async fn find_section(&self, section_id: SectionId) -> AppResult<Option<Section>> {
        let row = sqlx::query_as::<_, SectionRow>(
            "SELECT * FROM course_sections WHERE section_id = $1",
        )
        .bind(section_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SectionRow::into_section))
    }

    pub async fn create_section(&self, section: &Section) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO course_sections (
                section_id, course_id, title, description, sort_order,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(section.section_id.as_uuid())
        .bind(section.course_id.as_uuid())
        .bind(&section.title)
        .bind(&section.description)
        .bind(section.sort_order)
        .bind(section.created_at)
        .bind(section.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_section(&self, section: &Section) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE course_sections SET
                title = $2, description = $3, sort_order = $4, updated_at = $5
            WHERE section_id = $1
            "#,
        )
        .bind(section.section_id.as_uuid())
        .bind(&section.title)
        .bind(&section.description)
        .bind(section.sort_order)
        .bind(section.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a section and keep the course lesson counter accurate
    pub async fn delete_section(&self, section: &Section) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let lesson_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM lessons WHERE section_id = $1")
                .bind(section.section_id.as_uuid())
                .fetch_one(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM course_sections WHERE section_id = $1")
            .bind(section.section_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE courses SET total_lessons = total_lessons - $2 WHERE course_id = $1",
        )
        .bind(section.course_id.as_uuid())
        .bind(lesson_count as i32)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn reorder_sections(
        &self,
        course_id: CourseId,
        order: &[(SectionId, i32)],
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for (section_id, sort_order) in order {
            sqlx::query(
                "UPDATE course_sections SET sort_order = $3 \
                 WHERE section_id = $1 AND course_id = $2",
            )
            .bind(section_id.as_uuid())
            .bind(course_id.as_uuid())
            .bind(sort_order)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lessons
    // ------------------------------------------------------------------

    pub async fn list_lessons(&self, section_id: SectionId) -> AppResult<Vec<Lesson>> {
        let rows = sqlx::query_as::<_, LessonRow>(
            "SELECT * FROM lessons WHERE section_id = $1 ORDER BY sort_order",
        )
        .bind(section_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LessonRow::into_lesson).collect()
    }

    async fn list_lessons_for_course(&self, course_id: CourseId) -> AppResult<Vec<Lesson>> {
        let rows = sqlx::query_as::<_, LessonRow>(
            r#"
            SELECT l.*
            FROM lessons l
            JOIN course_sections s ON s.section_id = l.section_id
            WHERE s.course_id = $1
            ORDER BY s.sort_order, l.sort_order
            "#,
        )
        .bind(course_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LessonRow::into_lesson).collect()
    }

    pub async fn find_lesson(&self, lesson_id: LessonId) -> AppResult<Option<Lesson>> {
        let row = sqlx::query_as::<_, LessonRow>("SELECT * FROM lessons WHERE lesson_id = $1")
            .bind(lesson_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(LessonRow::into_lesson).transpose()
    }

    pub async fn create_lesson(&self, course_id: CourseId, lesson: &Lesson) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO lessons (
                lesson_id, section_id, title, lesson_type, video_url,
                video_duration_secs, content, is_free, is_published,
                sort_order, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(lesson.lesson_id.as_uuid())
        .bind(lesson.section_id.as_uuid())
        .bind(&lesson.title)
        .bind(lesson.lesson_type.as_str())
        .bind(&lesson.video_url)
        .bind(lesson.video_duration_secs)
        .bind(&lesson.content)
        .bind(lesson.is_free)
        .bind(lesson.is_published)
        .bind(lesson.sort_order)
        .bind(lesson.created_at)
        .bind(lesson.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE courses SET total_lessons = total_lessons + 1 WHERE course_id = $1")
            .bind(course_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn update_lesson(&self, lesson: &Lesson) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE lessons SET
                title = $2, lesson_type = $3, video_url = $4,
                video_duration_secs = $5, content = $6, is_free = $7,
                is_published = $8, sort_order = $9, updated_at = $10
            WHERE lesson_id = $1
            "#,
        )
        .bind(lesson.lesson_id.as_uuid())
        .bind(&lesson.title)
        .bind(lesson.lesson_type.as_str())
        .bind(&lesson.video_url)
        .bind(lesson.video_duration_secs)
        .bind(&lesson.content)
        .bind(lesson.is_free)
        .bind(lesson.is_published)
        .bind(lesson.sort_order)
        .bind(lesson.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_lesson(&self, course_id: CourseId, lesson_id: LessonId) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM lessons WHERE lesson_id = $1")
            .bind(lesson_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() > 0 {
            sqlx::query(
                "UPDATE courses SET total_lessons = total_lessons - 1 WHERE course_id = $1",
            )
            .bind(course_id.as_uuid())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn reorder_lessons(
        &self,
        section_id: SectionId,
        order: &[(LessonId, i32)],
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for (lesson_id, sort_order) in order {
            sqlx::query(
                "UPDATE lessons SET sort_order = $3 \
                 WHERE lesson_id = $1 AND section_id = $2",
            )
            .bind(lesson_id.as_uuid())
            .bind(section_id.as_uuid())
            .bind(sort_order)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

fn push_course_filters(qb: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &CourseFilter) {
    if let Some(category_slug) = &filter.category_slug {
        qb.push(" AND cat.slug = ");
        qb.push_bind(category_slug.clone());
    }
    if let Some(level) = filter.level {
        qb.push(" AND c.level = ");
        qb.push_bind(level.as_str());
    }
    if let Some(course_type) = filter.course_type {
        qb.push(" AND c.course_type = ");
        qb.push_bind(course_type.as_str());
    }
    if let Some(instructor_id) = filter.instructor_id {
        qb.push(" AND c.instructor_id = ");
        qb.push_bind(instructor_id);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (c.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR c.subtitle ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

// Row types for sqlx mapping

#[derive(sqlx::FromRow)]
struct CategoryRow {
    category_id: Uuid,
    name: String,
    slug: String,
    description: Option<String>,
    sort_order: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            category_id: CategoryId::from_uuid(self.category_id),
            name: self.name,
            slug: self.slug,
            description: self.description,
            sort_order: self.sort_order,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CourseRow {
    course_id: Uuid,
    instructor_id: Uuid,
    category_id: Uuid,
    title: String,
    slug: String,
    subtitle: Option<String>,
    description: Option<String>,
    course_type: String,
    level: String,
    price: Decimal,
    discount_price: Option<Decimal>,
    status: String,
    published_at: Option<DateTime<Utc>>,
    total_lessons: i32,
    total_enrollments: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CourseRow {
    fn into_course(self) -> AppResult<Course> {
        Ok(Course {
            course_id: CourseId::from_uuid(self.course_id),
            instructor_id: UserId::from_uuid(self.instructor_id),
            category_id: CategoryId::from_uuid(self.category_id),
            title: self.title,
            slug: self.slug,
            subtitle: self.subtitle,
            description: self.description,
            course_type: CourseType::parse(&self.course_type)?,
            level: CourseLevel::parse(&self.level)?,
            price: self.price,
            discount_price: self.discount_price,
            status: CourseStatus::parse(&self.status)?,
            published_at: self.published_at,
            total_lessons: self.total_lessons,
            total_enrollments: self.total_enrollments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Build a Course from a dynamically-built query row
fn course_from_row(row: &sqlx::postgres::PgRow) -> AppResult<Course> {
    Ok(Course {
        course_id: CourseId::from_uuid(row.try_get("course_id")?),
        instructor_id: UserId::from_uuid(row.try_get("instructor_id")?),
        category_id: CategoryId::from_uuid(row.try_get("category_id")?),
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        subtitle: row.try_get("subtitle")?,
        description: row.try_get("description")?,
        course_type: CourseType::parse(row.try_get::<String, _>("course_type")?.as_str())?,
        level: CourseLevel::parse(row.try_get::<String, _>("level")?.as_str())?,
        price: row.try_get("price")?,
        discount_price: row.try_get("discount_price")?,
        status: CourseStatus::parse(row.try_get::<String, _>("status")?.as_str())?,
        published_at: row.try_get("published_at")?,
        total_lessons: row.try_get("total_lessons")?,
        total_enrollments: row.try_get("total_enrollments")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[derive(sqlx::FromRow)]
struct SectionRow {
    section_id: Uuid,
    course_id: Uuid,
    title: String,
    description: Option<String>,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SectionRow {
    fn into_section(self) -> Section {
        Section {
            section_id: SectionId::from_uuid(self.section_id),
            course_id: CourseId::from_uuid(self.course_id),
            title: self.title,
            description: self.description,
            sort_order: self.sort_order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LessonRow {
    lesson_id: Uuid,
    section_id: Uuid,
    title: String,
    lesson_type: String,
    video_url: Option<String>,
    video_duration_secs: Option<i32>,
    content: Option<String>,
    is_free: bool,
    is_published: bool,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LessonRow {
    fn into_lesson(self) -> AppResult<Lesson> {
        Ok(Lesson {
            lesson_id: LessonId::from_uuid(self.lesson_id),
            section_id: SectionId::from_uuid(self.section_id),
            title: self.title,
            lesson_type: LessonType::parse(&self.lesson_type)?,
            video_url: self.video_url,
            video_duration_secs: self.video_duration_secs,
            content: self.content,
            is_free: self.is_free,
            is_published: self.is_published,
            sort_order: self.sort_order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
