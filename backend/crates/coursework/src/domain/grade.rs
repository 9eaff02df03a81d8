//! Grade Entity
//!
//! One overall grade per batch and student.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{BatchId, GradeId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeStatus {
    #[default]
    InProgress,
    Completed,
    Withdrew,
}

impl GradeStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            GradeStatus::InProgress => "in_progress",
            GradeStatus::Completed => "completed",
            GradeStatus::Withdrew => "withdrew",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "in_progress" => Ok(GradeStatus::InProgress),
            "completed" => Ok(GradeStatus::Completed),
            "withdrew" => Ok(GradeStatus::Withdrew),
            _ => Err(AppError::bad_request(format!("Invalid grade status: {}", s))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Grade {
    pub grade_id: GradeId,
    pub batch_id: BatchId,
    pub user_id: UserId,
    pub score: Option<Decimal>,
    pub letter: Option<String>,
    /// Per-assignment breakdown, shape owned by the grader
    pub breakdown: Option<serde_json::Value>,
    pub status: GradeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Grade {
    pub fn new(batch_id: BatchId, user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            grade_id: GradeId::new(),
            batch_id,
            user_id,
            score: None,
            letter: None,
            breakdown: None,
            status: GradeStatus::InProgress,
            created_at: now,
            updated_at: now,
        }
    }
}
