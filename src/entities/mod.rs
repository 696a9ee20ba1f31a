use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// --- Tables ---

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub professor_id: Uuid,
    pub rating: i16,
    pub text: String,
    pub submitter_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A review that passed moderation and is about to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub professor_id: Uuid,
    pub rating: i16,
    pub text: String,
    pub submitter_id: Option<String>,
}
