use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::{NewReview, Review},
    moderation::types::{
        REASON_DEFAMATION, REASON_OFFENSIVE, REASON_PERSONAL_INFO, REASON_PUNCTUATION,
        REASON_REPETITIVE, REASON_SHOUTING, REASON_TOO_SHORT,
    },
};

const MAX_TEXT_CHARS: usize = 5000;
const MAX_SUBMITTER_ID_LEN: usize = 128;
const REJECTION_PREFIX: &str = "Tu comentario no pudo publicarse";

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitReviewRequest {
    pub professor_id: Uuid,
    pub rating: i16,
    pub text: String,
    pub submitter_id: Option<String>,
}

impl SubmitReviewRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.rating) {
            return Err("Rating must be between 1 and 5".to_string());
        }
        validate_text(&self.text)?;
        validate_submitter(self.submitter_id.as_deref())
    }

    pub fn into_new_review(self) -> NewReview {
        NewReview {
            professor_id: self.professor_id,
            rating: self.rating,
            text: self.text.trim().to_string(),
            submitter_id: self.submitter_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckContentRequest {
    pub text: String,
    pub submitter_id: Option<String>,
}

impl CheckContentRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_text(&self.text)?;
        validate_submitter(self.submitter_id.as_deref())
    }
}

fn validate_text(text: &str) -> Result<(), String> {
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err("Text too long".to_string());
    }
    Ok(())
}

fn validate_submitter(submitter_id: Option<&str>) -> Result<(), String> {
    if submitter_id.is_some_and(|id| id.len() > MAX_SUBMITTER_ID_LEN) {
        return Err("Submitter id too long".to_string());
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub professor_id: Uuid,
    pub rating: i16,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            professor_id: review.professor_id,
            rating: review.rating,
            text: review.text,
            created_at: review.created_at,
        }
    }
}

/// Moderation outcome as shown to submitters: reasons only, no provider
/// scores.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckContentResponse {
    pub allowed: bool,
    pub reasons: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RejectionResponse {
    pub error: String,
    pub reasons: Vec<String>,
}

impl RejectionResponse {
    pub fn new(reasons: Vec<String>) -> Self {
        Self {
            error: rejection_message(&reasons),
            reasons,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Spanish message for the submitter, e.g. "Tu comentario no pudo
/// publicarse: contiene lenguaje ofensivo".
pub fn rejection_message(reasons: &[String]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for reason in reasons {
        let part = translate(reason);
        if !parts.contains(&part) {
            parts.push(part);
        }
    }
    if parts.is_empty() {
        return format!("{}.", REJECTION_PREFIX);
    }
    format!("{}: {}", REJECTION_PREFIX, parts.join("; "))
}

fn translate(reason: &str) -> &'static str {
    match reason {
        r if r.starts_with(REASON_OFFENSIVE) => "contiene lenguaje ofensivo",
        REASON_PERSONAL_INFO => "contiene información personal",
        REASON_SHOUTING => "usa demasiadas mayúsculas",
        REASON_TOO_SHORT => "es demasiado corto",
        REASON_REPETITIVE => "contiene caracteres repetidos",
        REASON_PUNCTUATION => "usa demasiados signos de puntuación",
        REASON_DEFAMATION => "parece una acusación sin contexto académico",
        _ => "infringe las normas de la comunidad",
    }
}
