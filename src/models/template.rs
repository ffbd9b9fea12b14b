use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Editable message fragment from message_templates
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub id: Uuid,
    pub template_type: String,
    pub content: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}
