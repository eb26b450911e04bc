use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackCriteria {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackCategory {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub criteria: Vec<FeedbackCriteria>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCriteria {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub criteria: Vec<NewCriteria>,
}

/// Categories and criteria every fresh database starts with.
pub fn default_catalog() -> Vec<CreateCategoryRequest> {
    fn category(name: &str, description: &str, criteria: &[(&str, &str)]) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: name.to_string(),
            description: description.to_string(),
            criteria: criteria
                .iter()
                .map(|(name, description)| NewCriteria {
                    name: name.to_string(),
                    description: description.to_string(),
                })
                .collect(),
        }
    }

    vec![
        category(
            "Communication",
            "Evaluation of verbal and non-verbal communication skills",
            &[
                ("Clarity", "Ability to express ideas clearly and concisely"),
                ("Body Language", "Effective use of gestures, posture, and eye contact"),
            ],
        ),
        category(
            "Content",
            "Quality and relevance of content presented",
            &[
                ("Relevance", "Relevance of points to the topic at hand"),
                ("Structure", "Logical organization and flow of ideas"),
            ],
        ),
        category(
            "Critical Thinking",
            "Evaluation of analytical and problem solving abilities",
            &[
                ("Analysis", "Ability to analyze problems and situations"),
                ("Reasoning", "Quality of logical arguments and conclusions"),
            ],
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackDetail {
    pub id: Uuid,
    pub criteria_id: i64,
    pub rating: i64,
    pub comment: String,
}

/// One evaluation from an evaluator to a recipient within a discussion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub discussion_id: Uuid,
    pub evaluator_id: Uuid,
    pub recipient_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub details: Vec<FeedbackDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackDetailInput {
    pub criteria_id: i64,
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitFeedbackRequest {
    pub discussion_id: Uuid,
    pub recipient_id: Uuid,
    pub details: Vec<FeedbackDetailInput>,
}

impl SubmitFeedbackRequest {
    /// Materializes the stored record, assigning fresh ids.
    pub fn into_feedback(self, evaluator_id: Uuid) -> Feedback {
        Feedback {
            id: Uuid::new_v4(),
            discussion_id: self.discussion_id,
            evaluator_id,
            recipient_id: self.recipient_id,
            created_at: Utc::now(),
            details: self
                .details
                .into_iter()
                .map(|detail| FeedbackDetail {
                    id: Uuid::new_v4(),
                    criteria_id: detail.criteria_id,
                    rating: detail.rating,
                    comment: detail.comment,
                })
                .collect(),
        }
    }
}
