use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// The ID of the one and only election document.
pub const ELECTION_RECORD_ID: &str = "election";

/// Election-wide state that is not derivable from the accepted results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionRecord {
    #[serde(rename = "_id")]
    pub id: String,
    /// The current operator, or `None` once the role has been renounced.
    pub operator: Option<Id>,
    pub ended: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl ElectionRecord {
    /// A fresh election, open for submissions, run by the given operator.
    pub fn new(operator: Id) -> Self {
        Self {
            id: ELECTION_RECORD_ID.to_string(),
            operator: Some(operator),
            ended: false,
            created_at: Utc::now(),
        }
    }
}
