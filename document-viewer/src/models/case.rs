use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Case {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}
