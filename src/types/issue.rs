use serde::{Deserialize, Serialize};

/// Body of the tracker's issue-creation call.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct IssueRequest {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
}

/// Minimal issue info returned after create.
#[derive(Deserialize, Debug)]
pub struct CreatedIssue {
    pub number: u64,
    pub html_url: Option<String>,
}
