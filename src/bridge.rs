use tracing::info;

use crate::assign::pick_assignees;
use crate::client::TrackerClient;
use crate::config::Settings;
use crate::error::Result;
use crate::format::issue_body;
use crate::types::{Attachment, IssueRequest, Repository};

/// Issues are assigned to at most this many collaborators.
pub const ASSIGNEE_COUNT: usize = 1;

/// Turns one support-request attachment into one tracker issue.
pub struct IssueBridge {
    client: TrackerClient,
    repository: Repository,
    labels: Vec<String>,
}

/// Result of a successful [`IssueBridge::open_issue`].
#[derive(Debug)]
pub struct OpenedIssue {
    pub number: Option<u64>,
    pub assignees: Vec<String>,
}

impl IssueBridge {
    pub fn new(client: TrackerClient, repository: Repository, labels: Vec<String>) -> Self {
        Self {
            client,
            repository,
            labels,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            TrackerClient::new(settings.api_url.clone(), settings.token.clone()),
            settings.repository.clone(),
            settings.labels.clone(),
        )
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Look up collaborators, pick an assignee, then create the issue.
    ///
    /// The two tracker calls run strictly in sequence; a failed lookup means
    /// the issue is never created.
    pub async fn open_issue(&self, attachment: &Attachment) -> Result<OpenedIssue> {
        let collaborators = self.client.collaborators(&self.repository).await?;

        let assignees = pick_assignees(&collaborators, ASSIGNEE_COUNT, &mut rand::thread_rng());
        if assignees.is_empty() {
            info!("No collaborators available, issue will be created without assignees");
        } else {
            info!(
                collaborators = collaborators.len(),
                assignees = ?assignees,
                "Assigning issue"
            );
        }

        let issue = IssueRequest {
            title: attachment.title.clone(),
            body: issue_body(attachment),
            labels: self.labels.clone(),
            assignees,
        };

        let created = self.client.create_issue(&self.repository, &issue).await?;
        let number = created.as_ref().map(|c| c.number);
        info!(
            number = ?number,
            url = created
                .as_ref()
                .and_then(|c| c.html_url.as_deref())
                .unwrap_or("-"),
            "Issue created"
        );

        Ok(OpenedIssue {
            number,
            assignees: issue.assignees,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::BridgeError;
    use crate::types::AttachmentField;

    fn bridge_for(server: &MockServer) -> IssueBridge {
        IssueBridge::new(
            TrackerClient::new(Url::parse(&server.uri()).unwrap(), "test-token".to_string()),
            Repository::new("acme", "support"),
            vec!["question".to_string(), "help wanted".to_string()],
        )
    }

    fn attachment() -> Attachment {
        Attachment {
            color: "#000".to_string(),
            pretext: "p".to_string(),
            title: "Need help".to_string(),
            text: "Cannot log in".to_string(),
            fields: vec![AttachmentField {
                title: "User".to_string(),
                value: "alice".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_open_issue_assigns_one_collaborator() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/support/collaborators"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "login": "bob" }, { "login": "carol" }])),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/support/issues"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "number": 7 })))
            .expect(1)
            .mount(&server)
            .await;

        let opened = bridge_for(&server).open_issue(&attachment()).await.unwrap();
        assert_eq!(opened.number, Some(7));
        assert_eq!(opened.assignees.len(), 1);
        assert!(["bob", "carol"].contains(&opened.assignees[0].as_str()));
    }

    #[tokio::test]
    async fn test_lookup_failure_skips_creation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/support/collaborators"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let err = bridge_for(&server).open_issue(&attachment()).await.unwrap_err();
        assert!(matches!(err, BridgeError::Upstream { status: 404, .. }));
    }
}
