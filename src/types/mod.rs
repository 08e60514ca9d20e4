mod attachment;
mod collaborator;
mod issue;
mod repository;

pub use attachment::{Attachment, AttachmentField, PostMessageRequest};
pub use collaborator::Collaborator;
pub use issue::{CreatedIssue, IssueRequest};
pub use repository::Repository;
