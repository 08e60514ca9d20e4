use serde::Deserialize;

/// Webhook payload accepted on `POST /postMessage`.
#[derive(Deserialize, Debug, Clone)]
pub struct PostMessageRequest {
    #[serde(rename = "requestBody")]
    pub request_body: PostMessageBody,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PostMessageBody {
    pub attachments: Vec<Attachment>,
}

/// A chat-message attachment describing one support request.
#[derive(Deserialize, Debug, Clone)]
pub struct Attachment {
    pub color: String,
    pub pretext: String,
    pub title: String,
    pub text: String,
    pub fields: Vec<AttachmentField>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
}

impl PostMessageRequest {
    /// The attachment an issue is opened from. Later attachments are ignored.
    pub fn attachment(&self) -> Option<&Attachment> {
        self.request_body.attachments.first()
    }
}
