//! Shape validation for `POST /postMessage` bodies.
//!
//! The schema is closed: every level rejects keys it does not name. All
//! violations are collected rather than stopping at the first one.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::PostMessageRequest;

const ROOT_KEYS: &[&str] = &["requestBody"];
const BODY_KEYS: &[&str] = &["attachments"];
const ATTACHMENT_KEYS: &[&str] = &["color", "pretext", "title", "text", "fields"];
const ATTACHMENT_STRINGS: &[&str] = &["color", "pretext", "title", "text"];
const FIELD_KEYS: &[&str] = &["title", "value"];

/// One violated constraint, reported back to the caller in a 400 response.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Violation {
    pub message: String,
    pub path: Vec<PathSegment>,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Parse and validate a raw request body.
pub fn parse_post_message(raw: &[u8]) -> Result<PostMessageRequest, Vec<Violation>> {
    let value: Value = serde_json::from_slice(raw).map_err(|e| {
        vec![Violation {
            message: format!("\"value\" must be valid JSON: {e}"),
            path: Vec::new(),
            kind: "json.parse",
        }]
    })?;

    let violations = validate(&value);
    if !violations.is_empty() {
        return Err(violations);
    }

    serde_json::from_value(value).map_err(|e| {
        vec![Violation {
            message: format!("\"value\" {e}"),
            path: Vec::new(),
            kind: "object.base",
        }]
    })
}

/// Check `body` against the webhook schema, returning every violation found.
pub fn validate(body: &Value) -> Vec<Violation> {
    let mut validator = Validator::default();

    if let Some(root) = validator.object(Some(body), ROOT_KEYS) {
        validator.enter("requestBody", |v| {
            if let Some(request) = v.object(root.get("requestBody"), BODY_KEYS) {
                v.enter("attachments", |v| v.attachments(request.get("attachments")));
            }
        });
    }

    validator.violations
}

#[derive(Default)]
struct Validator {
    path: Vec<PathSegment>,
    violations: Vec<Violation>,
}

impl Validator {
    fn enter(&mut self, segment: impl Into<PathSegment>, check: impl FnOnce(&mut Self)) {
        self.path.push(segment.into());
        check(self);
        self.path.pop();
    }

    fn attachments(&mut self, value: Option<&Value>) {
        let Some(items) = self.array(value) else {
            return;
        };

        if items.is_empty() {
            self.report("array.min", "must contain at least 1 items");
            return;
        }

        for (index, item) in items.iter().enumerate() {
            self.enter(index, |v| v.attachment(item));
        }
    }

    fn attachment(&mut self, value: &Value) {
        let Some(map) = self.object(Some(value), ATTACHMENT_KEYS) else {
            return;
        };

        for key in ATTACHMENT_STRINGS {
            self.enter(*key, |v| v.string(map.get(*key)));
        }

        self.enter("fields", |v| {
            if let Some(fields) = v.array(map.get("fields")) {
                for (index, field) in fields.iter().enumerate() {
                    v.enter(index, |v| v.field(field));
                }
            }
        });
    }

    fn field(&mut self, value: &Value) {
        let Some(map) = self.object(Some(value), FIELD_KEYS) else {
            return;
        };

        for key in FIELD_KEYS {
            self.enter(*key, |v| v.string(map.get(*key)));
        }
    }

    fn present<'a>(&mut self, value: Option<&'a Value>) -> Option<&'a Value> {
        match value {
            None => {
                self.report("any.required", "is required");
                None
            }
            Some(value) => Some(value),
        }
    }

    fn object<'a>(
        &mut self,
        value: Option<&'a Value>,
        allowed: &[&str],
    ) -> Option<&'a Map<String, Value>> {
        let value = self.present(value)?;

        let Some(map) = value.as_object() else {
            self.report("object.base", "must be of type object");
            return None;
        };

        for key in map.keys().filter(|k| !allowed.contains(&k.as_str())) {
            self.enter(key.as_str(), |v| v.report("object.unknown", "is not allowed"));
        }

        Some(map)
    }

    fn array<'a>(&mut self, value: Option<&'a Value>) -> Option<&'a Vec<Value>> {
        let value = self.present(value)?;

        if value.as_array().is_none() {
            self.report("array.base", "must be an array");
        }
        value.as_array()
    }

    fn string(&mut self, value: Option<&Value>) {
        let Some(value) = self.present(value) else {
            return;
        };

        match value.as_str() {
            None => self.report("string.base", "must be a string"),
            Some("") => self.report("string.empty", "is not allowed to be empty"),
            Some(_) => {}
        }
    }

    fn report(&mut self, kind: &'static str, problem: &str) {
        self.violations.push(Violation {
            message: format!("\"{}\" {problem}", self.label()),
            path: self.path.clone(),
            kind,
        });
    }

    /// Dotted label for the current path, e.g. `requestBody.attachments[0].color`.
    fn label(&self) -> String {
        if self.path.is_empty() {
            return "value".to_string();
        }

        let mut label = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) if label.is_empty() => label.push_str(key),
                PathSegment::Key(key) => {
                    label.push('.');
                    label.push_str(key);
                }
                PathSegment::Index(index) => label.push_str(&format!("[{index}]")),
            }
        }
        label
    }
}
