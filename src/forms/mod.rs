//! Form plumbing shared by every submission endpoint: field paths, error
//! reports, decoding of `name[0].child` style form fields and the outcome type
//! handed back to the HTTP layer.

pub mod attributes;
pub mod lenient;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// Location of a field inside a nested form, rendered as
/// `quotation_request_line_items[0].attributes[1].key`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(name: &str) -> Self {
        Self::root().key(name)
    }

    pub fn key(mut self, name: &str) -> Self {
        self.0.push(Segment::Key(name.to_string()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.0.push(Segment::Index(index));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Parses a form field name. Returns `None` for malformed names.
    pub fn parse(name: &str) -> Option<Self> {
        let mut segments = Vec::new();
        for part in name.split('.') {
            let (head, mut rest) = match part.find('[') {
                Some(pos) => part.split_at(pos),
                None => (part, ""),
            };
            if head.is_empty() {
                return None;
            }
            segments.push(Segment::Key(head.to_string()));

            while !rest.is_empty() {
                let inner = rest.strip_prefix('[')?;
                let close = inner.find(']')?;
                let token = &inner[..close];
                if token.is_empty() {
                    return None;
                }
                segments.push(match token.parse::<usize>() {
                    Ok(index) => Segment::Index(index),
                    Err(_) => Segment::Key(token.to_string()),
                });
                rest = &inner[close + 1..];
            }
        }
        Some(Self(segments))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(name) if position == 0 => write!(f, "{}", name)?,
                Segment::Key(name) => write!(f, ".{}", name)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Messages keyed by rendered field path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` at `path`; a message already present there is not repeated.
    pub fn add(&mut self, path: impl fmt::Display, message: impl Into<String>) {
        let message = message.into();
        let messages = self.0.entry(path.to_string()).or_default();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.0.get(path).map(Vec::as_slice)
    }

    pub fn has(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn contains(&self, path: &str, message: &str) -> bool {
        self.get(path)
            .map(|messages| messages.iter().any(|m| m == message))
            .unwrap_or(false)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (path, messages) in other.0 {
            for message in messages {
                self.add(&path, message);
            }
        }
    }

    /// Flattens `validator` derive output, including nested structs and lists.
    pub fn from_validator(errors: &validator::ValidationErrors) -> Self {
        let mut out = Self::new();
        collect_validator_errors(&FieldPath::root(), errors, &mut out);
        out
    }
}

fn collect_validator_errors(
    base: &FieldPath,
    errors: &validator::ValidationErrors,
    out: &mut FieldErrors,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = base.clone().key(field);
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                    out.add(&path, message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_validator_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_validator_errors(&path.clone().index(*index), nested, out);
                }
            }
        }
    }
}

enum Node {
    Text(String),
    Object(BTreeMap<String, Node>),
    List(BTreeMap<usize, Node>),
}

impl Node {
    fn insert(&mut self, path: &[Segment], value: String) {
        let Some((head, rest)) = path.split_first() else {
            *self = Node::Text(value);
            return;
        };
        match head {
            Segment::Key(name) => {
                if !matches!(self, Node::Object(_)) {
                    *self = Node::Object(BTreeMap::new());
                }
                if let Node::Object(children) = self {
                    children
                        .entry(name.clone())
                        .or_insert_with(|| Node::Text(String::new()))
                        .insert(rest, value);
                }
            }
            Segment::Index(index) => {
                if !matches!(self, Node::List(_)) {
                    *self = Node::List(BTreeMap::new());
                }
                if let Node::List(children) = self {
                    children
                        .entry(*index)
                        .or_insert_with(|| Node::Text(String::new()))
                        .insert(rest, value);
                }
            }
        }
    }

    fn into_json(self) -> Value {
        match self {
            Node::Text(text) => Value::String(text),
            Node::Object(children) => Value::Object(
                children
                    .into_iter()
                    .map(|(name, child)| (name, child.into_json()))
                    .collect::<Map<String, Value>>(),
            ),
            // Gaps left by removed rows collapse; order follows the indices.
            Node::List(children) => {
                Value::Array(children.into_values().map(Node::into_json).collect())
            }
        }
    }
}

/// Rebuilds the nested value a form describes from its flat `(name, value)` pairs.
///
/// Later pairs overwrite earlier ones at the same path. Malformed names are skipped.
pub fn parse_form(pairs: &[(String, String)]) -> Value {
    let mut root = Node::Object(BTreeMap::new());
    for (name, value) in pairs {
        match FieldPath::parse(name) {
            Some(path) => root.insert(path.segments(), value.clone()),
            None => debug!(field = %name, "Skipping malformed form field name"),
        }
    }
    root.into_json()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// The submitted values broke one or more rules.
    Validation,
    /// The values were valid but could not be stored.
    Persistence,
}

/// What a rejected form gets back: the submitted values, so the form can be
/// redisplayed as the user left it, and the errors to show beside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReply {
    pub status: String,
    pub kind: RejectionKind,
    pub initial_value: Value,
    pub field_errors: FieldErrors,
    pub form_errors: Vec<String>,
}

impl SubmissionReply {
    pub fn invalid(initial_value: Value, field_errors: FieldErrors) -> Self {
        Self {
            status: "error".to_string(),
            kind: RejectionKind::Validation,
            initial_value,
            field_errors,
            form_errors: Vec::new(),
        }
    }

    pub fn invalid_form(initial_value: Value, message: impl Into<String>) -> Self {
        Self {
            form_errors: vec![message.into()],
            ..Self::invalid(initial_value, FieldErrors::new())
        }
    }

    pub fn not_saved(initial_value: Value, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            kind: RejectionKind::Persistence,
            initial_value,
            field_errors: FieldErrors::new(),
            form_errors: vec![message.into()],
        }
    }
}

/// Result of pushing one submission through validation and persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome<T> {
    Saved(T),
    Rejected(SubmissionReply),
}

impl<T> SubmissionOutcome<T> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmissionOutcome::Saved(_))
    }

    pub fn saved(self) -> Option<T> {
        match self {
            SubmissionOutcome::Saved(value) => Some(value),
            SubmissionOutcome::Rejected(_) => None,
        }
    }

    pub fn rejected(self) -> Option<SubmissionReply> {
        match self {
            SubmissionOutcome::Saved(_) => None,
            SubmissionOutcome::Rejected(reply) => Some(reply),
        }
    }
}

/// Message used when a submission body cannot be read as a form at all.
pub const MALFORMED_FORM: &str = "The submitted form could not be read.";
