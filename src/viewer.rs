//! Defensive loading of document JSON for display.
//!
//! The viewer accepts JSON from storage or from another process, so it
//! never trusts it: malformed input becomes a document-level error state,
//! not a partial render, and every outcome that has nothing to show gets a
//! one-line placeholder document instead of an empty tree.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::highlight::Sanitizer;
use crate::model::EditorState;

/// Shown when no document is loaded.
pub const NO_DOCUMENT_MESSAGE: &str = "Upload a file to see content";

/// Shown when the document JSON cannot be parsed.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading content";

/// Shown when the document has no content.
pub const EMPTY_DOCUMENT_MESSAGE: &str = "No content available";

/// What the viewer displays.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// No document was given
    NoDocument(EditorState),
    /// The document could not be parsed
    Failed {
        /// Parse error
        message: String,
        /// Placeholder shown instead
        state: EditorState,
    },
    /// The document parsed but has no content
    Empty(EditorState),
    /// The document is ready to display
    Ready(EditorState),
}

impl ViewState {
    /// Error state for input that could not be read.
    pub fn failed(message: impl Into<String>) -> Self {
        ViewState::Failed {
            message: message.into(),
            state: EditorState::placeholder(LOAD_ERROR_MESSAGE),
        }
    }

    /// The state to display.
    pub fn state(&self) -> &EditorState {
        match self {
            ViewState::NoDocument(state)
            | ViewState::Failed { state, .. }
            | ViewState::Empty(state)
            | ViewState::Ready(state) => state,
        }
    }

    /// Take the state to display.
    pub fn into_state(self) -> EditorState {
        match self {
            ViewState::NoDocument(state)
            | ViewState::Failed { state, .. }
            | ViewState::Empty(state)
            | ViewState::Ready(state) => state,
        }
    }

    /// Check if a real document is shown.
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready(_))
    }

    /// The parse error, if loading failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Load document JSON for display.
pub fn load_editor_state(json: Option<&str>) -> ViewState {
    let json = match json.map(str::trim) {
        Some(json) if !json.is_empty() => json,
        _ => return ViewState::NoDocument(EditorState::placeholder(NO_DOCUMENT_MESSAGE)),
    };

    match parse_editor_state(json) {
        Ok(state) if state.is_empty() => {
            ViewState::Empty(EditorState::placeholder(EMPTY_DOCUMENT_MESSAGE))
        }
        Ok(state) => ViewState::Ready(state),
        Err(e) => {
            log::warn!("Failed to parse editor state: {}", e);
            ViewState::failed(e.to_string())
        }
    }
}

/// Parse document JSON, resetting malformed `indent` values to 0 and
/// re-sanitizing stored code block markup.
pub fn parse_editor_state(json: &str) -> Result<EditorState> {
    let mut value: Value = serde_json::from_str(json)?;
    match value.get_mut("root") {
        Some(root) => sanitize_node(root, &Sanitizer::code_block()),
        None => return Err(Error::Parse("missing root node".to_string())),
    }
    Ok(serde_json::from_value(value)?)
}

/// Keep `indent` only where it is a non-negative integer in range, and
/// pass code block `html` through the allow-list again.
fn sanitize_node(node: &mut Value, sanitizer: &Sanitizer) {
    let Some(object) = node.as_object_mut() else {
        return;
    };

    if let Some(indent) = object.get_mut("indent") {
        *indent = Value::from(valid_indent(indent).unwrap_or(0));
    }
    if object.get("type").and_then(Value::as_str) == Some("codeblock") {
        if let Some(Value::String(html)) = object.get_mut("html") {
            *html = sanitizer.sanitize(html);
        }
    }
    if let Some(Value::Array(children)) = object.get_mut("children") {
        children
            .iter_mut()
            .for_each(|child| sanitize_node(child, sanitizer));
    }
}

fn valid_indent(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    // 2.0 is an integer too
    let n = value.as_f64()?;
    (n.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&n)).then_some(n as u32)
}
