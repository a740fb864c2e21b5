//! Pulls JSON out of free-form model replies.
//!
//! Models often wrap the requested JSON in prose or Markdown fences. The
//! extractor takes the span from the first opening bracket to the last
//! closing one and parses that; if no span is found, it parses the whole
//! reply. Either way the result is a typed value or a [`ServiceError`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, ServiceError};

static ARRAY_SPAN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\[[\s\S]*\]").ok());
static OBJECT_SPAN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\{[\s\S]*\}").ok());

/// Parses the outermost `[...]` span of `content` as `T`.
///
/// `what` names the content for the error message, e.g. "generated questions".
pub fn extract_array<T: DeserializeOwned>(content: &str, what: &'static str) -> Result<T> {
    extract_with(&ARRAY_SPAN, content, what)
}

/// Parses the outermost `{...}` span of `content` as `T`.
pub fn extract_object<T: DeserializeOwned>(content: &str, what: &'static str) -> Result<T> {
    extract_with(&OBJECT_SPAN, content, what)
}

fn extract_with<T: DeserializeOwned>(
    pattern: &Lazy<Option<Regex>>,
    content: &str,
    what: &'static str,
) -> Result<T> {
    let candidate = (**pattern)
        .as_ref()
        .and_then(|re| re.find(content))
        .map_or(content, |m| m.as_str());

    serde_json::from_str(candidate).map_err(|e| {
        debug!(
            what,
            error = %e,
            reply_len = content.len(),
            "Model reply did not match the requested shape"
        );
        ServiceError::parse(what, e.to_string())
    })
}
