//! Port for the generative interpreter consulted on out-of-grammar commands.
//!
//! The collaborator is untrusted: its reply must parse and validate as a
//! full snapshot before it can replace the current state.

use thiserror::Error;

use crate::persistence::{SnapshotError, parse_snapshot};
use crate::state::GameState;

/// Rewrites game state from a free-text prompt.
pub trait FallbackInterpreter {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send the prompt and return the raw reply text.
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator is unreachable or replies badly.
    fn rewrite(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Whether a collaborator is configured at all.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// A fallback that is never configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl FallbackInterpreter for NoFallback {
    type Error = FallbackError;

    fn rewrite(&self, _prompt: &str) -> Result<String, Self::Error> {
        Err(FallbackError::Disabled)
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("fallback interpreter is not configured")]
    Disabled,
    #[error("fallback transport failed: {0}")]
    Transport(String),
    #[error("fallback reply contained no JSON object")]
    NoJson,
    #[error("fallback reply rejected: {0}")]
    Rejected(#[from] SnapshotError),
    #[error("state could not be serialized for the prompt: {0}")]
    Prompt(#[source] serde_json::Error),
}

/// Game-master instruction, the serialized state, then the command.
///
/// # Errors
///
/// Returns [`FallbackError::Prompt`] if the state cannot be serialized.
pub fn build_prompt(state: &GameState, command: &str) -> Result<String, FallbackError> {
    let snapshot = serde_json::to_string(state).map_err(FallbackError::Prompt)?;
    let mut s = String::new();
    s.push_str("You are the game master of a space-trading simulation.\n");
    s.push_str("Apply the player's command to the game state and return the full updated state.\n");
    s.push_str("Return ONLY the JSON object, with the same shape and field names.\n");
    s.push_str("Append a short narrative entry to \"log\". Do not include any other text.\n\n");
    s.push_str("STATE:\n");
    s.push_str(&snapshot);
    s.push_str("\n\nCOMMAND: ");
    s.push_str(command);
    s.push('\n');
    Ok(s)
}

/// Drop Markdown code fences, keeping their contents.
#[must_use]
pub fn strip_code_fences(reply: &str) -> String {
    reply.replace("```json", "").replace("```", "")
}

/// Extract the first JSON object `{...}` from a string that may contain
/// surrounding text.
#[must_use]
pub fn extract_first_json_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let end = s.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&s[start..=end])
}

/// Turn a collaborator reply into a validated, synchronized state.
///
/// # Errors
///
/// Returns [`FallbackError::NoJson`] when no object is present, or
/// [`FallbackError::Rejected`] when the object fails snapshot validation.
pub fn accept_rewrite(reply: &str) -> Result<GameState, FallbackError> {
    let cleaned = strip_code_fences(reply);
    let json = extract_first_json_object(&cleaned).ok_or(FallbackError::NoJson)?;
    Ok(parse_snapshot(json)?)
}
