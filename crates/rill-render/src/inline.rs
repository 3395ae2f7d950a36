//! Inline state embedding.
//!
//! Resolved server data is pushed onto `self.__rill_s` so hydration can
//! consume it without a second round trip. The inline script for a
//! boundary only ever travels with (or after) that boundary's resolution
//! chunk, never with its fallback.

use serde_json::Value;

/// Prefix every inline state script starts with.
pub const INLINE_STATE_PREFIX: &str = "self.__rill_s=";

/// Render the inline state script for a resolved boundary.
pub fn inline_state_script(boundary: &str, state: &Value) -> String {
    let name = escape_script_content(&serde_json::to_string(boundary).unwrap_or_default());
    let payload = escape_script_content(&serde_json::to_string(state).unwrap_or_default());
    format!(
        "<script>{INLINE_STATE_PREFIX}(self.__rill_s||[]);self.__rill_s.push([{name},{payload}]);</script>"
    )
}

/// Escape `</` so embedded JSON cannot close the surrounding script tag.
fn escape_script_content(s: &str) -> String {
    s.replace("</", "<\\/")
}
