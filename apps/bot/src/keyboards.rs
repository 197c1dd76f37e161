//! Reply and inline keyboard payloads, plus the reserved menu labels.

use serde_json::{Value, json};

pub const CREATE_SITE: &str = "🌐 Create Website";
pub const MY_SITES: &str = "📋 My Websites";
pub const HELP: &str = "❓ Help";
pub const CANCEL: &str = "❌ Cancel";

/// Reserved labels are always menu commands, never candidate site names.
pub fn is_reserved_label(text: &str) -> bool {
    matches!(text, CREATE_SITE | MY_SITES | HELP | CANCEL)
}

pub fn main_menu() -> Value {
    json!({
        "keyboard": [
            [{ "text": CREATE_SITE }],
            [{ "text": MY_SITES }, { "text": HELP }],
        ],
        "resize_keyboard": true,
        "one_time_keyboard": false,
    })
}

pub fn cancel_only() -> Value {
    json!({
        "keyboard": [
            [{ "text": CANCEL }],
        ],
        "resize_keyboard": true,
        "one_time_keyboard": false,
    })
}

pub fn open_site_button(url: &str) -> Value {
    json!({
        "inline_keyboard": [
            [{ "text": "🌐 Open Website", "url": url }],
        ],
    })
}
