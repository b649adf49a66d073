//! Internationalization (i18n) module.
//!
//! Translations are embedded with `include_str!` and parsed on first use.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::Value;
use tracing::warn;

/// Global translation store: LangCode -> Key -> Text
static TRANSLATIONS: OnceLock<HashMap<String, Value>> = OnceLock::new();

fn load() -> HashMap<String, Value> {
    let mut map = HashMap::new();

    for (lang, raw) in [("en", include_str!("en.json")), ("ar", include_str!("ar.json"))] {
        match serde_json::from_str(raw) {
            Ok(val) => {
                map.insert(lang.to_string(), val);
            }
            Err(e) => warn!("Failed to parse {} translations: {}", lang, e),
        }
    }

    map
}

/// Parse translations eagerly so a broken file shows up at startup.
pub fn init() {
    TRANSLATIONS.get_or_init(load);
}

/// Get text for a key in a specific language.
/// Supports nested keys via dot notation, e.g., "quiz.timeout".
pub fn get_text(lang: &str, key: &str) -> String {
    let store = TRANSLATIONS.get_or_init(load);

    if let Some(text) = store.get(lang).and_then(|val| resolve_key(val, key)) {
        return text;
    }

    // Fallback to "en"
    if lang != "en"
        && let Some(text) = store.get("en").and_then(|val| resolve_key(val, key))
    {
        return text;
    }

    key.to_string()
}

/// Get a list of texts (JSON array) for a key, falling back to "en".
pub fn get_list(lang: &str, key: &str) -> Vec<String> {
    let store = TRANSLATIONS.get_or_init(load);

    [lang, "en"]
        .iter()
        .filter_map(|l| store.get(*l))
        .filter_map(|val| lookup(val, key))
        .filter_map(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect::<Vec<_>>()
        })
        .find(|items| !items.is_empty())
        .unwrap_or_default()
}

fn lookup<'a>(val: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(val, |current, part| current.get(part))
}

fn resolve_key(val: &Value, key: &str) -> Option<String> {
    lookup(val, key).and_then(Value::as_str).map(str::to_string)
}
