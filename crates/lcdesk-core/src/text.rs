//! Display-only text transforms for the review tabs.
//!
//! Neither function mutates the data model; they reshape service text
//! for rendering.

/// One parsed key/value row. Continuation lines appearing before any
/// keyed line produce an entry with no key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Option<String>,
    pub value: String,
}

/// Re-parses extracted OCR text into key/value rows with the colon
/// heuristic: a line containing `:` starts a new key (text before the
/// first colon) and value (remainder); a line without one extends the
/// current value, separated by a single space.
pub fn parse_key_values(text: &str) -> Vec<KeyValue> {
    let mut pairs = Vec::new();
    let mut current_key: Option<String> = None;
    let mut current_value = String::new();

    for line in text.lines() {
        if line.contains(':') {
            if current_key.is_some() || !current_value.is_empty() {
                pairs.push(KeyValue {
                    key: current_key.take(),
                    value: current_value.trim().to_string(),
                });
            }
            let (key, rest) = line.split_once(':').unwrap_or((line, ""));
            current_key = Some(key.trim().to_string());
            current_value = rest.trim().to_string();
        } else {
            current_value.push(' ');
            current_value.push_str(line.trim());
        }
    }

    if current_key.is_some() || !current_value.is_empty() {
        pairs.push(KeyValue {
            key: current_key,
            value: current_value.trim().to_string(),
        });
    }

    pairs
}

/// Normalizes a document-type key or classification name for display:
/// strips quote characters, lower-cases, maps underscores to spaces,
/// and capitalizes the first letter of each word.
pub fn normalize_display_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| *c != '"' && *c != '\'')
        .flat_map(|c| {
            if c == '_' {
                ' '.to_lowercase()
            } else {
                c.to_lowercase()
            }
        })
        .collect();

    let mut result = String::with_capacity(cleaned.len());
    let mut at_word_start = true;
    for c in cleaned.chars() {
        if at_word_start && c.is_alphanumeric() {
            result.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = !c.is_alphanumeric();
        }
    }
    result
}
