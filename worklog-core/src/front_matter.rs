use std::collections::BTreeMap;

/// Reads the `---` delimited key/value block at the top of a document.
/// A missing or unterminated block yields an empty map.
pub fn parse_front_matter(text: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let mut lines = text.lines();
    if lines.next().map(str::trim) != Some("---") {
        return fields;
    }

    for line in lines {
        let line = line.trim();
        if line == "---" {
            return fields;
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if !key.is_empty() {
                let value = value.trim().trim_matches('"').to_string();
                fields.insert(key.to_string(), value);
            }
        }
    }
    BTreeMap::new()
}

/// Whether the front matter carries `marker`, given as `key` or `key: value`.
pub fn has_marker(fields: &BTreeMap<String, String>, marker: &str) -> bool {
    match marker.split_once(':') {
        Some((key, value)) => fields
            .get(key.trim())
            .is_some_and(|v| v == value.trim()),
        None => fields.contains_key(marker.trim()),
    }
}
