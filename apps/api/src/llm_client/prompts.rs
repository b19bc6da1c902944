// Shared prompt fragments and prompt-building utilities.
// Each endpoint that needs LLM calls defines its own prompts alongside it.

/// Appended to every prompt whose answer must be machine-readable.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Collapses every whitespace run into a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fills `{name}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so user text containing a
/// placeholder name stays literal. Unknown `{...}` sequences are kept.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = values.iter().find(|(name, _)| {
            tail.strip_prefix(name)
                .map_or(false, |after| after.starts_with('}'))
        });

        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Pretty-prints a JSON payload for embedding in a prompt.
pub fn to_prompt_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\n\n b\t c  "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let filled = fill_template(
            "A: {a}\nB: {b}",
            &[("a", "see {b}"), ("b", "secret")],
        );
        assert_eq!(filled, "A: see {b}\nB: secret");
    }

    #[test]
    fn test_fill_template_keeps_json_braces_and_unknown_names() {
        let filled = fill_template(r#"{"k": 1} {missing} {x}"#, &[("x", "y")]);
        assert_eq!(filled, r#"{"k": 1} {missing} y"#);
    }

    #[test]
    fn test_to_prompt_json_is_pretty() {
        let text = to_prompt_json(&json!({"name": "Jane"}));
        assert!(text.contains("\n"));
        assert!(text.contains("\"name\": \"Jane\""));
    }
}
