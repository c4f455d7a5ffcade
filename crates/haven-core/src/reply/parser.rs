//! Resilient structured-output parsing.
//!
//! The generative model is instructed to emit a fixed-shape JSON object
//! but truncation, missing delimiters, and stray prose are all routine.
//! `parse_reply` therefore runs a ladder of progressively weaker recovery
//! stages and always produces a usable [`StructuredReply`], prioritizing
//! availability over strict fidelity.

use super::model::StructuredReply;
use once_cell::sync::Lazy;
use regex::Regex;

/// Expected field names with their stage-4 fallback phrases.
const FIELD_DEFAULTS: &[(&str, &str)] = &[
    ("reflection", "I understand your situation"),
    ("validation", "Your feelings are valid"),
    ("support", "Let's work through this together"),
    ("question", "Would you like to tell me more?"),
    ("safety_note", ""),
];

static FIELD_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    FIELD_DEFAULTS
        .iter()
        .map(|(field, _)| {
            let pattern = format!(r#""{field}"\s*:\s*"([^"]*)""#);
            (*field, Regex::new(&pattern).expect("field pattern is valid"))
        })
        .collect()
});

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([\]}])").expect("trailing comma pattern is valid"));

static UNQUOTED_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([{,])\s*([^"{\s])"#).expect("unquoted key pattern is valid"));

static UNQUOTED_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([^"}]),\s*([^"{\s])"#).expect("unquoted value pattern is valid"));

/// Parses a raw model completion into a structured reply.
///
/// Never fails: each decode stage is attempted only when the previous
/// one came up empty, and per-field extraction covers everything else.
pub fn parse_reply(raw: &str) -> StructuredReply {
    let trimmed = raw.trim();

    decode_strict(trimmed)
        .or_else(|| locate_and_decode(trimmed))
        .unwrap_or_else(|| extract_fields(raw))
}

/// Stage 1: strict JSON decode of the trimmed text.
fn decode_strict(text: &str) -> Option<StructuredReply> {
    serde_json::from_str(text).ok()
}

/// Stages 2 and 3: locate the outermost brace-delimited blob, decode it
/// as-is, then retry after a syntactic repair pass.
fn locate_and_decode(text: &str) -> Option<StructuredReply> {
    let blob = extract_braced(text)?;
    decode_strict(blob).or_else(|| decode_strict(&repair_json(blob)))
}

/// Greedy multi-line scan for the outermost `{ ... }` substring.
fn extract_braced(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

/// Best-effort syntactic repair of a JSON-ish blob.
///
/// Strips embedded newlines, removes trailing commas before closing
/// delimiters, and quotes bare keys and bare values following a comma.
fn repair_json(blob: &str) -> String {
    let repaired: String = blob.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    let repaired = TRAILING_COMMA.replace_all(&repaired, "$1");
    let repaired = UNQUOTED_KEY.replace_all(&repaired, "$1\"$2");
    let repaired = UNQUOTED_VALUE.replace_all(&repaired, "$1,\"$2");
    repaired.into_owned()
}

/// Stage 4: independent per-field extraction over the raw text.
///
/// Infallible: fields that are not found fall back to their fixed
/// default phrases, so even pure prose yields a usable reply.
fn extract_fields(raw: &str) -> StructuredReply {
    let field_value = |name: &str, default: &str| -> String {
        let pattern = FIELD_PATTERNS
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, pattern)| pattern)
            .expect("every expected field has a pattern");
        match pattern.captures(raw) {
            Some(captures) => captures[1].to_string(),
            None => default.to_string(),
        }
    };

    StructuredReply {
        reflection: field_value("reflection", FIELD_DEFAULTS[0].1),
        validation: field_value("validation", FIELD_DEFAULTS[1].1),
        support: field_value("support", FIELD_DEFAULTS[2].1),
        question: field_value("question", FIELD_DEFAULTS[3].1),
        safety_note: field_value("safety_note", FIELD_DEFAULTS[4].1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_json_round_trips() {
        let reply = StructuredReply {
            reflection: "I hear you".to_string(),
            validation: "That sounds hard".to_string(),
            support: "You're not alone".to_string(),
            question: "What happened next?".to_string(),
            safety_note: String::new(),
        };
        let raw = serde_json::to_string(&reply).unwrap();
        assert_eq!(parse_reply(&raw), reply);
    }

    #[test]
    fn test_json_wrapped_in_prose() {
        let raw = "Sure! Here is the response you asked for:\n\
                   {\"reflection\": \"I hear you\", \"validation\": \"that's valid\", \
                   \"support\": \"\", \"question\": \"\", \"safety_note\": \"\"}\n\
                   Let me know if you need anything else.";
        let reply = parse_reply(raw);
        assert_eq!(reply.reflection, "I hear you");
        assert_eq!(reply.validation, "that's valid");
    }

    #[test]
    fn test_trailing_comma_is_repaired() {
        let raw = "{\"reflection\": \"I hear you\", \"support\": \"stay strong\",}";
        let reply = parse_reply(raw);
        assert_eq!(reply.reflection, "I hear you");
        assert_eq!(reply.support, "stay strong");
    }

    #[test]
    fn test_embedded_newlines_are_repaired() {
        let raw = "{\"reflection\": \"I\nhear\nyou\",\n \"support\": \"here\",}";
        let reply = parse_reply(raw);
        assert_eq!(reply.reflection, "Ihearyou");
        assert_eq!(reply.support, "here");
    }

    #[test]
    fn test_truncated_object_recovers_found_fields() {
        // Missing closing brace and two fields; the documented scenario.
        let raw = "{\"reflection\": \"I hear you\", \"support\": \"stay strong\"";
        let reply = parse_reply(raw);
        assert_eq!(reply.reflection, "I hear you");
        assert_eq!(reply.support, "stay strong");
        assert_eq!(reply.validation, "Your feelings are valid");
        assert_eq!(reply.question, "Would you like to tell me more?");
        assert_eq!(reply.safety_note, "");
    }

    #[test]
    fn test_prose_without_fields_gets_field_defaults() {
        let reply = parse_reply("the model refused and wrote a poem instead");
        assert_eq!(reply.reflection, "I understand your situation");
        assert_eq!(reply.validation, "Your feelings are valid");
        assert_eq!(reply.support, "Let's work through this together");
        assert_eq!(reply.question, "Would you like to tell me more?");
        assert_eq!(reply.safety_note, "");
    }

    #[test]
    fn test_empty_input_gets_field_defaults() {
        for input in ["", "   \n  "] {
            let reply = parse_reply(input);
            assert_eq!(reply.reflection, "I understand your situation");
            assert_eq!(reply.question, "Would you like to tell me more?");
        }
    }

    #[test]
    fn test_never_panics_on_arbitrary_input() {
        let inputs = [
            "{{{{}}}}",
            "}{",
            "{\"reflection\": }",
            "null",
            "[1, 2, 3]",
            "{\"unknown_field\": \"x\"}",
            "\u{0}\u{1}\u{2}",
            "{\"reflection\": \"unterminated",
        ];
        for input in inputs {
            // All five fields are always present in the result.
            let reply = parse_reply(input);
            let _ = (
                reply.reflection,
                reply.validation,
                reply.support,
                reply.question,
                reply.safety_note,
            );
        }
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let raw = "{\"reflection\": \"hi\", \"mood\": \"calm\"}";
        let reply = parse_reply(raw);
        assert_eq!(reply.reflection, "hi");
    }

    #[test]
    fn test_stage_order_prefers_strict_decode() {
        // A valid object whose reflection text itself looks like a field
        // assignment must come from the strict decode, not extraction.
        let raw = "{\"reflection\": \"say \\\"hello\\\"\", \"validation\": \"ok\"}";
        let reply = parse_reply(raw);
        assert_eq!(reply.reflection, "say \"hello\"");
    }
}
