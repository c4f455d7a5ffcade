//! Natural-language assembly of a structured reply.

use super::model::StructuredReply;
use once_cell::sync::Lazy;
use regex::Regex;

/// Leading words that mark continuation-style text. A field starting with
/// one of these is dropped unless it is the first field included, to avoid
/// grammatically dangling fragments.
const CONTINUATION_CONJUNCTIONS: &[&str] = &["and", "also", "additionally"];

/// Fixed reply used when every field is empty.
const EMPTY_REPLY_FALLBACK: &str =
    "I'm here to listen and support you. Would you like to share more?";

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Assembles a reply's fields into a single display string.
///
/// Fields are collected in fixed order (reflection, validation, support,
/// question), joined with `". "`, cleaned up, and capitalized per sentence
/// fragment. A non-empty safety note is appended on its own line with an
/// `IMPORTANT:` marker, unconditionally.
///
/// The output is never empty: when all fields are empty a fixed fallback
/// sentence is returned.
pub fn compose_reply(reply: &StructuredReply) -> String {
    let ordered = [
        reply.reflection.trim(),
        reply.validation.trim(),
        reply.support.trim(),
        reply.question.trim(),
    ];

    let mut parts: Vec<&str> = Vec::new();
    for field in ordered {
        if field.is_empty() {
            continue;
        }
        if !parts.is_empty() && starts_with_conjunction(field) {
            continue;
        }
        parts.push(field);
    }

    let safety_note = reply.safety_note.trim();

    if parts.is_empty() && safety_note.is_empty() {
        return EMPTY_REPLY_FALLBACK.to_string();
    }

    let mut body = parts.join(". ");
    while body.contains("..") {
        body = body.replace("..", ".");
    }
    let body = WHITESPACE_RUN.replace_all(&body, " ");
    let body = capitalize_fragments(body.trim());

    if safety_note.is_empty() {
        body
    } else if body.is_empty() {
        format!("IMPORTANT: {safety_note}")
    } else {
        format!("{body}\nIMPORTANT: {safety_note}")
    }
}

fn starts_with_conjunction(text: &str) -> bool {
    let first_word = text
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    CONTINUATION_CONJUNCTIONS.contains(&first_word.as_str())
}

/// Uppercases the first letter of each `". "`-separated fragment, leaving
/// the rest of the fragment untouched.
fn capitalize_fragments(text: &str) -> String {
    text.split(". ")
        .filter(|fragment| !fragment.trim().is_empty())
        .map(|fragment| {
            let fragment = fragment.trim();
            let mut chars = fragment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(". ")
}
