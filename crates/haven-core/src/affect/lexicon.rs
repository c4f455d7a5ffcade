//! Phrase tables for the lexical affect classifier.
//!
//! Matching is lowercase substring containment, not tokenization, so
//! "overwhelm" also matches "overwhelmed" and "overwhelming".

use super::model::Emotion;

/// Emotion labels with their associated phrase patterns, in declaration
/// order. Order doubles as the tie-break rule: the first label with the
/// top score wins.
pub const EMOTION_PATTERNS: &[(Emotion, &[&str])] = &[
    (
        Emotion::Neutral,
        &[
            "hello",
            "hi",
            "hey",
            "how are you",
            "good morning",
            "good afternoon",
            "good evening",
        ],
    ),
    (
        Emotion::Anxiety,
        &[
            "anxious", "worried", "panic", "stress", "overwhelm", "nervous", "fear", "tension",
        ],
    ),
    (
        Emotion::Depression,
        &[
            "depress",
            "sad",
            "hopeless",
            "worthless",
            "tired",
            "exhausted",
            "empty",
            "lonely",
        ],
    ),
    (
        Emotion::Anger,
        &[
            "angry",
            "furious",
            "rage",
            "frustrated",
            "irritated",
            "mad",
            "resent",
        ],
    ),
    (
        Emotion::Grief,
        &[
            "loss",
            "grief",
            "miss",
            "gone",
            "death",
            "passed away",
            "mourning",
        ],
    ),
    (
        Emotion::Relationship,
        &[
            "relationship",
            "partner",
            "marriage",
            "divorce",
            "family",
            "friend",
            "conflict",
        ],
    ),
    (
        Emotion::Trauma,
        &[
            "trauma",
            "abuse",
            "ptsd",
            "flashback",
            "nightmare",
            "trigger",
            "assault",
        ],
    ),
    (
        Emotion::SelfEsteem,
        &[
            "confidence",
            "self-worth",
            "ugly",
            "failure",
            "not good enough",
            "shame",
        ],
    ),
    (
        Emotion::Crisis,
        &[
            "suicide",
            "kill myself",
            "better off dead",
            "end it all",
            "no point living",
            "harm myself",
        ],
    ),
];

/// Intensity modifier phrase groups. Each matching group is applied once,
/// additively, to the 0.5 base.
pub const INTENSITY_MODIFIERS: &[(&[&str], f32)] = &[
    (&["very", "really", "extremely", "completely", "always"], 0.3),
    (&["quite", "rather", "fairly", "often"], 0.2),
    (&["sometimes", "occasionally", "a bit", "slightly"], -0.1),
    (&["maybe", "perhaps", "not sure"], -0.2),
];

/// Temporal-urgency markers. Any match adds a flat risk bump.
pub const IMMEDIACY_MARKERS: &[&str] =
    &["right now", "tonight", "plan to", "going to", "decided to"];

/// Counts occurrences of `needle` inside `haystack`, allowing overlaps.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        count += 1;
        start += pos + 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_occurrences_overlapping() {
        assert_eq!(count_occurrences("aaaa", "aa"), 3);
        assert_eq!(count_occurrences("sad and sad", "sad"), 2);
        assert_eq!(count_occurrences("calm", "sad"), 0);
        assert_eq!(count_occurrences("anything", ""), 0);
    }

    #[test]
    fn test_neutral_declared_first() {
        // Declaration order is the documented tie-break order.
        assert_eq!(EMOTION_PATTERNS[0].0, Emotion::Neutral);
        assert_eq!(EMOTION_PATTERNS.last().unwrap().0, Emotion::Crisis);
    }

    #[test]
    fn test_substring_matches_inflections() {
        assert_eq!(count_occurrences("i feel overwhelmed", "overwhelm"), 1);
        assert_eq!(count_occurrences("so depressing", "depress"), 1);
    }
}
