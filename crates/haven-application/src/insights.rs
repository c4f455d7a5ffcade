//! Therapeutic insight extraction.
//!
//! Simple keyword scans over the reply text; themes feed the session's
//! accumulated theme set and coping strategies feed its discussion log.

/// Recognized therapeutic themes.
const COMMON_THEMES: &[&str] = &[
    "anxiety",
    "depression",
    "relationships",
    "self-esteem",
    "grief",
    "trauma",
    "stress",
    "sleep",
    "anger",
];

/// Recognized coping strategies.
const COPING_STRATEGIES: &[&str] = &[
    "breathing",
    "meditation",
    "exercise",
    "mindfulness",
    "grounding",
    "self-care",
    "therapy",
    "journaling",
];

/// Extracts therapeutic themes mentioned in `text`.
pub fn extract_themes(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    COMMON_THEMES
        .iter()
        .filter(|theme| lower.contains(*theme))
        .map(|theme| (*theme).to_string())
        .collect()
}

/// Extracts coping strategies mentioned in `text`.
pub fn extract_coping_strategies(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    COPING_STRATEGIES
        .iter()
        .filter(|strategy| lower.contains(*strategy))
        .map(|strategy| (*strategy).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_themes() {
        let themes = extract_themes("It sounds like Anxiety around sleep is weighing on you");
        assert_eq!(themes, vec!["anxiety", "sleep"]);
    }

    #[test]
    fn test_extract_coping_strategies() {
        let strategies =
            extract_coping_strategies("Try a breathing exercise, or journaling before bed");
        assert_eq!(strategies, vec!["breathing", "exercise", "journaling"]);
    }

    #[test]
    fn test_no_matches() {
        assert!(extract_themes("nothing relevant here").is_empty());
        assert!(extract_coping_strategies("nothing relevant here").is_empty());
    }
}
