use shared_models::clinic::RiskLevel;

const HIGH_KEYWORDS: &[&str] = &[
    "infection", "infected", "bleeding", "pus", "diabetic", "diabetes", "ulcer", "fever",
    "spreading", "numbness",
];

const MEDIUM_KEYWORDS: &[&str] = &[
    "pain", "painful", "swelling", "swollen", "ingrown", "inflamed", "discomfort", "redness",
];

/// Maps a chatbot-supplied urgency answer onto a risk level.
pub fn parse_explicit_risk(value: &str) -> Option<RiskLevel> {
    match value.trim().to_lowercase().as_str() {
        "high" | "urgent" | "severe" | "critical" | "true" => Some(RiskLevel::High),
        "medium" | "moderate" => Some(RiskLevel::Medium),
        "low" | "routine" | "mild" | "false" => Some(RiskLevel::Low),
        _ => None,
    }
}

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| keywords.contains(&word))
}

/// Explicit answer wins; otherwise keyword triage over the free-text fields.
pub fn assess_risk(explicit: Option<&str>, texts: &[Option<&str>]) -> RiskLevel {
    if let Some(level) = explicit.and_then(parse_explicit_risk) {
        return level;
    }

    let corpus = texts
        .iter()
        .flatten()
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    if mentions_any(&corpus, HIGH_KEYWORDS) {
        RiskLevel::High
    } else if mentions_any(&corpus, MEDIUM_KEYWORDS) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_answer_overrides_keywords() {
        assert_eq!(assess_risk(Some("Routine"), &[Some("infected toe")]), RiskLevel::Low);
        assert_eq!(assess_risk(Some("URGENT"), &[None]), RiskLevel::High);
    }

    #[test]
    fn unrecognised_explicit_answer_falls_back_to_keywords() {
        assert_eq!(
            assess_risk(Some("not sure"), &[Some("Ingrown toenail"), Some("quite painful")]),
            RiskLevel::Medium
        );
    }

    #[test]
    fn high_keywords_win_over_medium() {
        assert_eq!(
            assess_risk(None, &[Some("Painful swelling"), Some("I am diabetic")]),
            RiskLevel::High
        );
    }

    #[test]
    fn keywords_match_whole_words_only() {
        // "pushed" must not match "pus"
        assert_eq!(assess_risk(None, &[Some("I pushed my shoe")]), RiskLevel::Low);
        assert_eq!(assess_risk(None, &[]), RiskLevel::Low);
    }
}
