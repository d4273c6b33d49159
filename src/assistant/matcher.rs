use super::rules::{FallbackGroup, IntentRule, ENGLISH_FALLBACKS, GENERIC_HELP, INTENT_RULES};

/// Maps raw chat input to a canned reply. Pure and deterministic.
pub fn reply_for(input: &str) -> &'static str {
    let normalized = input.to_lowercase();

    if let Some(rule) = first_matching_rule(INTENT_RULES, &normalized) {
        tracing::debug!(target: "assistant", intent = rule.id, language = rule.language, "intent matched");
        return rule.reply;
    }

    first_matching_fallback(ENGLISH_FALLBACKS, &normalized)
        .map(|group| group.reply)
        .unwrap_or(GENERIC_HELP.as_str())
}

/// Table order decides; the first rule with any keyword hit wins even when a
/// later rule would match more of the input.
pub fn first_matching_rule<'a>(rules: &'a [IntentRule], normalized: &str) -> Option<&'a IntentRule> {
    rules
        .iter()
        .find(|rule| contains_any(normalized, rule.keywords))
}

fn first_matching_fallback<'a>(
    groups: &'a [FallbackGroup],
    normalized: &str,
) -> Option<&'a FallbackGroup> {
    groups
        .iter()
        .find(|group| contains_any(normalized, group.keywords))
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}
