/// Offer codes whose shares are fixed regardless of type text
/// (guest 1 fully comped, guest 2 at half fare).
pub const SHARE_OVERRIDE_CODES: &[&str] = &["2511A06", "25NOV106"];

/// Shares assumed when no rule matches: a full room for two
pub const DEFAULT_COMPED_SHARES: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct ShareRule {
    pub name: &'static str,
    pub condition: ShareCondition,
    pub shares: f64,
}

#[derive(Debug, Clone)]
pub enum ShareCondition {
    /// Exact match on the trimmed offer code
    CodeIn(&'static [&'static str]),
    /// Case-folded offer type text contains any of the phrases
    TextContainsAny(&'static [&'static str]),
}

/// Estimates how many of the two required fares an offer covers.
///
/// Rules are evaluated top to bottom and the first match wins. The order
/// matters: "room for two" must be seen before any discount phrase and
/// 75% before 50% before 25%.
pub struct CompedShareEstimator {
    rules: Vec<ShareRule>,
}

impl CompedShareEstimator {
    pub fn new(rules: Vec<ShareRule>) -> Self {
        Self { rules }
    }

    pub fn estimate(&self, offer_code: &str, type_text: &str) -> f64 {
        self.matching_rule(offer_code, type_text)
            .map(|rule| rule.shares)
            .unwrap_or(DEFAULT_COMPED_SHARES)
    }

    pub fn matching_rule(&self, offer_code: &str, type_text: &str) -> Option<&ShareRule> {
        let code = offer_code.trim();
        let text = type_text.to_lowercase();
        self.rules.iter().find(|rule| Self::matches(&rule.condition, code, &text))
    }

    fn matches(condition: &ShareCondition, code: &str, text: &str) -> bool {
        match condition {
            ShareCondition::CodeIn(codes) => codes.contains(&code),
            ShareCondition::TextContainsAny(phrases) => phrases.iter().any(|p| text.contains(p)),
        }
    }
}

impl Default for CompedShareEstimator {
    fn default() -> Self {
        Self::new(get_default_share_rules())
    }
}

/// True when `code` is one of the hard-coded share overrides
pub fn is_override_code(code: &str) -> bool {
    SHARE_OVERRIDE_CODES.contains(&code.trim())
}

pub fn get_default_share_rules() -> Vec<ShareRule> {
    vec![
        ShareRule {
            name: "Legacy override codes",
            condition: ShareCondition::CodeIn(SHARE_OVERRIDE_CODES),
            shares: 1.5,
        },
        ShareRule {
            name: "Room for two",
            condition: ShareCondition::TextContainsAny(&[
                "room for two",
                "stateroom for 2",
                "cabin for two",
                "balcony room for two",
                "ocean view or interior room for two",
            ]),
            shares: 2.0,
        },
        ShareRule {
            name: "Guest pays full fare",
            condition: ShareCondition::TextContainsAny(&["guest pays full", "full fare for guest"]),
            shares: 1.0,
        },
        ShareRule {
            name: "Guest 75% off",
            condition: ShareCondition::TextContainsAny(&["75% off", "75% discount"]),
            shares: 1.75,
        },
        ShareRule {
            name: "Guest 50% off",
            condition: ShareCondition::TextContainsAny(&["50% off", "half off", "50% discount"]),
            shares: 1.5,
        },
        ShareRule {
            name: "Guest 25% off",
            condition: ShareCondition::TextContainsAny(&["25% off", "25% discount"]),
            shares: 1.25,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_code_beats_text() {
        let estimator = CompedShareEstimator::default();
        assert_eq!(estimator.estimate("2511A06", "Room for Two"), 1.5);
        assert_eq!(estimator.estimate(" 25NOV106 ", ""), 1.5);
    }

    #[test]
    fn test_text_rules() {
        let estimator = CompedShareEstimator::default();
        assert_eq!(estimator.estimate("X1", "Balcony Room For Two"), 2.0);
        assert_eq!(estimator.estimate("X1", "Stateroom for 2"), 2.0);
        assert_eq!(estimator.estimate("X1", "Second guest pays full fare"), 1.0);
        assert_eq!(estimator.estimate("X1", "Guest 75% OFF"), 1.75);
        assert_eq!(estimator.estimate("X1", "Half off for guest"), 1.5);
        assert_eq!(estimator.estimate("X1", "25% discount"), 1.25);
        assert_eq!(estimator.estimate("X1", "Free Play"), DEFAULT_COMPED_SHARES);
    }

    #[test]
    fn test_priority_not_specificity() {
        let estimator = CompedShareEstimator::default();
        // Both phrases present: the earlier rule decides
        assert_eq!(estimator.estimate("X1", "room for two, guest pays full"), 2.0);
        assert_eq!(estimator.estimate("X1", "guest pays full or 50% off"), 1.0);
        assert_eq!(estimator.estimate("X1", "75% off, then 25% off"), 1.75);
    }

    #[test]
    fn test_matching_rule_name() {
        let estimator = CompedShareEstimator::default();
        let rule = estimator.matching_rule("X1", "50% discount").unwrap();
        assert_eq!(rule.name, "Guest 50% off");
        assert!(estimator.matching_rule("X1", "mystery").is_none());
        assert!(is_override_code("2511A06"));
        assert!(!is_override_code("2511A07"));
    }
}
