//! Strategies: the behavioral genotypes that reproduction selects between.
//!
//! A [`Strategy`] is an opaque bundle of configuration that the mind service
//! interprets. The engine never looks inside it beyond equality: two players
//! holding strategies with identical fields share a genotype.

use serde::{Deserialize, Serialize};

/// A named behavioral configuration assigned to a player.
///
/// Equality, ordering, and hashing are by value over every field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Strategy {
    /// Policy the mind follows when this player is the donor.
    pub donor_strategy: String,
    /// Policy the mind follows when this player is not the donor.
    pub non_donor_strategy: String,
    /// How the mind weighs gossip and observations when forming trust.
    pub trust_model: String,
    /// Free-form options passed through to the mind unchanged.
    #[serde(default)]
    pub options: Vec<String>,
}

impl Strategy {
    /// Create a strategy with no options.
    pub fn new(
        donor_strategy: impl Into<String>,
        non_donor_strategy: impl Into<String>,
        trust_model: impl Into<String>,
    ) -> Self {
        Self {
            donor_strategy: donor_strategy.into(),
            non_donor_strategy: non_donor_strategy.into(),
            trust_model: trust_model.into(),
            options: Vec::new(),
        }
    }

    /// Attach free-form options to the strategy.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Name of the first required field that is blank, if any.
    ///
    /// The mind service cannot register an agent without all three policy
    /// fields, so a blank one is treated as missing.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("donor_strategy", &self.donor_strategy),
            ("non_donor_strategy", &self.non_donor_strategy),
            ("trust_model", &self.trust_model),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// One entry of a population composition: a strategy and how many players
/// hold it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyCount {
    /// The strategy.
    pub strategy: Strategy,
    /// Number of players holding it.
    pub count: u32,
}

impl StrategyCount {
    /// Create a composition entry.
    pub const fn new(strategy: Strategy, count: u32) -> Self {
        Self { strategy, count }
    }
}

/// Total number of players described by a composition.
pub fn total_population(composition: &[StrategyCount]) -> u64 {
    composition
        .iter()
        .fold(0u64, |acc, entry| acc.saturating_add(u64::from(entry.count)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategies_compare_by_value() {
        let a = Strategy::new("stranger_discriminator", "promote_self", "naive_trust");
        let b = Strategy::new("stranger_discriminator", "promote_self", "naive_trust");
        let c = b.clone().with_options(["forgiving"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn blank_field_is_reported_missing() {
        let complete = Strategy::new("cooperator", "lazy", "naive_trust");
        assert_eq!(complete.missing_field(), None);

        let blank = Strategy::new("cooperator", "  ", "naive_trust");
        assert_eq!(blank.missing_field(), Some("non_donor_strategy"));
    }

    #[test]
    fn options_default_when_absent() {
        let json = r#"{"donor_strategy":"defector","non_donor_strategy":"lazy","trust_model":"void"}"#;
        let parsed: Result<Strategy, _> = serde_json::from_str(json);
        assert!(parsed.is_ok_and(|s| s.options.is_empty()));
    }

    #[test]
    fn population_sums_counts() {
        let s1 = Strategy::new("cooperator", "lazy", "void");
        let s2 = Strategy::new("defector", "lazy", "void");
        let composition = vec![StrategyCount::new(s1, 6), StrategyCount::new(s2, 4)];
        assert_eq!(total_population(&composition), 10);
        assert_eq!(total_population(&[]), 0);
    }
}
