//! Headsign merge rules.
//!
//! Routes without a reference pass their feed headsigns through. When trips
//! of one direction carry different labels (a short-turn "6 Mile Only" next
//! to the full "Balfour" run), a per-route rule picks the canonical label.
//! Lookup is a total function: a pair no rule covers yields
//! `MergeOutcome::NoRuleMatched` rather than an error.

use std::collections::HashMap;

use crate::domain::RouteId;
use crate::reference::COMMUNITY_COMPLEX;

/// A declarative merge rule: any two labels from `labels` merge into
/// `canonical`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRule {
    labels: Vec<String>,
    canonical: String,
}

impl MergeRule {
    /// Create a rule.
    pub fn new(labels: Vec<String>, canonical: impl Into<String>) -> Self {
        Self {
            labels,
            canonical: canonical.into(),
        }
    }

    /// Returns true if both labels are acceptable for this rule.
    pub fn accepts(&self, a: &str, b: &str) -> bool {
        self.labels.iter().any(|l| l == a) && self.labels.iter().any(|l| l == b)
    }

    /// Returns the canonical label.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

/// Result of merging two headsigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome<'a> {
    /// Both labels are covered by a rule; use this label for both.
    Merged(&'a str),
    /// The labels are identical; nothing to merge.
    Same,
    /// No rule of the route covers this pair.
    NoRuleMatched,
}

/// Merge rules keyed by route.
#[derive(Debug, Clone, Default)]
pub struct HeadsignMergeRules {
    rules: HashMap<RouteId, Vec<MergeRule>>,
}

impl HeadsignMergeRules {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule to a route. Earlier rules take precedence.
    pub fn add(&mut self, route_id: RouteId, rule: MergeRule) {
        self.rules.entry(route_id).or_default().push(rule);
    }

    /// Builder-style variant of `add`.
    pub fn with_rule(mut self, route_id: u64, labels: &[&str], canonical: &str) -> Self {
        let labels = labels.iter().map(|l| l.to_string()).collect();
        self.add(RouteId(route_id), MergeRule::new(labels, canonical));
        self
    }

    /// Merge two headsigns of the same route and direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_splitter::domain::RouteId;
    /// use route_splitter::headsign::{HeadsignMergeRules, MergeOutcome};
    ///
    /// let rules = HeadsignMergeRules::new()
    ///     .with_rule(10, &["6 Mile Only", "Balfour"], "Balfour");
    ///
    /// assert_eq!(
    ///     rules.merge(RouteId(10), "6 Mile Only", "Balfour"),
    ///     MergeOutcome::Merged("Balfour")
    /// );
    /// assert_eq!(
    ///     rules.merge(RouteId(10), "6 Mile Only", "Nelson"),
    ///     MergeOutcome::NoRuleMatched
    /// );
    /// ```
    pub fn merge(&self, route_id: RouteId, a: &str, b: &str) -> MergeOutcome<'_> {
        if a == b {
            return MergeOutcome::Same;
        }
        self.rules
            .get(&route_id)
            .and_then(|rules| rules.iter().find(|r| r.accepts(a, b)))
            .map_or(MergeOutcome::NoRuleMatched, |r| {
                MergeOutcome::Merged(r.canonical())
            })
    }

    /// Returns the total number of rules.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Merge rules for the West Kootenay Transit System routes.
pub fn west_kootenay_merge_rules() -> HeadsignMergeRules {
    let cc_31 = format!("31 {COMMUNITY_COMPLEX}");
    HeadsignMergeRules::new()
        .with_rule(10, &["6 Mile Only", "Balfour"], "Balfour")
        .with_rule(20, &["Slocan & Perry's", "Slocan City"], "Slocan City")
        .with_rule(20, &["Playmor & Perry's", "Playmor Jct"], "Playmor Jct")
        .with_rule(31, &["32 Columbia", "Downtown"], "Downtown")
        .with_rule(
            32,
            &["31 N Castlegar", cc_31.as_str(), COMMUNITY_COMPLEX],
            COMMUNITY_COMPLEX,
        )
        .with_rule(32, &["Celgar Only", "Celgar & Robson", "Robson"], "Robson")
        .with_rule(33, &["98 Trail", COMMUNITY_COMPLEX], COMMUNITY_COMPLEX)
        .with_rule(33, &["36 Ootischenia", "Selkirk Coll"], "Selkirk Coll")
        .with_rule(
            36,
            &["Selkirk Coll", COMMUNITY_COMPLEX, "Ootischenia"],
            "Ootischenia",
        )
        .with_rule(43, &["Waneta Only", "Trail"], "Trail")
        .with_rule(43, &["Waneta / Walmart", "Fruitvale"], "Fruitvale")
        .with_rule(44, &["KBR Hosp Only", "Trail", "Sunningdale"], "Sunningdale")
        .with_rule(76, &["Balfour Only", "Nelson"], "Nelson")
        .with_rule(
            99,
            &["20 Slocan Vly", "Playmor Jct", "Selk Coll - C'gar"],
            "Selk Coll - C'gar",
        )
}
