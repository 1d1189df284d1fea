//! Identifiers for instrumented rules and guideline clauses.

use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// Rule Identifiers
// =============================================================================

/// Identifier assigned to a rule by the instrumenter.
///
/// Takes one of three shapes:
/// - `1.2.3` for the first rule under a `[1.2.3]` marker
/// - `1.2.3_B`, `1.2.3_C`, ... for subsequent rules under the same marker
/// - `unnamed_4` for rules that appear before any marker
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleId(String);

impl RuleId {
    /// Wraps an existing identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates the identifier of the `ordinal`-th rule (1-based) under `number`.
    ///
    /// The first rule keeps the bare number; later ones get letter suffixes
    /// starting at `B`. Past `Z` the suffix falls back to the ordinal itself.
    #[must_use]
    pub fn numbered(number: &str, ordinal: usize) -> Self {
        if ordinal <= 1 {
            return Self(number.to_string());
        }
        let offset = ordinal - 2;
        let suffix = u8::try_from(offset)
            .ok()
            .and_then(|o| b'B'.checked_add(o))
            .filter(u8::is_ascii_uppercase)
            .map_or_else(|| ordinal.to_string(), |c| char::from(c).to_string());
        Self(format!("{number}_{suffix}"))
    }

    /// Creates the identifier for a rule that appeared before any marker.
    #[must_use]
    pub fn unnamed(index: usize) -> Self {
        Self(format!("unnamed_{index}"))
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier with any `_X` suffix stripped.
    ///
    /// This is the key used to look the rule up in a guideline.
    #[must_use]
    pub fn base(&self) -> &str {
        self.0.split('_').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// =============================================================================
// Clause Identifiers
// =============================================================================

/// A dotted guideline clause identifier such as `1.2.3`.
///
/// Ordering is numeric per component, so `1.10` sorts after `1.9`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClauseId {
    text: String,
    components: Vec<u32>,
}

impl ClauseId {
    /// Parses a dotted identifier. Returns `None` unless every component is numeric.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let components = text
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    None
                } else {
                    part.parse::<u32>().ok()
                }
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            text: text.to_string(),
            components,
        })
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the numeric components.
    #[must_use]
    pub fn components(&self) -> &[u32] {
        &self.components
    }

    /// Number of dot-separated components.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    /// Leaf clauses have at least three components (two dots), e.g. `1.2.3`.
    ///
    /// Section headings such as `1` or `1.2` are not leaves.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.depth() >= 3
    }
}

impl Ord for ClauseId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components
            .cmp(&other.components)
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl PartialOrd for ClauseId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ClauseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
