//! Graph nodes and edge attributes.

use std::fmt;

use guidelog_syntax::Atom;

// =============================================================================
// Nodes
// =============================================================================

/// A node in a [`ProgramGraph`](crate::ProgramGraph).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// A predicate instantiation such as `offer("A")`.
    Predicate(Atom),
    /// A synthetic node standing for one choice rule's cardinality bounds.
    Choice {
        /// Minimum number of options that must hold.
        lower_bound: u32,
        /// Maximum number of options that may hold.
        upper_bound: u32,
    },
}

impl Node {
    /// Creates a choice node.
    #[must_use]
    pub fn choice(lower_bound: u32, upper_bound: u32) -> Self {
        Self::Choice {
            lower_bound,
            upper_bound,
        }
    }

    /// Returns the node identity.
    ///
    /// Predicates use their canonical atom text. Choice nodes are keyed by
    /// bounds only, so two choice rules with equal bounds share one node.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Predicate(atom) => atom.to_string(),
            Self::Choice {
                lower_bound,
                upper_bound,
            } => format!("choice_{lower_bound}_{upper_bound}"),
        }
    }

    /// Returns true for synthetic choice nodes.
    #[must_use]
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Choice { .. })
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

// =============================================================================
// Edges
// =============================================================================

/// Structural connection tag carried by `choice` and `and` edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connection {
    /// Choice node to one of its options.
    Choice,
    /// Two literals co-occurring in one rule body.
    And,
}

/// The category an edge is scored under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EdgeKind {
    /// Body literal to head.
    Regular,
    /// Negated body literal to head.
    Negated,
    /// Choice node to option.
    Choice,
    /// Symmetric conjunction signal between body literals.
    And,
}

impl EdgeKind {
    /// All kinds, in scoring order.
    pub const ALL: [Self; 4] = [Self::Regular, Self::Negated, Self::Choice, Self::And];

    /// Lowercase name used in reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Negated => "negated",
            Self::Choice => "choice",
            Self::And => "and",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Attributes accumulated on one directed edge.
///
/// Repeated writes to the same `(source, target)` pair update attributes in
/// place: dependency writes set `negated`, structural writes set
/// `connection`. The category is derived with precedence
/// negated > choice > and > regular.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeAttrs {
    /// Set when the most recent dependency write was negated.
    pub negated: bool,
    /// Most recent structural tag, if any.
    pub connection: Option<Connection>,
}

impl EdgeAttrs {
    /// Returns the category this edge is scored under.
    #[must_use]
    pub fn kind(&self) -> EdgeKind {
        if self.negated {
            return EdgeKind::Negated;
        }
        match self.connection {
            Some(Connection::Choice) => EdgeKind::Choice,
            Some(Connection::And) => EdgeKind::And,
            None => EdgeKind::Regular,
        }
    }
}
