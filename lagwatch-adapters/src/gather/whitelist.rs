use std::collections::BTreeSet;

/// Names a level is allowed to visit. Empty means no restriction.
///
/// Entries that match nothing are ignored: a whitelist may name resources
/// that do not exist right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    allowed: BTreeSet<String>,
}

impl Whitelist {
    /// A whitelist that allows every name.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// A whitelist of exactly these names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: names.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the whitelist restricts anything.
    pub fn is_restricted(&self) -> bool {
        !self.allowed.is_empty()
    }

    /// True when `name` may be visited.
    pub fn allows(&self, name: &str) -> bool {
        !self.is_restricted() || self.allowed.contains(name)
    }

    /// Keep the candidates this whitelist allows, in candidate order.
    pub fn filter(&self, candidates: &[String]) -> Vec<String> {
        if !self.is_restricted() {
            return candidates.to_vec();
        }
        candidates
            .iter()
            .filter(|name| self.allowed.contains(name.as_str()))
            .cloned()
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Whitelist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Intersect `candidates` with `allowed`, keeping candidate order.
/// An empty `allowed` returns the candidates unchanged.
pub fn filter(candidates: &[String], allowed: &[String]) -> Vec<String> {
    Whitelist::new(allowed.iter().cloned()).filter(candidates)
}
