//! Priority bucket: the ordered set of features sharing one status.
//!
//! A bucket holds feature names in priority order, so the name at index `i`
//! has priority `i + 1`. That makes the density invariant (priorities are
//! exactly `1..=N` with no gaps or duplicates) structural: any reachable
//! bucket state satisfies it. The tracker builds a bucket from the features
//! with a given status, runs one of the mutations below, and then writes the
//! resulting rank of each member back onto the cached features.
//!
//! Buckets have no identity of their own; they are rebuilt on demand and
//! discarded after each operation.

/// An ordered, dense-priority collection of feature names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    /// Member names, lowest index = highest precedence (priority 1).
    names: Vec<String>,
}

impl Bucket {
    /// Builds a bucket from names already sorted by priority.
    pub(crate) fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the bucket has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Member names in ascending priority order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// The priority of `name` within this bucket, if it is a member.
    #[must_use]
    pub fn priority_of(&self, name: &str) -> Option<usize> {
        self.position(name).map(|index| index + 1)
    }

    /// Adds `name` at the end of the bucket (priority N+1) and returns its
    /// new priority.
    pub fn append(&mut self, name: impl Into<String>) -> usize {
        self.names.push(name.into());
        self.names.len()
    }

    /// Removes `name`, closing the gap so that every member that ranked
    /// below it moves up by one. Returns the removed member's former
    /// priority.
    ///
    /// # Panics
    /// Panics if `name` is not a member; callers must only remove names they
    /// obtained from this bucket.
    pub fn remove(&mut self, name: &str) -> usize {
        let index = self
            .position(name)
            .unwrap_or_else(|| panic!("feature {name} is not in this bucket"));
        self.names.remove(index);
        index + 1
    }

    /// Moves `name` to the requested priority, clamped into `[1, N]`.
    ///
    /// Only the members strictly between the old and new rank shift, by one
    /// place each, and they keep their relative order. Returns the priority
    /// actually assigned.
    ///
    /// # Panics
    /// Panics if `name` is not a member.
    pub fn change_priority(&mut self, name: &str, requested: i64) -> usize {
        let index = self
            .position(name)
            .unwrap_or_else(|| panic!("feature {name} is not in this bucket"));
        let last = self.names.len() as i64;
        let target = usize::try_from(requested.clamp(1, last)).expect("clamped to >= 1") - 1;
        if target != index {
            let name = self.names.remove(index);
            self.names.insert(target, name);
        }
        target + 1
    }

    /// Index of `name` in the ordered member list.
    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|member| member == name)
    }
}

impl<'a> IntoIterator for &'a Bucket {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter().map(String::as_str)
    }
}
