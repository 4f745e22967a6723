//! Cross-stack residue collected while stacks are torn down

/// Function names and cluster ids whose log groups outlive their stacks.
///
/// Forms a monoid under [`merge`](Self::merge) with [`Default`] as identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupAccumulator {
    pub function_names: Vec<String>,
    pub cluster_ids: Vec<String>,
}

impl CleanupAccumulator {
    pub fn is_empty(&self) -> bool {
        self.function_names.is_empty() && self.cluster_ids.is_empty()
    }

    /// Concatenate `other` after `self`
    pub fn merge(mut self, other: CleanupAccumulator) -> CleanupAccumulator {
        self.function_names.extend(other.function_names);
        self.cluster_ids.extend(other.cluster_ids);
        self
    }
}
