/// Outcome of restoring one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub category: &'static str,
    /// Records written onto (or spawned as) a live entity.
    pub applied: usize,
    /// Names with no live match (match-in-place categories).
    pub missed: Vec<String>,
    /// Records that could not be resolved to a prefab or decoded.
    pub failed: usize,
}

impl RestoreReport {
    pub fn new(category: &'static str) -> Self {
        Self {
            category,
            ..Default::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.missed.is_empty() && self.failed == 0
    }
}

/// Per-category reports of one `restore_level` pass, in restore order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelRestoreReport {
    pub categories: Vec<RestoreReport>,
}

impl LevelRestoreReport {
    pub fn category(&self, name: &str) -> Option<&RestoreReport> {
        self.categories.iter().find(|r| r.category == name)
    }

    pub fn total_applied(&self) -> usize {
        self.categories.iter().map(|r| r.applied).sum()
    }

    pub fn total_missed(&self) -> usize {
        self.categories.iter().map(|r| r.missed.len()).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.categories.iter().map(|r| r.failed).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.categories.iter().all(RestoreReport::is_clean)
    }
}
