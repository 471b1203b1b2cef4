use crate::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: Path,
    pub desc: bool,
}

impl SortKey {
    pub fn asc(field: Path) -> Self {
        SortKey { field, desc: false }
    }

    pub fn desc(field: Path) -> Self {
        SortKey { field, desc: true }
    }
}

/// A parsed sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sort {
    Key(SortKey),
    /// Keys in priority order
    Composite(Vec<SortKey>),
}

impl Sort {
    pub fn keys(&self) -> &[SortKey] {
        match self {
            Sort::Key(key) => std::slice::from_ref(key),
            Sort::Composite(keys) => keys,
        }
    }

    /// True when sorting reads `field`.
    pub fn is_required(&self, field: &Path) -> bool {
        self.keys().iter().any(|k| k.field.overlaps(field))
    }
}
