//! Key ordering for the stable sorters.

use std::cmp::Ordering;

/// A sort key extracted from an element, which may be absent.
///
/// Absent keys compare greater than every present key, so elements without a
/// key sort to the end of the output. Among themselves, absent keys compare
/// equal and keep their relative input order.
///
/// # Example
/// ```
/// use underkit::domain::ordering::SortKey;
///
/// assert!(SortKey::Present(3) < SortKey::Present(7));
/// assert!(SortKey::Present(i64::MAX) < SortKey::Absent);
/// assert_eq!(SortKey::<i64>::Absent, SortKey::Absent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey<K> {
    /// A key extracted from the element
    Present(K),
    /// No key could be extracted (the selector returned `None`)
    Absent,
}

impl<K> SortKey<K> {
    /// Check if this key is present.
    pub fn is_present(&self) -> bool {
        matches!(self, SortKey::Present(_))
    }

    /// Check if this key is absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, SortKey::Absent)
    }
}

impl<K> From<Option<K>> for SortKey<K> {
    fn from(key: Option<K>) -> Self {
        match key {
            Some(key) => SortKey::Present(key),
            None => SortKey::Absent,
        }
    }
}

impl<K: Ord> Ord for SortKey<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Present(a), SortKey::Present(b)) => a.cmp(b),
            (SortKey::Present(_), SortKey::Absent) => Ordering::Less,
            (SortKey::Absent, SortKey::Present(_)) => Ordering::Greater,
            (SortKey::Absent, SortKey::Absent) => Ordering::Equal,
        }
    }
}

impl<K: Ord> PartialOrd for SortKey<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
