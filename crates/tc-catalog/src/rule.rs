//! Field predicates shared by every rule kind.
//!
//! A rule field left empty (or `None`) is "don't care". A descriptor value
//! that the metadata provider could not determine never exceeds a ceiling,
//! but an unknown container or codec never satisfies a non-empty set.

/// `value` is in `set`, or the set is empty.
pub(crate) fn one_of<T: PartialEq>(value: Option<T>, set: &[T]) -> bool {
    set.is_empty() || value.is_some_and(|v| set.contains(&v))
}

/// Like [`one_of`], but an unknown value also passes.
pub(crate) fn one_of_if_known<T: PartialEq>(value: Option<T>, set: &[T]) -> bool {
    set.is_empty() || value.map_or(true, |v| set.contains(&v))
}

/// `value <= max` when both are known.
pub fn within<T: PartialOrd>(value: Option<T>, max: Option<T>) -> bool {
    match (value, max) {
        (Some(v), Some(m)) => v <= m,
        _ => true,
    }
}

/// `lo <= value <= hi` when both are known.
pub(crate) fn in_range<T: PartialOrd>(value: Option<T>, range: Option<(T, T)>) -> bool {
    match (value, range) {
        (Some(v), Some((lo, hi))) => lo <= v && v <= hi,
        _ => true,
    }
}
