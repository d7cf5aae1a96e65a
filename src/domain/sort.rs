//! Stable key-based sorting.
//!
//! All sorters in this module use the decorate-sort-undecorate pattern: each
//! element is paired with its extracted key and original position, the pairs
//! are sorted by `(key, position)`, and the elements are read back out in pair
//! order. The position tiebreak is what guarantees stability, so the
//! underlying comparison sort is free to be unstable.
//!
//! Selectors return `Option<K>`; elements whose selector returns `None` sort
//! after every element with a key, keeping their relative input order.

use crate::domain::ordering::SortKey;

/// Access to named fields for the field-name selector form of sorting.
///
/// Implement this for element types that expose sortable fields by name, then
/// sort with [`sort_by_field`]. String slices come with a built-in `"length"`
/// field (also spelled `"len"`).
pub trait FieldByName {
    /// The extracted field type.
    type Field: Ord;

    /// Extract the field registered under `name`, if the element has it.
    fn field_by_name(&self, name: &str) -> Option<Self::Field>;
}

impl FieldByName for str {
    type Field = usize;

    fn field_by_name(&self, name: &str) -> Option<usize> {
        match name {
            "length" | "len" => Some(self.len()),
            _ => None,
        }
    }
}

impl FieldByName for String {
    type Field = usize;

    fn field_by_name(&self, name: &str) -> Option<usize> {
        self.as_str().field_by_name(name)
    }
}

impl<T: FieldByName + ?Sized> FieldByName for &T {
    type Field = T::Field;

    fn field_by_name(&self, name: &str) -> Option<Self::Field> {
        (**self).field_by_name(name)
    }
}

/// Compute the stable sort order of `items` without moving them.
///
/// # Arguments
/// * `items` - The elements to order
/// * `selector` - Extracts the sort key from each element; `None` means the
///   element has no key and sorts last
///
/// # Returns
/// A permutation of `0..items.len()`: position `i` of the result holds the
/// original index of the element that belongs at position `i` in sorted order.
pub fn sort_indices_by<T, K, F>(items: &[T], mut selector: F) -> Vec<usize>
where
    K: Ord,
    F: FnMut(&T) -> Option<K>,
{
    let mut decorated: Vec<(SortKey<K>, usize)> = items
        .iter()
        .enumerate()
        .map(|(position, item)| (SortKey::from(selector(item)), position))
        .collect();

    // The position tiebreak makes the order total, so an unstable sort is
    // safe here and avoids the allocation a stable sort would make.
    decorated.sort_unstable();

    decorated
        .into_iter()
        .map(|(_, position)| position)
        .collect()
}

/// Sort `items` by key into a new vector, preserving input order among
/// elements whose keys compare equal.
///
/// # Example
/// ```
/// use underkit::domain::sort::sort_by_key;
///
/// let words = ["one", "two", "three", "four", "five"];
/// let by_length = sort_by_key(&words, |word| Some(word.len()));
/// assert_eq!(by_length, ["one", "two", "four", "five", "three"]);
/// ```
pub fn sort_by_key<T, K, F>(items: &[T], selector: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: FnMut(&T) -> Option<K>,
{
    sort_indices_by(items, selector)
        .into_iter()
        .map(|index| items[index].clone())
        .collect()
}

/// Sort `items` by key in place, preserving input order among elements whose
/// keys compare equal.
///
/// Unlike [`sort_by_key`] this never clones elements: the computed order is
/// applied by walking permutation cycles and swapping.
pub fn sort_by_key_in_place<T, K, F>(items: &mut [T], selector: F)
where
    K: Ord,
    F: FnMut(&T) -> Option<K>,
{
    let order = sort_indices_by(items, selector);
    apply_permutation(items, order);
}

/// Sort `items` by the field registered under `name`.
///
/// Elements that do not expose the field sort last, in input order. See
/// [`FieldByName`] for registering fields on a type.
pub fn sort_by_field<T>(items: &[T], name: &str) -> Vec<T>
where
    T: FieldByName + Clone,
{
    sort_by_key(items, |item| item.field_by_name(name))
}

/// Rearrange `items` so that position `i` holds the element that was at
/// `order[i]`, walking each permutation cycle with swaps.
fn apply_permutation<T>(items: &mut [T], mut order: Vec<usize>) {
    for i in 0..items.len() {
        let mut current = i;
        while order[current] != i {
            let next = order[current];
            items.swap(current, next);
            order[current] = current;
            current = next;
        }
        order[current] = current;
    }
}
