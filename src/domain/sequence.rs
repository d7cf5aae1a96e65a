//! Order-preserving sequence combinators.
//!
//! Every operation here walks its input left to right and emits results in
//! input order. Membership checks for the set-flavored operations use hashed
//! lookups so combining large lists stays linear.

use ahash::AHashSet;
use std::hash::Hash;

/// Error returned when a sequence operation cannot be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// No method is registered under the requested name
    UnknownMethod {
        /// The name that failed to resolve
        name: String,
    },
}

impl std::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceError::UnknownMethod { name } => {
                write!(f, "no method registered under name `{name}`")
            }
        }
    }
}

impl std::error::Error for SequenceError {}

/// Dispatch to a method by name, for the string-name form of [`invoke_named`].
///
/// String slices come with a built-in table: `"to_uppercase"`,
/// `"to_lowercase"`, `"reverse"` and `"trim"`.
pub trait MethodByName {
    /// What the named methods produce.
    type Output;

    /// Invoke the method registered under `name`, if the type has one.
    fn method_by_name(&self, name: &str) -> Option<Self::Output>;
}

impl MethodByName for str {
    type Output = String;

    fn method_by_name(&self, name: &str) -> Option<String> {
        match name {
            "to_uppercase" => Some(self.to_uppercase()),
            "to_lowercase" => Some(self.to_lowercase()),
            "reverse" => Some(self.chars().rev().collect()),
            "trim" => Some(self.trim().to_string()),
            _ => None,
        }
    }
}

impl MethodByName for String {
    type Output = String;

    fn method_by_name(&self, name: &str) -> Option<String> {
        self.as_str().method_by_name(name)
    }
}

impl<T: MethodByName + ?Sized> MethodByName for &T {
    type Output = T::Output;

    fn method_by_name(&self, name: &str) -> Option<Self::Output> {
        (**self).method_by_name(name)
    }
}

/// Apply `f` to every element, collecting the results in input order.
pub fn invoke<T, R, F>(items: &[T], mut f: F) -> Vec<R>
where
    F: FnMut(&T) -> R,
{
    items.iter().map(|item| f(item)).collect()
}

/// Invoke the method registered under `name` on every element, collecting the
/// results in input order.
///
/// # Errors
/// Returns `SequenceError::UnknownMethod` if any element does not recognize
/// `name`. Nothing is returned for the elements before the failure; the
/// operation is all-or-nothing.
pub fn invoke_named<T>(items: &[T], name: &str) -> Result<Vec<T::Output>, SequenceError>
where
    T: MethodByName,
{
    items
        .iter()
        .map(|item| {
            item.method_by_name(name)
                .ok_or_else(|| SequenceError::UnknownMethod {
                    name: name.to_string(),
                })
        })
        .collect()
}

/// An arbitrarily nested sequence, the input shape for [`flatten`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nested<T> {
    /// A leaf value
    Item(T),
    /// A nested list
    List(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    /// Wrap a leaf value.
    pub fn item(value: T) -> Self {
        Nested::Item(value)
    }

    /// Wrap a nested list.
    pub fn list(values: Vec<Nested<T>>) -> Self {
        Nested::List(values)
    }
}

/// Flatten an arbitrarily nested sequence into a single level, depth-first
/// and left to right.
///
/// The traversal uses an explicit stack, so nesting depth is limited by
/// memory rather than by the call stack.
///
/// # Example
/// ```
/// use underkit::domain::sequence::{flatten, Nested};
///
/// let nested = vec![
///     Nested::item(1),
///     Nested::list(vec![Nested::item(2), Nested::list(vec![Nested::item(3)])]),
/// ];
/// assert_eq!(flatten(&nested), [1, 2, 3]);
/// ```
pub fn flatten<T: Clone>(nested: &[Nested<T>]) -> Vec<T> {
    let mut flat = Vec::new();
    let mut stack: Vec<&Nested<T>> = nested.iter().rev().collect();

    while let Some(node) = stack.pop() {
        match node {
            Nested::Item(value) => flat.push(value.clone()),
            Nested::List(children) => stack.extend(children.iter().rev()),
        }
    }

    flat
}

/// Combine lists element-wise by position.
///
/// Row `i` of the result holds position `i` of every input list, in input
/// order. The result is as long as the longest input; shorter lists
/// contribute `None` past their end.
pub fn zip<T: Clone>(lists: &[&[T]]) -> Vec<Vec<Option<T>>> {
    let rows = lists.iter().map(|list| list.len()).max().unwrap_or(0);

    (0..rows)
        .map(|row| lists.iter().map(|list| list.get(row).cloned()).collect())
        .collect()
}

/// Collect the elements of `first` that appear in every list of `others`,
/// in first-list order, each at most once.
pub fn intersection<T>(first: &[T], others: &[&[T]]) -> Vec<T>
where
    T: Hash + Eq + Clone,
{
    let member_sets: Vec<AHashSet<&T>> = others.iter().map(|list| list.iter().collect()).collect();

    let mut taken: AHashSet<&T> = AHashSet::new();
    let mut common = Vec::new();
    for item in first {
        if taken.contains(&item) {
            continue;
        }
        if member_sets.iter().all(|set| set.contains(&item)) {
            taken.insert(item);
            common.push(item.clone());
        }
    }

    common
}

/// Collect the elements of `first` that appear in none of the lists in
/// `others`, in first-list order.
///
/// Unlike [`intersection`] this keeps duplicates from `first`: only
/// membership in `others` removes an element.
pub fn difference<T>(first: &[T], others: &[&[T]]) -> Vec<T>
where
    T: Hash + Eq + Clone,
{
    let excluded: AHashSet<&T> = others.iter().flat_map(|list| list.iter()).collect();

    first
        .iter()
        .filter(|item| !excluded.contains(item))
        .cloned()
        .collect()
}
