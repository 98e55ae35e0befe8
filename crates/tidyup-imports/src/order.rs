//! Stable keyed ordering with optional case groups.

use std::cmp::Ordering;

use crate::collate::{CaseFirst, CollationOptions, Collator};

/// A sort key extracted from an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Number(usize),
    Text(String),
    /// No usable key. Sorts after every keyed item.
    Missing,
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Text(_) => 1,
            SortKey::Missing => 2,
        }
    }

    fn compare(&self, other: &SortKey, collator: &Collator) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => collator.compare(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaseGroup {
    Punctuation,
    Upper,
    Lower,
}

fn case_group(key: &SortKey) -> CaseGroup {
    let SortKey::Text(text) = key else {
        return CaseGroup::Lower;
    };
    let Some(first) = text.chars().next() else {
        return CaseGroup::Lower;
    };
    if matches!(first, '@' | '$' | '_') {
        return CaseGroup::Punctuation;
    }
    let mut upper = first.to_uppercase();
    if upper.next() == Some(first) && upper.next().is_none() {
        CaseGroup::Upper
    } else {
        CaseGroup::Lower
    }
}

/// Order `items` by the key `key` extracts, returning the permutation as
/// indices into `items`.
///
/// The sort is stable. With `case_groups`, keys starting with `@`, `$` or `_`
/// come first, then keys starting with a lowercase or uppercase character in
/// the order `case_first` picks (lowercase first unless `upper`). Characters
/// without case count as uppercase.
pub fn sort_by_key<T, F>(items: &[T], key: F, options: &CollationOptions) -> Vec<usize>
where
    F: Fn(&T) -> SortKey,
{
    let collator = options.collator();
    let keyed: Vec<(usize, SortKey)> = items.iter().map(&key).enumerate().collect();

    let sort = |mut bucket: Vec<(usize, SortKey)>| -> Vec<usize> {
        bucket.sort_by(|(_, a), (_, b)| a.compare(b, &collator));
        bucket.into_iter().map(|(i, _)| i).collect()
    };

    if !options.case_groups {
        return sort(keyed);
    }

    let mut punctuation = Vec::new();
    let mut upper = Vec::new();
    let mut lower = Vec::new();
    for entry in keyed {
        match case_group(&entry.1) {
            CaseGroup::Punctuation => punctuation.push(entry),
            CaseGroup::Upper => upper.push(entry),
            CaseGroup::Lower => lower.push(entry),
        }
    }

    let (first, second) = if options.case_first == CaseFirst::Upper {
        (upper, lower)
    } else {
        (lower, upper)
    };
    let mut out = sort(punctuation);
    out.extend(sort(first));
    out.extend(sort(second));
    out
}

/// Stable partition of a permutation: indices matching `front` first.
pub fn partition_stable(order: &[usize], front: impl Fn(usize) -> bool) -> Vec<usize> {
    let (mut head, tail): (Vec<usize>, Vec<usize>) = order.iter().partition(|&&i| front(i));
    head.extend(tail);
    head
}

/// Whether `order` is the identity permutation.
pub fn is_identity(order: &[usize]) -> bool {
    order.iter().enumerate().all(|(pos, &i)| pos == i)
}
