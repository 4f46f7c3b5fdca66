//! Target order of classified members.

use super::member::{Category, Member};
use crate::config::{SortConfig, UnclassifiedPolicy};

/// Compute the target order of `members` as a permutation of their indices.
///
/// Members sort by category rank; ties keep their original relative order.
/// With `sort_fields`, field declarations are additionally ordered by name.
/// With [`UnclassifiedPolicy::Keep`], `other` members keep their index and
/// the classified members fill the remaining slots.
pub fn order(members: &[Member], config: &SortConfig) -> Vec<usize> {
    match config.unclassified {
        UnclassifiedPolicy::Last => sorted_indices(members, 0..members.len(), config),
        UnclassifiedPolicy::Keep => order_keeping_unclassified(members, config),
    }
}

fn sorted_indices(
    members: &[Member],
    indices: impl Iterator<Item = usize>,
    config: &SortConfig,
) -> Vec<usize> {
    let mut indices: Vec<usize> = indices.collect();
    indices.sort_by(|&a, &b| {
        let (left, right) = (&members[a], &members[b]);
        config
            .order
            .rank(left.category)
            .cmp(&config.order.rank(right.category))
            .then_with(|| {
                if config.sort_fields && left.category == Category::Field {
                    left.name.cmp(&right.name)
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .then(left.original_index.cmp(&right.original_index))
    });
    indices
}

fn order_keeping_unclassified(members: &[Member], config: &SortConfig) -> Vec<usize> {
    let classified = (0..members.len()).filter(|&i| members[i].category != Category::Other);
    let mut sorted = sorted_indices(members, classified, config).into_iter();

    (0..members.len())
        .map(|slot| {
            if members[slot].category == Category::Other {
                Some(slot)
            } else {
                sorted.next()
            }
        })
        .collect::<Option<Vec<_>>>()
        .unwrap_or_else(|| (0..members.len()).collect())
}

/// Whether `permutation` leaves every member in place.
pub fn is_identity(permutation: &[usize]) -> bool {
    permutation.iter().enumerate().all(|(i, &p)| i == p)
}
