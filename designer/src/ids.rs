//! Identifier generator for newly placed controls.
//!
//! Ids are recomputed from whatever is on the canvas right now instead of
//! being drawn from a counter, so deleting or reloading controls can never
//! leave the generator out of step with the canvas.

#[cfg(test)]
#[path = "ids_test.rs"]
mod ids_test;

use std::collections::BTreeSet;

/// Return the id for the next control: the largest numeric id in `existing`
/// plus one, or `"1"` when there is none. Non-numeric ids count as zero.
/// If the largest id is `u64::MAX`, the smallest unused positive number is
/// returned instead.
#[must_use]
pub fn next_id<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: BTreeSet<u64> = existing.into_iter().map(numeric_value).collect();
    let Some(max) = taken.last() else {
        return "1".to_owned();
    };
    match max.checked_add(1) {
        Some(next) => next.to_string(),
        None => smallest_unused(&taken).to_string(),
    }
}

fn numeric_value(id: &str) -> u64 {
    id.trim().parse::<u64>().unwrap_or(0)
}

fn smallest_unused(taken: &BTreeSet<u64>) -> u64 {
    (1..=u64::MAX).find(|n| !taken.contains(n)).unwrap_or(0)
}
