// src/query/paginate.rs

/// Slice `items[offset .. offset + limit]`, clamped to the slice bounds.
///
/// Offsets past the end give an empty slice. Negative values are clamped to
/// zero, so a negative limit also gives an empty slice.
pub fn paginate<T>(items: &[T], offset: i64, limit: i64) -> &[T] {
    let len = items.len();
    let start = clamp_to_len(offset, len);
    let end = start.saturating_add(clamp_to_len(limit, len)).min(len);
    &items[start..end]
}

fn clamp_to_len(n: i64, len: usize) -> usize {
    usize::try_from(n.max(0)).map_or(len, |n| n.min(len))
}
