//! View derivers - pure presentation helpers over collection snapshots.
//!
//! Sorting, pagination windows, and aggregate totals are computed here, not
//! stored: the cached collection keeps server order, and screens derive
//! whatever shape they render from a snapshot. Every function is
//! referentially transparent and total over incomplete data.

/// The contiguous page `[(page_number - 1) * page_size, page_number * page_size)`.
///
/// Callers clamp `page_number` to `[1, page_count(..)]`; out-of-range input
/// yields an empty slice rather than a panic, and `page_size == 0` yields
/// an empty slice.
pub fn page<T>(items: &[T], page_size: usize, page_number: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = page_number.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages a collection of `len` items spans: `ceil(len / page_size)`.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Sum of `price * quantity` over cart lines.
///
/// `line` extracts `(unit_price, quantity)`; a missing price counts as
/// zero, so a cart with half-loaded product data still totals.
pub fn cart_total<T>(items: &[T], line: impl Fn(&T) -> (Option<f64>, u32)) -> f64 {
    items
        .iter()
        .map(|item| {
            let (price, quantity) = line(item);
            price.unwrap_or(0.0) * f64::from(quantity)
        })
        .sum()
}

/// The `limit` items with the greatest key, in descending key order.
///
/// The sort is stable: items with equal keys keep their collection order.
pub fn most_recent<T: Clone, K: Ord>(
    items: &[T],
    limit: usize,
    key: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut ordered: Vec<&T> = items.iter().collect();
    ordered.sort_by(|a, b| key(b).cmp(&key(a)));
    ordered.into_iter().take(limit).cloned().collect()
}
