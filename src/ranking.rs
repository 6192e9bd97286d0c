use std::cmp::Reverse;

use crate::dates::sort_key;
use crate::models::UpdateItem;

/// Keep the first `cap` items a source produced, in source order
pub fn cap_per_source(mut items: Vec<UpdateItem>, cap: usize) -> Vec<UpdateItem> {
    items.truncate(cap);
    items
}

/// Drop undated items, sort newest first and keep the top `max_items`.
///
/// Only literally empty dates are dropped. Dates that fail to parse stay in
/// and rank as time zero; the sort is stable so ties keep pooled order.
pub fn rank(pool: Vec<UpdateItem>, max_items: usize) -> Vec<UpdateItem> {
    let mut ranked: Vec<UpdateItem> = pool.into_iter().filter(UpdateItem::has_date).collect();
    ranked.sort_by_cached_key(|item| Reverse(sort_key(&item.date)));
    ranked.truncate(max_items);
    ranked
}
