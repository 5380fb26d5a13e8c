//! Sparse sequence helpers.
//!
//! Holes are modelled as `None`. Callbacks receive the present value, its
//! index and the whole slice, and are never invoked for holes.

/// Collect the present values for which `pred` returns `true`.
///
/// The output is compacted: holes and rejected values leave no trace.
pub fn filter<T, F>(items: &[Option<T>], mut pred: F) -> Vec<T>
where
    T: Clone,
    F: FnMut(&T, usize, &[Option<T>]) -> bool,
{
    let mut out = Vec::with_capacity(items.len());
    for (i, slot) in items.iter().enumerate() {
        if let Some(value) = slot {
            if pred(value, i, items) {
                out.push(value.clone());
            }
        }
    }
    out.shrink_to_fit();
    out
}

/// Map every present value, keeping holes where they were.
pub fn map<T, U, F>(items: &[Option<T>], mut f: F) -> Vec<Option<U>>
where
    F: FnMut(&T, usize, &[Option<T>]) -> U,
{
    items
        .iter()
        .enumerate()
        .map(|(i, slot)| slot.as_ref().map(|value| f(value, i, items)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_skips_holes_and_compacts() {
        let items = [Some(1), None, Some(4), Some(7), None];
        let mut seen = Vec::new();
        let odd = filter(&items, |v, i, _| {
            seen.push(i);
            v % 2 == 1
        });
        assert_eq!(odd, vec![1, 7]);
        assert_eq!(seen, vec![0, 2, 3]);
    }

    #[test]
    fn filter_sees_whole_slice() {
        let items = [Some(3), Some(1), Some(2)];
        let above_first = filter(&items, |v, _, all| Some(*v) > all[0]);
        assert!(above_first.is_empty());
    }

    #[test]
    fn map_preserves_length_and_holes() {
        let items = [Some("a"), None, Some("bc")];
        let lens = map(&items, |s, i, _| s.len() + i);
        assert_eq!(lens, vec![Some(1), None, Some(4)]);
    }

    #[test]
    fn map_of_empty_is_empty() {
        let items: [Option<u8>; 0] = [];
        assert!(map(&items, |v, _, _| *v).is_empty());
    }
}
