//! Order-sensitive equality between maps. Two maps are equal when they hold
//! the same pairs in the same order, regardless of how their hash tables or
//! node stores happen to be laid out.

use crate::OrderedMap;

/// Compares two maps which may or may not exist. Both missing counts as
/// equal, one missing doesn't.
pub fn equal<K, V, S1, S2>(
    x: Option<&OrderedMap<K, V, S1>>,
    y: Option<&OrderedMap<K, V, S2>>,
) -> bool
where
    K: Eq,
    V: PartialEq,
{
    match (x, y) {
        (None, None) => true,
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

impl<K, V, S1, S2> PartialEq<OrderedMap<K, V, S2>> for OrderedMap<K, V, S1>
where
    K: Eq,
    V: PartialEq,
{
    fn eq(&self, other: &OrderedMap<K, V, S2>) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter().zip(other.iter()).all(|(x, y)| x == y)
    }
}

impl<K: Eq, V: Eq, S> Eq for OrderedMap<K, V, S> {}

#[cfg(test)]
mod tests {
    use super::equal;
    use crate::OrderedMap;
    use std::{
        collections::hash_map::{DefaultHasher, RandomState},
        hash::BuildHasherDefault,
    };

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        name: String,
        x: i32,
        y: i32,
    }

    #[test]
    fn test_same_pairs_same_order() {
        let x = OrderedMap::from([("a", 1), ("b", 2)]);
        let y = OrderedMap::from([("a", 1), ("b", 2)]);
        assert_eq!(x, y);
        assert!(equal(Some(&x), Some(&y)));
    }

    #[test]
    fn test_order_matters() {
        let x = OrderedMap::from([("a", 1), ("b", 2)]);
        let y = OrderedMap::from([("b", 2), ("a", 1)]);
        assert_ne!(x, y);
        assert!(!equal(Some(&x), Some(&y)));
    }

    #[test]
    fn test_values_compared_deeply() {
        let point = Point {
            name: "origin".to_owned(),
            x: 0,
            y: 0,
        };
        let x = OrderedMap::from([("p", point.clone())]);
        let mut y = OrderedMap::from([("p", point)]);
        assert_eq!(x, y);

        if let Some(p) = y.get_mut("p") {
            p.y = 1;
        }
        assert_ne!(x, y);
    }

    #[test]
    fn test_length_mismatch() {
        let x = OrderedMap::from([("a", 1), ("b", 2)]);
        let y = OrderedMap::from([("a", 1)]);
        assert_ne!(x, y);
        assert_ne!(y, x);
    }

    #[test]
    fn test_missing_maps() {
        let x = OrderedMap::from([("a", 1)]);
        assert!(equal::<&str, i32, RandomState, RandomState>(None, None));
        assert!(!equal(Some(&x), None::<&OrderedMap<&str, i32>>));
        assert!(!equal(None::<&OrderedMap<&str, i32>>, Some(&x)));
    }

    #[test]
    fn test_layout_does_not_matter() {
        // same logical order, reached through different node layouts and
        // different hashers
        let mut x: OrderedMap<u64, u64> = OrderedMap::new();
        x.set(3, 3).set(1, 1).set(2, 2);
        x.move_to_back(&3).unwrap();

        let mut y: OrderedMap<u64, u64, BuildHasherDefault<DefaultHasher>> =
            OrderedMap::default();
        y.set(9, 9).set(1, 1).set(2, 2).set(3, 3);
        y.remove(&9);

        assert_eq!(x, y);
    }
}
