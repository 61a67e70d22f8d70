//! Sorting keys for block order.
//!
//! Blocks are ordered by their `sortingKey`, compared as plain strings. This
//! module provides:
//! - generation of keys for the i-th block of a freshly converted notebook
//! - a stable sort that never depends on storage order for distinct keys

use crate::errors::{CoreError, CoreResult};

const KEY_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Longest key [`key_for_index`] will produce.
pub const MAX_SORTING_KEY_LEN: usize = 6;

/// Sorting key for the block at position `index`.
///
/// Keys are bijective base-36 numerals of `index + 1`: `0`..`z`, then
/// `00`..`zz`, and so on. Indexes whose key would exceed
/// [`MAX_SORTING_KEY_LEN`] characters are rejected.
///
/// Order is preserved only among keys of the same length. Across a length
/// change string order breaks: index 35 gives `z`, index 36 gives `00`, and
/// `"z" > "00"`. Callers that need more than 36 ordered keys must not mix
/// lengths.
pub fn key_for_index(index: usize) -> CoreResult<String> {
    let base = KEY_ALPHABET.len();
    let mut n = index
        .checked_add(1)
        .ok_or_else(|| CoreError::invalid_argument("sorting key index overflow"))?;
    let mut digits = Vec::new();

    while n > 0 {
        n -= 1;
        digits.push(KEY_ALPHABET[n % base]);
        n /= base;
        if digits.len() > MAX_SORTING_KEY_LEN {
            return Err(CoreError::invalid_argument(format!(
                "sorting key for index {index} exceeds {MAX_SORTING_KEY_LEN} characters"
            )));
        }
    }

    digits.reverse();
    Ok(digits.into_iter().map(char::from).collect())
}

/// Sort items by sorting key. Rust's `sort_by` is stable, so equal keys keep
/// their relative order.
pub fn sort_by_sorting_key<T, F>(items: &mut [T], mut key_fn: F)
where
    F: FnMut(&T) -> &str,
{
    items.sort_by(|a, b| key_fn(a).cmp(key_fn(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_keys() {
        assert_eq!(key_for_index(0).unwrap(), "0");
        assert_eq!(key_for_index(9).unwrap(), "9");
        assert_eq!(key_for_index(10).unwrap(), "a");
        assert_eq!(key_for_index(35).unwrap(), "z");
        assert_eq!(key_for_index(36).unwrap(), "00");
        assert_eq!(key_for_index(37).unwrap(), "01");
    }

    #[test]
    fn longest_key_and_overflow() {
        // 36 + 36^2 + ... + 36^6 keys fit in six characters.
        let fits: usize = (1..=6).map(|p| 36usize.pow(p)).sum();
        assert_eq!(key_for_index(fits - 1).unwrap(), "zzzzzz");
        assert!(key_for_index(fits).is_err());
    }

    #[test]
    fn same_length_keys_sort_in_index_order() {
        let keys: Vec<String> = (36..100).map(|i| key_for_index(i).unwrap()).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn order_breaks_across_key_length() {
        let last_short = key_for_index(35).unwrap();
        let first_long = key_for_index(36).unwrap();
        assert!(last_short > first_long, "{last_short} vs {first_long}");

        let mut keys: Vec<String> = (30..40).map(|i| key_for_index(i).unwrap()).collect();
        sort_by_sorting_key(&mut keys, String::as_str);
        assert_eq!(keys.first().map(String::as_str), Some("00"));
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut v = vec![("b", 1), ("a", 2), ("b", 0)];
        sort_by_sorting_key(&mut v, |x| x.0);
        assert_eq!(v, vec![("a", 2), ("b", 1), ("b", 0)]);
    }
}
