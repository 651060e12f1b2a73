//! Property-based tests for the edit distance.
//!
//! Levenshtein is a metric, so identity, symmetry and the triangle
//! inequality must hold for any token sequences.

use homebias_core::distance::levenshtein;
use proptest::prelude::*;

/// Short sequences over a small alphabet so that sequences share tokens
fn arb_sequence() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..6, 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn distance_is_symmetric(a in arb_sequence(), b in arb_sequence()) {
        prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
    }

    #[test]
    fn distance_to_self_is_zero(a in arb_sequence()) {
        prop_assert_eq!(levenshtein(&a, &a), 0);
    }

    #[test]
    fn distance_to_empty_is_length(a in arb_sequence()) {
        let empty: Vec<u32> = Vec::new();
        prop_assert_eq!(levenshtein(&a, &empty), a.len());
        prop_assert_eq!(levenshtein(&empty, &a), a.len());
    }

    #[test]
    fn triangle_inequality_holds(
        a in arb_sequence(),
        b in arb_sequence(),
        c in arb_sequence(),
    ) {
        let ac = levenshtein(&a, &c);
        let ab = levenshtein(&a, &b);
        let bc = levenshtein(&b, &c);
        prop_assert!(ac <= ab + bc, "d(a,c)={} > d(a,b)={} + d(b,c)={}", ac, ab, bc);
    }

    #[test]
    fn distance_bounded_by_longer_length(a in arb_sequence(), b in arb_sequence()) {
        let d = levenshtein(&a, &b);
        prop_assert!(d <= a.len().max(b.len()));
        prop_assert!(d >= a.len().abs_diff(b.len()));
    }
}

// ============================================================================
// Fixed Cases
// ============================================================================

#[test]
fn test_single_substitution() {
    assert_eq!(levenshtein(&[1, 2, 3], &[1, 9, 3]), 1);
}

#[test]
fn test_swapped_pair_needs_two_edits() {
    assert_eq!(levenshtein(&[1, 2], &[2, 1]), 2);
}

#[test]
fn test_prefix_needs_insertions_only() {
    assert_eq!(levenshtein(&[1, 2], &[1, 2, 3]), 1);
    assert_eq!(levenshtein(&[2, 1], &[1, 2, 3]), 2);
}

#[test]
fn test_disjoint_sequences() {
    assert_eq!(levenshtein(&[1, 2, 3], &[4, 5, 6, 7]), 4);
}
