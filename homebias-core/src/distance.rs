//! Edit distance over sequences of opaque tokens.

/// Levenshtein distance between two token sequences.
///
/// Insertions, deletions and substitutions each cost 1. Tokens are compared
/// with `PartialEq` only, so site codes, strings or characters all work.
pub fn levenshtein<T: PartialEq>(x: &[T], y: &[T]) -> usize {
    let (len_x, len_y) = (x.len(), y.len());

    if len_x == 0 {
        len_y
    } else if len_y == 0 {
        len_x
    } else if len_x < len_y {
        // keep the DP row sized to the shorter sequence
        levenshtein(y, x)
    } else {
        let mut cur = (0..=len_y).collect::<Vec<_>>();

        for (i, cx) in x.iter().enumerate() {
            let mut pre = cur[0];
            cur[0] = i + 1;
            for (j, cy) in y.iter().enumerate() {
                let tmp = cur[j + 1];
                let substitution = pre + usize::from(cx != cy);
                cur[j + 1] = (tmp + 1).min(cur[j] + 1).min(substitution);
                pre = tmp;
            }
        }

        cur[len_y]
    }
}
