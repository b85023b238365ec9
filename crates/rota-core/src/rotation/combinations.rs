//! k-combinations of a member pool, in lexicographic index order.

/// Iterator over every `k`-element combination of `items`.
///
/// Combinations come out in lexicographic order of positions, so the first
/// one is `items[..k]`. Order of the input decides tie-breaking downstream.
pub struct Combinations<'a, T> {
    items: &'a [T],
    indices: Vec<usize>,
    done: bool,
}

impl<'a, T: Copy> Combinations<'a, T> {
    pub fn new(items: &'a [T], k: usize) -> Self {
        Self {
            items,
            indices: (0..k).collect(),
            done: k == 0 || k > items.len(),
        }
    }
}

impl<T: Copy> Iterator for Combinations<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.iter().map(|&i| self.items[i]).collect();

        // Advance: find the rightmost index that can still move right.
        let n = self.items.len();
        let k = self.indices.len();
        match (0..k).rev().find(|&i| self.indices[i] != i + n - k) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }
        Some(current)
    }
}

/// `n choose k`, saturating at `u128::MAX`.
pub fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // result * (n - i) / (i + 1) stays integral at every step.
        result = match result.checked_mul((n - i) as u128) {
            Some(v) => v / (i as u128 + 1),
            None => return u128::MAX,
        };
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn pairs_of_four_in_order() {
        let pairs: Vec<Vec<u8>> = Combinations::new(&[1, 2, 3, 4], 2).collect();
        assert_eq!(
            pairs,
            vec![
                vec![1, 2],
                vec![1, 3],
                vec![1, 4],
                vec![2, 3],
                vec![2, 4],
                vec![3, 4],
            ]
        );
    }

    #[test]
    fn k_larger_than_pool_yields_nothing() {
        assert_eq!(Combinations::new(&[1, 2], 3).count(), 0);
        assert_eq!(Combinations::new(&[1, 2], 0).count(), 0);
    }

    #[test]
    fn full_pool_is_a_single_combination() {
        let all: Vec<Vec<u8>> = Combinations::new(&[7, 8, 9], 3).collect();
        assert_eq!(all, vec![vec![7, 8, 9]]);
    }

    #[rstest]
    #[case(4, 2, 6)]
    #[case(5, 3, 10)]
    #[case(10, 1, 10)]
    #[case(3, 4, 0)]
    #[case(30, 15, 155_117_520)]
    fn binomial_matches_known_values(#[case] n: usize, #[case] k: usize, #[case] expected: u128) {
        assert_eq!(binomial(n, k), expected);
    }

    #[test]
    fn count_matches_binomial() {
        let items: Vec<u32> = (0..8).collect();
        assert_eq!(Combinations::new(&items, 3).count() as u128, binomial(8, 3));
    }
}
