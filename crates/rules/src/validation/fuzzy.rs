//! Fuzzy string matching for "Did you mean …?" suggestions.

/// Closest candidate by case-insensitive edit distance.
///
/// Returns `None` when even the best candidate differs in more than half of
/// the longer string's characters.
pub(crate) fn fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let input_lower = input.to_lowercase();
    let (best, dist) = candidates
        .iter()
        .map(|c| (*c, levenshtein(&input_lower, &c.to_lowercase())))
        .min_by_key(|(_, d)| *d)?;

    (dist <= input.len().max(best.len()) / 2).then_some(best)
}

/// Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let m = a.len();
    let n = b.len();

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
