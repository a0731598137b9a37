//! Near-match suggestions for failed lookups.
//!
//! Suggestion building is deliberately small: plain Levenshtein distance
//! over the registered names, closest first, ties broken alphabetically.

/// Levenshtein edit distance between two strings, by character.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1) // deletion
                .min(current[j] + 1); // insertion
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Up to `limit` names within `max_distance` of `target`, best match first.
#[must_use]
pub fn suggest(names: &[String], target: &str, max_distance: usize, limit: usize) -> Vec<String> {
    let mut scored: Vec<(usize, &String)> = names
        .iter()
        .map(|name| (edit_distance(name, target), name))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();

    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored.into_iter().take(limit).map(|(_, n)| n.clone()).collect()
}
