//! Frequency-based truncation of a high-cardinality code column.

use std::collections::HashMap;

/// Python-style `isalnum`: non-empty and every char alphanumeric.
fn is_alnum(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}

/// The `k` most frequent codes, most frequent first. Missing cells,
/// non-alphanumeric tokens and anything in `junk` are never selected. Equal
/// counts keep first-seen order.
pub fn select_top_k<'a, I>(codes: I, junk: &[String], k: usize) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    if k == 0 {
        return Vec::new();
    }

    // (code, count) in first-seen order
    let mut tally: Vec<(&str, usize)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for code in codes.into_iter().flatten() {
        if !is_alnum(code) || junk.iter().any(|j| j == code) {
            continue;
        }
        match slot.get(code) {
            Some(&i) => tally[i].1 += 1,
            None => {
                slot.insert(code, tally.len());
                tally.push((code, 1));
            }
        }
    }

    // sort_by is stable: ties stay in first-seen order
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
        .into_iter()
        .take(k)
        .map(|(code, _)| code.to_string())
        .collect()
}
