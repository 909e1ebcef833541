fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ca != *cb);
            row[j + 1] = substitution.min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }
    row[b_chars.len()]
}

/// Candidates close to `input`, best first. Substring matches rank right
/// after exact ones.
pub fn suggest(input: &str, candidates: &[&str], limit: usize) -> Vec<String> {
    let needle = normalize(input);
    if needle.is_empty() {
        return Vec::new();
    }
    let allowed = (needle.len() / 3).max(1);

    let mut scored: Vec<(usize, &str)> = candidates
        .iter()
        .filter_map(|candidate| {
            let normalized = normalize(candidate);
            if normalized.is_empty() {
                return None;
            }
            let score = if normalized == needle {
                0
            } else if normalized.contains(&needle) || needle.contains(&normalized) {
                1
            } else {
                edit_distance(&needle, &normalized)
            };
            (score <= allowed).then_some((score, *candidate))
        })
        .collect();
    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored.dedup_by(|a, b| a.1 == b.1);
    scored
        .into_iter()
        .take(limit.max(1))
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_typos_are_suggested() {
        let known = ["set_url", "set_field", "settle"];
        assert_eq!(suggest("set_urll", &known, 3), vec!["set_url".to_string()]);
    }

    #[test]
    fn unrelated_input_suggests_nothing() {
        assert!(suggest("zzzzzz", &["get", "settle"], 3).is_empty());
    }

    #[test]
    fn edit_distance_counts_single_edits() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
    }
}
