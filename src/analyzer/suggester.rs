use ordered_float::OrderedFloat;

/// Default cut-off on the normalized edit distance.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Candidates close to `target`, closest first, ties broken alphabetically.
pub fn suggest<I, S>(target: &str, candidates: I, max: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    suggest_within(target, candidates, max, DEFAULT_THRESHOLD)
}

pub fn suggest_within<I, S>(target: &str, candidates: I, max: usize, threshold: f64) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let target = target.to_lowercase();
    let mut scored: Vec<(OrderedFloat<f64>, String)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let candidate = candidate.as_ref();
            let distance = normalized_distance(&target, &candidate.to_lowercase());
            (distance <= threshold).then(|| (OrderedFloat(distance), candidate.to_string()))
        })
        .collect();

    scored.sort();
    scored.dedup_by(|a, b| a.1 == b.1);
    scored.into_iter().take(max).map(|(_, name)| name).collect()
}

/// Tail appended to an unknown-name message.
pub fn did_you_mean(suggestions: &[String]) -> String {
    match suggestions {
        [] => String::new(),
        [single] => format!(", did you mean [{}]?", single),
        many => format!(", did you mean any of [{}]?", many.join(", ")),
    }
}

/// Edits divided by the length of the longer string.
pub fn normalized_distance(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    levenshtein(a, b) as f64 / longest as f64
}

pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // single rolling row
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}
