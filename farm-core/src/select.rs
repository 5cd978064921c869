//! Order-preserving reductions over the sample tables.
//!
//! Rankings use a stable sort, so rows with equal keys keep table order.
//! Groups are reported in the order their key is first seen.

use std::collections::HashMap;

/// The `n` rows with the largest key, highest first.
pub fn top_n_by<T, F>(rows: &[T], n: usize, key: F) -> Vec<&T>
where
    F: Fn(&T) -> f64,
{
    let mut ranked: Vec<&T> = rows.iter().collect();
    ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
    ranked.truncate(n);
    ranked
}

/// The `n` rows with the smallest key, lowest first.
pub fn bottom_n_by<T, F>(rows: &[T], n: usize, key: F) -> Vec<&T>
where
    F: Fn(&T) -> f64,
{
    let mut ranked: Vec<&T> = rows.iter().collect();
    ranked.sort_by(|a, b| key(a).total_cmp(&key(b)));
    ranked.truncate(n);
    ranked
}

/// Sum `value` per distinct `key`.
pub fn group_sum<T, K, V>(rows: &[T], key: K, value: V) -> Vec<(String, f64)>
where
    K: Fn(&T) -> &str,
    V: Fn(&T) -> f64,
{
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, f64)> = Vec::new();
    for row in rows {
        let k = key(row);
        let slot = *slots.entry(k).or_insert_with(|| {
            groups.push((k.to_string(), 0.0));
            groups.len() - 1
        });
        groups[slot].1 += value(row);
    }
    groups
}

/// Number of rows per distinct `key`.
pub fn group_count<T, K>(rows: &[T], key: K) -> Vec<(String, usize)>
where
    K: Fn(&T) -> &str,
{
    group_sum(rows, key, |_| 1.0)
        .into_iter()
        .map(|(k, n)| (k, n as usize))
        .collect()
}

/// Arithmetic mean; `None` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub fn distinct_count<'a>(values: impl IntoIterator<Item = &'a str>) -> usize {
    let mut seen = std::collections::HashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).count()
}

/// First row holding the maximum key.
pub fn arg_max_by<T, F>(rows: &[T], key: F) -> Option<&T>
where
    F: Fn(&T) -> f64,
{
    top_n_by(rows, 1, key).into_iter().next()
}
