//! Descriptive statistics used by the scorer

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by n, not n - 1)
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    let variance = values.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Median, averaging the two middle values for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Population z-scores of a column.
///
/// A column with no spread (all values equal, a single value, or a
/// degenerate standard deviation) maps to all zeros.
pub fn zscore(values: &[f64]) -> Vec<f64> {
    let zeros = || vec![0.0; values.len()];

    let first = match values.first() {
        Some(f) => *f,
        None => return Vec::new(),
    };
    if values.iter().all(|v| *v == first) {
        return zeros();
    }

    let (mu, sigma) = match (mean(values), population_std_dev(values)) {
        (Some(mu), Some(sigma)) if sigma.is_finite() && sigma > 0.0 => (mu, sigma),
        _ => return zeros(),
    };

    values.iter().map(|x| (x - mu) / sigma).collect()
}
