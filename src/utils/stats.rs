// src/utils/stats.rs

/// Arithmetic mean. `None` for an empty slice.
///
/// Summed as offsets from the first value so that equal inputs give back
/// exactly that value.
pub fn mean(values: &[f64]) -> Option<f64> {
    let base = *values.first()?;
    Some(base + mean_offset(values, base))
}

fn mean_offset(values: &[f64], base: f64) -> f64 {
    values.iter().map(|v| v - base).sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
/// Needs at least two values: one point says nothing about spread.
/// Example: [700, 650, 600] -> 50
pub fn sample_stdev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let base = values[0];
    let offset = mean_offset(values, base);
    let sum_sq: f64 = values
        .iter()
        .map(|v| ((v - base) - offset).powi(2))
        .sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}
