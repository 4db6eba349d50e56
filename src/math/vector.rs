/// Offset added to the norm so that an all-zero row normalises to an all-zero row.
pub const NORM_OFFSET: f64 = 1e-10;

#[must_use]
pub fn norm(x: &[f64]) -> f64 {
    x.iter().map(|xi| xi * xi).sum::<f64>().sqrt()
}

#[must_use]
#[inline]
pub fn dot(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    x.iter().zip(y).fold(0.0, |dot, (xi, yi)| dot + xi * yi)
}

/// Returns the vector scaled by `1 / (‖x‖ + ε)`.
#[must_use]
pub fn normalize(x: &[f64]) -> Vec<f64> {
    let scale = norm(x) + NORM_OFFSET;
    x.iter().map(|xi| xi / scale).collect()
}

/// Cosine similarity with the stabilising offset, so that a zero vector
/// is similar to nothing instead of producing `NaN`.
#[must_use]
pub fn cosine_similarity(x: &[f64], y: &[f64]) -> f64 {
    dot(x, y) / (norm(x) + NORM_OFFSET) / (norm(y) + NORM_OFFSET)
}
