//! Cosine similarity.

/// Cosine similarity between `a` and `b`.
///
/// Returns `0.0` when the lengths differ, either vector is empty, or either
/// vector has zero magnitude. Accumulates in `f64` so a vector compared with
/// itself scores exactly `1.0` after narrowing, and the result is clamped to
/// `[-1.0, 1.0]`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if score.is_nan() {
        return 0.0;
    }
    (score as f32).clamp(-1.0, 1.0)
}
