/// Cosine similarity of two dense vectors.
/// Zero vectors and mismatched lengths score 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "vector dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    cosine_from_parts(dot, norm_a, norm_b)
}

pub(crate) fn cosine_from_parts(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Maps a cosine in [-1, 1] to a percentage score in [0, 100], two decimals.
/// Negative cosines (possible with embeddings) clamp to 0.
///
/// Always returns `+0.0` for a zero score. An empty dot-product sum is `-0.0`,
/// which `total_cmp` would rank below `+0.0` and break tie order.
pub fn to_percentage(cosine: f64) -> f64 {
    let pct = (cosine * 100.0).clamp(0.0, 100.0);
    let rounded = (pct * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors_score_one() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_scores_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_to_percentage_rounds_to_two_decimals() {
        assert_eq!(to_percentage(0.123456), 12.35);
        assert_eq!(to_percentage(1.0), 100.0);
    }

    #[test]
    fn test_to_percentage_clamps_negative() {
        assert_eq!(to_percentage(-0.4), 0.0);
    }

    #[test]
    fn test_zero_score_is_never_negative_zero() {
        assert!(to_percentage(-0.0).is_sign_positive());
        assert!(to_percentage(-0.4).is_sign_positive());
        assert!(to_percentage(cosine_from_parts(-0.0, 1.0, 1.0)).is_sign_positive());
        assert_eq!(to_percentage(-0.0).total_cmp(&0.0), std::cmp::Ordering::Equal);
    }
}
