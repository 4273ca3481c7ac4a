/// Cosine similarity of two equal-length vectors, clamped to [-1, 1].
///
/// Returns 0 when either vector has zero norm. Dimensions are checked by the
/// caller; extra trailing components are ignored.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (dot, norm_a, norm_b) = a.iter().zip(b.iter()).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32
}
