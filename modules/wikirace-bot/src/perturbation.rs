use rand::Rng;

/// Default fraction of a score that may be added or removed as noise.
pub const DEFAULT_VARIANCE_FRACTION: f64 = 0.10;

/// Bounded random noise on a raw score.
///
/// The margin is `variance_fraction * score`; the result lies in
/// `[score - margin, score + margin]` and is not clamped back into `[0, 1]`.
/// Perturbed values are only ever compared against each other.
pub fn perturb<R: Rng + ?Sized>(score: f64, variance_fraction: f64, rng: &mut R) -> f64 {
    let margin = (variance_fraction * score).abs();
    if margin == 0.0 || !margin.is_finite() {
        return score;
    }
    score + rng.random_range(-margin..=margin)
}
