//! Random integers for presentational jitter (not for security).

use rand::Rng;

/// A uniformly distributed integer in `[min, max)`.
///
/// Returns `min` when the range is empty (`max <= min`).
pub fn random_int(min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    rand::thread_rng().gen_range(min..max)
}
