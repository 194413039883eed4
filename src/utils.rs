use rand::Rng;

use super::Height;

/// A tower grows by one level with probability `1 / HEIGHT_INCREASE_RATIO`.
pub(crate) const HEIGHT_INCREASE_RATIO: u32 = 4;

/// Draws a tower height from a geometric distribution with `p = 1/4`, capped at `max`.
#[inline]
pub(crate) fn random_height<R: Rng + ?Sized>(rng: &mut R, max: Height) -> Height {
  let max = max.get();
  let mut h = 1;
  while h < max && rng.random_ratio(1, HEIGHT_INCREASE_RATIO) {
    h += 1;
  }
  // h is in 1..=max, and max is a valid height.
  Height::new(h).unwrap_or(Height::MIN)
}
