/// Two floating-point values closer than this are treated as equal.
pub const EPSILON: f64 = 1e-9;

/// Reports whether `u` and `v` differ by less than [`EPSILON`].
#[inline]
pub fn approx_eq(u: f64, v: f64) -> bool {
    (u - v).abs() < EPSILON
}

/// Reports whether `x` is within [`EPSILON`] of zero.
#[inline]
pub fn approx_zero(x: f64) -> bool {
    approx_eq(x, 0.0)
}
