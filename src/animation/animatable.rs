/// Trait for types that can be animated by interpolating between values
pub trait Animatable: Clone + PartialEq + 'static {
    /// Linear interpolation between two values.
    /// t = 0.0 returns `from`, t = 1.0 returns `to`.
    /// t can exceed [0, 1] range for overshoot effects and must not be clamped.
    fn lerp(from: &Self, to: &Self, t: f64) -> Self;
}

impl Animatable for f64 {
    fn lerp(from: &Self, to: &Self, t: f64) -> Self {
        from * (1.0 - t) + to * t
    }
}
