//! Indicator trait definitions.

/// Trait for close-price indicators.
///
/// Output is index-aligned with the input: entry `t` belongs to `data[t]`
/// and is `None` wherever the indicator is undefined.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>>;

    /// Observations needed before the first defined value.
    fn warmup(&self) -> usize;

    /// Column name, e.g. `SMA_20`.
    fn name(&self) -> &str;

    /// Number of defined values `calculate` would yield for `len` inputs.
    fn defined_count(&self, len: usize) -> usize {
        len.saturating_sub(self.warmup())
    }
}
