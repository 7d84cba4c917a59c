//! Construction parameters for [`Table`](crate::Table).

/// Base capacity used by [`Table::new`](crate::Table::new). The slot array gets
/// `next_prime(50) = 53` slots.
pub const DEFAULT_BASE_CAPACITY: usize = 50;

/// Load factor, in percent, above which a table grows.
pub const DEFAULT_GROW_THRESHOLD: usize = 70;

/// Load factor, in percent, below which a table shrinks.
pub const DEFAULT_SHRINK_THRESHOLD: usize = 10;

/// Sizing and resize policy of a table.
///
/// Thresholds are stored as percentages (0-100). The base capacity given here is also the
/// floor a table never shrinks below.
///
/// ```rust
/// use dhtable::{Table, TableConfig};
///
/// let config = TableConfig::new().with_base_capacity(8).with_grow_threshold(50);
/// let table = Table::with_config(config);
/// assert_eq!(table.capacity(), 11);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Requested base capacity; the slot count is the next prime at or above it
    base_capacity: usize,
    /// Grow once `count * 100 > size * grow_threshold`
    grow_threshold: usize,
    /// Shrink once `count * 100 < size * shrink_threshold`
    shrink_threshold: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TableConfig {
    /// Default policy: base capacity 50, grow above 70% load, shrink below 10%.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base_capacity: DEFAULT_BASE_CAPACITY,
            grow_threshold: DEFAULT_GROW_THRESHOLD,
            shrink_threshold: DEFAULT_SHRINK_THRESHOLD,
        }
    }

    /// Sets the base capacity. Zero is treated as one.
    #[must_use]
    pub fn with_base_capacity(mut self, capacity: usize) -> Self {
        self.base_capacity = capacity.max(1);
        self
    }

    /// Sets the grow threshold in percent, kept within 1-95.
    ///
    /// The shrink threshold is lowered if needed so that it stays below the grow threshold.
    #[must_use]
    pub fn with_grow_threshold(mut self, percent: usize) -> Self {
        self.grow_threshold = percent.clamp(1, 95);
        self.shrink_threshold = self.shrink_threshold.min(self.grow_threshold.saturating_sub(1));
        self
    }

    /// Sets the shrink threshold in percent. Zero disables shrinking; values at or above the
    /// grow threshold are capped just below it.
    #[must_use]
    pub fn with_shrink_threshold(mut self, percent: usize) -> Self {
        self.shrink_threshold = percent.min(self.grow_threshold.saturating_sub(1));
        self
    }

    /// Requested base capacity.
    #[must_use]
    pub const fn base_capacity(&self) -> usize {
        self.base_capacity
    }

    /// Grow threshold in percent.
    #[must_use]
    pub const fn grow_threshold(&self) -> usize {
        self.grow_threshold
    }

    /// Shrink threshold in percent.
    #[must_use]
    pub const fn shrink_threshold(&self) -> usize {
        self.shrink_threshold
    }

    /// Whether `count` live entries in `size` slots is above the grow threshold.
    pub(crate) fn should_grow(&self, count: usize, size: usize) -> bool {
        count.saturating_mul(100) > size.saturating_mul(self.grow_threshold)
    }

    /// Whether `count` live entries in `size` slots is below the shrink threshold.
    pub(crate) fn should_shrink(&self, count: usize, size: usize) -> bool {
        count.saturating_mul(100) < size.saturating_mul(self.shrink_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.base_capacity(), 50);
        assert_eq!(config.grow_threshold(), 70);
        assert_eq!(config.shrink_threshold(), 10);
    }

    #[test]
    fn test_setters_clamp() {
        let config = TableConfig::new().with_base_capacity(0).with_grow_threshold(200);
        assert_eq!(config.base_capacity(), 1);
        assert_eq!(config.grow_threshold(), 95);

        let config = TableConfig::new().with_grow_threshold(0);
        assert_eq!(config.grow_threshold(), 1);
        assert_eq!(config.shrink_threshold(), 0);

        let config = TableConfig::new().with_shrink_threshold(90);
        assert_eq!(config.shrink_threshold(), 69);
    }

    #[test]
    fn test_thresholds() {
        let config = TableConfig::new();
        // 7 / 10 is exactly 70%, not above it.
        assert!(!config.should_grow(7, 10));
        assert!(config.should_grow(8, 11));
        assert!(config.should_shrink(1, 11));
        assert!(!config.should_shrink(1, 10));
        assert!(!TableConfig::new().with_shrink_threshold(0).should_shrink(0, 53));
    }
}
