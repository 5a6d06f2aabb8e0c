//! Indicator trait definitions.

/// Trait for technical indicators.
///
/// Indicators process price data and produce derived values. Output is
/// aligned 1:1 with the input so it can be plotted against the same bars.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically closes)
    ///
    /// # Returns
    /// One value per input point
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the lookback period.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Check whether there's enough data for defined values.
    fn is_warmed_up(&self, data: &[f64]) -> bool {
        data.len() >= self.period()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestIndicator {
        period: usize,
    }

    impl Indicator for TestIndicator {
        type Output = f64;

        fn calculate(&self, data: &[f64]) -> Vec<f64> {
            // Trailing sum, zero until the window fills
            (0..data.len())
                .map(|i| {
                    if i + 1 < self.period {
                        0.0
                    } else {
                        data[i + 1 - self.period..=i].iter().sum()
                    }
                })
                .collect()
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_indicator_warm_up() {
        let indicator = TestIndicator { period: 5 };

        assert!(!indicator.is_warmed_up(&[1.0, 2.0, 3.0]));
        assert!(indicator.is_warmed_up(&[1.0, 2.0, 3.0, 4.0, 5.0]));
    }

    #[test]
    fn test_indicator_calculate_aligned() {
        let indicator = TestIndicator { period: 3 };
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = indicator.calculate(&data);

        assert_eq!(result.len(), data.len());
        assert!((result[2] - 6.0).abs() < 0.001); // 1+2+3
        assert!((result[4] - 12.0).abs() < 0.001); // 3+4+5
    }
}
