//! Configuration types for the talking button service

use crate::error::ConfigError;
use crate::message::MAX_DIGITS;

/// Tunables of a talking button session, all durations in milliseconds.
///
/// Changing the configuration in the middle of a message is allowed but not re-validated against the message
/// already accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Consecutive polls must be closer than this
    pub max_read_period_ms: u32,
    /// Shortest accepted release inside a message
    pub min_released_ms: u32,
    /// Shortest accepted press inside a message
    pub min_pressed_ms: u32,
    /// Release duration that ends a message
    pub message_separator_ms: u32,
    /// Count mode: highest press count
    pub max_count: u8,
    /// Binary mode: highest number of bits
    pub max_bit_num: u8,
    /// Duration mode: highest number of digits
    pub max_digit_num: u8,
    /// Binary mode: presses longer than this read as 1
    pub binary_high_low_threshold_ms: u32,
    /// Duration mode: quantization step
    pub duration_unit_ms: u32,
}

impl Config {
    /// Checks the limits against what the decoders can hold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_read_period_ms == 0 {
            return Err(ConfigError::InvalidReadPeriod);
        }
        if self.duration_unit_ms == 0 {
            return Err(ConfigError::InvalidDurationUnit);
        }
        if self.max_count == 0 {
            return Err(ConfigError::InvalidMaxCount);
        }
        if self.max_bit_num == 0 || self.max_bit_num > u8::BITS as u8 {
            return Err(ConfigError::InvalidMaxBitNum);
        }
        if self.max_digit_num == 0 || usize::from(self.max_digit_num) > MAX_DIGITS {
            return Err(ConfigError::InvalidMaxDigitNum);
        }

        Ok(())
    }

    /// Shortest level duration taken as a genuine change: two consecutive reads plus margin.
    pub const fn debounce_interval_ms(&self) -> u32 {
        self.max_read_period_ms.saturating_mul(2).saturating_add(2)
    }

    /// Noise threshold for the inter-change exponential average.
    ///
    /// The average is kept scaled by 16, so is the threshold.
    pub const fn min_change_average(&self) -> u32 {
        self.debounce_interval_ms().saturating_mul(16)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_read_period_ms: 20,
            min_released_ms: 100,
            min_pressed_ms: 100,
            message_separator_ms: 500,
            max_count: 10,
            max_bit_num: 4,
            max_digit_num: 4,
            binary_high_low_threshold_ms: 300,
            duration_unit_ms: 1000,
        }
    }
}
