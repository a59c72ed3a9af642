//! Error types

use core::fmt;

/// Faults reported by [`crate::Session::poll_with`] and [`crate::TalkingButton::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Two consecutive polls were at least `max_read_period_ms` apart
    ReadPeriodTooLong,
    /// The level toggles too fast to be a human press
    ReadNoise,
    /// A release inside a message was shorter than `min_released_ms`
    ReleaseTooShort,
    /// A press inside a message was shorter than `min_pressed_ms`
    PressTooShort,
    /// More presses than `max_count` in count mode
    CountOverflow,
    /// More presses than `max_bit_num` in binary mode
    BinaryBitsOverflow,
    /// More presses than `max_digit_num` in duration mode
    DurationDigitsOverflow,
    /// The pin level could not be read
    PinRead,
}

impl Error {
    /// Human readable description
    pub const fn description(&self) -> &'static str {
        match self {
            Error::ReadPeriodTooLong => "button read period is too long",
            Error::ReadNoise => "button status changes too fast, read noise",
            Error::ReleaseTooShort => "button release is too short",
            Error::PressTooShort => "button press is too short",
            Error::CountOverflow => "press count too high in count mode",
            Error::BinaryBitsOverflow => "too many bits read in binary mode",
            Error::DurationDigitsOverflow => "too many digits read in duration mode",
            Error::PinRead => "button pin read failed",
        }
    }

    /// Returns true if this error discards the message being decoded.
    ///
    /// Timing and noise faults are transient; protocol violations and overflows send the parser back to idle.
    pub const fn resets(&self) -> bool {
        !matches!(self, Error::ReadPeriodTooLong | Error::ReadNoise | Error::PinRead)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Rejected configuration values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `max_read_period_ms` must be non-zero
    InvalidReadPeriod,
    /// `duration_unit_ms` must be non-zero
    InvalidDurationUnit,
    /// `max_count` must be non-zero
    InvalidMaxCount,
    /// `max_bit_num` must be within 1..=8
    InvalidMaxBitNum,
    /// `max_digit_num` must be within 1..=[`crate::MAX_DIGITS`]
    InvalidMaxDigitNum,
}

/// The destination slice cannot hold the encoded message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferTooSmall {
    /// Bytes required to hold the message
    pub required: usize,
}
