//! Press mode decoders

use crate::config::Config;
use crate::error::Error;
use crate::message::{Digits, Message};

/// How presses inside one message are turned into symbols
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// The message is the number of presses
    #[default]
    Count,
    /// Each press is one bit, long presses are 1
    Binary,
    /// Each press is its duration rounded to a multiple of the duration unit
    Duration,
}

/// Accumulator of the active mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Decoder {
    Count { count: u8 },
    Binary { code: u8, bits: u8 },
    Duration { digits: Digits },
}

impl Decoder {
    pub(crate) fn new(mode: Mode) -> Self {
        match mode {
            Mode::Count => Decoder::Count { count: 0 },
            Mode::Binary => Decoder::Binary { code: 0, bits: 0 },
            Mode::Duration => Decoder::Duration { digits: Digits::new() },
        }
    }

    pub(crate) fn mode(&self) -> Mode {
        match self {
            Decoder::Count { .. } => Mode::Count,
            Decoder::Binary { .. } => Mode::Binary,
            Decoder::Duration { .. } => Mode::Duration,
        }
    }

    /// Returns true if no symbol has been accumulated
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Decoder::Count { count } => *count == 0,
            Decoder::Binary { bits, .. } => *bits == 0,
            Decoder::Duration { digits } => digits.is_empty(),
        }
    }

    /// Accumulates one completed press lasting `duration_ms`.
    ///
    /// On overflow the accumulator is left as is, the caller is expected to [`Decoder::reset`].
    pub(crate) fn on_press(&mut self, duration_ms: u32, config: &Config) -> Result<(), Error> {
        match self {
            Decoder::Count { count } => {
                if *count >= config.max_count {
                    return Err(Error::CountOverflow);
                }
                *count += 1;
                debug!("Count: {}", *count);
            }
            Decoder::Binary { code, bits } => {
                if *bits >= config.max_bit_num {
                    return Err(Error::BinaryBitsOverflow);
                }
                *bits += 1;
                let bit = u8::from(duration_ms > config.binary_high_low_threshold_ms);
                *code = (*code << 1) | bit;
                debug!("Binary: bit {} of {} is {}", *bits, config.max_bit_num, bit);
            }
            Decoder::Duration { digits } => {
                if digits.len() >= usize::from(config.max_digit_num) {
                    return Err(Error::DurationDigitsOverflow);
                }
                let digit = quantize(duration_ms, config.duration_unit_ms);
                digits.push(digit).map_err(|_| Error::DurationDigitsOverflow)?;
                debug!("Duration: {} ms quantized to {}", duration_ms, digit);
            }
        }

        Ok(())
    }

    /// Ends the message: returns it if at least one symbol was read, and clears the accumulator.
    pub(crate) fn on_message_complete(&mut self) -> Option<Message> {
        if self.is_empty() {
            return None;
        }

        let message = match self {
            Decoder::Count { count } => Message::Count(*count),
            Decoder::Binary { code, .. } => Message::Binary(*code),
            Decoder::Duration { digits } => Message::Durations(digits.clone()),
        };
        self.reset();
        Some(message)
    }

    pub(crate) fn reset(&mut self) {
        *self = Decoder::new(self.mode());
    }
}

/// Rounds `duration_ms` to the nearest number of `unit_ms`, never below 1.
///
/// Zero is reserved as the terminator of encoded duration messages.
fn quantize(duration_ms: u32, unit_ms: u32) -> u8 {
    let units = duration_ms.saturating_add(unit_ms / 2) / unit_ms;
    u8::try_from(units).unwrap_or(u8::MAX).max(1)
}
