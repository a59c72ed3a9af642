//! Decoded messages

use crate::error::BufferTooSmall;

/// Most digits a duration message can carry
pub const MAX_DIGITS: usize = 15;

/// Quantized press durations of a duration message, in order of entry
pub type Digits = heapless::Vec<u8, MAX_DIGITS>;

/// A complete message decoded from the button
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    /// Number of presses
    Count(u8),
    /// Press pattern, most significant bit first, long press is 1
    Binary(u8),
    /// Press durations in units of `duration_unit_ms`, never zero
    Durations(Digits),
}

impl Message {
    /// Returns the value of a count or binary message
    pub fn value(&self) -> Option<u8> {
        match self {
            Message::Count(value) | Message::Binary(value) => Some(*value),
            Message::Durations(_) => None,
        }
    }

    /// Returns the digits of a duration message, empty for other messages
    pub fn digits(&self) -> &[u8] {
        match self {
            Message::Durations(digits) => digits.as_slice(),
            _ => &[],
        }
    }

    /// Bytes needed by [`Message::encode_into_slice`]
    pub fn encoded_len(&self) -> usize {
        match self {
            Message::Count(_) | Message::Binary(_) => 1,
            Message::Durations(digits) => digits.len() + 1,
        }
    }

    /// Writes the byte form of the message and returns the number of bytes written.
    ///
    /// Count and binary messages are one byte. Duration messages are their digits followed by a zero terminator;
    /// digits are never zero so the terminator is unambiguous.
    pub fn encode_into_slice(&self, buf: &mut [u8]) -> Result<usize, BufferTooSmall> {
        let len = self.encoded_len();
        if buf.len() < len {
            return Err(BufferTooSmall { required: len });
        }

        match self {
            Message::Count(value) | Message::Binary(value) => buf[0] = *value,
            Message::Durations(digits) => {
                buf[..digits.len()].copy_from_slice(digits);
                buf[digits.len()] = 0;
            }
        }

        Ok(len)
    }
}
