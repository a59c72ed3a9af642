//! Button Interpreter Module
//!
//! Splits the stream of debounced presses and releases into messages. A release lasting the message separator
//! closes the message in progress, the first change after a separator opens the next one.

use crate::config::Config;
use crate::debounce::Change;
use crate::decoder::{Decoder, Mode};
use crate::error::Error;
use crate::message::Message;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Enum representing where the interpreter stands in the message stream.
pub enum ParseState {
    /// Waiting for a separator before listening, initial state and state after an error
    #[default]
    Idle,
    /// A separator was seen, the next change opens a message
    AwaitingMessage,
    /// Presses are being decoded
    InMessage,
    /// The separator closing a message was seen, left as soon as the message is decoded
    MessageComplete,
}

/// Message boundary state machine driving the decoder of the active mode
#[derive(Debug, Clone)]
pub(crate) struct Interpreter {
    state: ParseState,
    decoder: Decoder,
}

impl Interpreter {
    pub(crate) fn new(mode: Mode) -> Self {
        Self {
            state: ParseState::Idle,
            decoder: Decoder::new(mode),
        }
    }

    pub(crate) fn state(&self) -> ParseState {
        self.state
    }

    pub(crate) fn mode(&self) -> Mode {
        self.decoder.mode()
    }

    fn set_state(&mut self, state: ParseState) {
        if self.state != state {
            debug!("Parse state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// Handles a release lasting the message separator, returns the message it closes if any.
    pub(crate) fn on_separator(&mut self) -> Option<Message> {
        match self.state {
            ParseState::Idle => {
                self.set_state(ParseState::AwaitingMessage);
                None
            }
            ParseState::InMessage => {
                self.set_state(ParseState::MessageComplete);
                let message = self.decoder.on_message_complete();
                self.set_state(ParseState::AwaitingMessage);
                message
            }
            ParseState::AwaitingMessage | ParseState::MessageComplete => None,
        }
    }

    /// Handles a raw level change before debouncing.
    ///
    /// Returns true if the change opened a message and must not be looked at further: it only ends the separator.
    pub(crate) fn on_change(&mut self) -> bool {
        if self.state == ParseState::AwaitingMessage {
            self.set_state(ParseState::InMessage);
            return true;
        }
        false
    }

    /// Handles a debounced level change.
    pub(crate) fn on_level_end(&mut self, change: &Change, config: &Config) -> Result<(), Error> {
        if self.state != ParseState::InMessage {
            return Ok(());
        }

        let result = if change.pressed {
            if change.duration_ms < config.min_pressed_ms {
                Err(Error::PressTooShort)
            } else {
                self.decoder.on_press(change.duration_ms, config)
            }
        } else if change.duration_ms < config.min_released_ms {
            Err(Error::ReleaseTooShort)
        } else {
            Ok(())
        };

        result.map_err(|error| self.fail(error))
    }

    /// Applies the reset policy of `error` and hands it back.
    fn fail(&mut self, error: Error) -> Error {
        if error.resets() {
            self.decoder.reset();
            self.set_state(ParseState::Idle);
        }
        error
    }
}
