//! Talking button session
//!
//! All state of one button lives in [`Session`], driven by the caller through `&mut self`. The session does no I/O:
//! every poll is handed the current time and a way to read the level, see [`crate::TalkingButton`] for the
//! adapter binding it to a pin and a clock.

use crate::config::Config;
use crate::debounce::{Change, Debouncer, Sample};
use crate::decoder::Mode;
use crate::error::{BufferTooSmall, ConfigError, Error};
use crate::interpreter::{Interpreter, ParseState};
use crate::message::Message;

/// Description returned when no error is recorded
pub const NO_ERROR: &str = "no error";

/// State of one talking button
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    debouncer: Debouncer,
    interpreter: Interpreter,
    /// At most one message waiting for the caller, overwritten by the next one
    pending: Option<Message>,
    last_error: Option<Error>,
}

impl Session {
    /// Starts a session in `mode` with the default configuration, the button being released at `now`.
    pub fn start(mode: Mode, now: u32) -> Self {
        let config = Config::default();
        info!("Talking button started in {:?} mode", mode);
        Self {
            debouncer: Debouncer::new(&config, now),
            interpreter: Interpreter::new(mode),
            config,
            pending: None,
            last_error: None,
        }
    }

    /// Replaces the configuration and recomputes the derived thresholds.
    ///
    /// The noise average is seeded again with the noise threshold. Parsing state is left alone.
    pub fn configure(&mut self, config: Config) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.debouncer.configure(&self.config);
        info!(
            "Configured: read period {} ms, separator {} ms",
            config.max_read_period_ms,
            config.message_separator_ms
        );
        Ok(())
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn update(&mut self, f: impl FnOnce(&mut Config)) -> Result<(), ConfigError> {
        let mut config = self.config;
        f(&mut config);
        self.configure(config)
    }

    /// Sets the longest allowed time between polls
    pub fn set_max_read_period(&mut self, ms: u32) -> Result<(), ConfigError> {
        self.update(|config| config.max_read_period_ms = ms)
    }

    /// Sets the shortest accepted release inside a message
    pub fn set_min_released(&mut self, ms: u32) -> Result<(), ConfigError> {
        self.update(|config| config.min_released_ms = ms)
    }

    /// Sets the shortest accepted press inside a message
    pub fn set_min_pressed(&mut self, ms: u32) -> Result<(), ConfigError> {
        self.update(|config| config.min_pressed_ms = ms)
    }

    /// Sets the release duration ending a message
    pub fn set_message_separator(&mut self, ms: u32) -> Result<(), ConfigError> {
        self.update(|config| config.message_separator_ms = ms)
    }

    /// Sets the highest count in count mode
    pub fn set_max_count(&mut self, max_count: u8) -> Result<(), ConfigError> {
        self.update(|config| config.max_count = max_count)
    }

    /// Sets the highest number of bits in binary mode
    pub fn set_max_bit_num(&mut self, max_bit_num: u8) -> Result<(), ConfigError> {
        self.update(|config| config.max_bit_num = max_bit_num)
    }

    /// Sets the press duration above which binary mode reads a 1
    pub fn set_binary_high_low_threshold(&mut self, ms: u32) -> Result<(), ConfigError> {
        self.update(|config| config.binary_high_low_threshold_ms = ms)
    }

    /// Sets the highest number of digits in duration mode
    pub fn set_max_digit_num(&mut self, max_digit_num: u8) -> Result<(), ConfigError> {
        self.update(|config| config.max_digit_num = max_digit_num)
    }

    /// Sets the quantization step of duration mode
    pub fn set_duration_unit(&mut self, ms: u32) -> Result<(), ConfigError> {
        self.update(|config| config.duration_unit_ms = ms)
    }

    /// Runs one poll at `now`.
    ///
    /// `read_pressed` returns true while the button is pressed. It is not called when the poll comes too late.
    /// Failures are recorded, see [`Session::last_error`].
    pub fn poll_with<E>(&mut self, now: u32, read_pressed: impl FnOnce() -> Result<bool, E>) -> Result<(), Error> {
        self.step(now, read_pressed).map_err(|error| {
            warn!("Talking button error: {:?}", error);
            self.last_error = Some(error);
            error
        })
    }

    fn step<E>(&mut self, now: u32, read_pressed: impl FnOnce() -> Result<bool, E>) -> Result<(), Error> {
        self.debouncer.check_period(now)?;
        let pressed = read_pressed().map_err(|_| Error::PinRead)?;

        match self.debouncer.sample(now, pressed) {
            Sample::Steady => Ok(()),
            Sample::Separator => {
                if let Some(message) = self.interpreter.on_separator() {
                    info!("Message complete: {:?}", message);
                    self.pending = Some(message);
                    self.last_error = None;
                }
                Ok(())
            }
            Sample::Changed(change) => self.on_change(change),
        }
    }

    fn on_change(&mut self, change: Change) -> Result<(), Error> {
        if self.interpreter.on_change() {
            return Ok(());
        }

        if self.debouncer.is_debounced(&change) {
            self.interpreter.on_level_end(&change, &self.config)
        } else if self.debouncer.is_noise() {
            Err(Error::ReadNoise)
        } else {
            trace!("Bounce of {} ms ignored", change.duration_ms);
            Ok(())
        }
    }

    /// Returns true if a message is waiting
    pub fn has_message(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the waiting message, if any
    pub fn take_message(&mut self) -> Option<Message> {
        self.pending.take()
    }

    /// Copies the waiting message into `buf`, see [`Message::encode_into_slice`].
    ///
    /// Returns the number of bytes written, or `None` if no message is waiting. The message stays pending when
    /// `buf` is too small.
    pub fn read_message(&mut self, buf: &mut [u8]) -> Result<Option<usize>, BufferTooSmall> {
        let Some(message) = &self.pending else {
            return Ok(None);
        };

        let len = message.encode_into_slice(buf)?;
        self.pending = None;
        Ok(Some(len))
    }

    /// Last recorded error, cleared when a message completes
    pub fn last_error(&self) -> Option<Error> {
        self.last_error
    }

    /// Describes the last recorded error
    pub fn describe_error(&self) -> &'static str {
        self.last_error.map_or(NO_ERROR, |error| error.description())
    }

    /// Current position in the message stream
    pub fn parse_state(&self) -> ParseState {
        self.interpreter.state()
    }

    /// Press mode chosen at start
    pub fn mode(&self) -> Mode {
        self.interpreter.mode()
    }
}
