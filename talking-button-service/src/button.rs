//! Button Service Definitions

use embassy_time::Instant;
use embedded_hal_1::digital::{ErrorType, InputPin};

use crate::config::Config;
use crate::debounce::ActiveState;
use crate::decoder::Mode;
use crate::error::{BufferTooSmall, ConfigError, Error};
use crate::interpreter::ParseState;
use crate::message::Message;
use crate::session::Session;

/// Monotonic millisecond tick source.
///
/// The tick may wrap around, differences are computed with wrapping subtraction.
pub trait Clock {
    /// Current tick in milliseconds
    fn now_ms(&mut self) -> u32;
}

/// [`Clock`] backed by the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&mut self) -> u32 {
        // Truncation keeps the low bits, which is all wrapping differences need
        Instant::now().as_millis() as u32
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Enum representing the bias applied to the button input.
pub enum Pull {
    /// Internal pull-up enabled
    #[default]
    Up,
    /// Floating input, the board provides the bias
    None,
}

/// Input pin whose bias can be set when the button starts
pub trait ConfigurePin: InputPin {
    /// Configures the pin as an input with the given bias
    fn configure(&mut self, pull: Pull) -> Result<(), Self::Error>;
}

/// Wraps a HAL input whose bias was already chosen when it was created
#[derive(Debug)]
pub struct Preconfigured<I>(pub I);

impl<I: ErrorType> ErrorType for Preconfigured<I> {
    type Error = I::Error;
}

impl<I: InputPin> InputPin for Preconfigured<I> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}

impl<I: InputPin> ConfigurePin for Preconfigured<I> {
    fn configure(&mut self, _pull: Pull) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Debug)]
/// A talking button: a GPIO pin and a clock driving a [`Session`].
pub struct TalkingButton<I, C> {
    gpio: I,
    clock: C,
    active_state: ActiveState,
    session: Session,
}

impl<I: ConfigurePin, C: Clock> TalkingButton<I, C> {
    /// Configures the pin and starts a session in `mode` with the default configuration.
    pub fn start(
        mut gpio: I,
        mut clock: C,
        mode: Mode,
        pull: Pull,
        active_state: ActiveState,
    ) -> Result<Self, I::Error> {
        gpio.configure(pull)?;
        let session = Session::start(mode, clock.now_ms());

        Ok(Self {
            gpio,
            clock,
            active_state,
            session,
        })
    }

    /// Replaces the session configuration, see [`Session::configure`].
    pub fn configure(&mut self, config: Config) -> Result<(), ConfigError> {
        self.session.configure(config)
    }

    /// Samples the button. Must be called more often than `max_read_period_ms`.
    pub fn poll(&mut self) -> Result<(), Error> {
        let now = self.clock.now_ms();
        let active_state = self.active_state;
        let gpio = &mut self.gpio;
        self.session.poll_with(now, || active_state.is_pressed(gpio))
    }

    /// Takes the waiting message, if any
    pub fn take_message(&mut self) -> Option<Message> {
        self.session.take_message()
    }

    /// Copies the waiting message into `buf`, see [`Session::read_message`].
    pub fn read_message(&mut self, buf: &mut [u8]) -> Result<Option<usize>, BufferTooSmall> {
        self.session.read_message(buf)
    }

    /// Last recorded error
    pub fn last_error(&self) -> Option<Error> {
        self.session.last_error()
    }

    /// Describes the last recorded error
    pub fn describe_error(&self) -> &'static str {
        self.session.describe_error()
    }

    /// Current position in the message stream
    pub fn parse_state(&self) -> ParseState {
        self.session.parse_state()
    }

    /// Returns the session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the session, for the individual setters
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Releases the pin and the clock
    pub fn release(self) -> (I, C) {
        (self.gpio, self.clock)
    }
}
