//! Debounce Module
//!
//! Sampling filter fed by periodic polls. A level change is genuine when the level it ends lasted at least the
//! debounce interval. Shorter levels are bounces; when bounces come so often that the exponential average of the
//! intervals between changes falls to the noise threshold, the input is reported as noise.

use embedded_hal_1::digital::InputPin;

use crate::config::Config;
use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Enum representing if the button is active low or active high.
pub enum ActiveState {
    /// Button is active low.
    #[default]
    ActiveLow,
    /// Button is active high.
    ActiveHigh,
}

impl ActiveState {
    /// Reads the pin and returns true if the button is pressed.
    pub fn is_pressed<I: InputPin>(&self, gpio: &mut I) -> Result<bool, I::Error> {
        match self {
            ActiveState::ActiveLow => gpio.is_low(),
            ActiveState::ActiveHigh => gpio.is_high(),
        }
    }
}

/// A level that just ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Change {
    /// Level that ended
    pub pressed: bool,
    /// How long it lasted, as measured at its last sample
    pub duration_ms: u32,
}

/// Outcome of one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sample {
    /// Same level as before
    Steady,
    /// Released for at least the message separator
    Separator,
    /// The level changed, not yet debounced
    Changed(Change),
}

/// Struct representing the sampling filter of a button.
#[derive(Debug, Clone)]
pub(crate) struct Debouncer {
    max_read_period_ms: u32,
    debounce_interval_ms: u32,
    min_change_average: u32,
    message_separator_ms: u32,
    last_pressed: bool,
    last_change: u32,
    current_duration_ms: u32,
    /// Exponential average of the intervals between changes, scaled by 16
    change_average: u32,
    last_read: u32,
}

impl Debouncer {
    /// Creates a filter that considers the button released since `now`.
    pub(crate) fn new(config: &Config, now: u32) -> Self {
        let mut debouncer = Self {
            max_read_period_ms: 0,
            debounce_interval_ms: 0,
            min_change_average: 0,
            message_separator_ms: 0,
            last_pressed: false,
            last_change: now,
            current_duration_ms: 0,
            change_average: 0,
            last_read: now,
        };
        debouncer.configure(config);
        debouncer
    }

    /// Recomputes the thresholds and seeds the change average with the noise threshold.
    ///
    /// The seed makes the first changes after a (re)configuration lean towards "not noise".
    pub(crate) fn configure(&mut self, config: &Config) {
        self.max_read_period_ms = config.max_read_period_ms;
        self.debounce_interval_ms = config.debounce_interval_ms();
        self.min_change_average = config.min_change_average();
        self.message_separator_ms = config.message_separator_ms;
        self.change_average = self.min_change_average;
    }

    /// Records the poll time, fails if it is too long since the previous poll.
    pub(crate) fn check_period(&mut self, now: u32) -> Result<(), Error> {
        let elapsed = now.wrapping_sub(self.last_read);
        self.last_read = now;

        if elapsed >= self.max_read_period_ms {
            return Err(Error::ReadPeriodTooLong);
        }

        Ok(())
    }

    /// Feeds the level read at `now`.
    pub(crate) fn sample(&mut self, now: u32, pressed: bool) -> Sample {
        let elapsed = now.wrapping_sub(self.last_change);

        if pressed == self.last_pressed {
            self.current_duration_ms = elapsed;
            if !pressed && elapsed >= self.message_separator_ms {
                return Sample::Separator;
            }
            return Sample::Steady;
        }

        self.change_average = (self.change_average - (self.change_average >> 4)).saturating_add(elapsed);
        self.last_change = now;

        let change = Change {
            pressed: self.last_pressed,
            duration_ms: self.current_duration_ms,
        };
        self.last_pressed = pressed;
        self.current_duration_ms = 0;

        trace!(
            "Level change: pressed {} -> {} after {} ms, average {}",
            change.pressed,
            pressed,
            change.duration_ms,
            self.change_average
        );
        Sample::Changed(change)
    }

    /// Returns true if the ended level lasted long enough to be a genuine change
    pub(crate) fn is_debounced(&self, change: &Change) -> bool {
        change.duration_ms >= self.debounce_interval_ms
    }

    /// Returns true if changes come too fast to be human presses
    pub(crate) fn is_noise(&self) -> bool {
        self.change_average <= self.min_change_average
    }

    #[cfg(test)]
    pub(crate) fn change_average(&self) -> u32 {
        self.change_average
    }
}
