//! Talking button service
//!
//! Turns a single push button into an input device emitting messages: a press count, a bit pattern coded by press
//! length, or a sequence of press durations. Messages are delimited by a long release, the message separator.
//!
//! The button is sampled by polling [`TalkingButton::poll`] (or [`Session::poll_with`]) faster than the configured
//! read period; completed messages are fetched with [`TalkingButton::take_message`].

#![no_std]
#![warn(missing_docs)]

#[macro_use]
mod fmt;

pub mod button;
pub mod config;
pub mod debounce;
pub mod decoder;
pub mod error;
pub mod interpreter;
pub mod message;
pub mod session;

pub use button::{Clock, ConfigurePin, EmbassyClock, Preconfigured, Pull, TalkingButton};
pub use config::Config;
pub use debounce::ActiveState;
pub use decoder::Mode;
pub use error::{BufferTooSmall, ConfigError, Error};
pub use interpreter::ParseState;
pub use message::{Digits, Message, MAX_DIGITS};
pub use session::{Session, NO_ERROR};
