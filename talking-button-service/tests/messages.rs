//! End to end decoding over a simulated press timeline

use talking_button_service::{Config, Error, Message, Mode, ParseState, Session};

/// Poll period of the simulated caller
const STEP: u32 = 5;

struct Timeline {
    session: Session,
    now: u32,
    errors: Vec<Error>,
}

impl Timeline {
    fn new(mode: Mode, config: Config) -> Self {
        let mut session = Session::start(mode, 0);
        session.configure(config).unwrap();
        Self {
            session,
            now: 0,
            errors: Vec::new(),
        }
    }

    fn hold(&mut self, pressed: bool, polls: u32) {
        for _ in 0..polls {
            self.now += STEP;
            if let Err(error) = self.session.poll_with(self.now, || Ok::<_, ()>(pressed)) {
                self.errors.push(error);
            }
        }
    }

    /// Press measured as lasting `ms`
    fn press(&mut self, ms: u32) -> &mut Self {
        self.hold(true, ms / STEP + 1);
        self
    }

    /// Release measured as lasting `ms`
    fn release(&mut self, ms: u32) -> &mut Self {
        self.hold(false, ms / STEP + 1);
        self
    }

    /// Releases long enough to separate messages
    fn separate(&mut self) -> &mut Self {
        let ms = self.session.config().message_separator_ms + 100;
        self.release(ms)
    }

    /// Runs `presses`, each followed by `gap_ms` of release, between two separators
    fn message(&mut self, presses: &[u32], gap_ms: u32) -> Option<Message> {
        self.separate();
        for (i, &press) in presses.iter().enumerate() {
            self.press(press);
            if i + 1 < presses.len() {
                self.release(gap_ms);
            }
        }
        self.separate();
        self.session.take_message()
    }
}

#[test]
fn test_count_mode() {
    let config = Config {
        max_count: 3,
        ..Default::default()
    };

    let mut timeline = Timeline::new(Mode::Count, config);
    assert_eq!(timeline.message(&[200, 200, 200], 200), Some(Message::Count(3)));
    assert!(timeline.errors.is_empty());

    let mut timeline = Timeline::new(Mode::Count, config);
    assert_eq!(timeline.message(&[200, 200, 200, 200], 200), None);
    assert_eq!(timeline.errors, [Error::CountOverflow]);
    assert_eq!(timeline.session.last_error(), Some(Error::CountOverflow));
}

#[test]
fn test_binary_mode() {
    let config = Config {
        binary_high_low_threshold_ms: 300,
        ..Default::default()
    };
    let mut timeline = Timeline::new(Mode::Binary, config);

    let message = timeline.message(&[400, 100], 200).unwrap();
    assert_eq!(message, Message::Binary(0b10));
    assert_eq!(message.value(), Some(2));

    assert_eq!(timeline.message(&[100, 400, 400, 100], 200), Some(Message::Binary(0b0110)));

    assert_eq!(timeline.message(&[400; 5], 200), None);
    assert_eq!(timeline.errors, [Error::BinaryBitsOverflow]);
}

#[test]
fn test_duration_mode() {
    let config = Config {
        duration_unit_ms: 1000,
        ..Default::default()
    };
    let mut timeline = Timeline::new(Mode::Duration, config);

    let message = timeline.message(&[900, 2100], 200).unwrap();
    assert_eq!(message.digits(), [1, 2]);

    let mut buf = [0xffu8; 8];
    let len = message.encode_into_slice(&mut buf).unwrap();
    assert_eq!(&buf[..len], [1, 2, 0]);

    assert_eq!(timeline.message(&[1000; 5], 200), None);
    assert_eq!(timeline.errors, [Error::DurationDigitsOverflow]);
}

#[test]
fn test_too_short_resets() {
    let mut timeline = Timeline::new(Mode::Count, Config::default());
    timeline.separate().press(200).release(60).press(200);
    assert_eq!(timeline.errors, [Error::ReleaseTooShort]);
    assert_eq!(timeline.session.parse_state(), ParseState::Idle);
    assert_eq!(timeline.separate().session.take_message(), None);

    let mut timeline = Timeline::new(Mode::Count, Config::default());
    timeline.separate().press(200).release(200).press(60).release(200);
    assert_eq!(timeline.errors, [Error::PressTooShort]);
    assert_eq!(timeline.session.parse_state(), ParseState::Idle);
    assert_eq!(timeline.separate().session.take_message(), None);
    assert_eq!(timeline.session.describe_error(), "button press is too short");

    // Recovers on the next message
    assert_eq!(timeline.message(&[200], 200), Some(Message::Count(1)));
    assert_eq!(timeline.session.last_error(), None);
}

#[test]
fn test_slow_poll_keeps_message() {
    let mut timeline = Timeline::new(Mode::Count, Config::default());
    timeline.separate().press(200).release(200);

    timeline.now += timeline.session.config().max_read_period_ms;
    let result = timeline.session.poll_with(timeline.now, || Ok::<_, ()>(false));
    assert_eq!(result, Err(Error::ReadPeriodTooLong));
    assert_eq!(timeline.session.parse_state(), ParseState::InMessage);

    timeline.press(200).separate();
    assert_eq!(timeline.session.take_message(), Some(Message::Count(2)));
}

#[test]
fn test_take_message_when_empty() {
    let mut timeline = Timeline::new(Mode::Duration, Config::default());
    timeline.separate();

    let state = timeline.session.parse_state();
    assert_eq!(timeline.session.take_message(), None);
    assert_eq!(timeline.session.read_message(&mut [0u8; 16]), Ok(None));
    assert_eq!(timeline.session.parse_state(), state);
    assert_eq!(timeline.session.last_error(), None);
}

#[test]
fn test_unread_message_is_overwritten() {
    let mut timeline = Timeline::new(Mode::Count, Config::default());

    timeline.separate().press(200).separate();
    assert!(timeline.session.has_message());
    timeline.press(200).release(200).press(200).separate();

    assert_eq!(timeline.session.take_message(), Some(Message::Count(2)));
    assert_eq!(timeline.session.take_message(), None);
}

#[test]
fn test_noise() {
    for mode in [Mode::Count, Mode::Binary, Mode::Duration] {
        let mut timeline = Timeline::new(mode, Config::default());
        timeline.separate();

        // Contact chatter: the level flips on every poll
        let mut pressed = false;
        for _ in 0..64 {
            pressed = !pressed;
            timeline.hold(pressed, 1);
        }

        assert!(timeline.errors.contains(&Error::ReadNoise), "{:?}", mode);
        assert!(timeline.errors.iter().all(|error| *error == Error::ReadNoise));
        timeline.separate();
        assert_eq!(timeline.session.take_message(), None);
    }
}

#[test]
fn test_noise_while_idle() {
    let mut timeline = Timeline::new(Mode::Count, Config::default());

    let mut pressed = false;
    for _ in 0..64 {
        pressed = !pressed;
        timeline.hold(pressed, 1);
    }

    assert!(timeline.errors.contains(&Error::ReadNoise));
    assert_eq!(timeline.session.parse_state(), ParseState::Idle);
}

#[test]
fn test_release_length_does_not_matter() {
    let config = Config {
        binary_high_low_threshold_ms: 300,
        ..Default::default()
    };
    let presses = [350, 120, 500, 310];

    let mut short_gaps = Timeline::new(Mode::Binary, config);
    let mut long_gaps = Timeline::new(Mode::Binary, config);

    let expected = Some(Message::Binary(0b1011));
    assert_eq!(short_gaps.message(&presses, 100), expected);
    assert_eq!(long_gaps.message(&presses, 450), expected);

    let mut durations = Timeline::new(Mode::Duration, config);
    let message = durations.message(&[1400, 600, 2600], 150).unwrap();
    assert_eq!(message.digits(), [1, 1, 3]);
}

#[test]
fn test_bounce_is_ignored() {
    let mut timeline = Timeline::new(Mode::Count, Config::default());
    timeline.separate();

    timeline.press(200).release(200);
    // Contact closes for a single poll before the real press
    timeline.hold(true, 1);
    timeline.hold(false, 1);
    timeline.press(150).separate();

    assert!(timeline.errors.is_empty());
    assert_eq!(timeline.session.take_message(), Some(Message::Count(2)));
}

#[test]
fn test_clock_wraparound() {
    let mut session = Session::start(Mode::Count, u32::MAX - 1000);
    let mut now = u32::MAX - 1000;
    let mut poll = |session: &mut Session, pressed: bool, ms: u32| {
        for _ in 0..ms / STEP + 1 {
            now = now.wrapping_add(STEP);
            session.poll_with(now, || Ok::<_, ()>(pressed)).unwrap();
        }
    };

    poll(&mut session, false, 600);
    poll(&mut session, true, 200);
    poll(&mut session, false, 200);
    poll(&mut session, true, 200);
    poll(&mut session, false, 600);

    assert_eq!(session.take_message(), Some(Message::Count(2)));
}
