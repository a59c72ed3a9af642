use embassy_executor::Executor;
use embassy_time::{Duration, Instant, Timer};
use log::*;
use static_cell::StaticCell;
use talking_button_service::{ActiveState, Config, EmbassyClock, Mode, Preconfigured, Pull, TalkingButton};

/// Mock button replaying a press script
mod device {
    use core::convert::Infallible;

    use embassy_time::Instant;
    use embedded_hal_1::digital::{ErrorType, InputPin};

    /// Active low pin following `(pressed, duration ms)` steps, released once the script is over
    pub struct ScriptedPin {
        start: Instant,
        script: &'static [(bool, u64)],
    }

    impl ScriptedPin {
        pub fn new(script: &'static [(bool, u64)]) -> Self {
            Self {
                start: Instant::now(),
                script,
            }
        }

        /// Total script length in milliseconds
        pub fn length_ms(&self) -> u64 {
            self.script.iter().map(|(_, ms)| ms).sum()
        }

        fn pressed(&self) -> bool {
            let mut elapsed = self.start.elapsed().as_millis();
            for &(pressed, ms) in self.script {
                if elapsed < ms {
                    return pressed;
                }
                elapsed -= ms;
            }
            false
        }
    }

    impl ErrorType for ScriptedPin {
        type Error = Infallible;
    }

    impl InputPin for ScriptedPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.pressed())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.pressed())
        }
    }
}

const POLL_PERIOD: Duration = Duration::from_millis(5);

/// Three presses
const COUNT_SCRIPT: &[(bool, u64)] = &[
    (false, 700),
    (true, 200),
    (false, 200),
    (true, 200),
    (false, 200),
    (true, 200),
];

/// Long, short, long: 0b101
const BINARY_SCRIPT: &[(bool, u64)] = &[
    (false, 700),
    (true, 500),
    (false, 200),
    (true, 150),
    (false, 200),
    (true, 500),
];

/// One and two units
const DURATION_SCRIPT: &[(bool, u64)] = &[(false, 700), (true, 900), (false, 300), (true, 2100)];

async fn run(mode: Mode, script: &'static [(bool, u64)]) {
    let pin = device::ScriptedPin::new(script);
    let end = Instant::now() + Duration::from_millis(pin.length_ms() + 1000);

    let mut button = match TalkingButton::start(
        Preconfigured(pin),
        EmbassyClock,
        mode,
        Pull::Up,
        ActiveState::ActiveLow,
    ) {
        Ok(button) => button,
        Err(e) => match e {},
    };
    if let Err(e) = button.configure(Config::default()) {
        error!("Invalid configuration: {:?}", e);
        return;
    }

    while Instant::now() < end {
        if let Err(e) = button.poll() {
            warn!("Poll failed: {}", e);
        }
        if let Some(message) = button.take_message() {
            info!("{:?} mode message: {:?}", mode, message);
        }
        Timer::after(POLL_PERIOD).await;
    }
}

#[embassy_executor::task]
async fn button_task() {
    run(Mode::Count, COUNT_SCRIPT).await;
    run(Mode::Binary, BINARY_SCRIPT).await;
    run(Mode::Duration, DURATION_SCRIPT).await;
    info!("Done");
    std::process::exit(0);
}

fn main() {
    env_logger::builder().filter_level(log::LevelFilter::Info).init();

    static EXECUTOR: StaticCell<Executor> = StaticCell::new();
    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(button_task());
    });
}
