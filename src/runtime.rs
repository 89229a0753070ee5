use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Production tick interval. The once-per-second tick is the app's only
/// timing primitive: the countdown, the auto-start delay and toast aging
/// all advance on it.
pub const TICK_RATE_MS: u64 = 1000;

/// Unified event type consumed by the app loop
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source backed by crossterm's blocking reader
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Scripted event source for headless tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Owns the app's wall clock: interleaves input events with the
/// once-per-second tick on the caller's thread, so no two tick deliveries
/// can ever be in flight at once.
///
/// Ticks are deadline-based rather than timeout-based. A burst of key
/// events cannot starve the countdown clock, and a stalled or suspended
/// process gets one catch-up tick, not a backlog of them.
pub struct Runner<E: EventSource> {
    source: E,
    tick_interval: Duration,
    next_tick: Instant,
}

impl<E: EventSource> Runner<E> {
    pub fn new(source: E) -> Self {
        Self::with_tick_interval(source, Duration::from_millis(TICK_RATE_MS))
    }

    pub fn with_tick_interval(source: E, tick_interval: Duration) -> Self {
        Self {
            source,
            tick_interval,
            next_tick: Instant::now() + tick_interval,
        }
    }

    /// Returns the next input event, or a Tick once the deadline passes.
    pub fn step(&mut self) -> AppEvent {
        let now = Instant::now();
        if now >= self.next_tick {
            self.schedule_next_tick(now);
            return AppEvent::Tick;
        }

        match self.source.recv_timeout(self.next_tick - now) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => {
                self.schedule_next_tick(Instant::now());
                AppEvent::Tick
            }
            Err(RecvTimeoutError::Disconnected) => {
                // no more input will ever arrive; keep the clock honest
                std::thread::sleep(self.next_tick.saturating_duration_since(Instant::now()));
                self.schedule_next_tick(Instant::now());
                AppEvent::Tick
            }
        }
    }

    fn schedule_next_tick(&mut self, now: Instant) {
        self.next_tick += self.tick_interval;
        // missed deadlines coalesce into the single tick just delivered
        if self.next_tick <= now {
            self.next_tick = now + self.tick_interval;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let mut runner =
            Runner::with_tick_interval(TestEventSource::new(rx), Duration::from_millis(1));

        match runner.step() {
            AppEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize).unwrap();
        let mut runner =
            Runner::with_tick_interval(TestEventSource::new(rx), Duration::from_millis(100));

        match runner.step() {
            AppEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
    }

    #[test]
    fn queued_events_cannot_starve_the_clock() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..16 {
            tx.send(AppEvent::Resize).unwrap();
        }
        let mut runner =
            Runner::with_tick_interval(TestEventSource::new(rx), Duration::from_millis(10));

        // the deadline passes while the queue is still full
        std::thread::sleep(Duration::from_millis(15));
        match runner.step() {
            AppEvent::Tick => {}
            _ => panic!("expected the overdue Tick before more input"),
        }
        match runner.step() {
            AppEvent::Resize => {}
            _ => panic!("expected queued input after the Tick"),
        }
    }

    #[test]
    fn stall_yields_one_catch_up_tick_not_a_backlog() {
        let (tx, rx) = mpsc::channel();
        let mut runner =
            Runner::with_tick_interval(TestEventSource::new(rx), Duration::from_millis(10));

        // several intervals pass unserved
        std::thread::sleep(Duration::from_millis(50));
        match runner.step() {
            AppEvent::Tick => {}
            _ => panic!("expected a catch-up Tick"),
        }

        // the deadline was re-anchored: queued input comes before another tick
        tx.send(AppEvent::Resize).unwrap();
        match runner.step() {
            AppEvent::Resize => {}
            _ => panic!("expected input, not a tick backlog"),
        }
    }

    #[test]
    fn disconnected_source_keeps_ticking() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(tx);
        let mut runner =
            Runner::with_tick_interval(TestEventSource::new(rx), Duration::from_millis(1));

        for _ in 0..3 {
            match runner.step() {
                AppEvent::Tick => {}
                _ => panic!("expected Tick from a disconnected source"),
            }
        }
    }
}
