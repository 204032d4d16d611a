use std::time::{Duration, Instant};

const TICK_PERIOD: Duration = Duration::from_millis(500);
const TICK_STEP: u8 = 5;
const TICK_CAP: u8 = 90;

/// Simulated progress for one in-flight submission.
///
/// The percentage carries no information about actual server-side progress:
/// it climbs on a fixed clock and parks below 100 so that the jump to 100 is
/// an unambiguous "done" signal. Resolution (success or failure) freezes the
/// ticker for good; only success snaps it to 100.
#[derive(Debug)]
pub struct ProgressTicker {
    percent: u8,
    last_tick: Instant,
    resolved: bool,
}

impl ProgressTicker {
    pub fn start() -> Self {
        Self::start_at(Instant::now())
    }

    pub fn start_at(now: Instant) -> Self {
        Self {
            percent: 0,
            last_tick: now,
            resolved: false,
        }
    }

    /// Advance the simulation to `now`. A no-op once resolved.
    pub fn tick(&mut self, now: Instant) -> u8 {
        if self.resolved {
            return self.percent;
        }
        while self.percent < TICK_CAP
            && now.duration_since(self.last_tick) >= TICK_PERIOD
        {
            self.percent = (self.percent + TICK_STEP).min(TICK_CAP);
            self.last_tick += TICK_PERIOD;
        }
        self.percent
    }

    /// The request succeeded: stop ticking and snap to 100.
    pub fn finish(&mut self) {
        self.resolved = true;
        self.percent = 100;
    }

    /// The request failed: stop ticking, keep the current value.
    pub fn cancel(&mut self) {
        self.resolved = true;
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn fraction(&self) -> f32 {
        f32::from(self.percent) / 100.0
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// How long until the next tick would land, for repaint scheduling.
    pub fn period() -> Duration {
        TICK_PERIOD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn climbs_by_fixed_steps() {
        let t0 = Instant::now();
        let mut ticker = ProgressTicker::start_at(t0);
        assert_eq!(ticker.percent(), 0);
        assert_eq!(ticker.tick(t0 + TICK_PERIOD), TICK_STEP);
        assert_eq!(ticker.tick(t0 + 3 * TICK_PERIOD), 3 * TICK_STEP);
    }

    #[test]
    fn never_decreases() {
        let t0 = Instant::now();
        let mut ticker = ProgressTicker::start_at(t0);
        let mut last = 0;
        for i in 0u32..50 {
            let now = ticker.tick(t0 + i * TICK_PERIOD);
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn caps_below_one_hundred_while_pending() {
        let t0 = Instant::now();
        let mut ticker = ProgressTicker::start_at(t0);
        assert_eq!(ticker.tick(t0 + 1000 * TICK_PERIOD), TICK_CAP);
        assert!(ticker.percent() < 100);
    }

    #[test]
    fn finish_snaps_to_one_hundred_and_goes_inert() {
        let t0 = Instant::now();
        let mut ticker = ProgressTicker::start_at(t0);
        ticker.tick(t0 + 2 * TICK_PERIOD);
        ticker.finish();
        assert_eq!(ticker.percent(), 100);
        assert_eq!(ticker.tick(t0 + 500 * TICK_PERIOD), 100);
    }

    #[test]
    fn cancel_freezes_at_current_value() {
        let t0 = Instant::now();
        let mut ticker = ProgressTicker::start_at(t0);
        let frozen = ticker.tick(t0 + 4 * TICK_PERIOD);
        ticker.cancel();
        assert_eq!(ticker.tick(t0 + 400 * TICK_PERIOD), frozen);
        assert!(ticker.is_resolved());
        assert!(ticker.percent() < 100);
    }
}
