use std::fmt;

const MS_PER_SECOND: i64 = 1_000;
const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Waiting,
    Active,
}

/// Emitted exactly once, when the countdown first observes the go-live time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownCompleted;

/// Time left until go-live, split the way the counter renders it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingTime {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl RemainingTime {
    /// Split a millisecond span; partial seconds count as a whole second
    pub fn from_millis(ms: i64) -> Self {
        let total_seconds = (ms.max(0) + MS_PER_SECOND - 1) / MS_PER_SECOND;
        Self {
            days: total_seconds / SECONDS_PER_DAY,
            hours: (total_seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
            minutes: (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
            seconds: total_seconds % SECONDS_PER_MINUTE,
        }
    }

    /// Days are folded into the hour count
    pub fn total_hours(&self) -> i64 {
        self.hours + self.days * 24
    }
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hours, {} minutes, {} seconds",
            self.total_hours(),
            self.minutes,
            self.seconds
        )
    }
}

/// Two-state countdown to the sale's go-live time.
///
/// `Waiting` is initial and `Active` is terminal. Callers must `observe` once
/// at setup so an already-past go-live date completes without waiting for a
/// timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    go_live_ms: i64,
    phase: CountdownPhase,
}

impl Countdown {
    pub fn new(go_live_ms: i64) -> Self {
        Self {
            go_live_ms,
            phase: CountdownPhase::Waiting,
        }
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    /// Advance with the current clock; `Some` only on the Waiting -> Active edge
    pub fn observe(&mut self, now_ms: i64) -> Option<CountdownCompleted> {
        match self.phase {
            CountdownPhase::Active => None,
            CountdownPhase::Waiting if now_ms >= self.go_live_ms => {
                self.phase = CountdownPhase::Active;
                Some(CountdownCompleted)
            }
            CountdownPhase::Waiting => None,
        }
    }

    /// `None` once active
    pub fn remaining(&self, now_ms: i64) -> Option<RemainingTime> {
        match self.phase {
            CountdownPhase::Active => None,
            CountdownPhase::Waiting => Some(RemainingTime::from_millis(self.go_live_ms - now_ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GO_LIVE: i64 = 1_700_000_000_000;

    #[test]
    fn test_past_go_live_completes_on_first_observation() {
        let mut countdown = Countdown::new(GO_LIVE);
        assert_eq!(countdown.observe(GO_LIVE + 5_000), Some(CountdownCompleted));
        assert_eq!(countdown.phase(), CountdownPhase::Active);
    }

    #[test]
    fn test_completion_fires_once() {
        let mut countdown = Countdown::new(GO_LIVE);
        assert_eq!(countdown.observe(GO_LIVE - 2_000), None);
        assert_eq!(countdown.observe(GO_LIVE - 1_000), None);
        assert_eq!(countdown.observe(GO_LIVE), Some(CountdownCompleted));
        assert_eq!(countdown.observe(GO_LIVE + 1_000), None);
        // a clock going backwards does not re-arm it
        assert_eq!(countdown.observe(GO_LIVE - 60_000), None);
        assert_eq!(countdown.phase(), CountdownPhase::Active);
        assert_eq!(countdown.remaining(GO_LIVE - 60_000), None);
    }

    #[test]
    fn test_days_fold_into_hours() {
        let span = 2 * 86_400_000 + 3 * 3_600_000 + 4 * 60_000 + 5_000;
        let remaining = RemainingTime::from_millis(span);
        assert_eq!(remaining.days, 2);
        assert_eq!(remaining.total_hours(), 51);
        assert_eq!(remaining.to_string(), "51 hours, 4 minutes, 5 seconds");
    }

    #[test]
    fn test_partial_second_rounds_up() {
        assert_eq!(RemainingTime::from_millis(1).to_string(), "0 hours, 0 minutes, 1 seconds");
        assert_eq!(RemainingTime::from_millis(-500).to_string(), "0 hours, 0 minutes, 0 seconds");

        let countdown = Countdown::new(GO_LIVE);
        let remaining = countdown.remaining(GO_LIVE - 61_200).unwrap();
        assert_eq!((remaining.minutes, remaining.seconds), (1, 2));
    }
}
