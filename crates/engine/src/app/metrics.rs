use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default)]
pub struct SimMetricsSnapshot {
    pub tps: f32,
    pub tick_time_ms: f32,
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    ticks: u32,
    tick_time_sum: Duration,
}

impl MetricsAccumulator {
    pub(crate) fn new(now: Instant) -> Self {
        Self {
            interval_start: now,
            ticks: 0,
            tick_time_sum: Duration::ZERO,
        }
    }

    pub(crate) fn record_tick(&mut self, tick_dt: Duration) {
        self.ticks = self.ticks.saturating_add(1);
        self.tick_time_sum = self.tick_time_sum.saturating_add(tick_dt);
    }

    pub(crate) fn snapshot_and_reset(&mut self, now: Instant) -> SimMetricsSnapshot {
        let elapsed = now.saturating_duration_since(self.interval_start);
        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let tick_time_ms = if self.ticks == 0 {
            0.0
        } else {
            (self.tick_time_sum.as_secs_f32() / self.ticks as f32) * 1000.0
        };

        let snapshot = SimMetricsSnapshot {
            tps: self.ticks as f32 / elapsed_seconds,
            tick_time_ms,
        };

        self.interval_start = now;
        self.ticks = 0;
        self.tick_time_sum = Duration::ZERO;

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_averages_tick_time_and_counts_rate() {
        let start = Instant::now();
        let mut metrics = MetricsAccumulator::new(start);
        metrics.record_tick(Duration::from_millis(10));
        metrics.record_tick(Duration::from_millis(20));

        let snapshot = metrics.snapshot_and_reset(start + Duration::from_secs(1));
        assert!((snapshot.tps - 2.0).abs() < 1e-3);
        assert!((snapshot.tick_time_ms - 15.0).abs() < 1e-3);
    }

    #[test]
    fn snapshot_resets_the_interval() {
        let start = Instant::now();
        let mut metrics = MetricsAccumulator::new(start);
        metrics.record_tick(Duration::from_millis(10));
        metrics.snapshot_and_reset(start + Duration::from_secs(1));

        let empty = metrics.snapshot_and_reset(start + Duration::from_secs(2));
        assert_eq!(empty.tps, 0.0);
        assert_eq!(empty.tick_time_ms, 0.0);
    }
}
