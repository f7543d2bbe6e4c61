//! Frame timing statistics.
//!
//! Collects per-frame render and total times and reports them through
//! `tracing` once per [`STATS_INTERVAL`](crate::config::STATS_INTERVAL):
//!
//! ```ignore
//! let mut stats = FrameStats::new();
//!
//! // In main loop:
//! let frame_start = Instant::now();
//! // ... tick ...
//! let render_time = frame_start.elapsed();
//! // ... sleep ...
//! stats.record_frame(frame_start.elapsed(), render_time);
//! stats.report_if_due(STATS_INTERVAL);
//! ```

use std::time::{Duration, Instant};

use tracing::info;

pub struct FrameStats {
    /// Minimum frame time in the current window
    frame_time_min_us: u32,
    /// Maximum frame time in the current window
    frame_time_max_us: u32,
    /// Exponential moving average over the whole run
    frame_time_avg_us: f32,
    /// Slowest render (tick without sleep) in the current window
    render_time_max_us: u32,

    window_frames: u32,
    /// Sensor faults seen in the current window
    window_faults: u32,
    pub total_frames: u64,

    window_start: Instant,
    start_time: Instant,
}

impl FrameStats {
    /// Exponential moving average alpha (0.1 for smooth updates).
    const EMA_ALPHA: f32 = 0.1;

    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_time_min_us: u32::MAX,
            frame_time_max_us: 0,
            frame_time_avg_us: 0.0,
            render_time_max_us: 0,
            window_frames: 0,
            window_faults: 0,
            total_frames: 0,
            window_start: now,
            start_time: now,
        }
    }

    pub fn record_frame(
        &mut self,
        total_time: Duration,
        render_time: Duration,
    ) {
        let total_us = total_time.as_micros().min(u128::from(u32::MAX)) as u32;
        let render_us = render_time.as_micros().min(u128::from(u32::MAX)) as u32;

        self.frame_time_min_us = self.frame_time_min_us.min(total_us);
        self.frame_time_max_us = self.frame_time_max_us.max(total_us);
        self.render_time_max_us = self.render_time_max_us.max(render_us);

        if self.total_frames == 0 {
            self.frame_time_avg_us = total_us as f32;
        } else {
            self.frame_time_avg_us =
                Self::EMA_ALPHA.mul_add(total_us as f32, (1.0 - Self::EMA_ALPHA) * self.frame_time_avg_us);
        }

        self.window_frames += 1;
        self.total_frames += 1;
    }

    #[inline]
    pub const fn record_fault(&mut self) { self.window_faults += 1; }

    #[inline]
    pub const fn frame_time_avg_us(&self) -> u32 { self.frame_time_avg_us as u32 }

    /// Log and start a new window once `interval` has passed. Returns `true`
    /// if a report was emitted.
    pub fn report_if_due(
        &mut self,
        interval: Duration,
    ) -> bool {
        let elapsed = self.window_start.elapsed();
        if elapsed < interval || self.window_frames == 0 {
            return false;
        }

        let fps = self.window_frames as f32 / elapsed.as_secs_f32();
        info!(
            fps = %format_args!("{fps:.1}"),
            min_us = self.frame_time_min_us,
            max_us = self.frame_time_max_us,
            avg_us = self.frame_time_avg_us(),
            render_max_us = self.render_time_max_us,
            sensor_faults = self.window_faults,
            uptime_s = self.start_time.elapsed().as_secs(),
            "frame stats"
        );

        self.frame_time_min_us = u32::MAX;
        self.frame_time_max_us = 0;
        self.render_time_max_us = 0;
        self.window_frames = 0;
        self.window_faults = 0;
        self.window_start = Instant::now();
        true
    }
}

impl Default for FrameStats {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_avg() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::from_micros(30_000), Duration::from_micros(5_000));
        stats.record_frame(Duration::from_micros(40_000), Duration::from_micros(9_000));
        stats.record_frame(Duration::from_micros(20_000), Duration::from_micros(2_000));

        assert_eq!(stats.frame_time_min_us, 20_000);
        assert_eq!(stats.frame_time_max_us, 40_000);
        assert_eq!(stats.render_time_max_us, 9_000);
        assert_eq!(stats.total_frames, 3);
        // 30000 -> 31000 -> 29900
        assert!(stats.frame_time_avg_us().abs_diff(29_900) <= 1);
    }

    #[test]
    fn test_report_resets_window() {
        let mut stats = FrameStats::new();
        assert!(!stats.report_if_due(Duration::ZERO), "nothing recorded yet");

        stats.record_frame(Duration::from_micros(33_000), Duration::from_micros(4_000));
        stats.record_fault();
        assert!(!stats.report_if_due(Duration::from_secs(3600)));
        assert!(stats.report_if_due(Duration::ZERO));

        assert_eq!(stats.window_frames, 0);
        assert_eq!(stats.window_faults, 0);
        assert_eq!(stats.frame_time_min_us, u32::MAX);
        assert_eq!(stats.total_frames, 1);
    }
}
