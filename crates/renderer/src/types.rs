use std::path::PathBuf;
use std::time::Duration;

/// Window size used when the caller does not request one.
pub const DEFAULT_SURFACE_SIZE: (u32, u32) = (800, 600);

/// Frame rate the loop paces itself to, and the divisor for `glx_Time`.
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// How the render loop spaces out its ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacing {
    /// Ticks per second. Also defines shader time: `time = frame / target_fps`.
    pub target_fps: u32,
    /// When false the loop never sleeps; time still advances per frame.
    pub capped: bool,
}

impl FramePacing {
    pub fn new(target_fps: u32, capped: bool) -> Self {
        Self {
            target_fps: target_fps.max(1),
            capped,
        }
    }

    /// Length of one tick at the target rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }

    /// How long to sleep after a tick that took `elapsed`, if at all.
    pub fn pause_after(&self, elapsed: Duration) -> Option<Duration> {
        if !self.capped {
            return None;
        }
        self.frame_interval()
            .checked_sub(elapsed)
            .filter(|remaining| !remaining.is_zero())
    }
}

impl Default for FramePacing {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FPS, true)
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// Mirrors the CLI: which fragment shader to compile, how large the window
/// should be, and how the loop is paced.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Path to the user fragment shader body.
    pub shader_source: PathBuf,
    /// Frame-rate target and capping.
    pub pacing: FramePacing,
    /// Window title.
    pub title: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: DEFAULT_SURFACE_SIZE,
            shader_source: PathBuf::new(),
            pacing: FramePacing::default(),
            title: "Shaker".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_one_sixtieth() {
        let pacing = FramePacing::default();
        assert_eq!(pacing.target_fps, 60);
        assert!(pacing.capped);
        let interval = pacing.frame_interval().as_secs_f64();
        assert!((interval - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn fast_tick_sleeps_the_remainder() {
        let pacing = FramePacing::new(50, true);
        assert_eq!(
            pacing.pause_after(Duration::from_millis(5)),
            Some(Duration::from_millis(15))
        );
    }

    #[test]
    fn slow_tick_does_not_sleep() {
        let pacing = FramePacing::new(50, true);
        assert_eq!(pacing.pause_after(Duration::from_millis(20)), None);
        assert_eq!(pacing.pause_after(Duration::from_millis(35)), None);
    }

    #[test]
    fn uncapped_never_sleeps() {
        let pacing = FramePacing::new(60, false);
        assert_eq!(pacing.pause_after(Duration::ZERO), None);
    }

    #[test]
    fn zero_fps_is_clamped() {
        assert_eq!(FramePacing::new(0, true).target_fps, 1);
    }
}
