use std::time::{Duration, Instant};

/// Whether the on-screen controls are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsState {
    Visible,
    Hidden,
}

/// Hides the controls after a fixed idle window while playback runs.
///
/// Purely a timestamp machine: it owns no OS timer, so tearing down the
/// controller tears down the policy with it. `tick` is driven from the
/// application loop; user activity resets the window and re-shows the
/// controls.
#[derive(Debug)]
pub struct ActivityTracker {
    state: ControlsState,
    last_activity: Instant,
    hide_after: Duration,
}

impl ActivityTracker {
    pub fn new(hide_after: Duration, now: Instant) -> Self {
        Self {
            state: ControlsState::Visible,
            last_activity: now,
            hide_after,
        }
    }

    /// Record user activity: the controls become visible and the idle
    /// window restarts.
    pub fn notify_activity(&mut self, now: Instant) {
        self.last_activity = now;
        self.state = ControlsState::Visible;
    }

    /// Advance the idle clock. Controls only hide while playback runs; a
    /// paused player keeps them on screen indefinitely.
    pub fn tick(&mut self, now: Instant, playing: bool) {
        if self.state == ControlsState::Visible
            && playing
            && now.duration_since(self.last_activity) >= self.hide_after
        {
            self.state = ControlsState::Hidden;
        }
    }

    pub fn controls_visible(&self) -> bool {
        self.state == ControlsState::Visible
    }

    pub fn state(&self) -> ControlsState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIDE: Duration = Duration::from_secs(3);

    fn tracker() -> (ActivityTracker, Instant) {
        let now = Instant::now();
        (ActivityTracker::new(HIDE, now), now)
    }

    #[test]
    fn starts_visible() {
        let (t, _) = tracker();
        assert!(t.controls_visible());
    }

    #[test]
    fn hides_after_the_idle_window_while_playing() {
        let (mut t, now) = tracker();
        t.tick(now + Duration::from_secs(2), true);
        assert!(t.controls_visible(), "window not elapsed yet");

        t.tick(now + Duration::from_secs(3), true);
        assert!(!t.controls_visible());
    }

    #[test]
    fn never_hides_while_paused() {
        let (mut t, now) = tracker();
        t.tick(now + Duration::from_secs(60), false);
        assert!(t.controls_visible());
    }

    #[test]
    fn activity_resets_the_window() {
        let (mut t, now) = tracker();
        t.tick(now + Duration::from_secs(2), true);
        t.notify_activity(now + Duration::from_secs(2));

        t.tick(now + Duration::from_secs(4), true);
        assert!(t.controls_visible(), "only 2s since last activity");

        t.tick(now + Duration::from_secs(5), true);
        assert!(!t.controls_visible());
    }

    #[test]
    fn activity_reshows_hidden_controls() {
        let (mut t, now) = tracker();
        t.tick(now + Duration::from_secs(3), true);
        assert!(!t.controls_visible());

        t.notify_activity(now + Duration::from_secs(4));
        assert!(t.controls_visible());
        assert_eq!(t.state(), ControlsState::Visible);
    }
}
