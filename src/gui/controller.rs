use std::time::Instant;

use kiss3d::event::{Action, Event, Key, WindowEvent};

use super::backend::Kiss3dBackend;
use crate::model::{BodyID, SceneCoordinator, NOMINAL_TICK_SECONDS};

// Key config, all in one place
const KEY_FOCUS_PRIMARY: Key = Key::P;
const KEY_PREV_FOCUS: Key = Key::Q;
const KEY_NEXT_FOCUS: Key = Key::E;
const KEY_FOCUS_OUT: Key = Key::O;
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_TOGGLE_PAUSE: Key = Key::Space;
const KEY_TOGGLE_ORBIT: Key = Key::T;
const KEY_TOGGLE_HUD: Key = Key::H;

const MIN_TIME_SCALE: f64 = 1.0 / 64.0;
const MAX_TIME_SCALE: f64 = 64.0;

pub struct Controller {
    time_scale: f64,
    paused: bool,
    pub show_orbit: bool,
    pub show_hud: bool,
    focus: FocusCycle,
    timer: FrameTimer,
}

/// What the camera can be pointed at, in the order Q/E walks through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPoint {
    Primary,
    Satellite(BodyID),
}

#[derive(Debug)]
pub struct FocusCycle {
    num_satellites: usize,
    focus_idx: usize,
}

impl FocusCycle {
    pub fn new(num_satellites: usize) -> Self {
        FocusCycle {
            num_satellites,
            focus_idx: 0,
        }
    }

    // index 0 is the primary, then satellites by id
    fn len(&self) -> usize {
        self.num_satellites + 1
    }

    pub fn next(&mut self) -> FocusPoint {
        self.focus_idx = (self.focus_idx + 1) % self.len();
        self.point()
    }

    pub fn prev(&mut self) -> FocusPoint {
        self.focus_idx = (self.focus_idx + self.len() - 1) % self.len();
        self.point()
    }

    pub fn reset(&mut self) {
        self.focus_idx = 0;
    }

    pub fn point(&self) -> FocusPoint {
        match self.focus_idx {
            0 => FocusPoint::Primary,
            i => FocusPoint::Satellite(BodyID(i - 1)),
        }
    }
}

/// Frame timing: the length of the last frame, and a frames-per-second figure
/// averaged over a window so it's readable on screen.
pub struct FrameTimer {
    // None until the first frame, so setup time isn't billed to it
    last_frame: Option<Instant>,
    window_start: Instant,
    counter: usize,
    window_size_millis: usize,
    previous_fps: f64,
}

impl FrameTimer {
    pub fn new(window_size_millis: usize) -> Self {
        FrameTimer {
            last_frame: None,
            window_start: Instant::now(),
            counter: 0,
            window_size_millis,
            previous_fps: 0.0,
        }
    }

    pub fn fps(&self) -> f64 {
        self.previous_fps
    }

    /// Marks the start of a new frame and returns how long the previous one
    /// took, in seconds. The very first frame is one nominal tick long.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let seconds = match self.last_frame {
            Some(last) => now.duration_since(last).as_secs_f64(),
            None => {
                self.window_start = now;
                NOMINAL_TICK_SECONDS
            }
        };
        self.last_frame = Some(now);

        self.counter += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed.as_millis() > self.window_size_millis as u128 {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.window_start = now;
            self.counter = 0;
        }

        seconds
    }
}

impl Controller {
    pub fn new(num_satellites: usize, show_orbit: bool, show_hud: bool) -> Self {
        Controller {
            time_scale: 1.0,
            paused: false,
            show_orbit,
            show_hud,
            focus: FocusCycle::new(num_satellites),
            timer: FrameTimer::new(1000),
        }
    }

    pub fn process_event(&mut self, event: Event, scene: &mut SceneCoordinator<Kiss3dBackend>) {
        match event.value {
            WindowEvent::Key(KEY_FOCUS_PRIMARY, Action::Press, _) => {
                self.focus.reset();
                scene.focus_on_primary();
            }
            WindowEvent::Key(KEY_NEXT_FOCUS, Action::Press, _) => {
                let point = self.focus.next();
                Self::focus(scene, point);
            }
            WindowEvent::Key(KEY_PREV_FOCUS, Action::Press, _) => {
                let point = self.focus.prev();
                Self::focus(scene, point);
            }
            WindowEvent::Key(KEY_FOCUS_OUT, Action::Press, _) => {
                self.focus.reset();
                scene.focus_out();
            }
            WindowEvent::Key(KEY_SPEED_UP, Action::Press, _) => {
                self.time_scale = (self.time_scale * 2.0).min(MAX_TIME_SCALE);
                tracing::info!(time_scale = self.time_scale, "sped up");
            }
            WindowEvent::Key(KEY_SLOW_DOWN, Action::Press, _) => {
                self.time_scale = (self.time_scale / 2.0).max(MIN_TIME_SCALE);
                tracing::info!(time_scale = self.time_scale, "slowed down");
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                self.paused = !self.paused;
                tracing::info!(paused = self.paused, "toggled pause");
            }
            WindowEvent::Key(KEY_TOGGLE_ORBIT, Action::Press, _) => {
                self.show_orbit = !self.show_orbit;
            }
            WindowEvent::Key(KEY_TOGGLE_HUD, Action::Press, _) => {
                self.show_hud = !self.show_hud;
            }
            WindowEvent::FramebufferSize(width, height) => {
                scene.on_resize(width, height);
            }
            _ => {}
        }
    }

    fn focus(scene: &mut SceneCoordinator<Kiss3dBackend>, point: FocusPoint) {
        match point {
            FocusPoint::Primary => scene.focus_on_primary(),
            FocusPoint::Satellite(id) => {
                // The cycle only hands out ids it was built with
                if let Err(err) = scene.focus_on_satellite(id) {
                    tracing::warn!(%err, "couldn't focus on satellite");
                }
            }
        }
    }

    /// Time scale the bodies should run at right now; zero while paused.
    pub fn effective_time_scale(&self) -> f64 {
        if self.paused {
            0.0
        } else {
            self.time_scale
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn focus_point(&self) -> FocusPoint {
        self.focus.point()
    }

    pub fn fps(&self) -> f64 {
        self.timer.fps()
    }

    pub fn tick_frame_timer(&mut self) -> f64 {
        self.timer.tick()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_focus_cycle_wraps() {
        let mut cycle = FocusCycle::new(2);
        assert_eq!(cycle.point(), FocusPoint::Primary);
        assert_eq!(cycle.next(), FocusPoint::Satellite(BodyID(0)));
        assert_eq!(cycle.next(), FocusPoint::Satellite(BodyID(1)));
        assert_eq!(cycle.next(), FocusPoint::Primary);
        assert_eq!(cycle.prev(), FocusPoint::Satellite(BodyID(1)));
    }

    #[test]
    fn test_focus_cycle_without_satellites() {
        let mut cycle = FocusCycle::new(0);
        assert_eq!(cycle.next(), FocusPoint::Primary);
        assert_eq!(cycle.prev(), FocusPoint::Primary);
    }

    #[test]
    fn test_pause_zeroes_time_scale() {
        let mut controller = Controller::new(3, true, true);
        assert_eq!(controller.effective_time_scale(), 1.0);
        controller.paused = true;
        assert_eq!(controller.effective_time_scale(), 0.0);
        assert_eq!(controller.time_scale(), 1.0);
    }

    #[test]
    fn test_frame_timer_reports_elapsed() {
        let mut timer = FrameTimer::new(1000);
        timer.tick();
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.tick() >= 0.005);
        assert!(timer.tick() < 1.0);
    }

    #[test]
    fn test_first_frame_ignores_setup_time() {
        let mut timer = FrameTimer::new(1000);
        // Stands in for window and scene setup between construction and
        // the first frame
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(timer.tick(), NOMINAL_TICK_SECONDS);
        assert!(timer.tick() < 0.3);
    }
}
