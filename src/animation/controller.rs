//! Per-object spin and click-to-grow animation state
//!
//! Every animated mesh owns one [`AnimatedObjectController`]. The host calls
//! [`AnimatedObjectController::on_frame_tick`] once per rendered frame and
//! [`AnimatedObjectController::on_activate`] whenever the mesh is clicked.
//! Each tick advances the spin by a fixed step and moves the scale one step
//! toward the bound selected by the expand flag.

/// Angle added to the X rotation on every tick, in radians
pub const ROTATION_STEP: f64 = 0.01;

/// Scale change applied per tick while moving toward a bound
pub const SCALE_STEP: f64 = 0.05;

/// Fully contracted scale
pub const MIN_SCALE: f64 = 1.0;

/// Fully expanded scale
pub const MAX_SCALE: f64 = 1.4;

/// Transform produced by one frame tick
///
/// Rotations are in radians and apply to the X and Y axes of the render
/// object; `scale` applies uniformly to all three axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    pub rotation_x: f64,
    pub rotation_y: f64,
    pub scale: f64,
}

/// Animation state for a single render object
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedObjectController {
    rotation_x: f64,
    rotation_y: f64,
    scale: f64,
    expanding: bool,
}

impl Default for AnimatedObjectController {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatedObjectController {
    /// Creates a controller at rest: no rotation, contracted, not expanding
    pub fn new() -> Self {
        Self {
            rotation_x: 0.0,
            rotation_y: 0.0,
            scale: MIN_SCALE,
            expanding: false,
        }
    }

    /// Flips between expanding and contracting
    pub fn on_activate(&mut self) {
        self.expanding = !self.expanding;
    }

    /// Advances the animation by one frame and returns the new transform
    ///
    /// The Y rotation is locked to the freshly updated X rotation rather than
    /// accumulated on its own. Scale moves one step toward the active bound
    /// and is clamped so it lands on the bound exactly; that exact landing is
    /// what lets the bound checks below use plain equality.
    pub fn on_frame_tick(&mut self) -> FrameUpdate {
        self.rotation_x += ROTATION_STEP;
        self.rotation_y = self.rotation_x;

        if self.expanding {
            if self.scale != MAX_SCALE {
                self.scale = (self.scale + SCALE_STEP).min(MAX_SCALE);
            }
        } else if self.scale != MIN_SCALE {
            self.scale = (self.scale - SCALE_STEP).max(MIN_SCALE);
        }

        self.current()
    }

    /// Current transform without advancing the animation
    pub fn current(&self) -> FrameUpdate {
        FrameUpdate {
            rotation_x: self.rotation_x,
            rotation_y: self.rotation_y,
            scale: self.scale,
        }
    }

    pub fn rotation_x(&self) -> f64 {
        self.rotation_x
    }

    pub fn rotation_y(&self) -> f64 {
        self.rotation_y
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_expanding(&self) -> bool {
        self.expanding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn tick_n(controller: &mut AnimatedObjectController, n: usize) -> FrameUpdate {
        let mut last = controller.current();
        for _ in 0..n {
            last = controller.on_frame_tick();
        }
        last
    }

    /// Drives a fresh controller to the fully expanded bound
    fn fully_expanded() -> AnimatedObjectController {
        let mut controller = AnimatedObjectController::new();
        controller.on_activate();
        tick_n(&mut controller, 20);
        assert_eq!(controller.scale(), MAX_SCALE);
        controller
    }

    #[test]
    fn test_new_controller_is_at_rest() {
        let controller = AnimatedObjectController::new();
        assert_eq!(controller.rotation_x(), 0.0);
        assert_eq!(controller.rotation_y(), 0.0);
        assert_eq!(controller.scale(), 1.0);
        assert!(!controller.is_expanding());
    }

    #[test]
    fn test_idle_ticks_only_rotate() {
        for n in [0usize, 1, 2, 10, 100, 1000] {
            let mut controller = AnimatedObjectController::new();
            tick_n(&mut controller, n);

            let expected = 0.01 * n as f64;
            assert_abs_diff_eq!(controller.rotation_x(), expected, epsilon = 1e-9);
            assert_abs_diff_eq!(controller.rotation_y(), expected, epsilon = 1e-9);
            assert_eq!(controller.scale(), 1.0);
        }
    }

    #[test]
    fn test_rotation_axes_stay_locked() {
        let mut controller = AnimatedObjectController::new();
        for i in 0..250 {
            if i % 17 == 0 {
                controller.on_activate();
            }
            let update = controller.on_frame_tick();
            assert_eq!(update.rotation_x, update.rotation_y);
        }
    }

    #[test]
    fn test_activate_is_a_toggle() {
        let mut controller = AnimatedObjectController::new();
        controller.on_activate();
        assert!(controller.is_expanding());
        controller.on_activate();
        assert!(!controller.is_expanding());
    }

    #[test]
    fn test_expand_reaches_max_in_eight_ticks() {
        let mut controller = AnimatedObjectController::new();
        controller.on_activate();

        let update = tick_n(&mut controller, 8);
        assert_eq!(update.scale, 1.4);

        tick_n(&mut controller, 5);
        assert_eq!(controller.scale(), 1.4);
    }

    #[test]
    fn test_contract_returns_to_min_in_eight_ticks() {
        let mut controller = fully_expanded();
        controller.on_activate();

        let update = tick_n(&mut controller, 8);
        assert_eq!(update.scale, 1.0);
    }

    #[test]
    fn test_bounds_are_fixed_points() {
        let mut controller = fully_expanded();
        for _ in 0..50 {
            assert_eq!(controller.on_frame_tick().scale, MAX_SCALE);
        }

        let mut controller = AnimatedObjectController::new();
        for _ in 0..50 {
            assert_eq!(controller.on_frame_tick().scale, MIN_SCALE);
        }
    }

    #[test]
    fn test_interrupted_toggle_does_not_undershoot() {
        let mut controller = AnimatedObjectController::new();
        tick_n(&mut controller, 2);
        assert_eq!(controller.scale(), 1.0);

        controller.on_activate();
        assert_eq!(controller.on_frame_tick().scale, 1.05);

        controller.on_activate();
        assert_eq!(controller.on_frame_tick().scale, 1.0);
    }

    #[test]
    fn test_scale_stays_within_bounds_for_random_inputs() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..64 {
            let mut controller = AnimatedObjectController::new();
            for _ in 0..500 {
                if rng.random_bool(0.15) {
                    controller.on_activate();
                }
                let scale = controller.on_frame_tick().scale;
                assert!((MIN_SCALE..=MAX_SCALE).contains(&scale), "scale {scale} escaped");
            }
        }
    }
}
