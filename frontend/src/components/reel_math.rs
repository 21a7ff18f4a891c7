use shared::prize::Category;

pub const ITEM_HEIGHT: f64 = 120.0;
pub const CONTAINER_HEIGHT: f64 = 400.0;
pub const REPEAT_COUNT: usize = 30;
/// Copy of the base sequence the reel comes to rest on.
pub const TARGET_CYCLE: usize = 15;

pub const SPIN_CYCLES: f64 = 3.0;
pub const SPIN_PERIOD_MS: f64 = 4000.0;
pub const STOP_DURATION_MS: f64 = 3500.0;
pub const SETTLE_DELAY_MS: u32 = 1500;

pub const STOP_EASING: CubicBezier = CubicBezier::new(0.1, 0.8, 0.2, 1.0);

/// CSS `cubic-bezier()` timing function with fixed end points (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn curve(p1: f64, p2: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    fn curve_slope(p1: f64, p2: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }

    /// Eased progress for linear progress `x` in `[0, 1]`.
    pub fn ease(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }

        // Newton first, bisection if the slope flattens out
        let mut t = x;
        for _ in 0..8 {
            let error = Self::curve(self.x1, self.x2, t) - x;
            if error.abs() < 1e-7 {
                return Self::curve(self.y1, self.y2, t);
            }
            let slope = Self::curve_slope(self.x1, self.x2, t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= error / slope;
        }

        let (mut low, mut high) = (0.0, 1.0);
        t = x;
        for _ in 0..50 {
            let value = Self::curve(self.x1, self.x2, t);
            if (value - x).abs() < 1e-7 {
                break;
            }
            if value < x {
                low = t;
            } else {
                high = t;
            }
            t = (low + high) / 2.0;
        }
        Self::curve(self.y1, self.y2, t)
    }
}

pub fn cycle_height(sequence_len: usize) -> f64 {
    sequence_len as f64 * ITEM_HEIGHT
}

/// Offset of the looping strip `elapsed_ms` into a spin.
pub fn spin_offset(elapsed_ms: f64, sequence_len: usize) -> f64 {
    let distance = SPIN_CYCLES * cycle_height(sequence_len);
    let progress = (elapsed_ms.max(0.0) / SPIN_PERIOD_MS).fract();
    -(progress * distance)
}

/// Offset that centres item `index` of the target cycle in the window.
pub fn stop_offset(sequence_len: usize, index: usize) -> f64 {
    let item = (TARGET_CYCLE * sequence_len + index) as f64;
    CONTAINER_HEIGHT / 2.0 - ITEM_HEIGHT / 2.0 - item * ITEM_HEIGHT
}

pub fn stopping_offset(from: f64, to: f64, elapsed_ms: f64) -> f64 {
    let progress = (elapsed_ms / STOP_DURATION_MS).clamp(0.0, 1.0);
    from + (to - from) * STOP_EASING.ease(progress)
}

pub fn target_index(sequence: &[Category], category: Category) -> Option<usize> {
    sequence.iter().position(|c| *c == category)
}
