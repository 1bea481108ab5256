//! Easing curves referenced by keyframes and transitions.

use vizij_rive_codec::PropertyValue;

use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::Core;
use crate::scene::{set_f32, set_u32};

const NEWTON_ITERATIONS: usize = 4;
const NEWTON_MIN_SLOPE: f32 = 0.001;
const SUBDIVISION_PRECISION: f32 = 0.000_000_1;
const SUBDIVISION_MAX_ITERATIONS: usize = 10;
const SPLINE_TABLE_SIZE: usize = 11;
const SAMPLE_STEP_SIZE: f32 = 1.0 / (SPLINE_TABLE_SIZE as f32 - 1.0);

/// One axis of a unit cubic bezier with end points (0,0) and (1,1).
#[inline]
pub fn calc_bezier(t: f32, a1: f32, a2: f32) -> f32 {
    (((1.0 - 3.0 * a2 + 3.0 * a1) * t + (3.0 * a2 - 6.0 * a1)) * t + (3.0 * a1)) * t
}

#[inline]
fn slope(t: f32, a1: f32, a2: f32) -> f32 {
    3.0 * (1.0 - 3.0 * a2 + 3.0 * a1) * t * t + 2.0 * (3.0 * a2 - 6.0 * a1) * t + 3.0 * a1
}

/// Inverts the x curve of a cubic bezier: finds `t` such that `x(t) == x`.
#[derive(Clone, Debug, PartialEq)]
pub struct CubicInterpolatorSolver {
    values: [f32; SPLINE_TABLE_SIZE],
    x1: f32,
    x2: f32,
}

impl CubicInterpolatorSolver {
    pub fn new(x1: f32, x2: f32) -> Self {
        let mut values = [0.0; SPLINE_TABLE_SIZE];
        for (i, v) in values.iter_mut().enumerate() {
            *v = calc_bezier(i as f32 * SAMPLE_STEP_SIZE, x1, x2);
        }
        Self { values, x1, x2 }
    }

    pub fn get_t(&self, x: f32) -> f32 {
        let mut interval_start = 0.0;
        let mut current = 1;
        let last = SPLINE_TABLE_SIZE - 1;
        while current != last && self.values[current] <= x {
            interval_start += SAMPLE_STEP_SIZE;
            current += 1;
        }
        current -= 1;

        let span = self.values[current + 1] - self.values[current];
        let dist = if span != 0.0 {
            (x - self.values[current]) / span
        } else {
            0.0
        };
        let mut guess = interval_start + dist * SAMPLE_STEP_SIZE;

        let initial_slope = slope(guess, self.x1, self.x2);
        if initial_slope >= NEWTON_MIN_SLOPE {
            for _ in 0..NEWTON_ITERATIONS {
                let s = slope(guess, self.x1, self.x2);
                if s == 0.0 {
                    return guess;
                }
                let current_x = calc_bezier(guess, self.x1, self.x2) - x;
                guess -= current_x / s;
            }
            guess
        } else if initial_slope == 0.0 {
            guess
        } else {
            let mut lower = interval_start;
            let mut upper = interval_start + SAMPLE_STEP_SIZE;
            let mut t = lower;
            for _ in 0..SUBDIVISION_MAX_ITERATIONS {
                t = lower + (upper - lower) / 2.0;
                let current_x = calc_bezier(t, self.x1, self.x2) - x;
                if current_x > 0.0 {
                    upper = t;
                } else {
                    lower = t;
                }
                if current_x.abs() <= SUBDIVISION_PRECISION {
                    break;
                }
            }
            t
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CubicEaseInterpolator {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    solver: CubicInterpolatorSolver,
}

impl Default for CubicEaseInterpolator {
    fn default() -> Self {
        Self::new(0.42, 0.0, 0.58, 1.0)
    }
}

impl CubicEaseInterpolator {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            solver: CubicInterpolatorSolver::new(x1, x2),
        }
    }

    /// Rebuilds the x table after the control points were deserialized.
    pub(crate) fn initialize(&mut self) {
        self.solver = CubicInterpolatorSolver::new(self.x1, self.x2);
    }

    pub fn transform(&self, factor: f32) -> f32 {
        calc_bezier(self.solver.get_t(factor), self.y1, self.y2)
    }
}

impl Core for CubicEaseInterpolator {
    fn core_type(&self) -> u16 {
        tk::CUBIC_EASE_INTERPOLATOR
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        let v = match key {
            pk::CUBIC_X1 => self.x1,
            pk::CUBIC_Y1 => self.y1,
            pk::CUBIC_X2 => self.x2,
            pk::CUBIC_Y2 => self.y2,
            _ => return None,
        };
        Some(PropertyValue::Double(v))
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match key {
            pk::CUBIC_X1 => set_f32(&mut self.x1, value),
            pk::CUBIC_Y1 => set_f32(&mut self.y1, value),
            pk::CUBIC_X2 => set_f32(&mut self.x2, value),
            pk::CUBIC_Y2 => set_f32(&mut self.y2, value),
            _ => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Easing {
    In,
    Out,
    InOut,
}

impl Easing {
    pub fn from_value(value: u32) -> Self {
        match value {
            0 => Easing::In,
            2 => Easing::InOut,
            _ => Easing::Out,
        }
    }
}

/// Exponentially decaying sine.
///
/// The phase `s` is chosen so the curve passes through 0 at factor 0. With an
/// amplitude below 1 the amplitude ramps in linearly over `|s|` so the curve
/// does not jump at the start.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ElasticEase {
    amplitude: f32,
    period: f32,
    s: f32,
}

impl ElasticEase {
    pub fn new(amplitude: f32, period: f32) -> Self {
        let s = if amplitude < 1.0 {
            period / 4.0
        } else {
            period / (2.0 * std::f32::consts::PI) * (1.0 / amplitude).asin()
        };
        Self {
            amplitude,
            period,
            s,
        }
    }

    fn actual_amplitude(&self, time: f32) -> f32 {
        if self.amplitude < 1.0 {
            let t = time.abs();
            let s = self.s.abs();
            if t < s {
                let l = t / s;
                return self.amplitude * l + (1.0 - l);
            }
        }
        self.amplitude
    }

    pub fn ease_out(&self, factor: f32) -> f32 {
        let time = factor;
        let a = self.actual_amplitude(time);
        a * 2f32.powf(-10.0 * time)
            * ((time - self.s) * (2.0 * std::f32::consts::PI) / self.period).sin()
            + 1.0
    }

    pub fn ease_in(&self, factor: f32) -> f32 {
        let time = factor - 1.0;
        let a = self.actual_amplitude(time);
        -(a * 2f32.powf(10.0 * time)
            * ((-time - self.s) * (2.0 * std::f32::consts::PI) / self.period).sin())
    }

    pub fn ease_in_out(&self, factor: f32) -> f32 {
        let time = factor * 2.0 - 1.0;
        let a = self.actual_amplitude(time);
        let two_pi = 2.0 * std::f32::consts::PI;
        if time < 0.0 {
            -0.5 * a * 2f32.powf(10.0 * time) * ((-time - self.s) * two_pi / self.period).sin()
        } else {
            0.5 * a * 2f32.powf(-10.0 * time) * ((time - self.s) * two_pi / self.period).sin()
                + 1.0
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElasticInterpolator {
    pub easing_value: u32,
    pub amplitude: f32,
    pub period: f32,
    ease: ElasticEase,
}

impl Default for ElasticInterpolator {
    fn default() -> Self {
        Self {
            easing_value: 1,
            amplitude: 1.0,
            period: 1.0,
            ease: ElasticEase::new(1.0, 1.0),
        }
    }
}

impl ElasticInterpolator {
    pub(crate) fn initialize(&mut self) {
        self.ease = ElasticEase::new(self.amplitude, self.period);
    }

    pub fn easing(&self) -> Easing {
        Easing::from_value(self.easing_value)
    }

    pub fn transform(&self, factor: f32) -> f32 {
        match self.easing() {
            Easing::In => self.ease.ease_in(factor),
            Easing::Out => self.ease.ease_out(factor),
            Easing::InOut => self.ease.ease_in_out(factor),
        }
    }
}

impl Core for ElasticInterpolator {
    fn core_type(&self) -> u16 {
        tk::ELASTIC_INTERPOLATOR
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match key {
            pk::ELASTIC_EASING => Some(PropertyValue::Uint(self.easing_value)),
            pk::ELASTIC_AMPLITUDE => Some(PropertyValue::Double(self.amplitude)),
            pk::ELASTIC_PERIOD => Some(PropertyValue::Double(self.period)),
            _ => None,
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match key {
            pk::ELASTIC_EASING => set_u32(&mut self.easing_value, value),
            pk::ELASTIC_AMPLITUDE => set_f32(&mut self.amplitude, value),
            pk::ELASTIC_PERIOD => set_f32(&mut self.period, value),
            _ => false,
        }
    }
}

/// Resolved interpolator shared by keyframes and transitions.
#[derive(Clone, Debug, PartialEq)]
pub enum Interpolator {
    Cubic(CubicEaseInterpolator),
    Elastic(ElasticInterpolator),
}

impl Interpolator {
    /// Maps a normalized factor to an eased factor.
    pub fn transform(&self, factor: f32) -> f32 {
        match self {
            Interpolator::Cubic(c) => c.transform(factor),
            Interpolator::Elastic(e) => e.transform(factor),
        }
    }

    pub fn transform_value(&self, from: f32, to: f32, factor: f32) -> f32 {
        from + (to - from) * self.transform(factor)
    }
}
