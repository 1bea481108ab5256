//! Playback cursor over a shared [`LinearAnimation`].

use std::sync::Arc;

use crate::animation::keyed::KeyedCallbackReporter;
use crate::animation::linear_animation::{LinearAnimation, Loop};
use crate::target::PropertyTarget;

#[derive(Clone, Debug)]
pub struct LinearAnimationInstance {
    animation: Arc<LinearAnimation>,
    time: f32,
    total_time: f32,
    last_total_time: f32,
    spilled_time: f32,
    /// +1 forward, -1 backward. Ping-pong flips it.
    direction: f32,
    /// Scale the owner applies to elapsed time before advancing.
    speed_multiplier: f32,
    did_loop: bool,
    /// Callback keyframes sitting exactly on the cursor have not fired yet.
    callbacks_pending: bool,
}

/// Walks the segments one advance covers, reporting callback keyframes.
struct Sweep<'r> {
    reporter: Option<&'r mut dyn KeyedCallbackReporter>,
    cursor: f32,
    include_cursor: bool,
}

impl Sweep<'_> {
    fn to(&mut self, animation: &LinearAnimation, seconds: f32) {
        if self.cursor == seconds {
            return;
        }
        if let Some(reporter) = self.reporter.as_deref_mut() {
            animation.report_keyed_callbacks(reporter, self.cursor, seconds, self.include_cursor);
        }
        self.cursor = seconds;
        self.include_cursor = false;
    }

    /// Moves without crossing anything, as a loop wrap does.
    fn jump(&mut self, seconds: f32) {
        self.cursor = seconds;
        self.include_cursor = true;
    }
}

impl LinearAnimationInstance {
    pub fn new(animation: Arc<LinearAnimation>) -> Self {
        Self::with_speed_multiplier(animation, 1.0)
    }

    /// Instance whose owner scales elapsed time by `speed_multiplier`. A
    /// negative product with the animation's speed starts at the far end.
    pub fn with_speed_multiplier(animation: Arc<LinearAnimation>, speed_multiplier: f32) -> Self {
        let time = if speed_multiplier >= 0.0 {
            animation.start_time()
        } else {
            animation.end_time()
        };
        Self {
            animation,
            time,
            total_time: 0.0,
            last_total_time: 0.0,
            spilled_time: 0.0,
            direction: 1.0,
            speed_multiplier,
            did_loop: false,
            callbacks_pending: true,
        }
    }

    pub fn animation(&self) -> &Arc<LinearAnimation> {
        &self.animation
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    pub fn last_total_time(&self) -> f32 {
        self.last_total_time
    }

    /// Time that ran past the end on the last advance of a one-shot or a wrap.
    pub fn spilled_time(&self) -> f32 {
        self.spilled_time
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn did_loop(&self) -> bool {
        self.did_loop
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Sign of travel once the animation's speed and the owner's multiplier
    /// are both accounted for.
    fn directed_speed(&self) -> f32 {
        self.direction * self.animation.speed * self.speed_multiplier
    }

    /// Jumps to `value` seconds, keeping total and last total in lockstep so
    /// exit-time checks still see the same delta.
    pub fn set_time(&mut self, value: f32) {
        if self.time == value {
            return;
        }
        self.time = value;
        let diff = self.total_time - self.last_total_time;
        self.total_time = value - self.animation.start_seconds();
        self.last_total_time = self.total_time - diff;
        self.direction = 1.0;
        self.callbacks_pending = true;
    }

    /// Whether another advance would still change the animation.
    pub fn keep_going(&self) -> bool {
        let animation = &self.animation;
        let directed = self.directed_speed();
        animation.loop_type() != Loop::OneShot
            || (directed > 0.0 && self.time < animation.end_seconds())
            || (directed < 0.0 && self.time > animation.start_seconds())
    }

    /// Moves the cursor by `elapsed` seconds. Returns false once a one-shot
    /// has run off either end.
    pub fn advance(&mut self, elapsed: f32) -> bool {
        self.advance_inner(elapsed, None)
    }

    /// Like [`advance`](Self::advance), also reporting every callback
    /// keyframe the cursor crosses, including across loop wraps.
    pub fn advance_reporting(&mut self, elapsed: f32, reporter: &mut dyn KeyedCallbackReporter) -> bool {
        self.advance_inner(elapsed, Some(reporter))
    }

    fn advance_inner(&mut self, elapsed: f32, reporter: Option<&mut dyn KeyedCallbackReporter>) -> bool {
        let animation = Arc::clone(&self.animation);
        let delta = elapsed * animation.speed * self.direction;
        self.last_total_time = self.total_time;
        self.total_time += delta.abs();
        self.spilled_time = 0.0;
        self.did_loop = false;
        if delta == 0.0 || animation.fps == 0 {
            return self.keep_going();
        }

        let mut sweep = Sweep {
            reporter,
            cursor: self.time,
            include_cursor: self.callbacks_pending,
        };
        self.time += delta;
        let fps = animation.fps as f32;
        let start = animation.start_frame() as f32;
        let end = animation.end_frame() as f32;
        let range = end - start;
        let mut frames = self.time * fps;
        let mut direction = if delta < 0.0 { -1.0 } else { 1.0 };
        let mut keep_going = true;

        match animation.loop_type() {
            Loop::OneShot => {
                if direction > 0.0 && frames > end {
                    keep_going = false;
                    self.spilled_time = (frames - end) / fps;
                    self.time = end / fps;
                    self.did_loop = true;
                } else if direction < 0.0 && frames < start {
                    keep_going = false;
                    self.spilled_time = (start - frames) / fps;
                    self.time = start / fps;
                    self.did_loop = true;
                }
            }
            Loop::Loop => {
                if range <= 0.0 {
                    self.time = start / fps;
                } else if direction > 0.0 && frames >= end {
                    sweep.to(&animation, end / fps);
                    sweep.jump(start / fps);
                    self.spilled_time = (frames - end) / fps;
                    frames = start + (frames - start) % range;
                    self.time = frames / fps;
                    self.did_loop = true;
                } else if direction < 0.0 && frames <= start {
                    sweep.to(&animation, start / fps);
                    sweep.jump(end / fps);
                    self.spilled_time = (start - frames) / fps;
                    frames = end - ((start - frames) % range).abs();
                    self.time = frames / fps;
                    self.did_loop = true;
                }
            }
            Loop::PingPong => loop {
                if direction > 0.0 && frames >= end {
                    sweep.to(&animation, end / fps);
                    self.spilled_time = (frames - end) / fps;
                    frames = end + (end - frames);
                } else if direction < 0.0 && frames < start {
                    sweep.to(&animation, start / fps);
                    self.spilled_time = (start - frames) / fps;
                    frames = start + (start - frames);
                } else {
                    break;
                }
                self.time = frames / fps;
                self.direction = -self.direction;
                direction = -direction;
                self.did_loop = true;
                if range <= 0.0 {
                    break;
                }
            },
        }
        sweep.to(&animation, self.time);
        self.callbacks_pending = sweep.include_cursor;
        keep_going
    }

    pub fn apply(&self, target: &mut dyn PropertyTarget, mix: f32) {
        self.animation.apply(target, self.time, mix);
    }
}
