//! Players: a linear animation or state machine bound to an artboard.

use crate::animation::{KeyedCallback, LinearAnimationInstance};
use crate::ids::PlayerId;
use crate::outputs::{CoreEvent, Outputs};
use crate::state_machine::StateMachineInstance;
use crate::target::PropertyTarget;

#[derive(Debug)]
pub enum Playback {
    Animation(LinearAnimationInstance),
    StateMachine(StateMachineInstance),
}

#[derive(Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub playback: Playback,
    pub paused: bool,
    /// Multiplier on elapsed time.
    pub speed: f32,
    ended: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, playback: Playback) -> Self {
        Self {
            id,
            name: name.into(),
            playback,
            paused: false,
            speed: 1.0,
            ended: false,
        }
    }

    /// Whether the player settled on its last advance.
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    pub fn animation(&self) -> Option<&LinearAnimationInstance> {
        match &self.playback {
            Playback::Animation(instance) => Some(instance),
            Playback::StateMachine(_) => None,
        }
    }

    pub fn animation_mut(&mut self) -> Option<&mut LinearAnimationInstance> {
        match &mut self.playback {
            Playback::Animation(instance) => Some(instance),
            Playback::StateMachine(_) => None,
        }
    }

    pub fn state_machine(&self) -> Option<&StateMachineInstance> {
        match &self.playback {
            Playback::StateMachine(machine) => Some(machine),
            Playback::Animation(_) => None,
        }
    }

    pub fn state_machine_mut(&mut self) -> Option<&mut StateMachineInstance> {
        match &mut self.playback {
            Playback::StateMachine(machine) => Some(machine),
            Playback::Animation(_) => None,
        }
    }

    /// Advances by `elapsed * speed` and writes the result to `target`.
    pub(crate) fn advance(
        &mut self,
        target: &mut dyn PropertyTarget,
        elapsed: f32,
        outputs: &mut Outputs,
    ) -> bool {
        if self.paused {
            return false;
        }
        let dt = elapsed * self.speed;
        let (keep_going, end_time) = match &mut self.playback {
            Playback::Animation(instance) => {
                let mut callbacks: Vec<KeyedCallback> = Vec::new();
                let keep_going = instance.advance_reporting(dt, &mut callbacks);
                instance.apply(target, 1.0);
                report_callbacks(self.id, &callbacks, outputs);
                (keep_going, instance.time())
            }
            Playback::StateMachine(machine) => {
                let keep_going = machine.advance(target, dt);
                for change in machine.state_changes() {
                    let animation = machine
                        .machine()
                        .layer(change.layer)
                        .and_then(|layer| layer.state(change.state))
                        .and_then(|state| state.animation())
                        .map(|animation| animation.name.clone());
                    log::debug!(
                        "player {:?} layer {} entered state {}",
                        self.id,
                        change.layer,
                        change.state
                    );
                    outputs.push_event(CoreEvent::StateChanged {
                        player: self.id,
                        layer: change.layer,
                        state: change.state,
                        animation,
                    });
                }
                report_callbacks(self.id, machine.reported_callbacks(), outputs);
                (keep_going, 0.0)
            }
        };

        if keep_going {
            self.ended = false;
        } else if !self.ended {
            self.ended = true;
            outputs.push_event(CoreEvent::PlaybackEnded {
                player: self.id,
                animation_time: end_time,
            });
        }
        keep_going
    }
}

fn report_callbacks(player: PlayerId, callbacks: &[KeyedCallback], outputs: &mut Outputs) {
    for callback in callbacks {
        outputs.push_event(CoreEvent::KeyedCallback {
            player,
            object_id: callback.object_id,
            property_key: callback.property_key,
            elapsed_seconds: callback.elapsed_seconds,
        });
    }
}
