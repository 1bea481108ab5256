//! Input contracts for artboard playback.
//!
//! Hosts queue player commands and pass them to `Artboard::update()` each
//! tick; they are applied before any player advances.

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Inputs {
    /// Player-level commands applied before stepping.
    #[serde(default)]
    pub player_cmds: Vec<PlayerCommand>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: PlayerCommand) -> &mut Self {
        self.player_cmds.push(cmd);
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum PlayerCommand {
    Play {
        player: PlayerId,
    },
    Pause {
        player: PlayerId,
    },
    /// Removes the player from the artboard.
    Stop {
        player: PlayerId,
    },
    /// Multiplier on elapsed time for this player.
    SetSpeed {
        player: PlayerId,
        speed: f32,
    },
    /// Jumps a linear animation player to `time` seconds.
    Seek {
        player: PlayerId,
        time: f32,
    },
    SetNumber {
        player: PlayerId,
        input: String,
        value: f32,
    },
    SetBool {
        player: PlayerId,
        input: String,
        value: bool,
    },
    FireTrigger {
        player: PlayerId,
        input: String,
    },
}

impl PlayerCommand {
    pub fn player(&self) -> PlayerId {
        match self {
            PlayerCommand::Play { player }
            | PlayerCommand::Pause { player }
            | PlayerCommand::Stop { player }
            | PlayerCommand::SetSpeed { player, .. }
            | PlayerCommand::Seek { player, .. }
            | PlayerCommand::SetNumber { player, .. }
            | PlayerCommand::SetBool { player, .. }
            | PlayerCommand::FireTrigger { player, .. } => *player,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_from_json() {
        let json = r#"{"player_cmds":[{"SetNumber":{"player":2,"input":"speed","value":1.5}},{"FireTrigger":{"player":2,"input":"jump"}}]}"#;
        let inputs: Inputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.player_cmds.len(), 2);
        assert_eq!(inputs.player_cmds[1].player(), PlayerId(2));
        assert!(matches!(
            &inputs.player_cmds[0],
            PlayerCommand::SetNumber { value, .. } if *value == 1.5
        ));
    }
}
