//! Lineup board: attendees split between the bench and the position slots of
//! a formation. Nothing here is persisted; a board is rebuilt from the current
//! attendance every time.

use crate::schemas::UserName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const BENCH: &str = "bench";

// Declared in pitch order, front to back. Slots serialize in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Position {
    FW,
    AMF,
    MF,
    DMF,
    DF,
    GK,
}

impl Position {
    pub fn label(self) -> &'static str {
        match self {
            Position::FW => "FW",
            Position::AMF => "AMF",
            Position::MF => "MF",
            Position::DMF => "DMF",
            Position::DF => "DF",
            Position::GK => "GK",
        }
    }
}

impl FromStr for Position {
    type Err = LineupError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "FW" => Ok(Position::FW),
            "AMF" => Ok(Position::AMF),
            "MF" => Ok(Position::MF),
            "DMF" => Ok(Position::DMF),
            "DF" => Ok(Position::DF),
            "GK" => Ok(Position::GK),
            other => Err(LineupError::UnknownTarget(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Formation {
    #[default]
    #[serde(rename = "4-3-3")]
    FourThreeThree,
    #[serde(rename = "4-2-1-3")]
    FourTwoOneThree,
}

impl Formation {
    pub const ALL: [Formation; 2] = [Formation::FourThreeThree, Formation::FourTwoOneThree];

    pub fn name(self) -> &'static str {
        match self {
            Formation::FourThreeThree => "4-3-3",
            Formation::FourTwoOneThree => "4-2-1-3",
        }
    }

    /// Position labels with their nominal head count. The count is a hint for
    /// display; moves never check it.
    pub fn positions(self) -> &'static [(Position, usize)] {
        match self {
            Formation::FourThreeThree => &[
                (Position::FW, 3),
                (Position::MF, 3),
                (Position::DF, 4),
                (Position::GK, 1),
            ],
            Formation::FourTwoOneThree => &[
                (Position::FW, 3),
                (Position::AMF, 1),
                (Position::DMF, 2),
                (Position::DF, 4),
                (Position::GK, 1),
            ],
        }
    }
}

impl FromStr for Formation {
    type Err = LineupError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Formation::ALL
            .into_iter()
            .find(|formation| formation.name() == name)
            .ok_or_else(|| LineupError::UnknownFormation(name.to_string()))
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Target {
    Bench,
    Slot(Position),
}

impl FromStr for Target {
    type Err = LineupError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        if label == BENCH {
            Ok(Target::Bench)
        } else {
            label.parse().map(Target::Slot)
        }
    }
}

impl TryFrom<String> for Target {
    type Error = LineupError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        label.parse()
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum LineupError {
    #[error("unknown lineup target {0:?}")]
    UnknownTarget(String),
    #[error("position {position} is not part of formation {formation}")]
    NotInFormation {
        position: &'static str,
        formation: Formation,
    },
    #[error("unknown formation {0:?}")]
    UnknownFormation(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineupCommand {
    Move { name: UserName, target: Target },
    SetFormation(Formation),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Lineup {
    formation: Formation,
    bench: Vec<UserName>,
    slots: BTreeMap<Position, Vec<UserName>>,
}

impl Lineup {
    /// Everyone starts on the bench. Repeated names are kept once.
    pub fn new(formation: Formation, attendees: impl IntoIterator<Item = UserName>) -> Lineup {
        let mut bench: Vec<UserName> = Vec::new();
        for name in attendees {
            if !bench.contains(&name) {
                bench.push(name);
            }
        }
        Lineup {
            formation,
            bench,
            slots: empty_slots(formation),
        }
    }

    pub fn formation(&self) -> Formation {
        self.formation
    }

    pub fn bench(&self) -> &[UserName] {
        &self.bench
    }

    pub fn slot(&self, position: Position) -> Option<&[UserName]> {
        self.slots.get(&position).map(Vec::as_slice)
    }

    pub fn players(&self) -> impl Iterator<Item = &UserName> {
        self.bench.iter().chain(self.slots.values().flatten())
    }

    /// Returns the board after `command`; `self` is never modified. On error
    /// the caller keeps the previous board.
    pub fn apply(&self, command: &LineupCommand) -> Result<Lineup, LineupError> {
        match command {
            LineupCommand::Move { name, target } => {
                let mut next = self.clone();
                next.move_player(name, *target)?;
                Ok(next)
            }
            // Placements are dropped rather than remapped onto the new labels.
            LineupCommand::SetFormation(formation) => Ok(Lineup::new(
                *formation,
                self.players().cloned().collect::<Vec<_>>(),
            )),
        }
    }

    // Works on a scratch copy; `apply` drops it on error.
    fn move_player(&mut self, name: &str, target: Target) -> Result<(), LineupError> {
        let formation = self.formation;
        let tracked = self.players().any(|player| player == name);

        self.bench.retain(|player| player != name);
        for players in self.slots.values_mut() {
            players.retain(|player| player != name);
        }

        let destination = match target {
            Target::Bench => &mut self.bench,
            Target::Slot(position) => {
                self.slots
                    .get_mut(&position)
                    .ok_or(LineupError::NotInFormation {
                        position: position.label(),
                        formation,
                    })?
            }
        };
        if tracked {
            destination.push(name.to_string());
        }
        Ok(())
    }
}

fn empty_slots(formation: Formation) -> BTreeMap<Position, Vec<UserName>> {
    formation
        .positions()
        .iter()
        .map(|(position, _)| (*position, Vec::new()))
        .collect()
}
