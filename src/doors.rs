use crate::error::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of doors on stage
pub const DOOR_COUNT: u32 = 3;

/// Rounds simulated by [`run_trials`]
pub const DEAL_TRIALS: u32 = 10_000;

/// What is, or is known to be, behind a door
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Prize {
    /// The door is still closed
    Unknown,

    /// A goat
    Goat,

    /// The car
    Car,
}

/// Stages of one round
#[derive(Debug, Serialize, Deserialize)]
pub enum Stage {
    /// The player picks an opening door
    FirstPick,

    /// The host reveals a goat
    Reveal {
        /// Door the player has picked
        chosen: u32,
    },

    /// The player picks a final door
    Decide {
        /// Door the player has picked
        chosen: u32,

        /// Door the host has opened
        revealed: u32,
    },

    /// The final door is opened
    Resolve {
        /// Door the player has picked
        chosen: u32,

        /// Door the host has opened
        revealed: u32,

        /// Door the player switched to
        decided: u32,
    },

    /// The round is over
    End { result: RoundResult },
}

impl Default for Stage {
    fn default() -> Self {
        Self::FirstPick
    }
}

/// The outcome of one round
#[derive(Debug, Serialize, Deserialize, Copy, Clone)]
pub struct RoundResult {
    /// Door hiding the car
    prize: u32,

    /// Player's opening pick
    chosen: u32,

    /// Door the host opened
    revealed: u32,

    /// Player's final pick
    decided: u32,

    /// Whether the final pick hid the car
    win: bool,
}

impl RoundResult {
    pub fn prize(&self) -> u32 {
        self.prize
    }

    pub fn chosen(&self) -> u32 {
        self.chosen
    }

    pub fn revealed(&self) -> u32 {
        self.revealed
    }

    pub fn decided(&self) -> u32 {
        self.decided
    }

    pub fn win(&self) -> bool {
        self.win
    }
}

/// One round of the three-door game. `truth` is the hidden layout;
/// `board` is the player's view, opened one door at a time.
#[derive(Debug, Serialize, Deserialize)]
pub struct DealGame {
    prize: u32,
    truth: [Prize; DOOR_COUNT as usize],
    board: [Prize; DOOR_COUNT as usize],
    stage: Stage,
}

impl DealGame {
    /// Set up a round with the car behind a uniformly random door
    pub fn setup<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let prize = rng.gen_range(0..DOOR_COUNT);
        let mut truth = [Prize::Goat; DOOR_COUNT as usize];
        truth[prize as usize] = Prize::Car;
        Self {
            prize,
            truth,
            board: [Prize::Unknown; DOOR_COUNT as usize],
            stage: Stage::default(),
        }
    }

    /// The player's view of the doors
    pub fn board(&self) -> &[Prize; DOOR_COUNT as usize] {
        &self.board
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The player's opening pick: with the whole board unknown, the
    /// position carries no information, so door 0 is as good as any
    pub fn first_pick(&mut self) -> Result<u32> {
        match self.stage {
            Stage::FirstPick => {
                let chosen = pick_door(&self.board).ok_or(Error::InvalidOperation)?;
                self.stage = Stage::Reveal { chosen };
                Ok(chosen)
            }
            _ => Err(Error::InvalidOperation),
        }
    }

    /// The host opens one door, drawn uniformly from the doors that are
    /// neither the player's pick nor the car
    pub fn reveal<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<u32> {
        match self.stage {
            Stage::Reveal { chosen } => {
                let options: Vec<u32> = (0..DOOR_COUNT)
                    .filter(|&door| door != chosen && door != self.prize)
                    .collect();
                if options.is_empty() {
                    return Err(Error::NoRevealableDoor);
                }
                let revealed = options[rng.gen_range(0..options.len())];
                self.board[revealed as usize] = self.truth[revealed as usize];
                self.stage = Stage::Decide { chosen, revealed };
                Ok(revealed)
            }
            _ => Err(Error::InvalidOperation),
        }
    }

    /// The switching player's final pick: the last door still unknown
    /// on the board, which is never the opening pick
    pub fn final_pick(&mut self) -> Result<u32> {
        match self.stage {
            Stage::Decide { chosen, revealed } => {
                let decided = pick_door(&self.board).ok_or(Error::InvalidOperation)?;
                self.stage = Stage::Resolve {
                    chosen,
                    revealed,
                    decided,
                };
                Ok(decided)
            }
            _ => Err(Error::InvalidOperation),
        }
    }

    /// Open the final door and settle the round
    pub fn resolve(&mut self) -> Result<RoundResult> {
        match self.stage {
            Stage::Resolve {
                chosen,
                revealed,
                decided,
            } => {
                self.board[decided as usize] = self.truth[decided as usize];
                let result = RoundResult {
                    prize: self.prize,
                    chosen,
                    revealed,
                    decided,
                    win: self.truth[decided as usize] == Prize::Car,
                };
                self.stage = Stage::End { result };
                Ok(result)
            }
            _ => Err(Error::InvalidOperation),
        }
    }
}

// The player's door policy: door 0 on an untouched board, afterwards
// the rightmost door still unknown (always a switch, since door 0 can
// never be the rightmost of the two remaining unknowns).
fn pick_door(board: &[Prize; DOOR_COUNT as usize]) -> Option<u32> {
    if board.iter().all(|&door| door == Prize::Unknown) {
        Some(0)
    } else {
        board
            .iter()
            .rposition(|&door| door == Prize::Unknown)
            .map(|index| index as u32)
    }
}

/// Play one full round with the always-switch player
pub fn play_one_round<R: Rng + ?Sized>(rng: &mut R) -> Result<RoundResult> {
    let mut game = DealGame::setup(rng);
    game.first_pick()?;
    game.reveal(rng)?;
    game.final_pick()?;
    game.resolve()
}

/// Aggregate over many rounds
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
pub struct DealStats {
    /// Rounds played, faulted ones included
    rounds: u32,

    /// Rounds the player won
    wins: u32,

    /// Rounds where the opening pick was already the car
    chosen_wins: u32,

    /// Rounds lost to a rule violation
    faults: u32,
}

impl DealStats {
    /// Record one round. A violation is scored as a loss: the
    /// experiment measures the strategy, so anomalies count against it.
    pub fn record(&mut self, outcome: &Result<RoundResult>) {
        self.rounds += 1;
        match outcome {
            Ok(result) => {
                if result.win() {
                    self.wins += 1;
                }
                if result.chosen() == result.prize() {
                    self.chosen_wins += 1;
                }
            }
            Err(_) => self.faults += 1,
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn chosen_wins(&self) -> u32 {
        self.chosen_wins
    }

    pub fn faults(&self) -> u32 {
        self.faults
    }

    /// Fraction of rounds won (about 2/3 for the switching player)
    pub fn win_ratio(&self) -> Result<f64> {
        if self.rounds == 0 {
            return Err(Error::NoQualifyingSamples);
        }
        Ok(self.wins as f64 / self.rounds as f64)
    }
}

/// Play `rounds` independent rounds with the always-switch player
pub fn run_trials<R: Rng + ?Sized>(rng: &mut R, rounds: u32) -> DealStats {
    let mut stats = DealStats::default();
    for _ in 0..rounds {
        stats.record(&play_one_round(rng));
    }

    debug!(
        rounds,
        wins = stats.wins(),
        faults = stats.faults(),
        "door trials complete"
    );

    stats
}
