#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pilot system that steers autonomous players.
//!
//! Once per movement step the pilot picks a heading for every player no
//! human controls: chase the pickup along the horizontal axis, divert
//! vertically with a fixed probability so runs do not degenerate into
//! straight lines, then probe one cell ahead and dodge sideways when the
//! probed cell would collide.

use slither_core::{
    CellClass, Command, Direction, Event, GridCoord, OccupancyView, PlayerView,
};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Odds of diverting vertically while chasing westward: one draw in two.
const WESTWARD_DIVERT_MODULUS: u64 = 2;

/// Odds of diverting vertically while chasing eastward: draws above the
/// threshold divert, four in eleven.
const EASTWARD_DIVERT_MODULUS: u64 = 11;
const EASTWARD_DIVERT_THRESHOLD: u64 = 6;

/// Configuration parameters required to construct the pilot system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that deterministically emits steering commands.
#[derive(Debug)]
pub struct Pilot {
    rng_state: u64,
}

impl Pilot {
    /// Creates a new pilot system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng_state: config.rng_seed,
        }
    }

    /// Consumes events and immutable views to emit steering commands.
    ///
    /// Commands are only produced when the event batch carries
    /// [`Event::StepReady`], so callers may pump the pilot every frame.
    pub fn handle(
        &mut self,
        events: &[Event],
        players: &PlayerView,
        occupancy: OccupancyView<'_>,
        pickup: Option<GridCoord>,
        out: &mut Vec<Command>,
    ) {
        if !events.contains(&Event::StepReady) {
            return;
        }

        for snapshot in players.iter() {
            if snapshot.human {
                continue;
            }

            let candidate = match pickup {
                Some(target) => self.chase(snapshot.cell, snapshot.direction, target),
                None => snapshot.direction,
            };
            let chosen = self.dodge(snapshot.cell, candidate, occupancy);
            if chosen != snapshot.direction {
                out.push(Command::SetDirection {
                    player: snapshot.id,
                    direction: chosen,
                });
            }
        }
    }

    /// Picks the heading that closes on the pickup, with a random vertical
    /// divert so the pursuit weaves instead of hugging one row.
    fn chase(&mut self, head: GridCoord, current: Direction, target: GridCoord) -> Direction {
        if head.column() > target.column() {
            if head.row() != target.row() && self.draw() % WESTWARD_DIVERT_MODULUS > 0 {
                vertical_toward(head, target)
            } else {
                Direction::West
            }
        } else if head.column() < target.column() {
            if head.row() != target.row()
                && self.draw() % EASTWARD_DIVERT_MODULUS > EASTWARD_DIVERT_THRESHOLD
            {
                vertical_toward(head, target)
            } else {
                Direction::East
            }
        } else if head.row() == target.row() {
            current
        } else {
            vertical_toward(head, target)
        }
    }

    /// Probes one cell ahead of the candidate heading. A clear probe keeps
    /// the candidate; a blocked one tries the clockwise then the
    /// counter-clockwise quarter turn, preferring the latter when both are
    /// clear. With every side blocked the candidate stands.
    fn dodge(
        &mut self,
        head: GridCoord,
        candidate: Direction,
        occupancy: OccupancyView<'_>,
    ) -> Direction {
        if probe(head, candidate, occupancy) {
            self.rng_state = self.rng_state.wrapping_add(1);
            return candidate;
        }

        let mut chosen = candidate;
        if probe(head, candidate.clockwise(), occupancy) {
            chosen = candidate.clockwise();
        }
        if probe(head, candidate.counter_clockwise(), occupancy) {
            chosen = candidate.counter_clockwise();
        }
        chosen
    }

    fn draw(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state >> 56
    }
}

fn vertical_toward(head: GridCoord, target: GridCoord) -> Direction {
    if target.row() < head.row() {
        Direction::North
    } else {
        Direction::South
    }
}

fn probe(head: GridCoord, direction: Direction, occupancy: OccupancyView<'_>) -> bool {
    let (columns, rows) = occupancy.dimensions();
    match head.stepped(direction, columns, rows) {
        Some(cell) => occupancy.classify(cell) != CellClass::Occupied,
        None => false,
    }
}
