#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Slither.
//!
//! The world owns both players, the occupancy grid, the pickup, and the
//! round/match state machine. Adapters drive it exclusively through
//! [`apply`]; systems observe it through the read-only [`query`] views.

mod grid;
mod trail;

use grid::OccupancyGrid;
use slither_core::{
    CellClass, CellTag, Command, Direction, Event, GridConfigError, GridCoord, HumanCount,
    MatchPhase, PlayerId, FLASH_HOLD_TICKS, GRID_COLUMNS, GRID_ROWS, MIN_GRID_COLUMNS,
    MIN_GRID_ROWS, MIN_PACE, START_PACE, WINNER_HOLD_TICKS, WIN_SCORE,
};
use trail::Trail;

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;
const DEFAULT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Random placement attempts before falling back to a deterministic scan.
const PLACEMENT_RETRY_LIMIT: usize = 256;

/// Distance from the grid edges to both spawn cells.
const SPAWN_MARGIN: u32 = 5;

#[derive(Clone, Debug)]
struct Player {
    id: PlayerId,
    cell: GridCoord,
    direction: Direction,
    score: u16,
    human: bool,
    collided: bool,
    trail: Trail,
}

impl Player {
    fn new(id: PlayerId) -> Self {
        Self {
            id,
            cell: GridCoord::new(0, 0),
            direction: Direction::East,
            score: 0,
            human: false,
            collided: false,
            trail: Trail::new(),
        }
    }

    fn reset(&mut self, cell: GridCoord, direction: Direction) {
        self.cell = cell;
        self.direction = direction;
        self.collided = false;
        self.trail.reset();
    }
}

/// Represents the authoritative Slither world state.
#[derive(Clone, Debug)]
pub struct World {
    columns: u32,
    rows: u32,
    players: [Player; 2],
    pickup: Option<GridCoord>,
    occupancy: OccupancyGrid,
    phase: MatchPhase,
    humans: u8,
    pace: u8,
    step_accumulator: u8,
    hold: u16,
    rng_state: u64,
    frame: u64,
}

impl World {
    /// Creates a new world on the default grid, laid out for attract mode.
    #[must_use]
    pub fn new() -> Self {
        Self::build(GRID_COLUMNS, GRID_ROWS)
    }

    /// Creates a new world on a custom grid, laid out for attract mode.
    pub fn with_grid(columns: u32, rows: u32) -> Result<Self, GridConfigError> {
        if columns < MIN_GRID_COLUMNS {
            return Err(GridConfigError::TooNarrow {
                columns,
                minimum: MIN_GRID_COLUMNS,
            });
        }
        if rows < MIN_GRID_ROWS {
            return Err(GridConfigError::TooShort {
                rows,
                minimum: MIN_GRID_ROWS,
            });
        }
        Ok(Self::build(columns, rows))
    }

    fn build(columns: u32, rows: u32) -> Self {
        let mut world = Self {
            columns,
            rows,
            players: [Player::new(PlayerId::One), Player::new(PlayerId::Two)],
            pickup: None,
            occupancy: OccupancyGrid::new(columns, rows),
            phase: MatchPhase::Attract,
            humans: 0,
            pace: START_PACE,
            step_accumulator: 0,
            hold: 0,
            rng_state: DEFAULT_SEED,
            frame: 0,
        };
        let mut discarded = Vec::new();
        world.lay_out_round(&mut discarded);
        world
    }

    fn start_match(&mut self, humans: HumanCount, out_events: &mut Vec<Event>) {
        if self.phase != MatchPhase::Attract {
            return;
        }
        self.humans = humans.count();
        self.players[0].human = true;
        self.players[1].human = humans == HumanCount::Two;
        self.players[0].score = 0;
        self.players[1].score = 0;
        self.phase = MatchPhase::Playing;
        out_events.push(Event::MatchStarted { humans });
        out_events.push(Event::PhaseChanged {
            phase: MatchPhase::Playing,
        });
        self.lay_out_round(out_events);
    }

    fn set_direction(
        &mut self,
        player: PlayerId,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) {
        if !matches!(self.phase, MatchPhase::Attract | MatchPhase::Playing) {
            return;
        }
        let slot = &mut self.players[player.index()];
        if slot.direction != direction {
            slot.direction = direction;
            out_events.push(Event::PlayerTurned { player, direction });
        }
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.frame = self.frame.saturating_add(1);
        out_events.push(Event::FrameAdvanced { frame: self.frame });

        match self.phase {
            MatchPhase::Attract | MatchPhase::Playing => {
                self.step_accumulator = self.step_accumulator.saturating_add(1);
                if self.step_accumulator >= self.pace {
                    self.step_accumulator = 0;
                    if self.phase == MatchPhase::Attract {
                        self.perturb_seed(1);
                    }
                    out_events.push(Event::StepReady);
                }
            }
            MatchPhase::RoundOver => {
                self.hold = self.hold.saturating_sub(1);
                if self.hold == 0 {
                    self.resolve_round(out_events);
                }
            }
            MatchPhase::MatchOver => {
                self.hold = self.hold.saturating_sub(1);
                if self.hold == 0 {
                    self.wrap_to_attract(out_events);
                }
            }
        }
    }

    fn step(&mut self, out_events: &mut Vec<Event>) {
        if !matches!(self.phase, MatchPhase::Attract | MatchPhase::Playing) {
            return;
        }

        // Player two moves first; the later mover observes the earlier
        // mover's already-updated trail, which decides head-on meetings.
        self.advance_player(PlayerId::Two, out_events);
        self.advance_player(PlayerId::One, out_events);

        let collided = [self.players[0].collided, self.players[1].collided];
        if collided == [false, false] {
            return;
        }

        let scorer = match collided {
            [true, false] => Some(PlayerId::Two),
            [false, true] => Some(PlayerId::One),
            _ => None,
        };
        if let Some(player) = scorer {
            let slot = &mut self.players[player.index()];
            slot.score = slot.score.saturating_add(1);
        }
        self.phase = MatchPhase::RoundOver;
        self.hold = FLASH_HOLD_TICKS;
        self.step_accumulator = 0;
        out_events.push(Event::RoundEnded {
            scorer,
            scores: self.scores(),
        });
        out_events.push(Event::PhaseChanged {
            phase: MatchPhase::RoundOver,
        });
    }

    fn advance_player(&mut self, player: PlayerId, out_events: &mut Vec<Event>) {
        let index = player.index();
        let head = self.players[index].cell;
        self.occupancy.set(head, CellTag::Trail(player));
        if let Some(vacated) = self.players[index].trail.push(head) {
            self.occupancy.set(vacated, CellTag::Empty);
        }

        let direction = self.players[index].direction;
        let Some(next) = head.stepped(direction, self.columns, self.rows) else {
            self.players[index].collided = true;
            out_events.push(Event::PlayerCollided { player, cell: head });
            return;
        };

        let class = self.occupancy.classify(next);
        self.players[index].cell = next;
        out_events.push(Event::PlayerAdvanced {
            player,
            from: head,
            to: next,
        });

        match class {
            CellClass::Empty => {
                self.occupancy.set(next, CellTag::Trail(player));
            }
            CellClass::Pickup => {
                self.occupancy.set(next, CellTag::Trail(player));
                out_events.push(Event::PickupConsumed { player, cell: next });
                if self.players[index].trail.grow() {
                    out_events.push(Event::TrailGrew {
                        player,
                        length: self.players[index].trail.length(),
                    });
                }
                self.place_pickup(out_events);
                let qualifies =
                    self.players[index].human || self.phase == MatchPhase::Attract;
                if self.pace > MIN_PACE && qualifies {
                    self.pace -= 1;
                    out_events.push(Event::PaceQuickened { pace: self.pace });
                }
            }
            CellClass::Occupied => {
                self.players[index].collided = true;
                out_events.push(Event::PlayerCollided { player, cell: next });
            }
        }
    }

    fn resolve_round(&mut self, out_events: &mut Vec<Event>) {
        let [first, second] = self.scores();
        if first != second && first.max(second) >= WIN_SCORE {
            let winner = if first > second {
                PlayerId::One
            } else {
                PlayerId::Two
            };
            self.phase = MatchPhase::MatchOver;
            self.hold = WINNER_HOLD_TICKS;
            out_events.push(Event::MatchEnded {
                winner,
                scores: self.scores(),
            });
            out_events.push(Event::PhaseChanged {
                phase: MatchPhase::MatchOver,
            });
            return;
        }

        self.phase = if self.humans == 0 {
            MatchPhase::Attract
        } else {
            MatchPhase::Playing
        };
        out_events.push(Event::PhaseChanged { phase: self.phase });
        self.lay_out_round(out_events);
    }

    fn wrap_to_attract(&mut self, out_events: &mut Vec<Event>) {
        self.humans = 0;
        for player in &mut self.players {
            player.human = false;
            player.score = 0;
        }
        self.phase = MatchPhase::Attract;
        out_events.push(Event::PhaseChanged {
            phase: MatchPhase::Attract,
        });
        self.lay_out_round(out_events);
    }

    fn lay_out_round(&mut self, out_events: &mut Vec<Event>) {
        self.occupancy.reset();
        self.pickup = None;

        let first_spawn = GridCoord::new(SPAWN_MARGIN, SPAWN_MARGIN);
        let second_spawn = GridCoord::new(
            self.columns - 1 - SPAWN_MARGIN,
            self.rows - 1 - SPAWN_MARGIN,
        );
        self.players[0].reset(first_spawn, Direction::East);
        self.players[1].reset(second_spawn, Direction::West);
        self.occupancy
            .set(first_spawn, CellTag::Trail(PlayerId::One));
        self.occupancy
            .set(second_spawn, CellTag::Trail(PlayerId::Two));

        self.pace = round_pace(self.humans);
        self.step_accumulator = 0;
        out_events.push(Event::RoundStarted { pace: self.pace });
        self.place_pickup(out_events);
    }

    fn place_pickup(&mut self, out_events: &mut Vec<Event>) {
        if let Some(old) = self.pickup.take() {
            if self.occupancy.tag(old) == CellTag::Pickup {
                self.occupancy.set(old, CellTag::Empty);
            }
        }

        let churn = u64::from(self.draw_byte());
        self.perturb_seed(churn);

        let (min_column, max_column, min_row, max_row) = self.occupancy.interior_span();
        let column_span = u64::from(max_column - min_column + 1);
        let row_span = u64::from(max_row - min_row + 1);

        let mut placed = None;
        for _ in 0..PLACEMENT_RETRY_LIMIT {
            let column = min_column + (u64::from(self.draw_byte()) % column_span) as u32;
            let row = min_row + (u64::from(self.draw_byte()) % row_span) as u32;
            let cell = GridCoord::new(column, row);
            if self.occupancy.classify(cell) == CellClass::Empty {
                placed = Some(cell);
                break;
            }
        }

        if placed.is_none() {
            placed = self.scan_for_empty_cell();
        }

        if let Some(cell) = placed {
            self.pickup = Some(cell);
            self.occupancy.set(cell, CellTag::Pickup);
            out_events.push(Event::PickupPlaced { cell });
        }
    }

    fn scan_for_empty_cell(&self) -> Option<GridCoord> {
        let (min_column, max_column, min_row, max_row) = self.occupancy.interior_span();
        for row in min_row..=max_row {
            for column in min_column..=max_column {
                let cell = GridCoord::new(column, row);
                if self.occupancy.classify(cell) == CellClass::Empty {
                    return Some(cell);
                }
            }
        }
        None
    }

    fn scores(&self) -> [u16; 2] {
        [self.players[0].score, self.players[1].score]
    }

    fn draw_byte(&mut self) -> u8 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        (self.rng_state >> 56) as u8
    }

    fn perturb_seed(&mut self, amount: u64) {
        self.rng_state = self.rng_state.wrapping_add(amount);
    }
}

fn round_pace(humans: u8) -> u8 {
    START_PACE.saturating_add(2 * humans * humans)
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SeedRandom { seed } => world.rng_state = seed,
        Command::StartMatch { humans } => world.start_match(humans, out_events),
        Command::SetDirection { player, direction } => {
            world.set_direction(player, direction, out_events);
        }
        Command::Tick => world.tick(out_events),
        Command::Step => world.step(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use slither_core::{GridCoord, MatchPhase, OccupancyView, PlayerSnapshot, PlayerView};

    /// Phase the round/match state machine currently occupies.
    #[must_use]
    pub fn phase(world: &World) -> MatchPhase {
        world.phase
    }

    /// Number of human-controlled players; zero during attract mode.
    #[must_use]
    pub fn humans(world: &World) -> u8 {
        world.humans
    }

    /// Scores of players one and two.
    #[must_use]
    pub fn scores(world: &World) -> [u16; 2] {
        world.scores()
    }

    /// Pacing interval currently in effect, in frames per movement step.
    #[must_use]
    pub fn pace(world: &World) -> u8 {
        world.pace
    }

    /// Total frames elapsed since the world was created.
    #[must_use]
    pub fn frame(world: &World) -> u64 {
        world.frame
    }

    /// Cell currently holding the pickup, if one is placed.
    #[must_use]
    pub fn pickup(world: &World) -> Option<GridCoord> {
        world.pickup
    }

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.occupancy.dimensions()
    }

    /// Captures a read-only view of both players.
    #[must_use]
    pub fn player_view(world: &World) -> PlayerView {
        PlayerView::from_snapshots(
            world
                .players
                .iter()
                .map(|player| PlayerSnapshot {
                    id: player.id,
                    cell: player.cell,
                    direction: player.direction,
                    score: player.score,
                    human: player.human,
                    collided: player.collided,
                    length: player.trail.length(),
                })
                .collect(),
        )
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        let (columns, rows) = world.occupancy.dimensions();
        OccupancyView::new(world.occupancy.cells(), columns, rows)
    }
}

/// Test-only hooks for steering world state into otherwise slow-to-reach
/// configurations. Enabled through the `round_scaffolding` feature.
#[cfg(feature = "round_scaffolding")]
pub mod scaffolding {
    use super::World;
    use slither_core::{CellTag, GridCoord};

    /// Forces the pickup onto the provided cell, releasing the old one.
    pub fn place_pickup_at(world: &mut World, cell: GridCoord) {
        if let Some(old) = world.pickup.take() {
            if world.occupancy.tag(old) == CellTag::Pickup {
                world.occupancy.set(old, CellTag::Empty);
            }
        }
        world.pickup = Some(cell);
        world.occupancy.set(cell, CellTag::Pickup);
    }

    /// Overwrites both players' scores.
    pub fn set_scores(world: &mut World, scores: [u16; 2]) {
        world.players[0].score = scores[0];
        world.players[1].score = scores[1];
    }
}
