#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Slither engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of grid columns, including the border and score strip.
pub const GRID_COLUMNS: u32 = 32;

/// Default number of grid rows, including the border and score strip.
pub const GRID_ROWS: u32 = 27;

/// Smallest grid width that still fits the border box and both spawn cells.
pub const MIN_GRID_COLUMNS: u32 = 12;

/// Smallest grid height that still fits the border box and both spawn cells.
pub const MIN_GRID_ROWS: u32 = 12;

/// Maximum number of cells a single player may occupy, head included.
pub const TRAIL_CAPACITY: usize = 45;

/// Number of cells a freshly reset player occupies, head included.
pub const INITIAL_TRAIL_LENGTH: usize = 2;

/// Baseline pacing interval in frames per movement step.
pub const START_PACE: u8 = 4;

/// Lower bound the pacing interval never drops below.
pub const MIN_PACE: u8 = 2;

/// Score a player must reach to win the match.
pub const WIN_SCORE: u16 = 7;

/// Frames the round-over collision flash holds before the round resolves.
pub const FLASH_HOLD_TICKS: u16 = 56;

/// Frames the winner banner holds before the world wraps back to attract.
pub const WINNER_HOLD_TICKS: u16 = 75;

/// Cardinal movement directions available to players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Returns the direction pointing the opposite way along the same axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Returns the perpendicular direction one quarter turn clockwise.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Returns the perpendicular direction one quarter turn counter-clockwise.
    #[must_use]
    pub const fn counter_clockwise(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }
}

/// Identity of one of the two competing players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// The left-hand player, listed first on the score strip.
    One,
    /// The right-hand player, listed second on the score strip.
    Two,
}

impl PlayerId {
    /// Zero-based index suitable for addressing per-player storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// Identity of the opposing player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

/// Number of human-controlled players selected when a match starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HumanCount {
    /// Player one is human, player two autonomous.
    One,
    /// Both players are human.
    Two,
}

impl HumanCount {
    /// Number of human players as a plain count.
    #[must_use]
    pub const fn count(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    column: u32,
    row: u32,
}

impl GridCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the neighboring cell one step in the provided direction, or
    /// `None` when the step would leave the `columns` by `rows` grid.
    #[must_use]
    pub fn stepped(self, direction: Direction, columns: u32, rows: u32) -> Option<Self> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
        };
        let cell = Self::new(column?, row?);
        (cell.column < columns && cell.row < rows).then_some(cell)
    }
}

/// Contents recorded for a single cell of the occupancy grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellTag {
    /// Nothing occupies the cell.
    Empty,
    /// Part of the border box or the area outside the playfield.
    Wall,
    /// Retained trail segment or head belonging to the tagged player.
    Trail(PlayerId),
    /// The active power pickup.
    Pickup,
}

impl CellTag {
    /// Collapses the tag into its collision classification.
    #[must_use]
    pub const fn classify(self) -> CellClass {
        match self {
            Self::Empty => CellClass::Empty,
            Self::Pickup => CellClass::Pickup,
            Self::Wall | Self::Trail(_) => CellClass::Occupied,
        }
    }
}

/// Collision classification of a cell as observed by movement and steering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellClass {
    /// The cell is free to enter.
    Empty,
    /// The cell holds the pickup and may be consumed.
    Pickup,
    /// Entering the cell collides: wall, trail, or out of bounds.
    Occupied,
}

/// Phase of the round/match state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Autonomous demo loop shown before a match starts.
    Attract,
    /// An active round with at least one human player.
    Playing,
    /// A collision ended the round; the flash window is counting down.
    RoundOver,
    /// A winner was declared; the banner window is counting down.
    MatchOver,
}

/// Bitmask snapshot of the buttons pressed on one controller this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PadState {
    bits: u8,
}

impl PadState {
    /// Directional button pointing left.
    pub const LEFT: u8 = 0b0000_0001;
    /// Directional button pointing right.
    pub const RIGHT: u8 = 0b0000_0010;
    /// Directional button pointing up.
    pub const UP: u8 = 0b0000_0100;
    /// Directional button pointing down.
    pub const DOWN: u8 = 0b0000_1000;
    /// Primary action button; starts a one-player match from attract.
    pub const BUTTON_A: u8 = 0b0001_0000;
    /// Secondary action button; starts a two-player match from attract.
    pub const BUTTON_B: u8 = 0b0010_0000;

    /// Creates a snapshot from raw button bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    /// Snapshot with no buttons pressed.
    #[must_use]
    pub const fn released() -> Self {
        Self { bits: 0 }
    }

    /// Reports whether every button in the provided mask is pressed.
    #[must_use]
    pub const fn pressed(&self, mask: u8) -> bool {
        self.bits & mask == mask
    }

    /// Raw button bits captured in the snapshot.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.bits
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the world's deterministic random state.
    SeedRandom {
        /// New random state applied before the next draw.
        seed: u64,
    },
    /// Leaves attract mode and begins a match with the selected player count.
    StartMatch {
        /// Number of human-controlled players for the match.
        humans: HumanCount,
    },
    /// Points a player's next movement step in the provided direction.
    SetDirection {
        /// Player whose heading changes.
        player: PlayerId,
        /// New heading for the player.
        direction: Direction,
    },
    /// Advances the raw frame clock by one tick.
    Tick,
    /// Executes one movement step for both players.
    Step,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the raw frame clock advanced.
    FrameAdvanced {
        /// Total frames elapsed since the world was created.
        frame: u64,
    },
    /// Enough frames accumulated: a movement step is due this tick.
    StepReady,
    /// Announces that the state machine entered a new phase.
    PhaseChanged {
        /// Phase that became active after processing commands.
        phase: MatchPhase,
    },
    /// Confirms that a match left attract mode.
    MatchStarted {
        /// Number of human-controlled players for the match.
        humans: HumanCount,
    },
    /// Confirms that a fresh round was set up.
    RoundStarted {
        /// Pacing interval the round begins with, in frames per step.
        pace: u8,
    },
    /// Confirms that a player's heading changed.
    PlayerTurned {
        /// Player whose heading changed.
        player: PlayerId,
        /// Heading the player now follows.
        direction: Direction,
    },
    /// Confirms that a player's head moved between two cells.
    PlayerAdvanced {
        /// Player that advanced.
        player: PlayerId,
        /// Cell the head occupied before moving.
        from: GridCoord,
        /// Cell the head occupies after the move.
        to: GridCoord,
    },
    /// Announces the pickup's new location.
    PickupPlaced {
        /// Cell now holding the pickup.
        cell: GridCoord,
    },
    /// Confirms that a player's head entered the pickup cell.
    PickupConsumed {
        /// Player that consumed the pickup.
        player: PlayerId,
        /// Cell the pickup occupied.
        cell: GridCoord,
    },
    /// Confirms that a trail retained one more cell after a pickup.
    TrailGrew {
        /// Player whose trail grew.
        player: PlayerId,
        /// Total occupied cells, head included, after growing.
        length: usize,
    },
    /// Confirms that the pacing interval decreased.
    PaceQuickened {
        /// Pacing interval now in effect, in frames per step.
        pace: u8,
    },
    /// Reports that a player's head entered an occupied, non-pickup cell or
    /// tried to step off the grid entirely.
    PlayerCollided {
        /// Player that collided.
        player: PlayerId,
        /// Occupied cell the head entered, or the head's standing cell when
        /// the step would have left the grid.
        cell: GridCoord,
    },
    /// Announces that a collision ended the round.
    RoundEnded {
        /// Player awarded a point, or `None` when both collided at once.
        scorer: Option<PlayerId>,
        /// Scores of players one and two after awarding the point.
        scores: [u16; 2],
    },
    /// Announces that a player reached the winning score.
    MatchEnded {
        /// Player that won the match.
        winner: PlayerId,
        /// Final scores of players one and two.
        scores: [u16; 2],
    },
}

/// Reasons a requested grid configuration is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GridConfigError {
    /// The requested column count cannot fit the playfield.
    #[error("grid needs at least {minimum} columns, got {columns}")]
    TooNarrow {
        /// Column count that was requested.
        columns: u32,
        /// Smallest accepted column count.
        minimum: u32,
    },
    /// The requested row count cannot fit the playfield.
    #[error("grid needs at least {minimum} rows, got {rows}")]
    TooShort {
        /// Row count that was requested.
        rows: u32,
        /// Smallest accepted row count.
        minimum: u32,
    },
}

/// Immutable representation of a single player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Identity of the player.
    pub id: PlayerId,
    /// Grid cell currently occupied by the player's head.
    pub cell: GridCoord,
    /// Heading the player's next step follows.
    pub direction: Direction,
    /// Points accumulated across rounds of the current match.
    pub score: u16,
    /// Whether the player is controlled by a human.
    pub human: bool,
    /// Whether the player's head entered an occupied cell this round.
    pub collided: bool,
    /// Total occupied cells, head included.
    pub length: usize,
}

/// Read-only snapshot describing both players.
#[derive(Clone, Debug, Default)]
pub struct PlayerView {
    snapshots: Vec<PlayerSnapshot>,
}

impl PlayerView {
    /// Creates a new player view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PlayerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerSnapshot> {
        self.snapshots.iter()
    }

    /// Retrieves the snapshot for the requested player, if captured.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&PlayerSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == player)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PlayerSnapshot> {
        self.snapshots
    }
}

/// Read-only view into the dense occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [CellTag],
    columns: u32,
    rows: u32,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellTag], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the tag recorded for the cell; out-of-bounds reads as wall.
    #[must_use]
    pub fn tag(&self, cell: GridCoord) -> CellTag {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(CellTag::Wall)
    }

    /// Collision classification of the cell; out-of-bounds is occupied.
    #[must_use]
    pub fn classify(&self, cell: GridCoord) -> CellClass {
        self.tag(cell).classify()
    }

    /// Returns an iterator over all cell tags in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellTag> + 'a {
        self.cells.iter().copied()
    }

    /// Provides the dimensions of the underlying occupancy grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CellClass, CellTag, Direction, GridConfigError, GridCoord, OccupancyView, PadState,
        PlayerId,
    };
    use serde::{de::DeserializeOwned, Serialize};

    const ALL_DIRECTIONS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[test]
    fn opposite_is_an_involution() {
        for direction in ALL_DIRECTIONS {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn quarter_turns_compose_into_opposite() {
        for direction in ALL_DIRECTIONS {
            assert_eq!(direction.clockwise().clockwise(), direction.opposite());
            assert_eq!(direction.clockwise().counter_clockwise(), direction);
        }
    }

    #[test]
    fn stepped_moves_one_cell() {
        let origin = GridCoord::new(3, 3);
        assert_eq!(
            origin.stepped(Direction::North, 8, 8),
            Some(GridCoord::new(3, 2))
        );
        assert_eq!(
            origin.stepped(Direction::East, 8, 8),
            Some(GridCoord::new(4, 3))
        );
        assert_eq!(
            origin.stepped(Direction::South, 8, 8),
            Some(GridCoord::new(3, 4))
        );
        assert_eq!(
            origin.stepped(Direction::West, 8, 8),
            Some(GridCoord::new(2, 3))
        );
    }

    #[test]
    fn stepped_rejects_leaving_the_grid() {
        assert_eq!(GridCoord::new(0, 0).stepped(Direction::North, 4, 4), None);
        assert_eq!(GridCoord::new(0, 0).stepped(Direction::West, 4, 4), None);
        assert_eq!(GridCoord::new(3, 3).stepped(Direction::East, 4, 4), None);
        assert_eq!(GridCoord::new(3, 3).stepped(Direction::South, 4, 4), None);
    }

    #[test]
    fn opponents_pair_up() {
        assert_eq!(PlayerId::One.opponent(), PlayerId::Two);
        assert_eq!(PlayerId::Two.opponent(), PlayerId::One);
        assert_eq!(PlayerId::One.index(), 0);
        assert_eq!(PlayerId::Two.index(), 1);
    }

    #[test]
    fn cell_tags_classify_for_collision() {
        assert_eq!(CellTag::Empty.classify(), CellClass::Empty);
        assert_eq!(CellTag::Pickup.classify(), CellClass::Pickup);
        assert_eq!(CellTag::Wall.classify(), CellClass::Occupied);
        assert_eq!(
            CellTag::Trail(PlayerId::Two).classify(),
            CellClass::Occupied
        );
    }

    #[test]
    fn occupancy_view_reads_out_of_bounds_as_wall() {
        let cells = vec![CellTag::Empty; 4];
        let view = OccupancyView::new(&cells, 2, 2);
        assert_eq!(view.tag(GridCoord::new(5, 0)), CellTag::Wall);
        assert_eq!(view.classify(GridCoord::new(0, 9)), CellClass::Occupied);
        assert_eq!(view.classify(GridCoord::new(1, 1)), CellClass::Empty);
    }

    #[test]
    fn pad_state_reports_pressed_masks() {
        let pad = PadState::from_bits(PadState::LEFT | PadState::BUTTON_A);
        assert!(pad.pressed(PadState::LEFT));
        assert!(pad.pressed(PadState::BUTTON_A));
        assert!(!pad.pressed(PadState::RIGHT));
        assert!(!pad.pressed(PadState::LEFT | PadState::RIGHT));
        assert_eq!(PadState::released().bits(), 0);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn player_id_round_trips_through_bincode() {
        assert_round_trip(&PlayerId::Two);
    }

    #[test]
    fn grid_coord_round_trips_through_bincode() {
        assert_round_trip(&GridCoord::new(15, 10));
    }

    #[test]
    fn cell_tag_round_trips_through_bincode() {
        assert_round_trip(&CellTag::Trail(PlayerId::One));
    }

    #[test]
    fn grid_config_error_round_trips_through_bincode() {
        assert_round_trip(&GridConfigError::TooNarrow {
            columns: 4,
            minimum: 12,
        });
    }
}
