#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Slither adapters.
//!
//! A [`Scene`] is composed purely from world views; a [`Surface`] turns
//! scenes into output. The in-memory [`TextSurface`] serves terminals and
//! tests alike, and graphical adapters can implement [`Surface`] without
//! touching the composition rules.

use anyhow::Result as AnyResult;
use slither_core::{CellTag, GridCoord, MatchPhase, OccupancyView, PlayerId, PlayerView};

/// Drawable mark occupying one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    /// Nothing occupies the cell.
    Blank,
    /// Border or score-strip cell.
    Wall,
    /// Retained trail cell belonging to the player.
    Body(PlayerId),
    /// Head cell belonging to the player.
    Head(PlayerId),
    /// The pickup.
    Pickup,
}

impl Glyph {
    /// Single-character representation used by text surfaces.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Glyph::Blank => ' ',
            Glyph::Wall => '#',
            Glyph::Body(PlayerId::One) => 'o',
            Glyph::Body(PlayerId::Two) => 'x',
            Glyph::Head(PlayerId::One) => 'O',
            Glyph::Head(PlayerId::Two) => 'X',
            Glyph::Pickup => '*',
        }
    }
}

/// Complete, adapter-agnostic description of one frame.
#[derive(Clone, Debug)]
pub struct Scene {
    columns: u32,
    rows: u32,
    glyphs: Vec<Glyph>,
    phase: MatchPhase,
    scores: [u16; 2],
}

impl Scene {
    /// Composes a frame from the world's read-only views.
    ///
    /// Heads are painted after the grid tags, so a head that entered an
    /// occupied cell still shows on top of what it hit.
    #[must_use]
    pub fn compose(
        occupancy: OccupancyView<'_>,
        players: &PlayerView,
        phase: MatchPhase,
        scores: [u16; 2],
    ) -> Self {
        let (columns, rows) = occupancy.dimensions();
        let mut glyphs: Vec<Glyph> = occupancy
            .iter()
            .map(|tag| match tag {
                CellTag::Empty => Glyph::Blank,
                CellTag::Wall => Glyph::Wall,
                CellTag::Trail(player) => Glyph::Body(player),
                CellTag::Pickup => Glyph::Pickup,
            })
            .collect();

        for snapshot in players.iter() {
            let index = (snapshot.cell.row() * columns + snapshot.cell.column()) as usize;
            if let Some(slot) = glyphs.get_mut(index) {
                *slot = Glyph::Head(snapshot.id);
            }
        }

        Self {
            columns,
            rows,
            glyphs,
            phase,
            scores,
        }
    }

    /// Glyph at the provided cell; out-of-bounds reads as wall.
    #[must_use]
    pub fn glyph(&self, cell: GridCoord) -> Glyph {
        if cell.column() < self.columns && cell.row() < self.rows {
            let index = (cell.row() * self.columns + cell.column()) as usize;
            self.glyphs.get(index).copied().unwrap_or(Glyph::Wall)
        } else {
            Glyph::Wall
        }
    }

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Match phase the frame was composed in.
    #[must_use]
    pub const fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Scores of players one and two.
    #[must_use]
    pub const fn scores(&self) -> [u16; 2] {
        self.scores
    }
}

/// Output target that scenes are presented onto.
pub trait Surface {
    /// Prepares the surface for a new frame.
    fn clear(&mut self, columns: u32, rows: u32) -> AnyResult<()>;

    /// Draws one glyph at the provided cell.
    fn draw_cell(&mut self, cell: GridCoord, glyph: Glyph) -> AnyResult<()>;

    /// Finishes the frame with the phase and score banner.
    fn finish(&mut self, phase: MatchPhase, scores: [u16; 2]) -> AnyResult<()>;
}

/// Presents the scene onto the surface cell by cell.
pub fn present(scene: &Scene, surface: &mut dyn Surface) -> AnyResult<()> {
    let (columns, rows) = scene.dimensions();
    surface.clear(columns, rows)?;
    for row in 0..rows {
        for column in 0..columns {
            let cell = GridCoord::new(column, row);
            surface.draw_cell(cell, scene.glyph(cell))?;
        }
    }
    surface.finish(scene.phase(), scene.scores())
}

/// In-memory text surface rendering one character per cell.
#[derive(Clone, Debug, Default)]
pub struct TextSurface {
    columns: u32,
    lines: Vec<Vec<char>>,
    banner: String,
}

impl TextSurface {
    /// Creates an empty text surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the last presented frame, banner line first.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = self.banner.clone();
        output.push('\n');
        for line in &self.lines {
            output.extend(line.iter());
            output.push('\n');
        }
        output
    }
}

impl Surface for TextSurface {
    fn clear(&mut self, columns: u32, rows: u32) -> AnyResult<()> {
        self.columns = columns;
        self.lines = vec![vec![' '; columns as usize]; rows as usize];
        self.banner.clear();
        Ok(())
    }

    fn draw_cell(&mut self, cell: GridCoord, glyph: Glyph) -> AnyResult<()> {
        if cell.column() < self.columns {
            if let Some(line) = self.lines.get_mut(cell.row() as usize) {
                if let Some(slot) = line.get_mut(cell.column() as usize) {
                    *slot = glyph.to_char();
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self, phase: MatchPhase, scores: [u16; 2]) -> AnyResult<()> {
        let label = match phase {
            MatchPhase::Attract => "attract",
            MatchPhase::Playing => "playing",
            MatchPhase::RoundOver => "round over",
            MatchPhase::MatchOver => "match over",
        };
        self.banner = format!("{label} {} - {}", scores[0], scores[1]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{present, Glyph, Scene, TextSurface};
    use slither_core::{
        CellTag, Direction, GridCoord, MatchPhase, OccupancyView, PlayerId, PlayerSnapshot,
        PlayerView,
    };

    const COLUMNS: u32 = 6;
    const ROWS: u32 = 5;

    fn sample_cells() -> Vec<CellTag> {
        let mut cells = vec![CellTag::Empty; (COLUMNS * ROWS) as usize];
        for column in 0..COLUMNS {
            cells[column as usize] = CellTag::Wall;
            cells[((ROWS - 1) * COLUMNS + column) as usize] = CellTag::Wall;
        }
        cells[(2 * COLUMNS + 1) as usize] = CellTag::Trail(PlayerId::One);
        cells[(2 * COLUMNS + 2) as usize] = CellTag::Trail(PlayerId::One);
        cells[(3 * COLUMNS + 4) as usize] = CellTag::Pickup;
        cells
    }

    fn sample_players() -> PlayerView {
        PlayerView::from_snapshots(vec![PlayerSnapshot {
            id: PlayerId::One,
            cell: GridCoord::new(2, 2),
            direction: Direction::East,
            score: 3,
            human: true,
            collided: false,
            length: 2,
        }])
    }

    #[test]
    fn heads_paint_over_grid_tags() {
        let cells = sample_cells();
        let occupancy = OccupancyView::new(&cells, COLUMNS, ROWS);
        let scene = Scene::compose(occupancy, &sample_players(), MatchPhase::Playing, [3, 0]);
        assert_eq!(scene.glyph(GridCoord::new(1, 2)), Glyph::Body(PlayerId::One));
        assert_eq!(scene.glyph(GridCoord::new(2, 2)), Glyph::Head(PlayerId::One));
        assert_eq!(scene.glyph(GridCoord::new(4, 3)), Glyph::Pickup);
        assert_eq!(scene.glyph(GridCoord::new(0, 0)), Glyph::Wall);
        assert_eq!(scene.glyph(GridCoord::new(COLUMNS, 0)), Glyph::Wall);
    }

    #[test]
    fn collided_head_still_shows_on_the_wall() {
        let cells = sample_cells();
        let occupancy = OccupancyView::new(&cells, COLUMNS, ROWS);
        let players = PlayerView::from_snapshots(vec![PlayerSnapshot {
            id: PlayerId::Two,
            cell: GridCoord::new(3, 0),
            direction: Direction::North,
            score: 0,
            human: false,
            collided: true,
            length: 2,
        }]);
        let scene = Scene::compose(occupancy, &players, MatchPhase::RoundOver, [0, 0]);
        assert_eq!(scene.glyph(GridCoord::new(3, 0)), Glyph::Head(PlayerId::Two));
    }

    #[test]
    fn text_surface_renders_banner_and_rows() {
        let cells = sample_cells();
        let occupancy = OccupancyView::new(&cells, COLUMNS, ROWS);
        let scene = Scene::compose(occupancy, &sample_players(), MatchPhase::Playing, [3, 0]);
        let mut surface = TextSurface::new();
        present(&scene, &mut surface).expect("present succeeds");

        let rendered = surface.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), ROWS as usize + 1);
        assert_eq!(lines[0], "playing 3 - 0");
        assert_eq!(lines[1], "######");
        assert_eq!(lines[3], " oO   ");
        assert_eq!(lines[4], "    * ");
        assert_eq!(lines[5], "######");
    }
}
