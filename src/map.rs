use crate::color::Color;
use anyhow::Context;
use glam::Vec2;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// side length of the procedural room
pub const ROOM_SIZE: usize = 30;
/// fixed dimensions of a grid loaded from text
pub const MAZE_SIZE: usize = 150;

/// A grid cell's tile code. Zero is walkable floor, everything else is wall.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Tile(pub u32);

impl Tile {
    pub const EMPTY: Tile = Tile(0);
    pub const OUTER_WALL: Tile = Tile(1);
    pub const SIDE_WALL: Tile = Tile(2);
    pub const DOORWAY_WALL: Tile = Tile(3);
    pub const DOOR_FRAME: Tile = Tile(4);

    pub fn is_wall(self) -> bool {
        self != Tile::EMPTY
    }

    /// palette shared by the 3D view and the minimap
    pub fn color(self) -> Color {
        match self.0 {
            1 => Color::rgb(170, 170, 170),
            2 => Color::rgb(90, 90, 90),
            3 => Color::rgb(200, 40, 40),
            4 => Color::rgb(120, 20, 20),
            _ => Color::WHITE,
        }
    }
}

/// Rectangular, immutable grid of tiles. `x` indexes columns and `y` rows.
#[derive(Clone, PartialEq, Debug)]
pub struct WorldGrid {
    pub width: usize,
    pub height: usize,
    tiles: Vec<Tile>,
}

impl WorldGrid {
    fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::EMPTY; width * height],
        }
    }

    /// build from row-major tile codes; rows must be non-empty and equally long
    pub fn from_rows(rows: &[Vec<u32>]) -> anyhow::Result<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 || height == 0 {
            anyhow::bail!("grid must have at least one row and one column");
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!("row {y} has {} columns, expected {width}", row.len());
            }
            tiles.extend(row.iter().copied().map(Tile));
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Bordered square room with a closed chamber in the middle.
    pub fn default_room() -> Self {
        let size = ROOM_SIZE;
        let mut this = Self::empty(size, size);

        for i in 0..size {
            this.set(i, 0, Tile::OUTER_WALL);
            this.set(i, size - 1, Tile::OUTER_WALL);
            this.set(0, i, Tile::SIDE_WALL);
            this.set(size - 1, i, Tile::SIDE_WALL);
        }

        let (start, end) = (12, 17);
        for x in start..end {
            this.set(x, start, Tile::DOORWAY_WALL);
        }
        this.set(end, start, Tile::DOOR_FRAME);
        for y in start + 1..end {
            this.set(start, y, Tile::DOOR_FRAME);
            this.set(end, y, Tile::DOOR_FRAME);
        }
        this.set(start, end, Tile::DOOR_FRAME);
        for x in start + 1..=end {
            this.set(x, end, Tile::DOORWAY_WALL);
        }

        this
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        log::info!("loading grid at {}", path.display());
        let text = read_to_string(path)
            .with_context(|| format!("failed to read grid from {}", path.display()))?;
        Self::parse(&text, MAZE_SIZE)
            .with_context(|| format!("failed to parse grid from {}", path.display()))
    }

    /// Parse whitespace separated tile codes into a `size` x `size` grid.
    ///
    /// Rows and columns beyond `size` are ignored; cells the text does not
    /// cover stay empty.
    pub fn parse(text: &str, size: usize) -> anyhow::Result<Self> {
        let mut this = Self::empty(size, size);

        for (y, line) in text.lines().take(size).enumerate() {
            for (x, token) in line.split_whitespace().take(size).enumerate() {
                let code = token
                    .parse::<u32>()
                    .with_context(|| format!("invalid tile {token:?} at row {y}, column {x}"))?;
                this.set(x, y, Tile(code));
            }
        }

        Ok(this)
    }

    fn set(&mut self, x: usize, y: usize, tile: Tile) {
        self.tiles[y * self.width + x] = tile;
    }

    pub fn get(&self, x: i64, y: i64) -> Option<Tile> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.tiles[self.vec_to_idx(x as usize, y as usize)])
    }

    /// tile under a world position, flooring both coordinates
    pub fn tile_at(&self, position: Vec2) -> Option<Tile> {
        if !position.is_finite() {
            return None;
        }
        self.get(position.x.floor() as i64, position.y.floor() as i64)
    }

    pub fn idx_to_cell(&self, idx: usize) -> (usize, usize) {
        (idx % self.width, idx / self.width)
    }

    pub fn vec_to_idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn tiles(&self) -> impl Iterator<Item = ((usize, usize), Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(idx, tile)| (self.idx_to_cell(idx), *tile))
    }

    /// the wall tile at `position`, if there is one
    pub fn colliding(&self, position: Vec2) -> Option<Tile> {
        self.tile_at(position).filter(|tile| tile.is_wall())
    }

    pub fn is_walkable(&self, x: i64, y: i64) -> bool {
        self.get(x, y) == Some(Tile::EMPTY)
    }
}

/// Process-wide collection of grids, loaded once and shared read-only.
#[derive(Default)]
pub struct GridCatalog {
    grids: Vec<Arc<WorldGrid>>,
}

impl GridCatalog {
    pub const ROOM: usize = 0;
    pub const MAZE: usize = 1;

    /// the procedural room followed by the maze loaded from `maze_path`
    pub fn with_defaults(maze_path: &Path) -> anyhow::Result<Self> {
        let mut this = Self::default();
        this.push(WorldGrid::default_room());
        this.push(WorldGrid::load(maze_path)?);
        Ok(this)
    }

    pub fn push(&mut self, grid: WorldGrid) -> usize {
        log::debug!(
            "registering grid {} ({}x{})",
            self.grids.len(),
            grid.width,
            grid.height
        );
        self.grids.push(Arc::new(grid));
        self.grids.len() - 1
    }

    pub fn get(&self, id: usize) -> Option<&Arc<WorldGrid>> {
        self.grids.get(id)
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}

/// first existing path among the conventional maze locations
pub fn default_maze_path() -> PathBuf {
    let primary = Path::new("mapStorage").join("DefaultMaze.txt");
    if primary.exists() {
        primary
    } else {
        PathBuf::from("DefaultMaze.txt")
    }
}
