use crate::math::Vec3;
use crate::{PICKUP_SIZE, PLAYER_SIZE, TILE_SIZE, WALL_HEIGHT};
use serde::{Deserialize, Serialize};

/// Cell codes of the level grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
    PlayerSpawn,
    JetpackPickup,
    AmmoPickup,
}

impl Tile {
    /// Unknown codes read as empty floor.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Tile::Wall,
            2 => Tile::PlayerSpawn,
            3 => Tile::JetpackPickup,
            4 => Tile::AmmoPickup,
            _ => Tile::Empty,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Tile::Empty => 0,
            Tile::Wall => 1,
            Tile::PlayerSpawn => 2,
            Tile::JetpackPickup => 3,
            Tile::AmmoPickup => 4,
        }
    }
}

/// Rectangular tile grid. Only consulted while a World is being built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub rows: Vec<Vec<u8>>,
}

const ARENA: [[u8; 12]; 12] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 2, 0, 0, 0, 0, 0, 0, 0, 0, 2, 1],
    [1, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 4, 0, 0, 3, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 3, 0, 0, 4, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 1],
    [1, 2, 0, 0, 0, 0, 0, 0, 0, 0, 2, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

impl Level {
    pub fn new(rows: Vec<Vec<u8>>) -> Self {
        Self { rows }
    }

    /// The fixed built-in arena.
    pub fn arena() -> Self {
        Self {
            rows: ARENA.iter().map(|row| row.to_vec()).collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Row-major scan of every non-empty cell.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &code)| (row, col, Tile::from_code(code)))
                .filter(|(_, _, tile)| *tile != Tile::Empty)
        })
    }

    /// Ground-level world position of a cell's center: columns map to X,
    /// rows map to Z.
    pub fn tile_to_world(row: usize, col: usize) -> Vec3 {
        Vec3::new(col as f32 * TILE_SIZE, 0.0, row as f32 * TILE_SIZE)
    }

    /// Where an entity of the given tile kind is centered.
    pub fn placement(row: usize, col: usize, tile: Tile) -> Vec3 {
        let base = Self::tile_to_world(row, col);
        let lift = match tile {
            Tile::Wall => WALL_HEIGHT / 2.0,
            Tile::PlayerSpawn => PLAYER_SIZE.y / 2.0,
            Tile::JetpackPickup | Tile::AmmoPickup => PICKUP_SIZE / 2.0,
            Tile::Empty => 0.0,
        };
        Vec3::new(base.x, lift, base.z)
    }

    pub fn spawn_points(&self) -> Vec<Vec3> {
        self.tiles()
            .filter(|(_, _, tile)| *tile == Tile::PlayerSpawn)
            .map(|(row, col, tile)| Self::placement(row, col, tile))
            .collect()
    }

    /// Center of the grid at ground level.
    pub fn center(&self) -> Vec3 {
        let w = self.width().saturating_sub(1) as f32 * TILE_SIZE;
        let h = self.height().saturating_sub(1) as f32 * TILE_SIZE;
        Vec3::new(w / 2.0, 0.0, h / 2.0)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::arena()
    }
}
