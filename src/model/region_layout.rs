use serde::{Deserialize, Serialize};

use super::{Position, SpecError};

pub type RegionId = usize;

/// The fixed region partition of an exclusivity-family board. Assigned once at
/// construction and shared immutably (via `Rc`) between all board snapshots
/// derived from the same puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegionLayout {
    pub width: usize,
    pub height: usize,
    regions: Vec<RegionId>, // row-major, one entry per cell
    pub n_regions: usize,
    region_sizes: Vec<usize>,
}

impl RegionLayout {
    pub fn new(width: usize, height: usize, regions: Vec<RegionId>) -> Result<Self, SpecError> {
        if width == 0 || height == 0 {
            return Err(SpecError::BadDimensions { width, height });
        }
        if regions.len() != width * height {
            return Err(SpecError::RegionGridSizeMismatch {
                expected: width * height,
                actual: regions.len(),
            });
        }
        let n_regions = regions.iter().max().map_or(0, |max| max + 1);
        let mut region_sizes = vec![0usize; n_regions];
        for &region in &regions {
            region_sizes[region] += 1;
        }
        if let Some(region) = region_sizes.iter().position(|&size| size == 0) {
            return Err(SpecError::EmptyRegion { region });
        }
        Ok(Self {
            width,
            height,
            regions,
            n_regions,
            region_sizes,
        })
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    pub fn region_at(&self, pos: &Position) -> RegionId {
        self.regions[pos.index(self.width)]
    }

    pub fn region_size(&self, region: RegionId) -> usize {
        self.region_sizes[region]
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(|row| (0..self.width).map(move |col| Position::new(row, col)))
    }

    pub fn row_positions(&self, row: usize) -> impl Iterator<Item = Position> + '_ {
        (0..self.width).map(move |col| Position::new(row, col))
    }

    pub fn col_positions(&self, col: usize) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).map(move |row| Position::new(row, col))
    }

    pub fn region_positions(&self, region: RegionId) -> Vec<Position> {
        self.positions()
            .filter(|pos| self.region_at(pos) == region)
            .collect()
    }

    /// The 8-neighborhood of a cell, clipped to the board.
    pub fn moore_neighbors(&self, pos: &Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(8);
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let row = pos.row as i64 + dr;
                let col = pos.col as i64 + dc;
                if row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
                {
                    neighbors.push(Position::new(row as usize, col as usize));
                }
            }
        }
        neighbors
    }

    pub fn orthogonal_neighbors(&self, pos: &Position) -> Vec<Position> {
        self.moore_neighbors(pos)
            .into_iter()
            .filter(|n| n.is_orthogonal_to(pos))
            .collect()
    }
}
