use std::ops::RangeInclusive;
use std::rc::Rc;

use itertools::Itertools;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, RngCore, SeedableRng};
use thiserror::Error;

use super::search::{solve, SolveOptions};
use super::tango_rules;
use crate::model::{
    PairConstraint, Position, QueensBoard, RegionId, RegionLayout, Symbol, TangoBoard, TangoLayout,
};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Whole-puzzle retry budget for both constructions.
    pub max_attempts: usize,
    /// Reproducible output when set; fresh entropy otherwise.
    pub seed: Option<u64>,
    /// How many given cells a balance puzzle starts from.
    pub n_seed_cells: RangeInclusive<usize>,
    /// How many Equal/Opposite pairs a balance puzzle carries.
    pub n_constraint_pairs: RangeInclusive<usize>,
    /// Per-region growth weight range for the region-growth construction.
    pub growth_rate_range: RangeInclusive<u32>,
    /// Iteration cap for the solvability sub-solve, configured separately
    /// from whatever cap the caller later solves with.
    pub sub_solve_iterations: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            seed: None,
            n_seed_cells: 3..=6,
            n_constraint_pairs: 4..=8,
            growth_rate_range: 1..=8,
            sub_solve_iterations: 20_000,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("no puzzle of size {size} exists")]
    InvalidSize { size: usize },
    #[error("gave up after {attempts} generation attempts")]
    Exhausted { attempts: usize },
}

/// Region-growth construction: plant one mark per row as a random column
/// permutation (redrawn until no two marks are 8-adjacent), seed one region
/// per mark, then grow the regions over the board by weighted random
/// expansion. The planted marks witness solvability; the returned board is
/// blank.
pub fn generate_queens(
    size: usize,
    options: &GenerateOptions,
) -> Result<QueensBoard, GenerateError> {
    // Sizes 2 and 3 admit no permutation without an adjacent pair.
    if size == 0 || size == 2 || size == 3 {
        return Err(GenerateError::InvalidSize { size });
    }
    let mut rng = seeded_rng(options);

    for attempt in 1..=options.max_attempts {
        let Some(marks) = non_adjacent_permutation(size, &mut rng) else {
            trace!(target: "generator", "attempt {}: adjacent marks, redrawing", attempt);
            continue;
        };
        let Some(regions) = grow_regions(size, &marks, options, &mut rng) else {
            trace!(target: "generator", "attempt {}: region growth stalled", attempt);
            continue;
        };
        debug!(target: "generator", "region layout grown on attempt {}", attempt);
        let layout = RegionLayout::new(size, size, regions)
            .expect("growth assigns every cell one of the seeded regions");
        return Ok(QueensBoard::new(Rc::new(layout)));
    }
    Err(GenerateError::Exhausted {
        attempts: options.max_attempts,
    })
}

/// Constraint-seeded construction: place a few random legal givens, confirm
/// solvability with a reduced-cap sub-solve, read Equal/Opposite relations
/// off the found solution for a random set of adjacent cell pairs, then
/// reset to the givens plus the new constraint list.
pub fn generate_tango(size: usize, options: &GenerateOptions) -> Result<TangoBoard, GenerateError> {
    if size == 0 || size % 2 != 0 {
        return Err(GenerateError::InvalidSize { size });
    }
    let mut rng = seeded_rng(options);
    let sub_solve = SolveOptions {
        max_iterations: options.sub_solve_iterations,
        ..Default::default()
    };

    for attempt in 1..=options.max_attempts {
        let givens = random_seed_cells(size, options, &mut rng);
        let seeded = TangoLayout::new(size, givens.clone(), Vec::new())
            .expect("seed cells are distinct, in-range and unconstrained");
        let board = TangoBoard::new(Rc::new(seeded));

        let solved = match solve(&board, &sub_solve) {
            Ok(solved) => solved,
            Err(err) => {
                trace!(target: "generator", "attempt {}: seeds unsolvable ({})", attempt, err);
                continue;
            }
        };
        debug!(target: "generator", "solvable seeding found on attempt {}", attempt);

        let constraints = derive_constraints(&solved, options, &mut rng);
        // Constraint kinds were read off the solution itself, so they hold
        // between any pair of given endpoints.
        let layout = TangoLayout::new(size, givens, constraints)
            .expect("constraints derived from a consistent completion");
        return Ok(TangoBoard::new(Rc::new(layout)));
    }
    Err(GenerateError::Exhausted {
        attempts: options.max_attempts,
    })
}

fn seeded_rng(options: &GenerateOptions) -> StdRng {
    let seed = options.seed.unwrap_or_else(|| rand::rng().next_u64());
    debug!(target: "generator", "generation seed {}", seed);
    StdRng::seed_from_u64(seed)
}

/// One mark per row at a random column, or `None` if two consecutive rows
/// land on touching columns. Row and column uniqueness hold by construction.
fn non_adjacent_permutation(size: usize, rng: &mut StdRng) -> Option<Vec<Position>> {
    let mut cols: Vec<usize> = (0..size).collect();
    cols.shuffle(rng);
    if cols.windows(2).any(|pair| pair[0].abs_diff(pair[1]) <= 1) {
        return None;
    }
    Some(
        cols.iter()
            .enumerate()
            .map(|(row, col)| Position::new(row, *col))
            .collect(),
    )
}

fn orthogonal_neighbors(size: usize, pos: &Position) -> Vec<Position> {
    let mut neighbors = Vec::with_capacity(4);
    if pos.row > 0 {
        neighbors.push(Position::new(pos.row - 1, pos.col));
    }
    if pos.row + 1 < size {
        neighbors.push(Position::new(pos.row + 1, pos.col));
    }
    if pos.col > 0 {
        neighbors.push(Position::new(pos.row, pos.col - 1));
    }
    if pos.col + 1 < size {
        neighbors.push(Position::new(pos.row, pos.col + 1));
    }
    neighbors
}

/// Flood the board from one seed cell per mark: each step picks a uniformly
/// random unassigned cell bordering assigned territory and hands it to one
/// of its assigned neighbors' regions, weighted by that region's growth
/// rate. Returns `None` if growth stalls before full coverage.
fn grow_regions(
    size: usize,
    marks: &[Position],
    options: &GenerateOptions,
    rng: &mut StdRng,
) -> Option<Vec<RegionId>> {
    let mut regions: Vec<Option<RegionId>> = vec![None; size * size];
    let growth_rates: Vec<u32> = marks
        .iter()
        .map(|_| rng.random_range(options.growth_rate_range.clone()))
        .collect();
    for (id, mark) in marks.iter().enumerate() {
        regions[mark.index(size)] = Some(id);
    }

    let all_positions: Vec<Position> = (0..size)
        .flat_map(|row| (0..size).map(move |col| Position::new(row, col)))
        .collect();
    let mut unassigned = size * size - marks.len();
    while unassigned > 0 {
        let frontier: Vec<&Position> = all_positions
            .iter()
            .filter(|pos| {
                regions[pos.index(size)].is_none()
                    && orthogonal_neighbors(size, pos)
                        .iter()
                        .any(|n| regions[n.index(size)].is_some())
            })
            .collect();
        let cell = *frontier.choose(rng)?;
        let candidates: Vec<RegionId> = orthogonal_neighbors(size, cell)
            .iter()
            .filter_map(|n| regions[n.index(size)])
            .unique()
            .collect();
        let region = *candidates
            .choose_weighted(rng, |id| growth_rates[*id])
            .ok()?;
        regions[cell.index(size)] = Some(region);
        unassigned -= 1;
    }

    regions.into_iter().collect()
}

/// A handful of randomly placed, individually legal given cells on an
/// otherwise empty board.
fn random_seed_cells(
    size: usize,
    options: &GenerateOptions,
    rng: &mut StdRng,
) -> Vec<(Position, Symbol)> {
    let layout = TangoLayout::new(size, Vec::new(), Vec::new()).expect("empty layout is valid");
    let mut board = TangoBoard::new(Rc::new(layout));
    let target = rng.random_range(options.n_seed_cells.clone());

    let mut open = board.empty_positions();
    open.shuffle(rng);
    let mut givens = Vec::new();
    for pos in open {
        if givens.len() == target {
            break;
        }
        let symbol = *Symbol::BOTH.choose(rng).unwrap_or(&Symbol::A);
        if tango_rules::is_legal_assignment(&board, &pos, symbol) {
            board = board.with_symbol(&pos, symbol);
            givens.push((pos, symbol));
        }
    }
    givens
}

/// Read constraints off a solved board: sample distinct orthogonally
/// adjacent pairs and record whether the solution holds them equal or
/// opposite.
fn derive_constraints(
    solved: &TangoBoard,
    options: &GenerateOptions,
    rng: &mut StdRng,
) -> Vec<PairConstraint> {
    let size = solved.size();
    let mut pairs: Vec<(Position, Position)> = Vec::new();
    for pos in solved.positions() {
        if pos.col + 1 < size {
            pairs.push((pos, Position::new(pos.row, pos.col + 1)));
        }
        if pos.row + 1 < size {
            pairs.push((pos, Position::new(pos.row + 1, pos.col)));
        }
    }
    pairs.shuffle(rng);

    let n_pairs = rng.random_range(options.n_constraint_pairs.clone());
    pairs
        .into_iter()
        .take(n_pairs)
        .map(|(a, b)| {
            if solved.value(&a) == solved.value(&b) {
                PairConstraint::equal(a, b)
            } else {
                PairConstraint::opposite(a, b)
            }
        })
        .collect()
}
