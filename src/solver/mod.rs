pub mod a_star;
pub mod heuristic;
pub mod outcome;

use std::error::Error;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::mem;

use crate::config::{ConfigErr, HeuristicKind, Limits};
use crate::state::State;
use crate::Solve;

pub use self::a_star::{AStarSolver, SearchErr};
pub use self::heuristic::{CacheStats, GreedyMatching, Heuristic, MisplacedBoxes, NearestGoal};
pub use self::outcome::{Outcome, SearchStats, Termination};

/// What the solver needs from a puzzle.
///
/// States are immutable, a move produces a new state.
/// `Display` renders the state for humans.
pub trait SearchState: Clone + Debug + Display {
    type Move: Copy + Debug;
    /// Two states with equal fingerprints are the same search node.
    type Fingerprint: Clone + Eq + Hash + Debug;
    type MoveErr: Error;

    /// Moves worth trying, cheap checks only.
    fn possible_moves(&self) -> Vec<Self::Move>;

    fn apply_move(&self, mov: Self::Move) -> Result<Self, Self::MoveErr>;

    fn is_goal(&self) -> bool;

    fn fingerprint(&self) -> &Self::Fingerprint;

    /// Rough heap + stack size, only used to estimate memory usage.
    fn approx_bytes(&self) -> usize {
        mem::size_of::<Self>()
    }
}

impl Solve for State {
    fn solve(&self, heuristic: HeuristicKind, limits: Limits) -> Result<Outcome<State>, ConfigErr> {
        let mut solver = AStarSolver::new(heuristic.build(), limits)?;
        Ok(solver.solve(self))
    }
}
