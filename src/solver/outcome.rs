use std::fmt::{self, Debug, Display, Formatter};
use std::time::Duration;

use separator::Separatable;

use crate::config::Limits;
use crate::moves::Moves;
use crate::solver::heuristic::CacheStats;
use crate::state::State;

/// Why a search stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    NotStarted,
    InitialIsGoal,
    SolutionFound,
    FrontierExhausted,
    StateLimit(usize),
    Timeout(Duration),
    /// The configured limit in bytes.
    MemoryLimit(usize),
    Failed(String),
}

impl Termination {
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            Termination::StateLimit(_) | Termination::Timeout(_) | Termination::MemoryLimit(_)
        )
    }
}

impl Display for Termination {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Termination::NotStarted => write!(f, "Search not started"),
            Termination::InitialIsGoal => write!(f, "Initial state is goal"),
            Termination::SolutionFound => write!(f, "Solution found"),
            Termination::FrontierExhausted => write!(f, "Open list exhausted"),
            Termination::StateLimit(max) => {
                write!(f, "State limit reached ({})", max.separated_string())
            }
            Termination::Timeout(timeout) => write!(f, "Timeout reached ({:?})", timeout),
            Termination::MemoryLimit(bytes) => write!(
                f,
                "Memory limit exceeded ({} bytes)",
                bytes.separated_string()
            ),
            Termination::Failed(msg) => write!(f, "Exception: {}", msg),
        }
    }
}

/// Result of one search. Only the elapsed time is filled in after construction.
pub struct Outcome<S> {
    path: Option<Vec<S>>,
    states_explored: usize,
    states_generated: usize,
    elapsed: Duration,
    termination: Termination,
}

impl<S> Outcome<S> {
    pub(crate) fn solved(
        path: Vec<S>,
        states_explored: usize,
        states_generated: usize,
        termination: Termination,
    ) -> Self {
        debug_assert!(!path.is_empty());
        Outcome {
            path: Some(path),
            states_explored,
            states_generated,
            elapsed: Duration::default(),
            termination,
        }
    }

    pub(crate) fn failed(
        states_explored: usize,
        states_generated: usize,
        termination: Termination,
    ) -> Self {
        Outcome {
            path: None,
            states_explored,
            states_generated,
            elapsed: Duration::default(),
            termination,
        }
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    pub fn found(&self) -> bool {
        self.path.is_some()
    }

    /// States from the initial one to a goal, both included.
    pub fn path(&self) -> Option<&[S]> {
        self.path.as_deref()
    }

    pub fn into_path(self) -> Option<Vec<S>> {
        self.path
    }

    /// Number of moves, 0 when nothing was found.
    pub fn solution_length(&self) -> usize {
        self.path.as_ref().map_or(0, |path| path.len() - 1)
    }

    pub fn states_explored(&self) -> usize {
        self.states_explored
    }

    pub fn states_generated(&self) -> usize {
        self.states_generated
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn termination(&self) -> &Termination {
        &self.termination
    }
}

impl Outcome<State> {
    pub fn moves(&self) -> Option<Moves> {
        self.path.as_ref().and_then(|path| Moves::from_path(path))
    }
}

impl<S> Display for Outcome<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.found() {
            writeln!(f, "Solution length: {}", self.solution_length().separated_string())?;
        } else {
            writeln!(f, "No solution")?;
        }
        writeln!(f, "Termination: {}", self.termination)?;
        writeln!(f, "States explored: {}", self.states_explored.separated_string())?;
        writeln!(f, "States generated: {}", self.states_generated.separated_string())?;
        writeln!(f, "Elapsed: {} ms", (self.elapsed.as_millis() as u64).separated_string())
    }
}

impl<S> Debug for Outcome<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outcome")
            .field("found", &self.found())
            .field("solution_length", &self.solution_length())
            .field("states_explored", &self.states_explored)
            .field("states_generated", &self.states_generated)
            .field("elapsed", &self.elapsed)
            .field("termination", &self.termination)
            .finish()
    }
}

/// Snapshot of the solver's bookkeeping, taken after or between searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStats {
    pub states_explored: usize,
    pub states_generated: usize,
    pub max_depth: u32,
    /// Fingerprints marked as pending.
    pub frontier_size: usize,
    /// Entries in the priority queue, including stale ones.
    pub heap_size: usize,
    pub closed_size: usize,
    pub g_scores_size: usize,
    pub f_scores_size: usize,
    pub parents_size: usize,
    pub cleanups: usize,
    pub limits: Limits,
    pub heuristic: String,
    pub cache: Option<CacheStats>,
}

impl Display for SearchStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "States explored: {}", self.states_explored.separated_string())?;
        writeln!(f, "States generated: {}", self.states_generated.separated_string())?;
        writeln!(f, "Max depth: {}", self.max_depth.separated_string())?;
        writeln!(
            f,
            "Frontier: {} ({} heap entries)",
            self.frontier_size.separated_string(),
            self.heap_size.separated_string()
        )?;
        writeln!(f, "Closed: {}", self.closed_size.separated_string())?;
        writeln!(
            f,
            "Tables: g {}, f {}, parents {}",
            self.g_scores_size.separated_string(),
            self.f_scores_size.separated_string(),
            self.parents_size.separated_string()
        )?;
        writeln!(f, "Cleanups: {}", self.cleanups)?;
        writeln!(f, "Limits: {}", self.limits)?;
        match self.cache {
            Some(cache) => writeln!(f, "Heuristic: {} (cache: {})", self.heuristic, cache),
            None => writeln!(f, "Heuristic: {}", self.heuristic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_outcome() {
        let mut outcome = Outcome::solved(vec!['a', 'b', 'c'], 5, 9, Termination::SolutionFound);
        outcome.set_elapsed(Duration::from_millis(1234));
        assert!(outcome.found());
        assert_eq!(outcome.solution_length(), 2);
        assert_eq!(outcome.path(), Some(&['a', 'b', 'c'][..]));
        assert_eq!(
            outcome.to_string(),
            "Solution length: 2\n\
             Termination: Solution found\n\
             States explored: 5\n\
             States generated: 9\n\
             Elapsed: 1,234 ms\n"
        );
        assert_eq!(outcome.into_path(), Some(vec!['a', 'b', 'c']));
    }

    #[test]
    fn failed_outcome() {
        let outcome: Outcome<char> =
            Outcome::failed(100_000, 250_000, Termination::StateLimit(100_000));
        assert!(!outcome.found());
        assert_eq!(outcome.solution_length(), 0);
        assert_eq!(outcome.path(), None);
        assert!(outcome.termination().is_limit());
        assert_eq!(
            outcome.to_string(),
            "No solution\n\
             Termination: State limit reached (100,000)\n\
             States explored: 100,000\n\
             States generated: 250,000\n\
             Elapsed: 0 ms\n"
        );
    }

    #[test]
    fn single_state_path() {
        let outcome = Outcome::solved(vec![()], 0, 1, Termination::InitialIsGoal);
        assert!(outcome.found());
        assert_eq!(outcome.solution_length(), 0);
    }

    #[test]
    fn termination_reasons() {
        assert_eq!(
            Termination::Timeout(Duration::from_secs(60)).to_string(),
            "Timeout reached (60s)"
        );
        assert_eq!(
            Termination::MemoryLimit(1024 * 1024).to_string(),
            "Memory limit exceeded (1,048,576 bytes)"
        );
        assert_eq!(
            Termination::Failed("boom".to_string()).to_string(),
            "Exception: boom"
        );
        assert!(!Termination::FrontierExhausted.is_limit());
        assert!(!Termination::Failed(String::new()).is_limit());
    }
}
