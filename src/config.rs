use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use separator::Separatable;

use crate::solver::heuristic::{GreedyMatching, Heuristic, MisplacedBoxes, NearestGoal};
use crate::state::State;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigErr {
    ZeroMaxStates,
    ZeroTimeout,
    ZeroMemoryLimit,
    ZeroCheckInterval,
    InadmissibleHeuristic(String),
    UnknownHeuristic(String),
}

impl Display for ConfigErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErr::ZeroMaxStates => write!(f, "Max states must be positive"),
            ConfigErr::ZeroTimeout => write!(f, "Timeout must be positive"),
            ConfigErr::ZeroMemoryLimit => write!(f, "Memory limit must be positive"),
            ConfigErr::ZeroCheckInterval => write!(f, "Memory check interval must be positive"),
            ConfigErr::InadmissibleHeuristic(name) => {
                write!(f, "Heuristic {} is not admissible", name)
            }
            ConfigErr::UnknownHeuristic(text) => write!(
                f,
                "Unknown heuristic '{}', expected one of: greedy, nearest, misplaced",
                text
            ),
        }
    }
}

impl Error for ConfigErr {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeuristicKind {
    Greedy,
    Nearest,
    Misplaced,
}

impl HeuristicKind {
    pub fn build(self) -> Box<dyn Heuristic<State = State>> {
        match self {
            HeuristicKind::Greedy => Box::new(GreedyMatching::new()),
            HeuristicKind::Nearest => Box::new(NearestGoal::new()),
            HeuristicKind::Misplaced => Box::new(MisplacedBoxes::new()),
        }
    }
}

impl Display for HeuristicKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            HeuristicKind::Greedy => write!(f, "greedy"),
            HeuristicKind::Nearest => write!(f, "nearest"),
            HeuristicKind::Misplaced => write!(f, "misplaced"),
        }
    }
}

impl FromStr for HeuristicKind {
    type Err = ConfigErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(HeuristicKind::Greedy),
            "nearest" => Ok(HeuristicKind::Nearest),
            "misplaced" => Ok(HeuristicKind::Misplaced),
            _ => Err(ConfigErr::UnknownHeuristic(s.to_string())),
        }
    }
}

/// Resource limits of one search. All of them must be positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub max_states: usize,
    pub timeout: Duration,
    /// Approximate, in bytes.
    pub memory_limit: usize,
    /// How many explored states between two memory estimates.
    pub memory_check_interval: usize,
}

impl Limits {
    pub fn validate(&self) -> Result<(), ConfigErr> {
        if self.max_states == 0 {
            return Err(ConfigErr::ZeroMaxStates);
        }
        if self.timeout == Duration::from_secs(0) {
            return Err(ConfigErr::ZeroTimeout);
        }
        if self.memory_limit == 0 {
            return Err(ConfigErr::ZeroMemoryLimit);
        }
        if self.memory_check_interval == 0 {
            return Err(ConfigErr::ZeroCheckInterval);
        }
        Ok(())
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_states: 100_000,
            timeout: Duration::from_secs(60),
            memory_limit: 512 * 1024 * 1024,
            memory_check_interval: 1_000,
        }
    }
}

impl Display for Limits {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max states: {}, timeout: {:?}, memory: {} bytes",
            self.max_states.separated_string(),
            self.timeout,
            self.memory_limit.separated_string(),
        )
    }
}
