// Opt in to warnings about new 2018 idioms
#![warn(rust_2018_idioms)]
// Additional warnings that are allow by default (`rustc -W help`)
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused)]

pub mod config;
pub mod data;
pub mod map;
pub mod moves;
pub mod solver;
pub mod state;

mod deadlocks;
mod fs;
mod map_formatter;
mod parser;
mod vec2d;

use std::error::Error;

pub use crate::parser::ParserErr;

use crate::config::{ConfigErr, HeuristicKind, Limits};
use crate::solver::Outcome;
use crate::state::State;

pub trait LoadLevel {
    fn load_level(&self) -> Result<State, Box<dyn Error>>;
}

pub trait Solve {
    fn solve(&self, heuristic: HeuristicKind, limits: Limits) -> Result<Outcome<State>, ConfigErr>;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::solver::{SearchState, Termination};

    use super::*;

    #[test]
    fn test_levels() {
        // (level, heuristic, expected solution length)
        let levels = [
            ("00-solved.txt", HeuristicKind::Greedy, Some(0)),
            ("01-simplest.txt", HeuristicKind::Greedy, Some(2)),
            ("01-simplest.txt", HeuristicKind::Nearest, Some(2)),
            ("01-simplest.txt", HeuristicKind::Misplaced, Some(2)),
            ("02-one-way.txt", HeuristicKind::Nearest, Some(3)),
            ("02-one-way.txt", HeuristicKind::Misplaced, Some(3)),
            ("03-corridor.txt", HeuristicKind::Nearest, Some(5)),
            ("04-two-boxes.txt", HeuristicKind::Nearest, Some(5)),
            ("04-two-boxes.txt", HeuristicKind::Misplaced, Some(5)),
            ("no-solution-corner.txt", HeuristicKind::Nearest, None),
        ];

        for &(level_name, heuristic, expected) in levels.iter() {
            let level_path = format!("levels/custom/{}", level_name);
            let level = level_path.load_level().unwrap();
            let outcome = level.solve(heuristic, Limits::default()).unwrap();

            println!("{} using {}:\n{}", level_path, heuristic, outcome);
            match expected {
                Some(len) => {
                    assert!(outcome.found(), "{}", level_path);
                    assert_eq!(outcome.solution_length(), len, "{}", level_path);
                    let path = outcome.path().unwrap();
                    assert!(path[path.len() - 1].is_goal());
                }
                None => {
                    assert!(!outcome.found(), "{}", level_path);
                    assert_eq!(outcome.termination(), &Termination::FrontierExhausted);
                }
            }
        }
    }

    #[test]
    fn state_limit_is_not_timeout() {
        let level = "levels/custom/sealed-room.txt".load_level().unwrap();
        let limits = Limits {
            max_states: 200,
            timeout: Duration::from_secs(600),
            ..Limits::default()
        };
        let outcome = level.solve(HeuristicKind::Nearest, limits).unwrap();
        assert!(!outcome.found());
        assert_eq!(outcome.solution_length(), 0);
        assert_eq!(outcome.termination(), &Termination::StateLimit(200));
        assert!(outcome.termination().to_string().contains("State limit"));
    }

    #[test]
    fn invalid_limits() {
        let level = "levels/custom/01-simplest.txt".load_level().unwrap();
        let limits = Limits {
            memory_limit: 0,
            ..Limits::default()
        };
        assert_eq!(
            level.solve(HeuristicKind::Greedy, limits).err(),
            Some(ConfigErr::ZeroMemoryLimit)
        );
    }
}
