use std::fmt::{self, Debug, Display, Formatter};

use crate::data::{MapCell, Pos};
use crate::map_formatter::MapFormatter;
use crate::vec2d::Vec2d;

/// The part of a level that never changes during a search.
///
/// Shared by every state of one puzzle instance.
#[derive(Clone, PartialEq, Eq)]
pub struct GoalMap {
    pub(crate) grid: Vec2d<MapCell>,
    goals: Vec<Pos>,
}

impl GoalMap {
    pub(crate) fn new(grid: Vec2d<MapCell>, mut goals: Vec<Pos>) -> Self {
        // sorted so the goal test is a plain comparison with sorted boxes
        goals.sort();
        GoalMap { grid, goals }
    }

    /// Everything outside the grid counts as a wall.
    pub fn is_wall(&self, pos: Pos) -> bool {
        self.grid.get(pos).map_or(true, |&cell| cell == MapCell::Wall)
    }

    pub fn is_goal(&self, pos: Pos) -> bool {
        self.grid.get(pos) == Some(&MapCell::Goal)
    }

    pub fn goals(&self) -> &[Pos] {
        &self.goals
    }

    pub fn width(&self) -> usize {
        self.grid.cols()
    }

    pub fn height(&self) -> usize {
        self.grid.rows()
    }
}

impl Display for GoalMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", MapFormatter::new(self, None))
    }
}

impl Debug for GoalMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
