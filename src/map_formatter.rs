use std::fmt::{self, Debug, Display, Formatter};

use crate::data::{Contents, MapCell, Pos};
use crate::map::GoalMap;

/// Writes a map in XSB format, optionally with a player and boxes on it.
pub(crate) struct MapFormatter<'a> {
    map: &'a GoalMap,
    player_pos: Option<Pos>,
    boxes: &'a [Pos],
}

impl<'a> MapFormatter<'a> {
    pub(crate) fn new(map: &'a GoalMap, state: Option<(Pos, &'a [Pos])>) -> Self {
        let (player_pos, boxes) = match state {
            Some((player_pos, boxes)) => (Some(player_pos), boxes),
            None => (None, &[][..]),
        };
        Self {
            map,
            player_pos,
            boxes,
        }
    }

    fn write_to_formatter(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let grid = &self.map.grid;
        let mut state_grid = grid.scratchpad(Contents::Empty);
        for &b in self.boxes {
            state_grid[b] = Contents::Box;
        }
        if let Some(player_pos) = self.player_pos {
            state_grid[player_pos] = Contents::Player;
        }

        for r in 0..grid.rows() as i32 {
            // don't print trailing empty cells to match the input level strings
            let mut line_len = 0;
            for c in 0..grid.cols() as i32 {
                let pos = Pos::new(r, c);
                if grid[pos] != MapCell::Empty || state_grid[pos] != Contents::Empty {
                    line_len = c + 1;
                }
            }

            for c in 0..line_len {
                let pos = Pos::new(r, c);
                Self::write_cell(grid[pos], state_grid[pos], f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_cell(cell: MapCell, contents: Contents, f: &mut Formatter<'_>) -> fmt::Result {
        match (cell, contents) {
            (MapCell::Empty, Contents::Empty) => write!(f, " "),
            (MapCell::Empty, Contents::Box) => write!(f, "$"),
            (MapCell::Empty, Contents::Player) => write!(f, "@"),
            (MapCell::Wall, Contents::Empty) => write!(f, "#"),
            (MapCell::Wall, _) => unreachable!("Wall with non-empty contents"),
            (MapCell::Goal, Contents::Empty) => write!(f, "."),
            (MapCell::Goal, Contents::Box) => write!(f, "*"),
            (MapCell::Goal, Contents::Player) => write!(f, "+"),
        }
    }
}

impl<'a> Display for MapFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_to_formatter(f)
    }
}

impl<'a> Debug for MapFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
