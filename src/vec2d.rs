use std::fmt::{self, Debug, Formatter};
use std::ops::{Index, IndexMut};

use crate::data::{MapCell, Pos};

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Vec2d<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Vec2d<T> {
    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    pub(crate) fn cols(&self) -> usize {
        self.cols
    }

    /// `None` for anything outside the grid, including negative coordinates.
    pub(crate) fn get(&self, pos: Pos) -> Option<&T> {
        self.index_of(pos).map(|i| &self.data[i])
    }

    pub(crate) fn scratchpad<U: Copy>(&self, default: U) -> Vec2d<U> {
        Vec2d {
            data: vec![default; self.data.len()],
            rows: self.rows,
            cols: self.cols,
        }
    }

    fn index_of(&self, pos: Pos) -> Option<usize> {
        if pos.r < 0 || pos.c < 0 {
            return None;
        }
        let (r, c) = (pos.r as usize, pos.c as usize);
        if r >= self.rows || c >= self.cols {
            None
        } else {
            Some(r * self.cols + c)
        }
    }
}

impl Vec2d<MapCell> {
    /// Pads shorter rows with empty cells.
    pub(crate) fn new(grid: &[Vec<MapCell>]) -> Self {
        let max_cols = grid.iter().map(|row| row.len()).max().unwrap_or(0);
        let mut data = Vec::with_capacity(grid.len() * max_cols);
        for row in grid {
            data.extend_from_slice(row);
            for _ in row.len()..max_cols {
                data.push(MapCell::Empty);
            }
        }
        Vec2d {
            data,
            rows: grid.len(),
            cols: max_cols,
        }
    }
}

impl<T: Debug> Debug for Vec2d<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.cols.max(1)) {
            writeln!(f, "{:?}", row)?;
        }
        Ok(())
    }
}

impl<T> Index<Pos> for Vec2d<T> {
    type Output = T;

    fn index(&self, index: Pos) -> &Self::Output {
        let i = self
            .index_of(index)
            .unwrap_or_else(|| panic!("{} out of bounds", index));
        &self.data[i]
    }
}

impl<T> IndexMut<Pos> for Vec2d<T> {
    fn index_mut(&mut self, index: Pos) -> &mut Self::Output {
        let i = self
            .index_of(index)
            .unwrap_or_else(|| panic!("{} out of bounds", index));
        &mut self.data[i]
    }
}
