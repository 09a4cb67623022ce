use std::fmt::{self, Debug, Display, Formatter};

use crate::data::Dir;
use crate::state::State;

/// One player step, remembering whether it pushed a box.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    dir: Dir,
    is_push: bool,
}

impl Move {
    pub fn new(dir: Dir, is_push: bool) -> Self {
        Move { dir, is_push }
    }

    pub fn dir(self) -> Dir {
        self.dir
    }

    pub fn is_push(self) -> bool {
        self.is_push
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_push {
            write!(f, "{}", self.dir.to_string().to_uppercase())
        } else {
            write!(f, "{}", self.dir)
        }
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A solution in LURD notation: lowercase steps, uppercase pushes.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Moves(Vec<Move>);

impl Moves {
    pub fn new(moves: Vec<Move>) -> Self {
        Moves(moves)
    }

    /// Recovers the moves between consecutive states of a path.
    ///
    /// Returns `None` if two neighboring states are not one step apart.
    pub fn from_path(path: &[State]) -> Option<Self> {
        let mut moves = Moves::default();
        for pair in path.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let dir = prev.player_pos().dir_to(next.player_pos())?;
            moves.add(Move::new(dir, prev.boxes() != next.boxes()));
        }
        Some(moves)
    }

    pub fn move_cnt(&self) -> usize {
        self.0.len()
    }

    pub fn push_cnt(&self) -> usize {
        self.0.iter().filter(|m| m.is_push).count()
    }

    pub(crate) fn add(&mut self, mov: Move) {
        self.0.push(mov);
    }

    pub fn iter(&self) -> ::std::slice::Iter<'_, Move> {
        self.0.iter()
    }
}

impl IntoIterator for Moves {
    type Item = Move;
    type IntoIter = ::std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Moves {
    type Item = &'a Move;
    type IntoIter = ::std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for mov in self {
            write!(f, "{}", mov)?;
        }
        Ok(())
    }
}

impl Debug for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
