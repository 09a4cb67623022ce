use std::fmt::{self, Display, Formatter};
use std::ops::Add;

/// Levels larger than this in any dimension are rejected by the parser.
pub(crate) const MAX_SIZE: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MapCell {
    Empty,
    Wall,
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Contents {
    Empty,
    Box,
    Player,
}

// signed so neighbors of border cells don't underflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub r: i32,
    pub c: i32,
}

impl Pos {
    pub fn new(r: i32, c: i32) -> Pos {
        Pos { r, c }
    }

    /// Manhattan distance
    pub fn dist(self, other: Pos) -> u32 {
        (self.r - other.r).unsigned_abs() + (self.c - other.c).unsigned_abs()
    }

    /// Direction of a neighboring position, `None` if `other` is not adjacent.
    pub fn dir_to(self, other: Pos) -> Option<Dir> {
        DIRECTIONS.iter().cloned().find(|&dir| self + dir == other)
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.r, self.c)
    }
}

/// The move symbol - one step of the player in one of four directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

/// Order in which successors are enumerated.
pub const DIRECTIONS: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

impl Dir {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Dir::Up => write!(f, "u"),
            Dir::Down => write!(f, "d"),
            Dir::Left => write!(f, "l"),
            Dir::Right => write!(f, "r"),
        }
    }
}

impl Add<Dir> for Pos {
    type Output = Pos;

    fn add(self, dir: Dir) -> Pos {
        let (dr, dc) = dir.delta();
        Pos::new(self.r + dr, self.c + dc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = Pos::new(1, 1);
        assert_eq!(a.dist(a), 0);
        assert_eq!(a.dist(Pos::new(3, 0)), 3);
        assert_eq!(Pos::new(3, 0).dist(a), 3);
    }

    #[test]
    fn directions() {
        let p = Pos::new(2, 2);
        for &dir in &DIRECTIONS {
            let n = p + dir;
            assert_eq!(p.dist(n), 1);
            assert_eq!(p.dir_to(n), Some(dir));
            assert_eq!(n.dir_to(p).map(|back| n + back), Some(p));
        }
        assert_eq!(p.dir_to(Pos::new(3, 3)), None);
        assert_eq!(p.dir_to(p), None);
    }

    #[test]
    fn border_neighbors() {
        assert_eq!(Pos::new(0, 0) + Dir::Up, Pos::new(-1, 0));
        assert_eq!(Pos::new(0, 0) + Dir::Left, Pos::new(0, -1));
    }
}
