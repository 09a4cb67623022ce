use std::cell::OnceCell;
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::mem;
use std::rc::Rc;
use std::str::FromStr;

use crate::data::{Dir, Pos, DIRECTIONS};
use crate::deadlocks;
use crate::map::GoalMap;
use crate::map_formatter::MapFormatter;
use crate::parser::{self, ParserErr};
use crate::solver::SearchState;

/// Identity of a state during a search: player position and sorted boxes.
///
/// The map is not part of it, it never changes during one search.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint {
    player_pos: Pos,
    boxes: Rc<[Pos]>,
}

impl Fingerprint {
    pub fn player_pos(&self) -> Pos {
        self.player_pos
    }

    pub fn boxes(&self) -> &[Pos] {
        &self.boxes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveErr {
    Wall,
    Blocked,
    FreezeDeadlock,
}

impl Display for MoveErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            MoveErr::Wall => write!(f, "Cannot move into wall"),
            MoveErr::Blocked => write!(f, "Cannot push box"),
            MoveErr::FreezeDeadlock => write!(f, "Freeze deadlock detected"),
        }
    }
}

impl Error for MoveErr {}

/// One configuration of a Sokoban level.
///
/// Immutable - moves produce new states which share the map with the old one.
#[derive(Clone)]
pub struct State {
    map: Rc<GoalMap>,
    player_pos: Pos,
    // sorted to detect equal states when we reorder boxes
    boxes: Rc<[Pos]>,
    fingerprint: OnceCell<Fingerprint>,
}

impl State {
    fn new(map: Rc<GoalMap>, player_pos: Pos, mut boxes: Vec<Pos>) -> State {
        boxes.sort();
        State {
            map,
            player_pos,
            boxes: boxes.into(),
            fingerprint: OnceCell::new(),
        }
    }

    pub fn map(&self) -> &GoalMap {
        &self.map
    }

    pub fn player_pos(&self) -> Pos {
        self.player_pos
    }

    /// Sorted box positions.
    pub fn boxes(&self) -> &[Pos] {
        &self.boxes
    }

    pub fn width(&self) -> usize {
        self.map.width()
    }

    pub fn height(&self) -> usize {
        self.map.height()
    }

    fn has_box(&self, pos: Pos) -> bool {
        self.boxes.binary_search(&pos).is_ok()
    }
}

impl SearchState for State {
    type Move = Dir;
    type Fingerprint = Fingerprint;
    type MoveErr = MoveErr;

    fn possible_moves(&self) -> Vec<Dir> {
        let mut moves = Vec::with_capacity(4);

        for &dir in &DIRECTIONS {
            let new_player_pos = self.player_pos + dir;
            if self.map.is_wall(new_player_pos) {
                continue;
            }

            if self.has_box(new_player_pos) {
                let push_dest = new_player_pos + dir;
                if self.map.is_wall(push_dest)
                    || self.has_box(push_dest)
                    || deadlocks::is_dead_square(&self.map, &self.boxes, push_dest)
                {
                    continue;
                }
            }

            moves.push(dir);
        }

        moves
    }

    fn apply_move(&self, dir: Dir) -> Result<State, MoveErr> {
        let new_player_pos = self.player_pos + dir;
        if self.map.is_wall(new_player_pos) {
            return Err(MoveErr::Wall);
        }

        let mut new_boxes = self.boxes.to_vec();
        if let Ok(index) = self.boxes.binary_search(&new_player_pos) {
            let push_dest = new_player_pos + dir;
            if self.map.is_wall(push_dest) || self.has_box(push_dest) {
                return Err(MoveErr::Blocked);
            }

            new_boxes[index] = push_dest;
            new_boxes.sort();
            if deadlocks::has_frozen_box(&self.map, &new_boxes) {
                return Err(MoveErr::FreezeDeadlock);
            }
        }

        Ok(State::new(Rc::clone(&self.map), new_player_pos, new_boxes))
    }

    fn is_goal(&self) -> bool {
        // both sorted and the parser guarantees equal counts
        *self.boxes == *self.map.goals()
    }

    fn fingerprint(&self) -> &Fingerprint {
        self.fingerprint.get_or_init(|| Fingerprint {
            player_pos: self.player_pos,
            boxes: Rc::clone(&self.boxes),
        })
    }

    fn approx_bytes(&self) -> usize {
        mem::size_of::<Self>() + self.boxes.len() * mem::size_of::<Pos>()
    }
}

impl FromStr for State {
    type Err = ParserErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = parser::parse(s)?;
        Ok(State::new(Rc::new(level.map), level.player_pos, level.boxes))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint() == other.fingerprint()
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint().hash(state);
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let formatter =
            MapFormatter::new(&self.map, Some((self.player_pos, &self.boxes[..])));
        write!(f, "{}", formatter)
    }
}

impl Debug for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const SIMPLE: &str = r"
#####
#.$ #
#  @#
#####
";

    fn state(level: &str) -> State {
        level.parse().unwrap()
    }

    #[test]
    fn push_onto_goal() {
        let initial = state(SIMPLE);
        assert!(!initial.is_goal());
        assert_eq!(initial.possible_moves(), vec![Dir::Up, Dir::Left]);

        let up = initial.apply_move(Dir::Up).unwrap();
        assert_eq!(up.player_pos(), Pos::new(1, 3));
        assert_eq!(up.boxes(), initial.boxes());
        assert!(!up.is_goal());
        assert_eq!(up.possible_moves(), vec![Dir::Down, Dir::Left]);

        let solved = up.apply_move(Dir::Left).unwrap();
        assert_eq!(solved.player_pos(), Pos::new(1, 2));
        assert_eq!(solved.boxes(), &[Pos::new(1, 1)]);
        assert!(solved.is_goal());
    }

    #[test]
    fn illegal_moves() {
        let initial = state(SIMPLE);
        assert_eq!(initial.apply_move(Dir::Right).unwrap_err(), MoveErr::Wall);
        assert_eq!(initial.apply_move(Dir::Down).unwrap_err(), MoveErr::Wall);

        // box against the top wall
        let left = initial.apply_move(Dir::Left).unwrap();
        assert_eq!(left.apply_move(Dir::Up).unwrap_err(), MoveErr::Blocked);
        assert!(!left.possible_moves().contains(&Dir::Up));
    }

    #[test]
    fn box_blocked_by_box() {
        let initial = state(
            r"
#######
#@$$..#
#######
",
        );
        assert_eq!(initial.apply_move(Dir::Right).unwrap_err(), MoveErr::Blocked);
        assert!(initial.possible_moves().is_empty());
    }

    #[test]
    fn no_push_into_dead_corner() {
        let initial = state(
            r"
######
# $@ #
#    #
#   .#
######
",
        );
        assert_eq!(initial.possible_moves(), vec![Dir::Down, Dir::Right]);
        // the pre-filter is separate from the move's own legality check
        let pushed = initial.apply_move(Dir::Left).unwrap();
        assert_eq!(pushed.boxes(), &[Pos::new(1, 1)]);
    }

    #[test]
    fn no_push_along_wall_without_goal() {
        let initial = state(
            r"
######
#    #
# $  #
# @  #
#   .#
######
",
        );
        assert_eq!(
            initial.possible_moves(),
            vec![Dir::Down, Dir::Left, Dir::Right]
        );

        let with_goal = state(
            r"
######
#   .#
# $  #
# @  #
#    #
######
",
        );
        assert_eq!(
            with_goal.possible_moves(),
            vec![Dir::Up, Dir::Down, Dir::Left, Dir::Right]
        );
    }

    #[test]
    fn freeze_deadlock_rejects_move() {
        let initial = state(
            r"
#######
##$####
#  $@ #
#..   #
#######
",
        );
        assert!(initial.possible_moves().contains(&Dir::Left));
        assert_eq!(
            initial.apply_move(Dir::Left).unwrap_err(),
            MoveErr::FreezeDeadlock
        );
    }

    #[test]
    fn apply_move_is_deterministic() {
        let initial = state(SIMPLE);
        for &dir in &DIRECTIONS {
            let a = initial.apply_move(dir);
            let b = initial.apply_move(dir);
            match (a, b) {
                (Ok(a), Ok(b)) => assert_eq!(a.fingerprint(), b.fingerprint()),
                (Err(a), Err(b)) => assert_eq!(a, b),
                _ => panic!("different results for {:?}", dir),
            }
        }
    }

    #[test]
    fn fingerprint_identity() {
        let initial = state(SIMPLE);
        // same configuration reached through a different path
        let back = initial
            .apply_move(Dir::Up)
            .unwrap()
            .apply_move(Dir::Down)
            .unwrap();
        assert_eq!(initial, back);
        assert_eq!(initial.fingerprint(), back.fingerprint());
        assert_eq!(initial.fingerprint().player_pos(), Pos::new(2, 3));
        assert_eq!(initial.fingerprint().boxes(), &[Pos::new(1, 2)]);

        let mut set = HashSet::new();
        set.insert(initial.clone());
        assert!(!set.insert(back));
        assert!(set.insert(initial.apply_move(Dir::Up).unwrap()));
    }

    #[test]
    fn boxes_are_a_set() {
        let a = state(
            r"
#######
#@$ $ #
#  .. #
#######
",
        );
        let b = a.apply_move(Dir::Down).unwrap().apply_move(Dir::Up).unwrap();
        assert_eq!(a.boxes(), &[Pos::new(1, 2), Pos::new(1, 4)]);
        assert_eq!(a, b);
    }

    #[test]
    fn goal_test_is_set_equality() {
        assert!(state(
            r"
#####
#@**#
#####
"
        )
        .is_goal());
        assert!(!state(
            r"
######
#@*$.#
######
"
        )
        .is_goal());
    }

    #[test]
    fn formatting_round_trip() {
        let levels = [
            SIMPLE,
            r"
######
#+*$ #
######
",
            r"
  #####
###   #
# $ # ##
# #  . #
#    # #
## #   #
 #@  ###
 #####
",
        ];
        for level in levels.iter() {
            let s = state(level);
            assert_eq!(s.to_string(), level.trim_start_matches('\n'));
            let again = state(&s.to_string());
            assert_eq!(s.fingerprint(), again.fingerprint());
            assert_eq!(s.width(), again.width());
            assert_eq!(s.height(), again.height());
        }
    }

    #[test]
    fn approx_bytes_grows_with_boxes() {
        let one = state(SIMPLE);
        let two = state(
            r"
#######
#@$ $ #
#  .. #
#######
",
        );
        assert!(two.approx_bytes() > one.approx_bytes());
    }
}
