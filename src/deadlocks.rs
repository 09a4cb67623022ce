//! Positions a box can never be brought back from.
//!
//! Both checks are conservative in the sense that they only look at walls,
//! goals and boxes directly adjacent to a cell - they miss many deadlocks
//! but are cheap enough to run for every candidate push.

use crate::data::{Dir, Pos};
use crate::map::GoalMap;

/// Checks the cell a box is about to be pushed to.
///
/// `boxes` are the boxes *before* the push. A goal is never dead.
/// Otherwise the cell is dead if it's a corner or if it's against a wall
/// and no free goal is left in the line the box can still slide along.
pub(crate) fn is_dead_square(map: &GoalMap, boxes: &[Pos], pos: Pos) -> bool {
    if map.is_goal(pos) {
        return false;
    }

    let up = map.is_wall(pos + Dir::Up);
    let down = map.is_wall(pos + Dir::Down);
    let left = map.is_wall(pos + Dir::Left);
    let right = map.is_wall(pos + Dir::Right);

    if (up || down) && (left || right) {
        return true;
    }

    let free_goal = |goal: &&Pos| boxes.binary_search(goal).is_err();
    if (up || down) && !map.goals().iter().filter(free_goal).any(|g| g.r == pos.r) {
        return true;
    }
    if (left || right) && !map.goals().iter().filter(free_goal).any(|g| g.c == pos.c) {
        return true;
    }

    false
}

/// Checks a configuration after a push.
///
/// A box off goal whose neighbors are walls or boxes on both sides of both axes
/// can never move again.
pub(crate) fn has_frozen_box(map: &GoalMap, boxes: &[Pos]) -> bool {
    let blocked = |pos: Pos| map.is_wall(pos) || boxes.binary_search(&pos).is_ok();

    boxes.iter().any(|&b| {
        if map.is_goal(b) {
            return false;
        }
        let vertical = blocked(b + Dir::Up) && blocked(b + Dir::Down);
        let horizontal = blocked(b + Dir::Left) && blocked(b + Dir::Right);
        vertical && horizontal
    })
}

#[cfg(test)]
mod tests {
    use crate::state::State;

    use super::*;

    fn state(level: &str) -> State {
        level.parse().unwrap()
    }

    #[test]
    fn corners() {
        let s = state(
            r"
######
#    #
# @$ #
#   .#
######
",
        );
        let map = s.map();
        assert!(is_dead_square(map, s.boxes(), Pos::new(1, 1)));
        assert!(is_dead_square(map, s.boxes(), Pos::new(1, 4)));
        assert!(is_dead_square(map, s.boxes(), Pos::new(3, 1)));
        // goal in a corner is fine
        assert!(!is_dead_square(map, s.boxes(), Pos::new(3, 4)));
        assert!(!is_dead_square(map, s.boxes(), Pos::new(2, 2)));
    }

    #[test]
    fn along_walls() {
        let s = state(
            r"
######
#    #
# @$ #
#   .#
######
",
        );
        let map = s.map();
        // top row has no goal
        assert!(is_dead_square(map, s.boxes(), Pos::new(1, 2)));
        // left column has no goal
        assert!(is_dead_square(map, s.boxes(), Pos::new(2, 1)));
        // bottom row and right column have one
        assert!(!is_dead_square(map, s.boxes(), Pos::new(3, 2)));
        assert!(!is_dead_square(map, s.boxes(), Pos::new(2, 4)));
    }

    #[test]
    fn occupied_goal_does_not_count() {
        let s = state(
            r"
#######
#     #
# @$  #
#   *.#
#######
",
        );
        // (3, 4) is taken but (3, 5) is still free
        assert!(!is_dead_square(s.map(), s.boxes(), Pos::new(3, 2)));

        let s = state(
            r"
#######
#    .#
# @$  #
#    *#
#######
",
        );
        assert!(is_dead_square(s.map(), s.boxes(), Pos::new(3, 2)));
    }

    #[test]
    fn frozen_boxes() {
        let s = state(
            r"
#######
##$####
#  $@ #
#..   #
#######
",
        );
        let map = s.map();
        assert!(!has_frozen_box(map, s.boxes()));
        // second box pushed under the first one
        let after = vec![Pos::new(1, 2), Pos::new(2, 2)];
        assert!(has_frozen_box(map, &after));
    }

    #[test]
    fn frozen_on_goal_is_fine() {
        let s = state(
            r"
#######
##*####
#  $@ #
#.    #
#######
",
        );
        let after = vec![Pos::new(1, 2), Pos::new(2, 2)];
        assert!(!has_frozen_box(s.map(), &after));
    }
}
