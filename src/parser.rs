use std::error::Error;
use std::fmt::{self, Display, Formatter};

use crate::data::{MapCell, Pos, MAX_SIZE};
use crate::map::GoalMap;
use crate::vec2d::Vec2d;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserErr {
    Pos(usize, usize),
    TooLarge,
    MultiplePlayers,
    NoPlayer,
    NoGoals,
    BoxesGoals { boxes: usize, goals: usize },
}

impl Display for ParserErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParserErr::Pos(r, c) => write!(f, "Invalid cell at pos: [{}, {}]", r, c),
            ParserErr::TooLarge => write!(f, "Map larger than {} rows/columns", MAX_SIZE),
            ParserErr::MultiplePlayers => write!(f, "More than one player"),
            ParserErr::NoPlayer => write!(f, "No player"),
            ParserErr::NoGoals => write!(f, "No goals"),
            ParserErr::BoxesGoals { boxes, goals } => write!(
                f,
                "Number of boxes ({}) must equal number of goals ({})",
                boxes, goals
            ),
        }
    }
}

impl Error for ParserErr {}

/// A validated level: the static map plus the initial player and box positions.
#[derive(Debug)]
pub(crate) struct ParsedLevel {
    pub(crate) map: GoalMap,
    pub(crate) player_pos: Pos,
    pub(crate) boxes: Vec<Pos>,
}

/// Parses (a subset of) the format described [here](http://www.sokobano.de/wiki/index.php?title=Level_format)
pub(crate) fn parse(level: &str) -> Result<ParsedLevel, ParserErr> {
    // trim so we can specify levels using raw strings more easily
    let level = level.trim_matches('\n').trim_end();

    let mut grid = Vec::new();
    let mut goals = Vec::new();
    let mut boxes = Vec::new();
    let mut player_pos = None;

    for (r, line) in level.lines().enumerate() {
        if r >= MAX_SIZE {
            return Err(ParserErr::TooLarge);
        }
        let mut line_tiles = Vec::new();
        for (c, cur_char) in line.trim_end_matches('\r').chars().enumerate() {
            if c >= MAX_SIZE {
                return Err(ParserErr::TooLarge);
            }
            let pos = Pos::new(r as i32, c as i32);

            let tile = match cur_char {
                '#' => MapCell::Wall,
                'p' | '@' => {
                    if player_pos.is_some() {
                        return Err(ParserErr::MultiplePlayers);
                    }
                    player_pos = Some(pos);
                    MapCell::Empty
                }
                'P' | '+' => {
                    if player_pos.is_some() {
                        return Err(ParserErr::MultiplePlayers);
                    }
                    player_pos = Some(pos);
                    goals.push(pos);
                    MapCell::Goal
                }
                'b' | '$' => {
                    boxes.push(pos);
                    MapCell::Empty
                }
                'B' | '*' => {
                    boxes.push(pos);
                    goals.push(pos);
                    MapCell::Goal
                }
                '.' => {
                    goals.push(pos);
                    MapCell::Goal
                }
                ' ' | '-' | '_' => MapCell::Empty,
                _ => return Err(ParserErr::Pos(r, c)),
            };
            line_tiles.push(tile);
        }
        grid.push(line_tiles);
    }

    let player_pos = player_pos.ok_or(ParserErr::NoPlayer)?;
    if goals.is_empty() {
        return Err(ParserErr::NoGoals);
    }
    if boxes.len() != goals.len() {
        return Err(ParserErr::BoxesGoals {
            boxes: boxes.len(),
            goals: goals.len(),
        });
    }

    Ok(ParsedLevel {
        map: GoalMap::new(Vec2d::new(&grid), goals),
        player_pos,
        boxes,
    })
}
