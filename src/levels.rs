//! Reader for the tag-attribute level file.
//!
//! ```text
//! <?xml version='1.0' encoding='utf-8'?>
//! <levels>
//!   <level color="rrr..." modifier="R00..." number="3" solution="A1,B2" />
//! </levels>
//! ```
//!
//! Only reading is supported. Levels are addressed by their zero-based
//! position in the file.
use crate::engine::Board;
use crate::errors::SolverError;
use crate::utils::board_from_strings;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_until, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{map, opt},
    multi::many0,
    sequence::{delimited, preceded, separated_pair, terminated, tuple},
    IResult, Parser,
};
use std::collections::BTreeMap;
use std::str::FromStr;

/// One `<level .../>` entry and its attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Level {
    attributes: BTreeMap<String, String>,
}

impl Level {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn color(&self) -> Option<&str> {
        self.attribute("color")
    }

    pub fn modifier(&self) -> Option<&str> {
        self.attribute("modifier")
    }

    /// Stored solution, if the level has a non-empty one.
    pub fn solution(&self) -> Option<&str> {
        self.attribute("solution").filter(|s| !s.trim().is_empty())
    }

    /// The `number` attribute, when present and numeric.
    pub fn number(&self) -> Option<u32> {
        self.attribute("number")?.trim().parse().ok()
    }

    /// Builds the level's board. `index` is only used for the error message.
    pub fn to_board(&self, index: usize) -> Result<Board, SolverError> {
        let color = self.color().ok_or(SolverError::MissingAttribute {
            index,
            attribute: "color",
        })?;
        let modifier = self.modifier().ok_or(SolverError::MissingAttribute {
            index,
            attribute: "modifier",
        })?;
        Ok(board_from_strings(color, modifier))
    }
}

fn quoted_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
        delimited(char('\''), take_till(|c: char| c == '\''), char('\'')),
    ))
    .parse(input)
}

fn attribute(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        take_while1(|c: char| !c.is_whitespace() && !"=/>".contains(c)),
        delimited(multispace0, char('='), multispace0),
        quoted_value,
    )
    .parse(input)
}

fn level_close(input: &str) -> IResult<&str, &str> {
    alt((
        tag("/>"),
        terminated(tag(">"), opt(preceded(multispace0, tag("</level>")))),
    ))
    .parse(input)
}

fn level(input: &str) -> IResult<&str, Level> {
    map(
        delimited(
            tag("<level"),
            many0(preceded(multispace1, attribute)),
            preceded(multispace0, level_close),
        ),
        |pairs| Level {
            attributes: pairs
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        },
    )
    .parse(input)
}

fn declaration(input: &str) -> IResult<&str, &str> {
    delimited(tag("<?xml"), take_until("?>"), tag("?>")).parse(input)
}

fn document(input: &str) -> IResult<&str, Vec<Level>> {
    map(
        tuple((
            multispace0,
            opt(terminated(declaration, multispace0)),
            tag("<levels>"),
            many0(preceded(multispace0, level)),
            multispace0,
            tag("</levels>"),
            multispace0,
        )),
        |(_, _, _, levels, _, _, _)| levels,
    )
    .parse(input)
}

/// Parses a whole level file.
///
/// # Errors
/// `SolverError::LevelFormat` with the byte offset where parsing stopped, if
/// the text is not a `<levels>` document or has trailing content.
pub fn parse_levels(text: &str) -> Result<Vec<Level>, SolverError> {
    match document(text) {
        Ok(("", levels)) => Ok(levels),
        Ok((rest, _)) => Err(SolverError::LevelFormat {
            offset: text.len() - rest.len(),
            reason: "unexpected content after </levels>".to_string(),
        }),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(SolverError::LevelFormat {
            offset: text.len() - e.input.len(),
            reason: format!("{:?}", e.code),
        }),
        Err(nom::Err::Incomplete(_)) => Err(SolverError::LevelFormat {
            offset: text.len(),
            reason: "unexpected end of input".to_string(),
        }),
    }
}

/// Which levels of a file to process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelSelection {
    All,
    /// `N`: just this level.
    Only(usize),
    /// `N+`: this level and every later one.
    From(usize),
}

impl LevelSelection {
    pub fn includes(&self, index: usize) -> bool {
        match *self {
            LevelSelection::All => true,
            LevelSelection::Only(n) => index == n,
            LevelSelection::From(n) => index >= n,
        }
    }
}

impl FromStr for LevelSelection {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || SolverError::InvalidSelection { input: s.to_string() };
        if s.is_empty() {
            return Ok(LevelSelection::All);
        }
        match s.strip_suffix('+') {
            Some(start) => start.parse().map(LevelSelection::From).map_err(|_| invalid()),
            None => s.parse().map(LevelSelection::Only).map_err(|_| invalid()),
        }
    }
}
