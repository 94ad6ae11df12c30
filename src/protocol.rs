//! Line-oriented command language exchanged between two endpoints.
//!
//! Every command is one newline-terminated, case-insensitive line. Decoding
//! tests the literals below in order and the first literal *contained* in the
//! line wins, which keeps us interoperable with peers that pad or prefix
//! their lines. An empty line (or a closed connection) means `Close`.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::core::Outcome;

/// Answer code carried by `answer <n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Miss = 0,
    Hit = 1,
    Sunk = 2,
}

impl Reply {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Reply::Miss),
            1 => Some(Reply::Hit),
            2 => Some(Reply::Sunk),
            _ => None,
        }
    }

    /// Reply for a resolved shot, `None` for a rejected one.
    pub fn from_outcome(outcome: Outcome) -> Option<Self> {
        outcome.answer_code().and_then(Reply::from_code)
    }
}

/// One decoded protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Opponent fired at zero-based `(col, row)`.
    Shoot { col: usize, row: usize },
    /// Grid dimension for a new networked match.
    Size(usize),
    /// Opponent finished placement.
    Confirm,
    /// Outcome of the shot this side sent last.
    Answer(Reply),
    /// Opponent is saving under the id; persist and close.
    Save(String),
    /// Resume the saved match with the id.
    Load(String),
    /// No-op acknowledgement.
    Pass,
    /// Connection is over.
    Close,
}

/// Why a line could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No known literal in the line.
    Unrecognized(String),
    /// A command is missing a field.
    MissingField { command: &'static str, field: &'static str },
    /// A numeric field did not parse.
    InvalidNumber { command: &'static str, value: String },
    /// Extra text after a complete command.
    TrailingInput { command: &'static str, rest: String },
    /// `answer` with a code other than 0, 1 or 2.
    InvalidAnswer(u8),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Unrecognized(line) => write!(f, "Unrecognized message: {:?}", line),
            DecodeError::MissingField { command, field } => {
                write!(f, "'{}' is missing its {}", command, field)
            }
            DecodeError::InvalidNumber { command, value } => {
                write!(f, "'{}' carries an invalid number {:?}", command, value)
            }
            DecodeError::TrailingInput { command, rest } => {
                write!(f, "'{}' followed by unexpected {:?}", command, rest)
            }
            DecodeError::InvalidAnswer(code) => write!(f, "Unknown answer code {}", code),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

type Parser = fn(&str) -> Result<Command, DecodeError>;

/// Literals in match order. Order matters where literals could overlap.
const GRAMMAR: [(&str, Parser); 7] = [
    ("shot ", parse_shot),
    ("size ", parse_size),
    ("confirmed", parse_confirmed),
    ("answer ", parse_answer),
    ("save ", parse_save),
    ("load ", parse_load),
    ("pass", parse_pass),
];

/// Decode one received line into a command.
pub fn decode(line: &str) -> Result<Command, DecodeError> {
    let text = line.trim().to_lowercase();
    if text.is_empty() {
        return Ok(Command::Close);
    }
    for (literal, parse) in GRAMMAR.iter() {
        if let Some(pos) = text.find(literal) {
            return parse(&text[pos + literal.len()..]);
        }
    }
    Err(DecodeError::Unrecognized(text))
}

/// Encode a command as one line, without the trailing newline.
pub fn encode(cmd: &Command) -> String {
    match cmd {
        Command::Shoot { col, row } => format!("shot {} {}", col, row),
        Command::Size(n) => format!("size {}", n),
        Command::Confirm => "confirmed".to_string(),
        Command::Answer(reply) => format!("answer {}", reply.code()),
        Command::Save(id) => format!("save {}", id),
        Command::Load(id) => format!("load {}", id),
        Command::Pass => "pass".to_string(),
        Command::Close => String::new(),
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for Command {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

fn numbers(command: &'static str, rest: &str) -> Result<Vec<usize>, DecodeError> {
    rest.split_whitespace()
        .map(|v| {
            v.parse::<usize>().map_err(|_| DecodeError::InvalidNumber {
                command,
                value: v.to_string(),
            })
        })
        .collect()
}

fn parse_shot(rest: &str) -> Result<Command, DecodeError> {
    let fields = numbers("shot", rest)?;
    match fields.as_slice() {
        [col, row] => Ok(Command::Shoot { col: *col, row: *row }),
        [] => Err(DecodeError::MissingField { command: "shot", field: "column" }),
        [_] => Err(DecodeError::MissingField { command: "shot", field: "row" }),
        _ => Err(DecodeError::TrailingInput {
            command: "shot",
            rest: rest.trim().to_string(),
        }),
    }
}

fn parse_size(rest: &str) -> Result<Command, DecodeError> {
    match numbers("size", rest)?.as_slice() {
        [n] => Ok(Command::Size(*n)),
        [] => Err(DecodeError::MissingField { command: "size", field: "dimension" }),
        _ => Err(DecodeError::TrailingInput {
            command: "size",
            rest: rest.trim().to_string(),
        }),
    }
}

fn parse_confirmed(rest: &str) -> Result<Command, DecodeError> {
    if rest.trim().is_empty() {
        Ok(Command::Confirm)
    } else {
        Err(DecodeError::TrailingInput {
            command: "confirmed",
            rest: rest.trim().to_string(),
        })
    }
}

fn parse_answer(rest: &str) -> Result<Command, DecodeError> {
    match numbers("answer", rest)?.as_slice() {
        [code] => match u8::try_from(*code) {
            Ok(code) => Reply::from_code(code)
                .map(Command::Answer)
                .ok_or(DecodeError::InvalidAnswer(code)),
            Err(_) => Err(DecodeError::InvalidNumber {
                command: "answer",
                value: code.to_string(),
            }),
        },
        [] => Err(DecodeError::MissingField { command: "answer", field: "code" }),
        _ => Err(DecodeError::TrailingInput {
            command: "answer",
            rest: rest.trim().to_string(),
        }),
    }
}

fn save_id(command: &'static str, rest: &str) -> Result<String, DecodeError> {
    let id = rest.trim();
    if id.is_empty() {
        Err(DecodeError::MissingField { command, field: "id" })
    } else {
        Ok(id.to_string())
    }
}

fn parse_save(rest: &str) -> Result<Command, DecodeError> {
    save_id("save", rest).map(Command::Save)
}

fn parse_load(rest: &str) -> Result<Command, DecodeError> {
    save_id("load", rest).map(Command::Load)
}

fn parse_pass(_rest: &str) -> Result<Command, DecodeError> {
    Ok(Command::Pass)
}
