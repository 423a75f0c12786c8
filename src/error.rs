use crate::parse::Position;
use std::fmt;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// What kind of table a duplicate name was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Type,
    Object,
    Constant,
    Predicate,
    Function,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Type => "type",
            Self::Object => "object",
            Self::Constant => "constant",
            Self::Predicate => "predicate",
            Self::Function => "function",
        };
        f.write_str(s)
    }
}

fn describe_at(position: &Option<Position>) -> String {
    position.map_or_else(String::new, |p| format!(" (at {p})"))
}

fn describe_found(found: &Option<String>) -> String {
    match found {
        Some(token) => format!("`{token}`"),
        None => "end of input".to_owned(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("no predicate or function named `{name}` is declared{}", describe_at(.position))]
    UnknownAtom {
        name: String,
        position: Option<Position>,
    },

    #[error(
        "`{token}` at {position} is neither a constant, an object nor a variable of type `{expected_type}`"
    )]
    UnresolvedToken {
        token: String,
        expected_type: String,
        position: Position,
    },

    #[error("expected `{expected}` at {position}, found {}", describe_found(.found))]
    Syntax {
        expected: String,
        found: Option<String>,
        position: Position,
    },

    #[error("`{name}` takes {expected} parameters but {found} were given")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("parameter {slot} of `{name}` does not resolve to a name")]
    UnresolvedSlot { name: String, slot: usize },

    #[error("variable {index} of `{name}` has no binding among {bound} arguments")]
    UnboundVariable {
        name: String,
        index: usize,
        bound: usize,
    },

    #[error("unknown type `{name}`")]
    UnknownType { name: String },

    #[error("{kind} `{name}` is already declared")]
    DuplicateSymbol { kind: SymbolKind, name: String },

    #[error("too many {what}: ids are limited to 32 bits")]
    CapacityExceeded { what: &'static str },

    #[error(transparent)]
    Fmt(#[from] fmt::Error),
}
