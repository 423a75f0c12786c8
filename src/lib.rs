pub mod config;
pub mod domain;
pub mod error;
pub mod ground;
pub mod parse;
pub mod pretty;
pub mod symbols;
pub mod tree;


pub use config::{Config, UnresolvedPolicy, DEFAULT_CONFIG};
pub use domain::{AtomKind, Domain, LiftedAtom, LiftedId, Type, TypeId};
pub use error::{Error, Result};
pub use ground::GroundAtom;
pub use parse::{Position, Token, TokenStream};
pub use pretty::Pretty;
pub use symbols::SymbolTable;
pub use tree::{Node, NodeId, NodeKind, Param, Tree};

/// What one parameter of a [`GroundAtom`] is bound to.
///
/// The tag is decided when the atom is parsed or constructed and never
/// reinterpreted afterwards.
#[derive(Debug, Hash, PartialOrd, Ord, Eq, PartialEq, Clone, Copy)]
pub enum ParamSlot {
    /// Index into the enclosing action's argument list.
    Variable(usize),
    /// Index into the object space of the parameter's type.
    Object(usize),
    /// Index into the constant space of the parameter's type.
    Constant(usize),
}

impl ParamSlot {
    pub const fn index(self) -> usize {
        match self {
            Self::Variable(i) | Self::Object(i) | Self::Constant(i) => i,
        }
    }

    pub const fn is_variable(self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Signed encoding used by PDDL tooling: objects and variables map to
    /// their index, constant `c` maps to `-c - 1`.
    pub fn encode(self) -> i64 {
        match self {
            Self::Variable(i) | Self::Object(i) => i as i64,
            Self::Constant(c) => -(c as i64) - 1,
        }
    }

    /// Inverse of [`encode`](Self::encode). Non-negative values are
    /// variables when `variable_context` is set and objects otherwise.
    pub fn decode(raw: i64, variable_context: bool) -> Self {
        match raw {
            r if r < 0 => Self::Constant((-(r + 1)) as usize),
            r if variable_context => Self::Variable(r as usize),
            r => Self::Object(r as usize),
        }
    }
}
