//! Append-only arena of expression-tree nodes, and lowering of ground atoms
//! into it.
//!
//! # Determinism
//! - A node's id is the arena length at the time it was pushed.
//! - Nodes are never removed or reordered, so ids stay valid for the
//!   lifetime of the tree.

use crate::config::Config;
use crate::domain::{dense_id, Domain};
use crate::error::{Error, Result};
use crate::ground::GroundAtom;
use log::trace;
use std::fmt;

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Only meaningful for the [`Tree`] that issued an id with this value.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Predicate,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: String,
    pub parameters: Vec<Param>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails once the arena holds `u32::MAX + 1` nodes; ids are never reused.
    pub fn push(&mut self, kind: NodeKind, name: String, parameters: Vec<Param>) -> Result<NodeId> {
        let id = NodeId(dense_id(self.nodes.len(), "tree nodes")?);
        self.nodes.push(Node { id, kind, name, parameters });
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

impl GroundAtom {
    /// Appends a node for this atom to `tree`.
    ///
    /// `substitution` names the enclosing action's arguments; variable slots
    /// take their name from it. Each parameter carries the declared type of
    /// its formal parameter.
    pub fn lower(
        &self,
        tree: &mut Tree,
        domain: &Domain,
        substitution: Option<&[String]>,
        config: &Config,
    ) -> Result<NodeId> {
        let lifted = domain
            .lifted(self.lifted())
            .ok_or_else(|| Error::UnknownAtom { name: self.name().to_owned(), position: None })?;
        let kind = if domain.function_index(self.name()).is_some() {
            NodeKind::Function
        } else {
            NodeKind::Predicate
        };
        let mut parameters = Vec::with_capacity(self.slots().len());
        for (slot, &ty) in lifted.params.iter().enumerate() {
            let name = match self.resolve(domain, slot, substitution) {
                Some(name) => name.to_owned(),
                None => self.unresolved(slot, config.unresolved)?,
            };
            let type_name = domain
                .type_(ty)
                .ok_or_else(|| Error::UnknownType { name: format!("#{}", ty.index()) })?
                .name()
                .to_owned();
            parameters.push(Param { name, type_name });
        }
        let id = tree.push(kind, self.name().to_owned(), parameters)?;
        trace!("lowered `{}` as {kind:?} {id}", self.name());
        Ok(id)
    }
}
