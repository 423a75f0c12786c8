use crate::config::UnresolvedPolicy;
use crate::domain::{Domain, LiftedAtom, LiftedId};
use crate::error::{Error, Result};
use crate::parse::TokenStream;
use crate::symbols::SymbolTable;
use crate::ParamSlot;
use log::{debug, trace};

/// An instance of a lifted predicate or function with every parameter slot
/// bound.
///
/// `slots.len()` always equals the arity of the lifted definition: every
/// constructor checks it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroundAtom {
    name: String,
    lifted: LiftedId,
    slots: Vec<ParamSlot>,
}

/// Finds the lifted definition called `name`, predicates first.
pub fn bind<'d>(domain: &'d Domain, name: &str) -> Result<(LiftedId, &'d LiftedAtom)> {
    domain
        .predicate(name)
        .or_else(|| domain.function(name))
        .and_then(|id| Some((id, domain.lifted(id)?)))
        .ok_or_else(|| Error::UnknownAtom { name: name.to_owned(), position: None })
}

fn check_arity(lifted: &LiftedAtom, found: usize) -> Result<()> {
    if lifted.arity() == found {
        Ok(())
    } else {
        Err(Error::ArityMismatch { name: lifted.name.clone(), expected: lifted.arity(), found })
    }
}

impl GroundAtom {
    /// Binds `name` in `domain` and takes `slots` as its arguments. Object
    /// and constant slots must lie within their type's index space.
    pub fn new(domain: &Domain, name: &str, slots: Vec<ParamSlot>) -> Result<Self> {
        let (lifted, def) = bind(domain, name)?;
        check_arity(def, slots.len())?;
        for (slot, (param, &ty)) in slots.iter().zip(&def.params).enumerate() {
            let in_range = match *param {
                ParamSlot::Variable(_) => true,
                ParamSlot::Object(i) => i < domain.object_count(ty),
                ParamSlot::Constant(c) => c < domain.constant_count(ty),
            };
            if !in_range {
                return Err(Error::UnresolvedSlot { name: name.to_owned(), slot });
            }
        }
        Ok(Self { name: def.name.clone(), lifted, slots })
    }

    /// Copies `other` into `domain`, rebinding by name. Slots are copied
    /// verbatim.
    pub fn from_ground(other: &GroundAtom, domain: &Domain) -> Result<Self> {
        let (lifted, def) = bind(domain, &other.name)?;
        check_arity(def, other.slots.len())?;
        debug!("rebound `{}` from {:?} to {:?}", other.name, other.lifted, lifted);
        Ok(Self { name: other.name.clone(), lifted, slots: other.slots.clone() })
    }

    /// Parses the arguments of `name` followed by the closing parenthesis.
    ///
    /// Each token is tried as a constant of the parameter's type, then as an
    /// object of that type, then as a name in `variables`; the first match
    /// wins.
    pub fn parse(
        domain: &Domain,
        name: &str,
        stream: &mut TokenStream,
        variables: &SymbolTable,
    ) -> Result<Self> {
        let (lifted, def) = bind(domain, name)?;
        let mut slots = Vec::with_capacity(def.arity());
        for &ty in &def.params {
            let position = stream.current_position();
            let type_name = domain.type_(ty).map_or("", |t| t.name());
            let token = match stream.next() {
                Some(token) if token.text != "(" && token.text != ")" => token.text,
                found => {
                    return Err(Error::Syntax {
                        expected: format!("parameter of type {type_name}"),
                        found: found.map(|t| t.text),
                        position,
                    })
                }
            };
            let slot = if let Some(c) = domain.resolve_constant(ty, &token) {
                ParamSlot::Constant(c)
            } else if let Some(o) = domain.resolve_object(ty, &token) {
                ParamSlot::Object(o)
            } else if let Some(v) = variables.index(&token) {
                ParamSlot::Variable(v)
            } else {
                debug!("no binding for `{token}` at {position}");
                return Err(Error::UnresolvedToken {
                    token,
                    expected_type: type_name.to_owned(),
                    position,
                });
            };
            trace!("`{name}` slot {}: `{token}` -> {slot:?}", slots.len());
            slots.push(slot);
        }
        stream.expect(")")?;
        Ok(Self { name: def.name.clone(), lifted, slots })
    }

    /// Parses a whole `( name arg* )` form.
    pub fn parse_atom(
        domain: &Domain,
        stream: &mut TokenStream,
        variables: &SymbolTable,
    ) -> Result<Self> {
        stream.expect("(")?;
        let position = stream.current_position();
        let name = match stream.next() {
            Some(token) if token.text != "(" && token.text != ")" => token.text,
            found => {
                return Err(Error::Syntax {
                    expected: "predicate or function name".to_owned(),
                    found: found.map(|t| t.text),
                    position,
                })
            }
        };
        Self::parse(domain, &name, stream, variables).map_err(|err| match err {
            Error::UnknownAtom { name, position: None } => {
                Error::UnknownAtom { name, position: Some(position) }
            }
            other => other,
        })
    }

    /// Replaces each `Variable(i)` slot by `args[i]`.
    pub fn instantiate(&self, args: &[ParamSlot]) -> Result<Self> {
        let slots = self
            .slots
            .iter()
            .map(|&slot| match slot {
                ParamSlot::Variable(i) => args.get(i).copied().ok_or_else(|| {
                    Error::UnboundVariable { name: self.name.clone(), index: i, bound: args.len() }
                }),
                other => Ok(other),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { name: self.name.clone(), lifted: self.lifted, slots })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn lifted(&self) -> LiftedId {
        self.lifted
    }
    pub fn slots(&self) -> &[ParamSlot] {
        &self.slots
    }
    /// True when no slot refers to an action argument.
    pub fn is_ground(&self) -> bool {
        !self.slots.iter().any(|slot| slot.is_variable())
    }
    /// Action-argument indices referenced by this atom, in slot order.
    pub fn variables(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            ParamSlot::Variable(i) => Some(*i),
            _ => None,
        })
    }

    /// The name slot `slot` stands for, if it has one. Variables resolve
    /// only through `substitution`; objects and constants only through the
    /// type tables.
    pub(crate) fn resolve<'a>(
        &self,
        domain: &'a Domain,
        slot: usize,
        substitution: Option<&'a [String]>,
    ) -> Option<&'a str> {
        let ty = *domain.lifted(self.lifted)?.params.get(slot)?;
        let name = match self.slots.get(slot)? {
            ParamSlot::Variable(v) => substitution?.get(*v).map(String::as_str),
            ParamSlot::Object(o) => domain.object_name(ty, *o),
            ParamSlot::Constant(c) => domain.constant_name(ty, *c),
        };
        name.filter(|n| !n.is_empty())
    }

    /// Stand-in text for a slot [`resolve`](Self::resolve) could not name.
    pub(crate) fn unresolved(&self, slot: usize, policy: UnresolvedPolicy) -> Result<String> {
        match policy {
            UnresolvedPolicy::Fail => Err(Error::UnresolvedSlot { name: self.name.clone(), slot }),
            UnresolvedPolicy::Placeholder => {
                let raw = self.slots.get(slot).map_or(0, |s| s.encode());
                debug!("slot {slot} of `{}` is unresolved, printing ?{raw}", self.name);
                Ok(format!("?{raw}"))
            }
        }
    }
}
