//! Domain-wide tables: the type hierarchy with its per-type objects and
//! constants, and the lifted predicate/function signatures.
//!
//! Everything is index-addressed. A [`TypeId`] or [`LiftedId`] is only
//! meaningful for the `Domain` that issued it; lookups with a foreign id
//! return `None` rather than panicking.
//!
//! # Index spaces
//! A type's object index space is its own objects followed by the object
//! spaces of its subtypes, recursively, in subtype declaration order.
//! Constants are laid out the same way. For a type with no subtypes this is
//! exactly its own table.

use crate::config::{Config, DEFAULT_CONFIG};
use crate::error::{Error, Result, SymbolKind};
use crate::symbols::SymbolTable;
use log::debug;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AtomKind {
    Predicate,
    Function,
}

/// Back-reference to a [`LiftedAtom`] owned by a [`Domain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LiftedId {
    pub kind: AtomKind,
    pub(crate) index: u32,
}

impl LiftedId {
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone)]
pub struct Type {
    name: String,
    parent: Option<TypeId>,
    subtypes: Vec<TypeId>,
    objects: SymbolTable,
    constants: SymbolTable,
}

impl Type {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn parent(&self) -> Option<TypeId> {
        self.parent
    }
    pub fn subtypes(&self) -> &[TypeId] {
        &self.subtypes
    }
    /// Objects declared directly on this type.
    pub fn objects(&self) -> &SymbolTable {
        &self.objects
    }
    /// Constants declared directly on this type.
    pub fn constants(&self) -> &SymbolTable {
        &self.constants
    }
    fn objects_mut(&mut self) -> &mut SymbolTable {
        &mut self.objects
    }
    fn constants_mut(&mut self) -> &mut SymbolTable {
        &mut self.constants
    }
}

/// A schematic predicate or function: a name and the types of its formal
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiftedAtom {
    pub name: String,
    pub params: Vec<TypeId>,
}

impl LiftedAtom {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

#[derive(Debug, Clone)]
pub struct Domain {
    pub name: String,
    fold_case: bool,
    type_names: SymbolTable,
    types: Vec<Type>,
    predicate_names: SymbolTable,
    predicates: Vec<LiftedAtom>,
    function_names: SymbolTable,
    functions: Vec<LiftedAtom>,
}

/// Narrows a table length to a dense 32-bit id.
pub(crate) fn dense_id(len: usize, what: &'static str) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::CapacityExceeded { what })
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, &DEFAULT_CONFIG)
    }

    /// Declared names are case-folded iff `config.fold_case`, matching what
    /// the tokenizer does to source text.
    pub fn with_config(name: impl Into<String>, config: &Config) -> Self {
        Self {
            name: name.into(),
            fold_case: config.fold_case,
            type_names: SymbolTable::new(),
            types: Vec::new(),
            predicate_names: SymbolTable::new(),
            predicates: Vec::new(),
            function_names: SymbolTable::new(),
            functions: Vec::new(),
        }
    }

    fn fold<'n>(&self, name: &'n str) -> Cow<'n, str> {
        if self.fold_case && name.chars().any(char::is_uppercase) {
            Cow::Owned(name.to_lowercase())
        } else {
            Cow::Borrowed(name)
        }
    }

    /////////////////////// building

    pub fn add_type(&mut self, name: &str, parent: Option<TypeId>) -> Result<TypeId> {
        if let Some(parent) = parent {
            self.check_type(parent)?;
        }
        let name = self.fold(name).into_owned();
        if self.type_names.index(&name).is_some() {
            return Err(Error::DuplicateSymbol { kind: SymbolKind::Type, name });
        }
        let id = TypeId(dense_id(self.types.len(), "types")?);
        self.type_names.insert(&name);
        debug!("declared type `{name}` as {id:?} (parent {parent:?})");
        self.types.push(Type {
            name,
            parent,
            subtypes: Vec::new(),
            objects: SymbolTable::new(),
            constants: SymbolTable::new(),
        });
        if let Some(parent) = parent {
            self.types[parent.index()].subtypes.push(id);
        }
        Ok(id)
    }

    /// Returns the index of the object in `ty`'s own table. Object names are
    /// unique across the whole domain.
    pub fn add_object(&mut self, ty: TypeId, name: &str) -> Result<usize> {
        self.add_named(ty, name, SymbolKind::Object, Type::objects_mut)
    }

    /// Returns the index of the constant in `ty`'s own table. Constant names
    /// are unique across the whole domain.
    pub fn add_constant(&mut self, ty: TypeId, name: &str) -> Result<usize> {
        self.add_named(ty, name, SymbolKind::Constant, Type::constants_mut)
    }

    fn add_named(
        &mut self,
        ty: TypeId,
        name: &str,
        kind: SymbolKind,
        table: fn(&mut Type) -> &mut SymbolTable,
    ) -> Result<usize> {
        self.check_type(ty)?;
        let name = self.fold(name).into_owned();
        if self.types.iter_mut().any(|t| table(t).index(&name).is_some()) {
            return Err(Error::DuplicateSymbol { kind, name });
        }
        let (idx, _) = table(&mut self.types[ty.index()]).insert(&name);
        Ok(idx)
    }

    pub fn add_predicate(&mut self, name: &str, params: &[TypeId]) -> Result<LiftedId> {
        self.add_lifted(AtomKind::Predicate, name, params)
    }

    pub fn add_function(&mut self, name: &str, params: &[TypeId]) -> Result<LiftedId> {
        self.add_lifted(AtomKind::Function, name, params)
    }

    fn add_lifted(&mut self, kind: AtomKind, name: &str, params: &[TypeId]) -> Result<LiftedId> {
        for &ty in params {
            self.check_type(ty)?;
        }
        let name = self.fold(name).into_owned();
        if self.predicate_names.index(&name).is_some() || self.function_names.index(&name).is_some()
        {
            let kind = match kind {
                AtomKind::Predicate => SymbolKind::Predicate,
                AtomKind::Function => SymbolKind::Function,
            };
            return Err(Error::DuplicateSymbol { kind, name });
        }
        let (names, atoms, what) = match kind {
            AtomKind::Predicate => (&mut self.predicate_names, &mut self.predicates, "predicates"),
            AtomKind::Function => (&mut self.function_names, &mut self.functions, "functions"),
        };
        let index = dense_id(atoms.len(), what)?;
        names.insert(&name);
        atoms.push(LiftedAtom { name, params: params.to_vec() });
        Ok(LiftedId { kind, index })
    }

    fn check_type(&self, ty: TypeId) -> Result<()> {
        if ty.index() < self.types.len() {
            Ok(())
        } else {
            Err(Error::UnknownType { name: format!("#{}", ty.0) })
        }
    }

    /////////////////////// lookup

    pub fn types(&self) -> &[Type] {
        &self.types
    }
    pub fn type_(&self, ty: TypeId) -> Option<&Type> {
        self.types.get(ty.index())
    }
    pub fn type_named(&self, name: &str) -> Option<TypeId> {
        let idx = self.type_names.index(&self.fold(name))?;
        Some(TypeId(u32::try_from(idx).ok()?))
    }
    pub fn predicate(&self, name: &str) -> Option<LiftedId> {
        let idx = self.predicate_names.index(&self.fold(name))?;
        Some(LiftedId { kind: AtomKind::Predicate, index: u32::try_from(idx).ok()? })
    }
    pub fn function(&self, name: &str) -> Option<LiftedId> {
        let idx = self.function_names.index(&self.fold(name))?;
        Some(LiftedId { kind: AtomKind::Function, index: u32::try_from(idx).ok()? })
    }
    pub fn function_index(&self, name: &str) -> Option<usize> {
        self.function_names.index(&self.fold(name))
    }
    pub fn lifted(&self, id: LiftedId) -> Option<&LiftedAtom> {
        match id.kind {
            AtomKind::Predicate => self.predicates.get(id.index()),
            AtomKind::Function => self.functions.get(id.index()),
        }
    }
    pub fn predicates(&self) -> &[LiftedAtom] {
        &self.predicates
    }
    pub fn functions(&self) -> &[LiftedAtom] {
        &self.functions
    }

    /////////////////////// index spaces

    pub fn object_name(&self, ty: TypeId, index: usize) -> Option<&str> {
        self.space_name(ty, index, Type::objects)
    }
    pub fn constant_name(&self, ty: TypeId, index: usize) -> Option<&str> {
        self.space_name(ty, index, Type::constants)
    }
    pub fn resolve_object(&self, ty: TypeId, token: &str) -> Option<usize> {
        self.space_index(ty, &self.fold(token), Type::objects)
    }
    pub fn resolve_constant(&self, ty: TypeId, token: &str) -> Option<usize> {
        self.space_index(ty, &self.fold(token), Type::constants)
    }
    pub fn object_count(&self, ty: TypeId) -> usize {
        self.space_len(ty, Type::objects)
    }
    pub fn constant_count(&self, ty: TypeId) -> usize {
        self.space_len(ty, Type::constants)
    }

    fn space_len(&self, ty: TypeId, table: fn(&Type) -> &SymbolTable) -> usize {
        self.type_(ty).map_or(0, |t| {
            table(t).len() + t.subtypes.iter().map(|&sub| self.space_len(sub, table)).sum::<usize>()
        })
    }

    fn space_name(
        &self,
        ty: TypeId,
        index: usize,
        table: fn(&Type) -> &SymbolTable,
    ) -> Option<&str> {
        let t = self.type_(ty)?;
        let own = table(t);
        if index < own.len() {
            return own.get(index);
        }
        let mut rest = index - own.len();
        for &sub in &t.subtypes {
            let len = self.space_len(sub, table);
            if rest < len {
                return self.space_name(sub, rest, table);
            }
            rest -= len;
        }
        None
    }

    fn space_index(
        &self,
        ty: TypeId,
        token: &str,
        table: fn(&Type) -> &SymbolTable,
    ) -> Option<usize> {
        let t = self.type_(ty)?;
        let own = table(t);
        if let Some(idx) = own.index(token) {
            return Some(idx);
        }
        let mut offset = own.len();
        for &sub in &t.subtypes {
            if let Some(idx) = self.space_index(sub, token, table) {
                return Some(offset + idx);
            }
            offset += self.space_len(sub, table);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicles() -> (Domain, [TypeId; 3]) {
        let mut d = Domain::new("logistics");
        let vehicle = d.add_type("vehicle", None).unwrap();
        let truck = d.add_type("truck", Some(vehicle)).unwrap();
        let plane = d.add_type("plane", Some(vehicle)).unwrap();
        d.add_object(vehicle, "cart").unwrap();
        d.add_object(truck, "t1").unwrap();
        d.add_object(truck, "t2").unwrap();
        d.add_object(plane, "p1").unwrap();
        d.add_constant(plane, "airforce-one").unwrap();
        (d, [vehicle, truck, plane])
    }

    #[test]
    fn subtype_objects_follow_own_objects() {
        let (d, [vehicle, truck, plane]) = vehicles();
        assert_eq!(d.object_count(vehicle), 4);
        let names: Vec<_> = (0..4).map(|i| d.object_name(vehicle, i).unwrap()).collect();
        assert_eq!(names, ["cart", "t1", "t2", "p1"]);
        assert_eq!(d.object_name(vehicle, 4), None);
        assert_eq!(d.resolve_object(vehicle, "p1"), Some(3));
        assert_eq!(d.resolve_object(plane, "p1"), Some(0));
        assert_eq!(d.resolve_object(truck, "p1"), None);
    }

    #[test]
    fn constants_are_reachable_from_supertypes() {
        let (d, [vehicle, truck, plane]) = vehicles();
        assert_eq!(d.resolve_constant(vehicle, "airforce-one"), Some(0));
        assert_eq!(d.resolve_constant(plane, "airforce-one"), Some(0));
        assert_eq!(d.resolve_constant(truck, "airforce-one"), None);
        assert_eq!(d.constant_name(vehicle, 0), Some("airforce-one"));
    }

    #[test]
    fn duplicates_are_rejected() {
        let (mut d, [vehicle, ..]) = vehicles();
        assert_eq!(
            d.add_type("truck", None),
            Err(Error::DuplicateSymbol { kind: SymbolKind::Type, name: "truck".into() })
        );
        assert!(matches!(
            d.add_object(vehicle, "cart"),
            Err(Error::DuplicateSymbol { kind: SymbolKind::Object, .. })
        ));
        d.add_predicate("at", &[vehicle]).unwrap();
        assert!(matches!(
            d.add_function("at", &[vehicle]),
            Err(Error::DuplicateSymbol { kind: SymbolKind::Function, .. })
        ));
    }

    #[test]
    fn object_names_are_unique_across_the_hierarchy() {
        let (mut d, [vehicle, truck, plane]) = vehicles();
        assert_eq!(
            d.add_object(truck, "cart"),
            Err(Error::DuplicateSymbol { kind: SymbolKind::Object, name: "cart".into() })
        );
        assert!(d.add_object(vehicle, "t1").is_err());
        assert!(d.add_object(plane, "t2").is_err());
        assert!(d.add_constant(truck, "airforce-one").is_err());
        // objects and constants live in separate namespaces
        assert_eq!(d.add_constant(truck, "cart"), Ok(0));
        assert_eq!(d.object_count(vehicle), 4);
    }

    #[test]
    fn names_fold_like_tokens() {
        let mut d = Domain::new("mixed");
        let block = d.add_type("Block", None).unwrap();
        d.add_object(block, "BlockA").unwrap();
        d.add_predicate("Clear", &[block]).unwrap();
        assert_eq!(d.type_(block).unwrap().name(), "block");
        assert_eq!(d.type_named("BLOCK"), Some(block));
        assert_eq!(d.resolve_object(block, "blocka"), Some(0));
        assert_eq!(d.object_name(block, 0), Some("blocka"));
        assert!(d.predicate("clear").is_some());
        assert!(matches!(d.add_object(block, "blocka"), Err(Error::DuplicateSymbol { .. })));

        let exact = Config { fold_case: false, ..Config::default() };
        let mut d = Domain::with_config("exact", &exact);
        let block = d.add_type("Block", None).unwrap();
        d.add_object(block, "BlockA").unwrap();
        d.add_object(block, "blocka").unwrap();
        assert_eq!(d.resolve_object(block, "BlockA"), Some(0));
        assert_eq!(d.type_named("block"), None);
    }

    #[test]
    fn ids_are_limited_to_32_bits() {
        assert_eq!(dense_id(u32::MAX as usize, "types"), Ok(u32::MAX));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            dense_id(u32::MAX as usize + 1, "types"),
            Err(Error::CapacityExceeded { what: "types" })
        );
    }

    #[test]
    fn foreign_type_ids_are_rejected() {
        let mut d = Domain::new("empty");
        assert!(matches!(d.add_object(TypeId(7), "x"), Err(Error::UnknownType { .. })));
        assert!(matches!(d.add_predicate("p", &[TypeId(0)]), Err(Error::UnknownType { .. })));
        assert_eq!(d.object_name(TypeId(7), 0), None);
    }
}
