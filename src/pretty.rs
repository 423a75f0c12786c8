use crate::config::{Config, UnresolvedPolicy};
use crate::domain::Domain;
use crate::error::Result;
use crate::ground::GroundAtom;
use std::fmt::{self, Display, Formatter, Write};

/// Display adapter resolving names through a [`Domain`]. Unresolved slots
/// print as `?<index>`.
pub struct Pretty<'a, T: ?Sized> {
    pub(crate) t: &'a T,
    pub(crate) domain: &'a Domain,
}

impl Display for Pretty<'_, GroundAtom> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_atom(self.t, f, self.domain, UnresolvedPolicy::Placeholder).map_err(|_| fmt::Error)
    }
}

impl Display for Pretty<'_, [GroundAtom]> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.t.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", Pretty { t: atom, domain: self.domain })?;
        }
        Ok(())
    }
}

fn write_atom<W: Write>(
    atom: &GroundAtom,
    w: &mut W,
    domain: &Domain,
    policy: UnresolvedPolicy,
) -> Result<()> {
    write!(w, "( {}", atom.name())?;
    for slot in 0..atom.slots().len() {
        match atom.resolve(domain, slot, None) {
            Some(name) => write!(w, " {name}")?,
            None => write!(w, " {}", atom.unresolved(slot, policy)?)?,
        }
    }
    write!(w, " )")?;
    Ok(())
}

impl GroundAtom {
    pub fn pretty<'a>(&'a self, domain: &'a Domain) -> Pretty<'a, Self> {
        Pretty { t: self, domain }
    }

    /// Writes `( name arg* )` indented by `indent` levels.
    pub fn write_pddl<W: Write>(
        &self,
        w: &mut W,
        indent: usize,
        domain: &Domain,
        config: &Config,
    ) -> Result<()> {
        write!(w, "{:width$}", "", width = indent * config.indent_width)?;
        write_atom(self, w, domain, config.unresolved)
    }

    pub fn to_pddl(&self, domain: &Domain, config: &Config) -> Result<String> {
        let mut s = String::new();
        self.write_pddl(&mut s, 0, domain, config)?;
        Ok(s)
    }
}

impl<'a> Pretty<'a, [GroundAtom]> {
    pub fn atoms(atoms: &'a [GroundAtom], domain: &'a Domain) -> Self {
        Self { t: atoms, domain }
    }
}
