/// What printing and lowering do with a slot that resolves to no name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedPolicy {
    /// Emit `?<index>`. Useful for dumping partially-bound atoms.
    #[default]
    Placeholder,
    /// Return [`Error::UnresolvedSlot`](crate::Error::UnresolvedSlot).
    Fail,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub unresolved: UnresolvedPolicy,
    /// Spaces per indentation level in printed output.
    pub indent_width: usize,
    /// Lowercase identifier tokens while lexing, and names declared in a
    /// [`Domain`](crate::Domain) built with this config.
    pub fold_case: bool,
}

pub const DEFAULT_CONFIG: Config = Config {
    unresolved: UnresolvedPolicy::Placeholder,
    indent_width: 2,
    fold_case: true,
};

impl Default for Config {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}

impl Config {
    pub fn strict() -> Self {
        Self { unresolved: UnresolvedPolicy::Fail, ..DEFAULT_CONFIG }
    }
}
