use std::fmt;

/// Identifier for a state, stable for the lifetime of the [`StateSymbolTable`] that allocated
/// it. States are compared and hashed by this id alone; a name is purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) u32);

impl StateId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Symbol table allocating fresh [`StateId`]s and optionally associating a printable name
/// with each.
#[derive(Debug, Clone, Default)]
pub struct StateSymbolTable {
    names: Vec<Option<String>>,
}

impl StateSymbolTable {
    /// Allocates a fresh, unnamed state.
    pub fn insert(&mut self) -> StateId {
        let id = self.names.len() as u32;
        self.names.push(None);
        StateId(id)
    }

    /// Allocates a fresh state with the given name.
    pub fn insert_named(&mut self, name: impl Into<String>) -> StateId {
        let id = self.names.len() as u32;
        self.names.push(Some(name.into()));
        StateId(id)
    }

    pub fn name(&self, id: StateId) -> Option<&str> {
        self.names.get(id.0 as usize).and_then(|n| n.as_deref())
    }

    pub fn set_name(&mut self, id: StateId, name: impl Into<String>) {
        if let Some(slot) = self.names.get_mut(id.0 as usize) {
            *slot = Some(name.into());
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
