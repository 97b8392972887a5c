//! Learned command set with a hash-keyed availability index.

use std::collections::HashSet;

/// A command granted by a skill.
///
/// `code` is the hashed command name the client sends when it uses the command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandRef {
    pub id: u32,
    pub code: u32,
}

impl CommandRef {
    pub const fn new(id: u32, code: u32) -> Self {
        Self { id, code }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandSet {
    commands: Vec<CommandRef>,
    index: HashSet<u32>,
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command unless one with the same id is already present.
    pub fn insert(&mut self, command: CommandRef) -> bool {
        if self.commands.iter().any(|known| known.id == command.id) {
            return false;
        }
        self.commands.push(command);
        self.index.insert(command.code);
        true
    }

    #[inline]
    pub fn contains_code(&self, code: u32) -> bool {
        self.index.contains(&code)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandRef> {
        self.commands.iter()
    }
}
