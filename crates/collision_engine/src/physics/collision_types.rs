//! Collision type and reaction registry
//!
//! Collision types are opaque string tags ("ball", "wall", ...) and reactions
//! are the names of notifications an entity wants to receive ("bounce",
//! "hit-by-ball", ...). Both are interned once, when an entity registers, so
//! the per-tick passes only compare and look up small integer handles.

use std::collections::HashMap;

/// Interned collision type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionType(u32);

impl CollisionType {
    /// Raw index of this type in its registry
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Interned reaction name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReactionId(u32);

impl ReactionId {
    /// Raw index of this reaction in its registry
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Default)]
struct Interner {
    names: Vec<String>,
    lookup: HashMap<String, u32>,
}

impl Interner {
    fn intern(&mut self, name: &str) -> u32 {
        if let Some(&index) = self.lookup.get(name) {
            return index;
        }
        let index = u32::try_from(self.names.len()).unwrap_or(u32::MAX);
        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), index);
        index
    }

    fn get(&self, name: &str) -> Option<u32> {
        self.lookup.get(name).copied()
    }

    fn name(&self, index: u32) -> &str {
        self.names.get(index as usize).map_or("<unknown>", String::as_str)
    }
}

/// Registry interning collision type tags and reaction names
#[derive(Debug, Default)]
pub struct CollisionTypeRegistry {
    types: Interner,
    reactions: Interner,
}

impl CollisionTypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a collision type, returning the existing handle if known
    pub fn intern_type(&mut self, name: &str) -> CollisionType {
        CollisionType(self.types.intern(name))
    }

    /// Look up a collision type without interning it
    pub fn lookup_type(&self, name: &str) -> Option<CollisionType> {
        self.types.get(name).map(CollisionType)
    }

    /// Name of a collision type
    pub fn type_name(&self, collision_type: CollisionType) -> &str {
        self.types.name(collision_type.0)
    }

    /// Intern a reaction name, returning the existing handle if known
    pub fn intern_reaction(&mut self, name: &str) -> ReactionId {
        ReactionId(self.reactions.intern(name))
    }

    /// Look up a reaction without interning it
    pub fn lookup_reaction(&self, name: &str) -> Option<ReactionId> {
        self.reactions.get(name).map(ReactionId)
    }

    /// Name of a reaction
    pub fn reaction_name(&self, reaction: ReactionId) -> &str {
        self.reactions.name(reaction.0)
    }

    /// Intern a list of reaction names
    pub fn intern_reactions<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<ReactionId> {
        names.iter().map(|name| self.intern_reaction(name.as_ref())).collect()
    }

    /// Number of distinct collision types
    pub fn type_count(&self) -> usize {
        self.types.names.len()
    }
}
