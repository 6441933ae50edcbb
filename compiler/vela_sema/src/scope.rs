//! Lexical scope tree and symbol table.
//!
//! Scopes form a tree rooted at the compilation unit. Each scope maps
//! identifiers to declarations; `insert` reports collisions within the
//! same scope (the original binding is preserved) and `lookup_outer`
//! supports the shadow-warning query.

use rustc_hash::FxHashMap;
use vela_ir::{DeclId, Name};

/// Index of a scope in the [`ScopeTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The compilation-unit root scope.
    pub const ROOT: ScopeId = ScopeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

struct Scope {
    parent: Option<ScopeId>,
    symbols: FxHashMap<Name, DeclId>,
}

/// The scope tree of one compilation unit.
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// Create a tree containing only the root scope.
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope {
                parent: None,
                symbols: FxHashMap::default(),
            }],
        }
    }

    /// Create a child of `parent`.
    pub fn push_child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(parent),
            symbols: FxHashMap::default(),
        });
        id
    }

    /// Insert a binding. On collision the original binding is preserved
    /// and returned as the error value.
    pub fn insert(&mut self, scope: ScopeId, name: Name, decl: DeclId) -> Result<(), DeclId> {
        let symbols = &mut self.scopes[scope.index()].symbols;
        if let Some(&existing) = symbols.get(&name) {
            return Err(existing);
        }
        symbols.insert(name, decl);
        Ok(())
    }

    /// Look up a name in this scope only.
    pub fn lookup_local(&self, scope: ScopeId, name: Name) -> Option<DeclId> {
        self.scopes[scope.index()].symbols.get(&name).copied()
    }

    /// Look up a name in this scope, then each ancestor.
    pub fn lookup(&self, scope: ScopeId, name: Name) -> Option<DeclId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(decl) = self.lookup_local(id, name) {
                return Some(decl);
            }
            current = self.scopes[id.index()].parent;
        }
        None
    }

    /// Look up a name in strictly-outer scopes (for shadow detection).
    pub fn lookup_outer(&self, scope: ScopeId, name: Name) -> Option<DeclId> {
        match self.scopes[scope.index()].parent {
            Some(parent) => self.lookup(parent, name),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: u32) -> Name {
        Name::from_raw(raw)
    }

    fn decl(raw: u32) -> DeclId {
        DeclId::from_raw(raw)
    }

    #[test]
    fn insert_and_lookup() {
        let mut tree = ScopeTree::new();
        assert!(tree.insert(ScopeId::ROOT, name(1), decl(10)).is_ok());
        assert_eq!(tree.lookup(ScopeId::ROOT, name(1)), Some(decl(10)));
        assert_eq!(tree.lookup(ScopeId::ROOT, name(2)), None);
    }

    #[test]
    fn collision_preserves_original() {
        let mut tree = ScopeTree::new();
        assert!(tree.insert(ScopeId::ROOT, name(1), decl(10)).is_ok());
        assert_eq!(tree.insert(ScopeId::ROOT, name(1), decl(11)), Err(decl(10)));
        assert_eq!(tree.lookup(ScopeId::ROOT, name(1)), Some(decl(10)));
    }

    #[test]
    fn lookup_walks_ancestors() {
        let mut tree = ScopeTree::new();
        let child = tree.push_child(ScopeId::ROOT);
        let grandchild = tree.push_child(child);
        assert!(tree.insert(ScopeId::ROOT, name(1), decl(10)).is_ok());
        assert_eq!(tree.lookup(grandchild, name(1)), Some(decl(10)));
        // local lookup does not walk
        assert_eq!(tree.lookup_local(grandchild, name(1)), None);
    }

    #[test]
    fn outer_lookup_for_shadow_detection() {
        let mut tree = ScopeTree::new();
        let child = tree.push_child(ScopeId::ROOT);
        assert!(tree.insert(ScopeId::ROOT, name(1), decl(10)).is_ok());
        assert!(tree.insert(child, name(1), decl(11)).is_ok());
        // the inner binding wins on lookup
        assert_eq!(tree.lookup(child, name(1)), Some(decl(11)));
        // but the outer binding is visible to the shadow query
        assert_eq!(tree.lookup_outer(child, name(1)), Some(decl(10)));
        assert_eq!(tree.lookup_outer(ScopeId::ROOT, name(1)), None);
    }
}
