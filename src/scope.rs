//! Naming context used while resolving builders.
//!
//! A `Scope` holds the names visible at one nesting level, a stash of typed
//! context values, and a borrowed parent. Children are created with
//! [`Scope::new_child`] and only ever write to their own tables.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use gogen_syntax::ast::{AstArena, Ident, Node};
use gogen_syntax::walk::{walk_node, Visitor};

/// Name used when `pick_name` is asked for an empty prefix.
pub const FILLER_NAME: &str = "gogen";

/// Typed key for a stash entry.
///
/// Keys are zero-sized marker types, so two unrelated components can never
/// collide on a string key:
///
/// ```
/// use gogen::scope::{Scope, StashKey};
///
/// struct Indent;
/// impl StashKey for Indent {
///     type Value = usize;
/// }
///
/// let mut root = Scope::root();
/// root.insert_stash::<Indent>(4);
/// let child = root.new_child();
/// assert_eq!(child.lookup_stash::<Indent>(), Some(&4));
/// ```
pub trait StashKey: 'static {
    type Value: 'static;
}

/// What a name in the table stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Taken, with no node attached (fresh names, reserved identifiers).
    Reserved,
    /// Declared for a node of the tree being built.
    Node(Node),
}

#[derive(Default)]
pub struct Scope<'p> {
    names: HashMap<String, Binding>,
    stash: HashMap<TypeId, Box<dyn Any>>,
    parent: Option<&'p Scope<'p>>,
}

impl std::fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("names", &self.names)
            .field("stash_len", &self.stash.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl Scope<'static> {
    /// A scope with no parent.
    pub fn root() -> Self {
        Self::default()
    }
}

impl<'p> Scope<'p> {
    /// Nested scope whose lookups fall back to `self`.
    #[inline]
    pub fn new_child(&self) -> Scope<'_> {
        Scope {
            names: HashMap::new(),
            stash: HashMap::new(),
            parent: Some(self),
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<&Scope<'p>> {
        self.parent
    }

    fn ancestors(&self) -> impl Iterator<Item = &Scope<'p>> {
        std::iter::successors(Some(self), |s| s.parent)
    }

    /// Finds `name` here or in the nearest ancestor that has it.
    pub fn lookup_var(&self, name: &str) -> Option<&Binding> {
        self.ancestors().find_map(|s| s.names.get(name))
    }

    #[inline]
    pub fn is_visible(&self, name: &str) -> bool {
        self.lookup_var(name).is_some()
    }

    /// Binds `name` locally, shadowing any ancestor binding.
    pub fn declare(&mut self, name: impl Into<String>, node: Node) {
        self.names.insert(name.into(), Binding::Node(node));
    }

    /// Marks `name` as taken in this scope.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.names.entry(name.into()).or_insert(Binding::Reserved);
    }

    /// Picks the first of `prefix`, `prefix2`, `prefix3`, ... that is not
    /// visible from here and reserves it locally.
    pub fn pick_name(&mut self, prefix: &str) -> String {
        let prefix = if prefix.is_empty() {
            FILLER_NAME
        } else {
            prefix
        };

        let mut name = prefix.to_owned();
        let mut idx = 2u32;
        while self.is_visible(&name) {
            name = format!("{prefix}{idx}");
            idx += 1;
        }
        tracing::trace!(prefix, %name, "picked fresh name");
        self.names.insert(name.clone(), Binding::Reserved);
        name
    }

    /// Reserves every identifier occurring in `node`, so fresh names picked
    /// afterwards cannot capture or shadow them.
    pub fn reserve_names(&mut self, arena: &AstArena, node: Node) {
        struct Reserver<'s, 'p> {
            scope: &'s mut Scope<'p>,
        }

        impl<'ast> Visitor<'ast> for Reserver<'_, '_> {
            fn visit_ident(&mut self, a: &'ast AstArena, name: Ident) {
                self.scope.reserve(a.name(name));
            }
        }

        walk_node(arena, node, &mut Reserver { scope: self });
    }

    // Stash

    /// Finds the value for `K` here or in the nearest ancestor.
    pub fn lookup_stash<K: StashKey>(&self) -> Option<&K::Value> {
        self.ancestors()
            .find_map(|s| s.stash.get(&TypeId::of::<K>()))
            .and_then(|v| v.downcast_ref::<K::Value>())
    }

    /// Local entry only; ancestors are not consulted.
    pub fn local_stash<K: StashKey>(&self) -> Option<&K::Value> {
        self.stash
            .get(&TypeId::of::<K>())
            .and_then(|v| v.downcast_ref::<K::Value>())
    }

    pub fn stash_mut<K: StashKey>(&mut self) -> Option<&mut K::Value> {
        self.stash
            .get_mut(&TypeId::of::<K>())
            .and_then(|v| v.downcast_mut::<K::Value>())
    }

    /// Sets the local entry for `K`, returning the previous local value.
    pub fn insert_stash<K: StashKey>(&mut self, value: K::Value) -> Option<K::Value> {
        self.stash
            .insert(TypeId::of::<K>(), Box::new(value))
            .and_then(|old| old.downcast::<K::Value>().ok())
            .map(|old| *old)
    }

    pub fn remove_stash<K: StashKey>(&mut self) -> Option<K::Value> {
        self.stash
            .remove(&TypeId::of::<K>())
            .and_then(|old| old.downcast::<K::Value>().ok())
            .map(|old| *old)
    }
}
