//! The three-universe symbol model.
//!
//! A symbol names a declaration the tree refers to. Where that declaration
//! lives is its provenance:
//!
//! - **universe** — declared inside the tree being converted; the target is a
//!   tree node and moves with it (see [`SymbolProvider::transfer_symbol`]);
//! - **multiverse** — a pre-existing Java or Kotlin declaration owned by the
//!   front-end, addressed by [`ExternalId`];
//! - **unresolved** — a reference the front-end could not resolve; carries
//!   only its text, and downstream passes treat it as "no semantic info".
//!
//! Symbols are interned: two resolutions of the same declaration yield the
//! same [`SymbolId`], so reference identity is id equality.

use std::collections::HashMap;

use j2k_core::{ExternalId, Language, NodeId, SmolStr, SymbolId};
use j2k_types::{Nullability, Ty, TypeRef};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod resolver;

pub use resolver::{ExternalDecl, ExternalResolver, StaticResolver};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Class,
    Method,
    Field,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provenance {
    Universe { target: NodeId },
    MultiverseJava { target: ExternalId },
    MultiverseKotlin { target: ExternalId },
    Unresolved { text: SmolStr },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: SmolStr,
    pub fq_name: SmolStr,
    pub provenance: Provenance,
}

impl Symbol {
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        matches!(self.provenance, Provenance::Unresolved { .. })
    }

    /// The external declaration behind a multiverse symbol.
    #[must_use]
    pub fn external_target(&self) -> Option<ExternalId> {
        match self.provenance {
            Provenance::MultiverseJava { target } | Provenance::MultiverseKotlin { target } => {
                Some(target)
            }
            _ => None,
        }
    }

    /// The tree node behind a universe symbol.
    #[must_use]
    pub fn node_target(&self) -> Option<NodeId> {
        match self.provenance {
            Provenance::Universe { target } => Some(target),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("symbol {symbol:?} is not a universe symbol and cannot be re-targeted")]
    NotUniverse { symbol: SymbolId },
}

/// Interning store for symbols.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    #[must_use]
    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Memoizing front door for symbol resolution.
///
/// Every resolution path funnels through here so identity holds: per external
/// declaration, per universe node, and per unresolved text, at most one
/// symbol is ever created.
pub struct SymbolProvider<'r> {
    table: SymbolTable,
    resolver: &'r dyn ExternalResolver,
    by_external: HashMap<ExternalId, SymbolId>,
    by_node: HashMap<NodeId, SymbolId>,
    by_unresolved_text: HashMap<(SmolStr, SymbolKind), SymbolId>,
}

impl<'r> SymbolProvider<'r> {
    pub fn new(resolver: &'r dyn ExternalResolver) -> Self {
        Self {
            table: SymbolTable::new(),
            resolver,
            by_external: HashMap::new(),
            by_node: HashMap::new(),
            by_unresolved_text: HashMap::new(),
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &'r dyn ExternalResolver {
        self.resolver
    }

    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        self.table.get(id)
    }

    #[must_use]
    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    /// Resolves an external declaration to its symbol. Memoized: the same
    /// `target` always yields the same id.
    pub fn resolve_direct(&mut self, target: ExternalId) -> SymbolId {
        if let Some(&id) = self.by_external.get(&target) {
            return id;
        }
        let id = match self.resolver.lookup(target) {
            Some(decl) => {
                let provenance = match decl.language {
                    Language::Java => Provenance::MultiverseJava { target },
                    Language::Kotlin => Provenance::MultiverseKotlin { target },
                };
                self.table.intern(Symbol {
                    kind: decl.kind,
                    name: decl.name,
                    fq_name: decl.fq_name,
                    provenance,
                })
            }
            None => {
                debug!(?target, "external declaration lookup failed");
                self.unresolved(SymbolKind::Class, format!("external#{}", target.0))
            }
        };
        self.by_external.insert(target, id);
        id
    }

    /// Resolves a qualified name. Failure is not an error: the result is an
    /// unresolved symbol carrying the reference text.
    pub fn resolve_by_name(&mut self, fq_name: &str, kind: SymbolKind) -> SymbolId {
        match self.resolver.resolve_qualified_name(fq_name) {
            Some(target) => self.resolve_direct(target),
            None => {
                debug!(fq_name, "qualified name did not resolve");
                self.unresolved(kind, fq_name)
            }
        }
    }

    /// Symbol for a declaration inside the tree being converted. Memoized per
    /// node.
    pub fn provide_universe_symbol(
        &mut self,
        target: NodeId,
        kind: SymbolKind,
        name: impl Into<SmolStr>,
    ) -> SymbolId {
        if let Some(&id) = self.by_node.get(&target) {
            return id;
        }
        let name = name.into();
        let id = self.table.intern(Symbol {
            kind,
            fq_name: name.clone(),
            name,
            provenance: Provenance::Universe { target },
        });
        self.by_node.insert(target, id);
        id
    }

    /// Looks up the universe symbol of a node, if one was ever provided.
    #[must_use]
    pub fn universe_symbol_of(&self, target: NodeId) -> Option<SymbolId> {
        self.by_node.get(&target).copied()
    }

    /// Re-points a universe symbol at a new declaration node. Used when a
    /// rewrite replaces a declaration and references must follow (e.g. a
    /// constructor promoted to the primary constructor).
    pub fn transfer_symbol(
        &mut self,
        symbol: SymbolId,
        new_target: NodeId,
    ) -> Result<(), SymbolError> {
        let data = &mut self.table.symbols[symbol.index()];
        let Provenance::Universe { target } = &mut data.provenance else {
            return Err(SymbolError::NotUniverse { symbol });
        };
        let old_target = *target;
        *target = new_target;
        if self.by_node.get(&old_target) == Some(&symbol) {
            self.by_node.remove(&old_target);
        }
        self.by_node.insert(new_target, symbol);
        Ok(())
    }

    fn unresolved(&mut self, kind: SymbolKind, text: impl Into<SmolStr>) -> SymbolId {
        let text = text.into();
        if let Some(&id) = self.by_unresolved_text.get(&(text.clone(), kind)) {
            return id;
        }
        let id = self.table.intern(Symbol {
            kind,
            name: text.clone(),
            fq_name: text.clone(),
            provenance: Provenance::Unresolved { text: text.clone() },
        });
        self.by_unresolved_text.insert((text, kind), id);
        id
    }

    /// Lowers a front-end type description into the type algebra, interning
    /// every class reference on the way.
    pub fn lower_type_ref(&mut self, type_ref: &TypeRef) -> Ty {
        match type_ref {
            TypeRef::Primitive(kind) => Ty::Primitive(*kind),
            TypeRef::Void => Ty::Void,
            TypeRef::Class {
                fq_name,
                args,
                nullability,
            } => {
                let lowered: Vec<Ty> = args.iter().map(|a| self.lower_type_ref(a)).collect();
                let symbol = self.resolve_by_name(fq_name, SymbolKind::Class);
                if self.symbol(symbol).is_unresolved() {
                    Ty::UnresolvedClass {
                        name: fq_name.clone(),
                        args: lowered,
                        nullability: *nullability,
                    }
                } else {
                    Ty::class(symbol, lowered, *nullability)
                }
            }
            TypeRef::Array { elem, nullability } => {
                Ty::array(self.lower_type_ref(elem), *nullability)
            }
            TypeRef::TypeParameter { name, nullability } => Ty::TypeParameter {
                name: name.clone(),
                nullability: *nullability,
            },
            TypeRef::Star => Ty::StarProjection,
        }
    }

    /// The declared type of a multiverse field or method (its return type),
    /// with the resolver's nullability verdict applied at the top level.
    pub fn external_signature_ty(&mut self, symbol: SymbolId) -> Option<Ty> {
        let data = self.symbol(symbol);
        let target = data.external_target()?;
        let kind = data.kind;
        let decl = self.resolver.lookup(target)?;
        let signature = decl.signature?;
        let ty = self.lower_type_ref(&signature);
        let verdict = match kind {
            SymbolKind::Field => self.resolver.variable_nullability(target),
            SymbolKind::Method => self.resolver.method_nullability(target),
            SymbolKind::Class => Nullability::Default,
        };
        Some(if verdict == Nullability::Default {
            ty
        } else {
            ty.update_nullability(verdict)
        })
    }
}

impl std::fmt::Debug for SymbolProvider<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolProvider")
            .field("symbols", &self.table.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolve_direct_is_memoized() {
        let mut resolver = StaticResolver::new();
        let string = resolver.add_class(Language::Java, "java.lang.String");
        let mut provider = SymbolProvider::new(&resolver);

        let a = provider.resolve_direct(string);
        let b = provider.resolve_direct(string);
        assert_eq!(a, b);
        assert_eq!(provider.table().len(), 1);
        assert_eq!(provider.symbol(a).fq_name, "java.lang.String");
        assert!(matches!(
            provider.symbol(a).provenance,
            Provenance::MultiverseJava { .. }
        ));
    }

    #[test]
    fn resolve_by_name_routes_through_the_same_symbol() {
        let mut resolver = StaticResolver::new();
        let list = resolver.add_class(Language::Kotlin, "kotlin.collections.MutableList");
        let mut provider = SymbolProvider::new(&resolver);

        let by_id = provider.resolve_direct(list);
        let by_name = provider.resolve_by_name("kotlin.collections.MutableList", SymbolKind::Class);
        assert_eq!(by_id, by_name);
        assert!(matches!(
            provider.symbol(by_id).provenance,
            Provenance::MultiverseKotlin { .. }
        ));
    }

    #[test]
    fn unresolved_names_are_not_errors() {
        let resolver = StaticResolver::new();
        let mut provider = SymbolProvider::new(&resolver);

        let a = provider.resolve_by_name("com.example.Missing", SymbolKind::Class);
        let b = provider.resolve_by_name("com.example.Missing", SymbolKind::Class);
        assert_eq!(a, b);
        assert!(provider.symbol(a).is_unresolved());
        assert_eq!(provider.symbol(a).name, "com.example.Missing");
    }

    #[test]
    fn transfer_symbol_re_points_a_universe_symbol() {
        let resolver = StaticResolver::new();
        let mut provider = SymbolProvider::new(&resolver);

        let old_node = NodeId(3);
        let new_node = NodeId(9);
        let symbol = provider.provide_universe_symbol(old_node, SymbolKind::Method, "init");
        provider.transfer_symbol(symbol, new_node).unwrap();

        assert_eq!(provider.symbol(symbol).node_target(), Some(new_node));
        assert_eq!(provider.universe_symbol_of(new_node), Some(symbol));
        assert_eq!(provider.universe_symbol_of(old_node), None);

        // Multiverse symbols cannot be re-targeted.
        let mut resolver = StaticResolver::new();
        let string = resolver.add_class(Language::Java, "java.lang.String");
        let mut provider = SymbolProvider::new(&resolver);
        let symbol = provider.resolve_direct(string);
        assert_eq!(
            provider.transfer_symbol(symbol, NodeId(1)),
            Err(SymbolError::NotUniverse { symbol })
        );
    }

    #[test]
    fn lower_type_ref_interns_class_references() {
        let mut resolver = StaticResolver::new();
        resolver.add_class(Language::Java, "java.util.List");
        let mut provider = SymbolProvider::new(&resolver);

        let ty = provider.lower_type_ref(&TypeRef::Class {
            fq_name: "java.util.List".into(),
            args: vec![TypeRef::class("com.example.Missing")],
            nullability: Nullability::Default,
        });
        let class = ty.as_class().unwrap();
        assert_eq!(provider.symbol(class.symbol).fq_name, "java.util.List");
        // The unresolved argument degrades to a textual type.
        assert!(matches!(class.args[0], Ty::UnresolvedClass { .. }));
    }

    #[test]
    fn external_signature_applies_nullability_verdict() {
        let mut resolver = StaticResolver::new();
        resolver.add_class(Language::Java, "java.lang.String");
        let getter = resolver.add_method(
            Language::Java,
            "com.example.Widget.name",
            TypeRef::class("java.lang.String"),
        );
        resolver.set_method_nullability(getter, Nullability::Nullable);
        let mut provider = SymbolProvider::new(&resolver);

        let symbol = provider.resolve_direct(getter);
        let ty = provider.external_signature_ty(symbol).unwrap();
        assert_eq!(ty.nullability(), Nullability::Nullable);
    }
}
