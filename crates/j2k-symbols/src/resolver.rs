//! The seam to the host front-end.
//!
//! The converter never sees Java or Kotlin sources; everything it knows about
//! declarations outside the tree being converted comes through
//! [`ExternalResolver`]. Signatures cross the seam as language-neutral
//! [`TypeRef`]s and are lowered to `Ty` by the symbol provider, because class
//! references in `Ty` must go through symbol interning.

use std::collections::{HashMap, HashSet};

use j2k_core::{ExternalId, Language, NodeId, SmolStr};
use j2k_types::{Nullability, TypeRef};
use serde::{Deserialize, Serialize};

use crate::SymbolKind;

/// An external declaration as the front-end describes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDecl {
    pub kind: SymbolKind,
    pub language: Language,
    pub name: SmolStr,
    pub fq_name: SmolStr,
    /// Field/variable type, or method return type. `None` for classes.
    pub signature: Option<TypeRef>,
}

/// Facade over the host's resolution and analysis facilities.
///
/// Lookups that fail return `None`/empty — the converter degrades to
/// unresolved symbols, it never errors on missing external information.
pub trait ExternalResolver {
    fn lookup(&self, id: ExternalId) -> Option<ExternalDecl>;

    fn resolve_qualified_name(&self, fq_name: &str) -> Option<ExternalId>;

    /// Whether any class in the host project extends or implements `id`.
    /// Drives the open/final decision of the modality conversion.
    fn has_inheritors(&self, id: ExternalId) -> bool;

    /// Declarations the given method overrides, nearest first.
    fn overridden_declarations(&self, id: ExternalId) -> Vec<ExternalId>;

    /// Flow-analysis verdict for a field or variable over the original Java.
    fn variable_nullability(&self, id: ExternalId) -> Nullability {
        let _ = id;
        Nullability::Default
    }

    /// Flow-analysis verdict for a method's return value.
    fn method_nullability(&self, id: ExternalId) -> Nullability {
        let _ = id;
        Nullability::Default
    }

    /// Control-flow fact for a statement of the input tree: `Some(true)` when
    /// execution can run off its end, `Some(false)` when it cannot (returns,
    /// throws, breaks on every path), `None` when the host did not analyze
    /// the node. Drives switch fallthrough merging.
    fn completes_normally(&self, node: NodeId) -> Option<bool> {
        let _ = node;
        None
    }
}

/// In-memory [`ExternalResolver`] backed by plain maps.
///
/// This is what tests and offline hosts use; an IDE host would implement the
/// trait over its own indexes instead.
#[derive(Debug, Default)]
pub struct StaticResolver {
    decls: Vec<ExternalDecl>,
    by_fq_name: HashMap<SmolStr, ExternalId>,
    with_inheritors: HashSet<ExternalId>,
    overrides: HashMap<ExternalId, Vec<ExternalId>>,
    variable_nullability: HashMap<ExternalId, Nullability>,
    method_nullability: HashMap<ExternalId, Nullability>,
    completion: HashMap<NodeId, bool>,
}

impl StaticResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, decl: ExternalDecl) -> ExternalId {
        let id = ExternalId(self.decls.len() as u32);
        self.by_fq_name.insert(decl.fq_name.clone(), id);
        self.decls.push(decl);
        id
    }

    pub fn add_class(&mut self, language: Language, fq_name: &str) -> ExternalId {
        let name = fq_name.rsplit('.').next().unwrap_or(fq_name);
        self.add(ExternalDecl {
            kind: SymbolKind::Class,
            language,
            name: name.into(),
            fq_name: fq_name.into(),
            signature: None,
        })
    }

    pub fn add_method(
        &mut self,
        language: Language,
        fq_name: &str,
        signature: TypeRef,
    ) -> ExternalId {
        let name = fq_name.rsplit('.').next().unwrap_or(fq_name);
        self.add(ExternalDecl {
            kind: SymbolKind::Method,
            language,
            name: name.into(),
            fq_name: fq_name.into(),
            signature: Some(signature),
        })
    }

    pub fn add_field(
        &mut self,
        language: Language,
        fq_name: &str,
        signature: TypeRef,
    ) -> ExternalId {
        let name = fq_name.rsplit('.').next().unwrap_or(fq_name);
        self.add(ExternalDecl {
            kind: SymbolKind::Field,
            language,
            name: name.into(),
            fq_name: fq_name.into(),
            signature: Some(signature),
        })
    }

    pub fn mark_inherited(&mut self, id: ExternalId) {
        self.with_inheritors.insert(id);
    }

    pub fn set_overrides(&mut self, id: ExternalId, overridden: Vec<ExternalId>) {
        self.overrides.insert(id, overridden);
    }

    pub fn set_variable_nullability(&mut self, id: ExternalId, nullability: Nullability) {
        self.variable_nullability.insert(id, nullability);
    }

    pub fn set_method_nullability(&mut self, id: ExternalId, nullability: Nullability) {
        self.method_nullability.insert(id, nullability);
    }

    pub fn set_completes_normally(&mut self, node: NodeId, completes: bool) {
        self.completion.insert(node, completes);
    }
}

impl ExternalResolver for StaticResolver {
    fn lookup(&self, id: ExternalId) -> Option<ExternalDecl> {
        self.decls.get(id.0 as usize).cloned()
    }

    fn resolve_qualified_name(&self, fq_name: &str) -> Option<ExternalId> {
        self.by_fq_name.get(fq_name).copied()
    }

    fn has_inheritors(&self, id: ExternalId) -> bool {
        self.with_inheritors.contains(&id)
    }

    fn overridden_declarations(&self, id: ExternalId) -> Vec<ExternalId> {
        self.overrides.get(&id).cloned().unwrap_or_default()
    }

    fn variable_nullability(&self, id: ExternalId) -> Nullability {
        self.variable_nullability
            .get(&id)
            .copied()
            .unwrap_or(Nullability::Default)
    }

    fn method_nullability(&self, id: ExternalId) -> Nullability {
        self.method_nullability
            .get(&id)
            .copied()
            .unwrap_or(Nullability::Default)
    }

    fn completes_normally(&self, node: NodeId) -> Option<bool> {
        self.completion.get(&node).copied()
    }
}
