//! Core shared types for the j2k conversion pipeline.
//!
//! This crate is intentionally small and dependency-light: id newtypes, names,
//! diagnostics, and the cooperative cancellation flag shared by every other
//! crate in the workspace.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use smol_str::SmolStr;

/// Identifier of a node in the intermediate tree arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Identifier of an interned symbol.
///
/// Symbol identity is id equality: two resolutions of the same external
/// declaration must yield the same `SymbolId`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// Handle to a declaration owned by the external front-end (a pre-existing
/// Java or Kotlin element outside the tree being converted).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExternalId(pub u32);

impl fmt::Debug for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExternalId({})", self.0)
    }
}

/// Source language of an external declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Java,
    Kotlin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A converter diagnostic attached to a tree node.
///
/// These are surfaced by the host as "needs manual review" locations; they
/// never abort a run. Serialize-only: the `code` is a static tag, hosts
/// export diagnostics but never feed them back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub node: Option<NodeId>,
}

impl Diagnostic {
    pub fn warning(code: &'static str, message: impl Into<String>, node: Option<NodeId>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            node,
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>, node: Option<NodeId>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            node,
        }
    }
}

/// Cooperative cancellation flag.
///
/// The engine checks this between passes and between top-level trees, never
/// mid-pass; a cancelled run produces no usable output.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!clone.is_cancelled());
        flag.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn diagnostic_constructors_set_severity() {
        let d = Diagnostic::warning("unsupported-construct", "cannot translate", None);
        assert_eq!(d.severity, Severity::Warning);
        let e = Diagnostic::error("internal", "bad tree", Some(NodeId(3)));
        assert_eq!(e.node, Some(NodeId(3)));
    }
}
