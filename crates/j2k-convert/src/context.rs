//! Shared state threaded through every conversion pass.

use j2k_core::{CancelFlag, Diagnostic, NodeId};
use j2k_symbols::SymbolProvider;
use j2k_tree::Tree;
use serde::{Deserialize, Serialize};

/// Host-facing knobs. One explicit struct, passed by value into the context;
/// passes read it, nothing writes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterSettings {
    /// Emit explicit types on local `val`/`var` declarations even when the
    /// initializer determines them.
    pub specify_local_variable_type_by_default: bool,
    /// Same, for properties.
    pub specify_field_type_by_default: bool,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            specify_local_variable_type_by_default: false,
            specify_field_type_by_default: false,
        }
    }
}

pub struct ConversionContext<'r> {
    pub tree: Tree,
    pub symbols: SymbolProvider<'r>,
    pub settings: ConverterSettings,
    pub cancel: CancelFlag,
    diagnostics: Vec<Diagnostic>,
}

impl<'r> ConversionContext<'r> {
    pub fn new(tree: Tree, symbols: SymbolProvider<'r>, settings: ConverterSettings) -> Self {
        Self {
            tree,
            symbols,
            settings,
            cancel: CancelFlag::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Records an untranslatable-construct diagnostic. Never aborts the run.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(
            code = diagnostic.code,
            node = ?diagnostic.node,
            "{}",
            diagnostic.message
        );
        self.diagnostics.push(diagnostic);
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn diagnostics_for(&self, node: NodeId) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.node == Some(node))
    }
}
