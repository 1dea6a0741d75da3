//! Java fields become properties, locals gain `val`/`var`.
//!
//! The `final` modality folds into mutability: `final` means `val`, its
//! absence means `var`. Declared types are omitted where the initializer
//! determines them, unless the corresponding [`ConverterSettings`] knob asks
//! for explicit types.
//!
//! [`ConverterSettings`]: crate::context::ConverterSettings

use j2k_core::NodeId;
use j2k_tree::{InvalidTreeState, NodeKind, VariableDecl};
use j2k_types::Ty;

use crate::context::ConversionContext;
use crate::engine::Conversion;
use crate::expr_ty::expression_ty;
use crate::passes::{collect_nodes, ensure_mutability};

pub struct FieldToPropertyConversion;

impl Conversion for FieldToPropertyConversion {
    fn name(&self) -> &'static str {
        "field-to-property"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        let declarations = collect_nodes(&ctx.tree, root, &|k| {
            matches!(k, NodeKind::JavaField(_) | NodeKind::LocalVariable(_))
        })?;
        for node in declarations {
            match ctx.tree.kind(node).clone() {
                NodeKind::JavaField(decl) => {
                    ensure_mutability(&mut ctx.tree, decl.modifiers)?;
                    if !ctx.settings.specify_field_type_by_default {
                        omit_inferable_type(ctx, &decl)?;
                    }
                    ctx.tree.set_kind(node, NodeKind::Property(decl))?;
                }
                NodeKind::LocalVariable(decl) => {
                    ensure_mutability(&mut ctx.tree, decl.modifiers)?;
                    if !ctx.settings.specify_local_variable_type_by_default {
                        omit_inferable_type(ctx, &decl)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Erases the declared type when the initializer determines it. The type
/// element stays in its slot carrying [`Ty::NoType`], which downstream passes
/// and the printer treat as "no type written".
fn omit_inferable_type(
    ctx: &mut ConversionContext<'_>,
    decl: &VariableDecl,
) -> Result<(), InvalidTreeState> {
    if matches!(ctx.tree.kind(decl.initializer), NodeKind::StubExpression) {
        return Ok(());
    }
    if expression_ty(ctx, decl.initializer) == Ty::NoType {
        return Ok(());
    }
    ctx.tree
        .set_kind(decl.type_element, NodeKind::TypeElement { ty: Ty::NoType })
}
