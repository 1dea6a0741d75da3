//! Open/final/abstract/override modality.
//!
//! Java classes and methods are open by default, Kotlin's are final; an
//! explicit `final` is therefore dropped, and `open` is added only where the
//! host project actually inherits. Override detection goes through the
//! resolver's override index.

use j2k_core::NodeId;
use j2k_tree::node::Modality;
use j2k_tree::{ClassKind, InvalidTreeState, NodeKind};

use crate::context::ConversionContext;
use crate::engine::Conversion;
use crate::passes::{collect_nodes, find_modality, push_modifier};

pub struct ModalityConversion;

impl Conversion for ModalityConversion {
    fn name(&self) -> &'static str {
        "modality"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        let classes = collect_nodes(&ctx.tree, root, &|k| matches!(k, NodeKind::Class(_)))?;
        for class in classes {
            let NodeKind::Class(decl) = ctx.tree.kind(class).clone() else {
                continue;
            };
            let class_name = identifier_text(ctx, decl.name);
            convert_class(ctx, &decl, &class_name)?;
            for member in &decl.declarations {
                if let NodeKind::JavaMethod(method) = ctx.tree.kind(*member).clone() {
                    let method_name = identifier_text(ctx, method.name);
                    convert_method(ctx, decl.kind, &class_name, &method_name, method.modifiers)?;
                }
            }
        }
        Ok(())
    }
}

fn identifier_text(ctx: &ConversionContext<'_>, name: NodeId) -> String {
    match ctx.tree.kind(name) {
        NodeKind::NameIdentifier { name } => name.to_string(),
        _ => String::new(),
    }
}

fn convert_class(
    ctx: &mut ConversionContext<'_>,
    decl: &j2k_tree::ClassDecl,
    class_name: &str,
) -> Result<(), InvalidTreeState> {
    match find_modality(&ctx.tree, decl.modifiers) {
        Some((node, Modality::Final)) => ctx.tree.detach(node),
        Some(_) => Ok(()),
        None => {
            // Interfaces and enums carry no open/final axis.
            if decl.kind != ClassKind::Class {
                return Ok(());
            }
            let resolver = ctx.symbols.resolver();
            let inherited = resolver
                .resolve_qualified_name(class_name)
                .is_some_and(|ext| resolver.has_inheritors(ext));
            if inherited {
                let open = ctx.tree.modality_modifier(Modality::Open);
                push_modifier(&mut ctx.tree, decl.modifiers, open)?;
            }
            Ok(())
        }
    }
}

fn convert_method(
    ctx: &mut ConversionContext<'_>,
    class_kind: ClassKind,
    class_name: &str,
    method_name: &str,
    modifiers: NodeId,
) -> Result<(), InvalidTreeState> {
    match find_modality(&ctx.tree, modifiers) {
        Some((node, Modality::Final)) => return ctx.tree.detach(node),
        Some((node, Modality::Abstract)) if class_kind == ClassKind::Interface => {
            // Implicit on interface members.
            return ctx.tree.detach(node);
        }
        Some(_) => return Ok(()),
        None => {}
    }
    let resolver = ctx.symbols.resolver();
    let overrides = resolver
        .resolve_qualified_name(&format!("{class_name}.{method_name}"))
        .map(|ext| resolver.overridden_declarations(ext))
        .unwrap_or_default();
    if overrides.is_empty() {
        return Ok(());
    }
    let modifier = ctx.tree.modality_modifier(Modality::Override);
    push_modifier(&mut ctx.tree, modifiers, modifier)
}
