//! Java types become their Kotlin equivalents.
//!
//! Primitives map to the not-null Kotlin classes, `void` to `Unit`, primitive
//! arrays to the specialized array classes, object arrays to `Array<T>`, and
//! well-known Java classes through the FQN table. Class nullability is left
//! as found (`Default` stays pending until nullability resolution). The
//! mapping is idempotent: Kotlin types map to themselves.

use j2k_core::NodeId;
use j2k_symbols::{SymbolKind, SymbolProvider};
use j2k_tree::{InvalidTreeState, NodeKind};
use j2k_types::mapping::{
    java_to_kotlin_class, primitive_array_fq_name, primitive_fq_name, ARRAY_FQ_NAME, UNIT_FQ_NAME,
};
use j2k_types::{Nullability, Ty};

use crate::context::ConversionContext;
use crate::engine::Conversion;
use crate::passes::collect_nodes;

pub struct TypeMappingConversion;

impl Conversion for TypeMappingConversion {
    fn name(&self) -> &'static str {
        "type-mapping"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        let elements =
            collect_nodes(&ctx.tree, root, &|k| matches!(k, NodeKind::TypeElement { .. }))?;
        for node in elements {
            let NodeKind::TypeElement { ty } = ctx.tree.kind(node).clone() else {
                continue;
            };
            let mapped = map_type(&mut ctx.symbols, &ty);
            if mapped != ty {
                ctx.tree.set_kind(node, NodeKind::TypeElement { ty: mapped })?;
            }
        }
        Ok(())
    }
}

pub fn map_type(symbols: &mut SymbolProvider<'_>, ty: &Ty) -> Ty {
    match ty {
        Ty::Primitive(kind) => {
            let symbol = symbols.resolve_by_name(primitive_fq_name(*kind), SymbolKind::Class);
            Ty::class(symbol, Vec::new(), Nullability::NotNull)
        }
        Ty::Void => {
            let symbol = symbols.resolve_by_name(UNIT_FQ_NAME, SymbolKind::Class);
            Ty::class(symbol, Vec::new(), Nullability::NotNull)
        }
        Ty::Array { elem, nullability } => match elem.as_primitive() {
            Some(kind) => {
                let symbol =
                    symbols.resolve_by_name(primitive_array_fq_name(kind), SymbolKind::Class);
                Ty::class(symbol, Vec::new(), *nullability)
            }
            None => {
                let symbol = symbols.resolve_by_name(ARRAY_FQ_NAME, SymbolKind::Class);
                Ty::class(symbol, vec![map_type(symbols, elem)], *nullability)
            }
        },
        Ty::Class(c) => {
            let args = c.args.iter().map(|a| map_type(symbols, a)).collect();
            let fq_name = symbols.symbol(c.symbol).fq_name.clone();
            match java_to_kotlin_class(&fq_name) {
                Some(kotlin) => {
                    let symbol = symbols.resolve_by_name(kotlin, SymbolKind::Class);
                    Ty::class(symbol, args, c.nullability)
                }
                None => Ty::class(c.symbol, args, c.nullability),
            }
        }
        Ty::UnresolvedClass {
            name,
            args,
            nullability,
        } => Ty::UnresolvedClass {
            name: name.clone(),
            args: args.iter().map(|a| map_type(symbols, a)).collect(),
            nullability: *nullability,
        },
        Ty::Disjunction { parts, nullability } => Ty::Disjunction {
            parts: parts.iter().map(|p| map_type(symbols, p)).collect(),
            nullability: *nullability,
        },
        Ty::StarProjection | Ty::TypeParameter { .. } | Ty::NoType => ty.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use j2k_core::Language;
    use j2k_symbols::StaticResolver;
    use j2k_types::PrimitiveKind;
    use pretty_assertions::assert_eq;

    fn kotlin_resolver() -> StaticResolver {
        let mut resolver = StaticResolver::new();
        for fq in [
            "kotlin.Int",
            "kotlin.Unit",
            "kotlin.IntArray",
            "kotlin.Array",
            "kotlin.String",
            "kotlin.collections.MutableList",
        ] {
            resolver.add_class(Language::Kotlin, fq);
        }
        resolver.add_class(Language::Java, "java.lang.String");
        resolver.add_class(Language::Java, "java.util.List");
        resolver
    }

    #[test]
    fn primitives_map_to_not_null_classes() {
        let resolver = kotlin_resolver();
        let mut symbols = SymbolProvider::new(&resolver);
        let mapped = map_type(&mut symbols, &Ty::Primitive(PrimitiveKind::Int));
        let class = mapped.as_class().unwrap();
        assert_eq!(symbols.symbol(class.symbol).fq_name, "kotlin.Int");
        assert_eq!(class.nullability, Nullability::NotNull);
    }

    #[test]
    fn arrays_specialize_on_primitive_elements() {
        let resolver = kotlin_resolver();
        let mut symbols = SymbolProvider::new(&resolver);

        let ints = Ty::array(Ty::Primitive(PrimitiveKind::Int), Nullability::Default);
        let mapped = map_type(&mut symbols, &ints);
        assert_eq!(
            symbols.symbol(mapped.as_class().unwrap().symbol).fq_name,
            "kotlin.IntArray"
        );

        let string = symbols.resolve_by_name("java.lang.String", SymbolKind::Class);
        let strings = Ty::array(
            Ty::class(string, vec![], Nullability::Default),
            Nullability::Default,
        );
        let mapped = map_type(&mut symbols, &strings);
        let class = mapped.as_class().unwrap();
        assert_eq!(symbols.symbol(class.symbol).fq_name, "kotlin.Array");
        assert_eq!(
            symbols.symbol(class.args[0].as_class().unwrap().symbol).fq_name,
            "kotlin.String"
        );
    }

    #[test]
    fn class_mapping_recurses_into_type_arguments() {
        let resolver = kotlin_resolver();
        let mut symbols = SymbolProvider::new(&resolver);
        let list = symbols.resolve_by_name("java.util.List", SymbolKind::Class);
        let string = symbols.resolve_by_name("java.lang.String", SymbolKind::Class);
        let ty = Ty::class(
            list,
            vec![Ty::class(string, vec![], Nullability::Default)],
            Nullability::Default,
        );

        let mapped = map_type(&mut symbols, &ty);
        let class = mapped.as_class().unwrap();
        assert_eq!(
            symbols.symbol(class.symbol).fq_name,
            "kotlin.collections.MutableList"
        );
        assert_eq!(
            symbols.symbol(class.args[0].as_class().unwrap().symbol).fq_name,
            "kotlin.String"
        );
    }

    #[test]
    fn mapping_is_idempotent_on_kotlin_types() {
        let resolver = kotlin_resolver();
        let mut symbols = SymbolProvider::new(&resolver);
        let string = symbols.resolve_by_name("java.lang.String", SymbolKind::Class);
        let java = Ty::array(
            Ty::class(string, vec![], Nullability::Nullable),
            Nullability::Default,
        );

        let once = map_type(&mut symbols, &java);
        let twice = map_type(&mut symbols, &once);
        assert_eq!(once, twice);

        let ints = map_type(
            &mut symbols,
            &Ty::array(Ty::Primitive(PrimitiveKind::Int), Nullability::Default),
        );
        assert_eq!(map_type(&mut symbols, &ints), ints);
    }
}
