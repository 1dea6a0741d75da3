//! The type algebra of the intermediate tree.
//!
//! Types are immutable values: every "update" operation returns a new `Ty`.
//! Nullability is a three-valued axis orthogonal to the type's shape; the
//! `Default` value is a placeholder that must be resolved to a concrete value
//! by the nullability passes before a type reaches the printer.

use j2k_core::{SmolStr, SymbolId};
use serde::{Deserialize, Serialize};

pub mod mapping;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nullability {
    NotNull,
    Nullable,
    /// Not yet decided. Structural equality treats this as distinct from the
    /// concrete values; the terminal nullability pass removes it.
    Default,
}

/// Java primitive kinds, in the fixed widening order used by implicit-cast
/// insertion: `BYTE < SHORT < INT < LONG < FLOAT < DOUBLE`.
///
/// `Boolean` and `Char` take part in no widening.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Position in the widening order, `None` for `boolean`/`char`.
    #[must_use]
    pub fn widening_rank(self) -> Option<u8> {
        match self {
            PrimitiveKind::Byte => Some(0),
            PrimitiveKind::Short => Some(1),
            PrimitiveKind::Int => Some(2),
            PrimitiveKind::Long => Some(3),
            PrimitiveKind::Float => Some(4),
            PrimitiveKind::Double => Some(5),
            PrimitiveKind::Boolean | PrimitiveKind::Char => None,
        }
    }

    /// A widening cast is required only when `target` is strictly higher in
    /// the order than `self`.
    #[must_use]
    pub fn widens_to(self, target: PrimitiveKind) -> bool {
        match (self.widening_rank(), target.widening_rank()) {
            (Some(from), Some(to)) => from < to,
            _ => false,
        }
    }

    /// Short Kotlin name, e.g. `Int`.
    #[must_use]
    pub fn kotlin_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::Int => "Int",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassTy {
    pub symbol: SymbolId,
    pub args: Vec<Ty>,
    pub nullability: Nullability,
}

impl ClassTy {
    #[must_use]
    pub fn new(symbol: SymbolId, args: Vec<Ty>, nullability: Nullability) -> Self {
        Self {
            symbol,
            args,
            nullability,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    Primitive(PrimitiveKind),
    /// Java `void`. Mapped to `kotlin.Unit` by the type-mapping pass.
    Void,
    Class(ClassTy),
    /// Java `T[]`. Mapped to `IntArray`/`Array<T>` by the type-mapping pass.
    Array {
        elem: Box<Ty>,
        nullability: Nullability,
    },
    StarProjection,
    TypeParameter {
        name: SmolStr,
        nullability: Nullability,
    },
    /// A class reference that could not be resolved; carries only text.
    /// Downstream code must treat this as "no semantic info available".
    UnresolvedClass {
        name: SmolStr,
        args: Vec<Ty>,
        nullability: Nullability,
    },
    /// Java multi-catch `A | B`.
    Disjunction {
        parts: Vec<Ty>,
        nullability: Nullability,
    },
    NoType,
}

impl Ty {
    #[must_use]
    pub fn class(symbol: SymbolId, args: Vec<Ty>, nullability: Nullability) -> Self {
        Ty::Class(ClassTy::new(symbol, args, nullability))
    }

    #[must_use]
    pub fn array(elem: Ty, nullability: Nullability) -> Self {
        Ty::Array {
            elem: Box::new(elem),
            nullability,
        }
    }

    #[must_use]
    pub fn nullability(&self) -> Nullability {
        match self {
            Ty::Primitive(_) | Ty::Void | Ty::NoType | Ty::StarProjection => Nullability::NotNull,
            Ty::Class(c) => c.nullability,
            Ty::Array { nullability, .. }
            | Ty::TypeParameter { nullability, .. }
            | Ty::UnresolvedClass { nullability, .. }
            | Ty::Disjunction { nullability, .. } => *nullability,
        }
    }

    #[must_use]
    pub fn as_class(&self) -> Option<&ClassTy> {
        match self {
            Ty::Class(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Ty::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Structural equality that ignores nullability at every position.
    #[must_use]
    pub fn eq_ignoring_nullability(&self, other: &Ty) -> bool {
        match (self, other) {
            (Ty::Primitive(a), Ty::Primitive(b)) => a == b,
            (Ty::Void, Ty::Void) | (Ty::NoType, Ty::NoType) => true,
            (Ty::StarProjection, Ty::StarProjection) => true,
            (Ty::Class(a), Ty::Class(b)) => {
                a.symbol == b.symbol
                    && a.args.len() == b.args.len()
                    && a.args
                        .iter()
                        .zip(&b.args)
                        .all(|(x, y)| x.eq_ignoring_nullability(y))
            }
            (Ty::Array { elem: a, .. }, Ty::Array { elem: b, .. }) => {
                a.eq_ignoring_nullability(b)
            }
            (Ty::TypeParameter { name: a, .. }, Ty::TypeParameter { name: b, .. }) => a == b,
            (
                Ty::UnresolvedClass {
                    name: a, args: xs, ..
                },
                Ty::UnresolvedClass {
                    name: b, args: ys, ..
                },
            ) => {
                a == b
                    && xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(ys)
                        .all(|(x, y)| x.eq_ignoring_nullability(y))
            }
            (Ty::Disjunction { parts: xs, .. }, Ty::Disjunction { parts: ys, .. }) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(ys)
                        .all(|(x, y)| x.eq_ignoring_nullability(y))
            }
            _ => false,
        }
    }

    /// Rebuilds the type bottom-up, letting `transform` replace any position.
    ///
    /// `transform` is tried first on the whole type; if it declines (returns
    /// `None`) the shape is preserved and the transform recurses into class
    /// type arguments, array elements and disjunction parts.
    #[must_use]
    pub fn apply_recursive(&self, transform: &mut impl FnMut(&Ty) -> Option<Ty>) -> Ty {
        if let Some(replaced) = transform(self) {
            return replaced;
        }
        match self {
            Ty::Class(c) => Ty::Class(ClassTy::new(
                c.symbol,
                c.args.iter().map(|a| a.apply_recursive(transform)).collect(),
                c.nullability,
            )),
            Ty::Array { elem, nullability } => {
                Ty::array(elem.apply_recursive(transform), *nullability)
            }
            Ty::UnresolvedClass {
                name,
                args,
                nullability,
            } => Ty::UnresolvedClass {
                name: name.clone(),
                args: args.iter().map(|a| a.apply_recursive(transform)).collect(),
                nullability: *nullability,
            },
            Ty::Disjunction { parts, nullability } => Ty::Disjunction {
                parts: parts
                    .iter()
                    .map(|p| p.apply_recursive(transform))
                    .collect(),
                nullability: *nullability,
            },
            Ty::Primitive(_)
            | Ty::Void
            | Ty::NoType
            | Ty::StarProjection
            | Ty::TypeParameter { .. } => self.clone(),
        }
    }

    /// Returns the type with nullability overridden at the top level only.
    /// Positions with no nullability axis (primitives, `void`, no-type,
    /// star projections) are returned unchanged.
    #[must_use]
    pub fn update_nullability(&self, new: Nullability) -> Ty {
        if self.nullability() == new {
            return self.clone();
        }
        match self {
            Ty::Class(c) => Ty::class(c.symbol, c.args.clone(), new),
            Ty::Array { elem, .. } => Ty::Array {
                elem: elem.clone(),
                nullability: new,
            },
            Ty::TypeParameter { name, .. } => Ty::TypeParameter {
                name: name.clone(),
                nullability: new,
            },
            Ty::UnresolvedClass { name, args, .. } => Ty::UnresolvedClass {
                name: name.clone(),
                args: args.clone(),
                nullability: new,
            },
            Ty::Disjunction { parts, .. } => Ty::Disjunction {
                parts: parts.clone(),
                nullability: new,
            },
            Ty::Primitive(_) | Ty::Void | Ty::NoType | Ty::StarProjection => self.clone(),
        }
    }

    /// Returns the type with nullability overridden through every nested type
    /// argument, array element and disjunction part.
    #[must_use]
    pub fn update_nullability_recursively(&self, new: Nullability) -> Ty {
        self.apply_recursive(&mut |ty| match ty {
            Ty::Class(c) => Some(Ty::class(
                c.symbol,
                c.args
                    .iter()
                    .map(|a| a.update_nullability_recursively(new))
                    .collect(),
                new,
            )),
            Ty::Array { elem, .. } => {
                Some(Ty::array(elem.update_nullability_recursively(new), new))
            }
            Ty::TypeParameter { name, .. } => Some(Ty::TypeParameter {
                name: name.clone(),
                nullability: new,
            }),
            Ty::UnresolvedClass { name, args, .. } => Some(Ty::UnresolvedClass {
                name: name.clone(),
                args: args
                    .iter()
                    .map(|a| a.update_nullability_recursively(new))
                    .collect(),
                nullability: new,
            }),
            _ => None,
        })
    }

    /// Whether any position still carries `Nullability::Default`.
    #[must_use]
    pub fn has_default_nullability(&self) -> bool {
        let mut found = false;
        let _ = self.apply_recursive(&mut |ty| {
            if ty.nullability() == Nullability::Default {
                found = true;
            }
            None
        });
        found
    }
}

/// Language-neutral type description used on the external-resolver seam.
///
/// The front-end cannot build `Ty` values directly (class references must go
/// through the symbol provider), so external declaration signatures are
/// carried as `TypeRef`s and lowered by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    Void,
    Class {
        fq_name: SmolStr,
        args: Vec<TypeRef>,
        nullability: Nullability,
    },
    Array {
        elem: Box<TypeRef>,
        nullability: Nullability,
    },
    TypeParameter {
        name: SmolStr,
        nullability: Nullability,
    },
    Star,
}

impl TypeRef {
    #[must_use]
    pub fn class(fq_name: impl Into<SmolStr>) -> Self {
        TypeRef::Class {
            fq_name: fq_name.into(),
            args: Vec::new(),
            nullability: Nullability::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nested_class_ty() -> Ty {
        // Map<String, List<Int>> with three nested class positions below the root.
        let int = Ty::class(SymbolId(1), vec![], Nullability::Default);
        let list = Ty::class(SymbolId(2), vec![int], Nullability::Default);
        let string = Ty::class(SymbolId(3), vec![], Nullability::Default);
        Ty::class(SymbolId(4), vec![string, list], Nullability::Default)
    }

    fn collect_nullabilities(ty: &Ty) -> Vec<Nullability> {
        let mut out = Vec::new();
        let _ = ty.apply_recursive(&mut |t| {
            out.push(t.nullability());
            None
        });
        out
    }

    #[test]
    fn update_nullability_touches_only_the_outermost_position() {
        let ty = nested_class_ty().update_nullability(Nullability::Nullable);
        let seen = collect_nullabilities(&ty);
        assert_eq!(seen[0], Nullability::Nullable);
        assert!(seen[1..]
            .iter()
            .all(|n| *n == Nullability::Default));
    }

    #[test]
    fn update_nullability_recursively_reaches_every_position() {
        let ty = nested_class_ty().update_nullability_recursively(Nullability::NotNull);
        let seen = collect_nullabilities(&ty);
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|n| *n == Nullability::NotNull));
        assert!(!ty.has_default_nullability());
    }

    #[test]
    fn update_nullability_recursively_covers_array_elements() {
        let ty = Ty::array(
            Ty::array(
                Ty::class(SymbolId(7), vec![], Nullability::Default),
                Nullability::Default,
            ),
            Nullability::Default,
        );
        let updated = ty.update_nullability_recursively(Nullability::Nullable);
        assert!(collect_nullabilities(&updated)
            .iter()
            .all(|n| *n == Nullability::Nullable));
    }

    #[test]
    fn structural_equality_ignores_nullability() {
        let a = nested_class_ty();
        let b = nested_class_ty().update_nullability_recursively(Nullability::Nullable);
        assert!(a.eq_ignoring_nullability(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn type_refs_round_trip_through_json() {
        let ty = TypeRef::Array {
            elem: Box::new(TypeRef::class("java.lang.String")),
            nullability: Nullability::Default,
        };
        let json = serde_json::to_string(&ty).unwrap();
        let back: TypeRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }

    #[test]
    fn widening_order_is_strict() {
        use PrimitiveKind::*;
        assert!(Byte.widens_to(Short));
        assert!(Int.widens_to(Double));
        assert!(!Long.widens_to(Int));
        assert!(!Int.widens_to(Int));
        assert!(!Boolean.widens_to(Int));
        assert!(!Char.widens_to(Int));
    }
}
