//! Java-FQN → Kotlin-FQN mapping tables used by the type-mapping pass.

use crate::PrimitiveKind;

pub const ARRAY_FQ_NAME: &str = "kotlin.Array";
pub const UNIT_FQ_NAME: &str = "kotlin.Unit";
pub const ARRAY_OF_NULLS_FQ_NAME: &str = "kotlin.arrayOfNulls";
pub const ARRAY_OF_FQ_NAME: &str = "kotlin.arrayOf";
pub const SYNCHRONIZED_FQ_NAME: &str = "kotlin.synchronized";
pub const INDICES_FQ_NAME: &str = "kotlin.collections.indices";
pub const REVERSED_FQ_NAME: &str = "kotlin.collections.reversed";
pub const UNTIL_FQ_NAME: &str = "kotlin.ranges.until";
pub const RANGE_TO_FQ_NAME: &str = "kotlin.ranges.rangeTo";
pub const DOWN_TO_FQ_NAME: &str = "kotlin.ranges.downTo";

/// Maps a Java class FQN to its Kotlin equivalent, `None` when the class has
/// no dedicated Kotlin counterpart and keeps its Java name.
#[must_use]
pub fn java_to_kotlin_class(fq_name: &str) -> Option<&'static str> {
    Some(match fq_name {
        "java.lang.Object" => "kotlin.Any",
        "java.lang.String" => "kotlin.String",
        "java.lang.CharSequence" => "kotlin.CharSequence",
        "java.lang.Throwable" => "kotlin.Throwable",
        "java.lang.Cloneable" => "kotlin.Cloneable",
        "java.lang.Comparable" => "kotlin.Comparable",
        "java.lang.Enum" => "kotlin.Enum",
        "java.lang.Number" => "kotlin.Number",
        "java.lang.Iterable" => "kotlin.collections.Iterable",
        "java.lang.Boolean" => "kotlin.Boolean",
        "java.lang.Character" => "kotlin.Char",
        "java.lang.Byte" => "kotlin.Byte",
        "java.lang.Short" => "kotlin.Short",
        "java.lang.Integer" => "kotlin.Int",
        "java.lang.Long" => "kotlin.Long",
        "java.lang.Float" => "kotlin.Float",
        "java.lang.Double" => "kotlin.Double",
        "java.util.Iterator" => "kotlin.collections.MutableIterator",
        "java.util.Collection" => "kotlin.collections.MutableCollection",
        "java.util.List" => "kotlin.collections.MutableList",
        "java.util.Set" => "kotlin.collections.MutableSet",
        "java.util.Map" => "kotlin.collections.MutableMap",
        "java.util.Map.Entry" => "kotlin.collections.MutableMap.MutableEntry",
        "java.util.ListIterator" => "kotlin.collections.MutableListIterator",
        _ => return None,
    })
}

/// Kotlin FQN of the boxed equivalent of a primitive, e.g. `kotlin.Int`.
#[must_use]
pub fn primitive_fq_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Boolean => "kotlin.Boolean",
        PrimitiveKind::Char => "kotlin.Char",
        PrimitiveKind::Byte => "kotlin.Byte",
        PrimitiveKind::Short => "kotlin.Short",
        PrimitiveKind::Int => "kotlin.Int",
        PrimitiveKind::Long => "kotlin.Long",
        PrimitiveKind::Float => "kotlin.Float",
        PrimitiveKind::Double => "kotlin.Double",
    }
}

/// Kotlin FQN of the specialized array class, e.g. `kotlin.IntArray`.
#[must_use]
pub fn primitive_array_fq_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Boolean => "kotlin.BooleanArray",
        PrimitiveKind::Char => "kotlin.CharArray",
        PrimitiveKind::Byte => "kotlin.ByteArray",
        PrimitiveKind::Short => "kotlin.ShortArray",
        PrimitiveKind::Int => "kotlin.IntArray",
        PrimitiveKind::Long => "kotlin.LongArray",
        PrimitiveKind::Float => "kotlin.FloatArray",
        PrimitiveKind::Double => "kotlin.DoubleArray",
    }
}

/// Kotlin FQN of the specialized array factory, e.g. `kotlin.intArrayOf`.
#[must_use]
pub fn primitive_array_factory_fq_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Boolean => "kotlin.booleanArrayOf",
        PrimitiveKind::Char => "kotlin.charArrayOf",
        PrimitiveKind::Byte => "kotlin.byteArrayOf",
        PrimitiveKind::Short => "kotlin.shortArrayOf",
        PrimitiveKind::Int => "kotlin.intArrayOf",
        PrimitiveKind::Long => "kotlin.longArrayOf",
        PrimitiveKind::Float => "kotlin.floatArrayOf",
        PrimitiveKind::Double => "kotlin.doubleArrayOf",
    }
}

/// Maps a boxed class FQN (Java or Kotlin) back to its primitive kind, so the
/// implicit-cast pass can see through boxed operands.
#[must_use]
pub fn primitive_by_class_fq_name(fq_name: &str) -> Option<PrimitiveKind> {
    Some(match fq_name {
        "kotlin.Boolean" | "java.lang.Boolean" => PrimitiveKind::Boolean,
        "kotlin.Char" | "java.lang.Character" => PrimitiveKind::Char,
        "kotlin.Byte" | "java.lang.Byte" => PrimitiveKind::Byte,
        "kotlin.Short" | "java.lang.Short" => PrimitiveKind::Short,
        "kotlin.Int" | "java.lang.Integer" => PrimitiveKind::Int,
        "kotlin.Long" | "java.lang.Long" => PrimitiveKind::Long,
        "kotlin.Float" | "java.lang.Float" => PrimitiveKind::Float,
        "kotlin.Double" | "java.lang.Double" => PrimitiveKind::Double,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kotlin_names_are_not_remapped() {
        assert_eq!(java_to_kotlin_class("kotlin.String"), None);
        assert_eq!(java_to_kotlin_class("kotlin.collections.MutableList"), None);
    }

    #[test]
    fn boxed_round_trip() {
        for kind in [
            PrimitiveKind::Boolean,
            PrimitiveKind::Char,
            PrimitiveKind::Byte,
            PrimitiveKind::Short,
            PrimitiveKind::Int,
            PrimitiveKind::Long,
            PrimitiveKind::Float,
            PrimitiveKind::Double,
        ] {
            assert_eq!(primitive_by_class_fq_name(primitive_fq_name(kind)), Some(kind));
        }
    }

    #[test]
    fn java_boxed_types_map_to_kotlin_primitive_classes() {
        assert_eq!(java_to_kotlin_class("java.lang.Integer"), Some("kotlin.Int"));
        assert_eq!(
            java_to_kotlin_class("java.util.List"),
            Some("kotlin.collections.MutableList")
        );
    }
}
