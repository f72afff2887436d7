//! The closed type lattice (spec.md §3): scalar `Int`/`Real`/`Bool`, and
//! `Array(element)` parametric over a scalar element.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Real,
    Bool,
    Array(Box<Type>),
}

impl Type {
    /// Builds an array type over `element`.
    ///
    /// `element` must be scalar — the lattice is closed at one level of
    /// nesting (spec.md §3: "parametric `Array(element)` where element is
    /// scalar").
    pub fn array(element: Type) -> Type {
        debug_assert!(element.is_scalar(), "array element type must be scalar");
        Type::Array(Box::new(element))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Int | Type::Real | Type::Bool)
    }

    /// The element type of an array, if this is one.
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array(elem) => Some(elem),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Real => write!(f, "float"),
            Type::Bool => write!(f, "bool"),
            Type::Array(elem) => write!(f, "array_{}", elem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_of_int_displays_like_original_type_name() {
        let t = Type::array(Type::Int);
        assert_eq!(t.to_string(), "array_int");
    }

    #[test]
    fn scalars_report_is_scalar() {
        assert!(Type::Int.is_scalar());
        assert!(Type::Real.is_scalar());
        assert!(Type::Bool.is_scalar());
        assert!(!Type::array(Type::Bool).is_scalar());
    }

    #[test]
    fn element_unwraps_array_type() {
        let t = Type::array(Type::Real);
        assert_eq!(t.element(), Some(&Type::Real));
        assert_eq!(Type::Int.element(), None);
    }
}
