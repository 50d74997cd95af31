//! Static types supplied by the front end.
//!
//! The engine never infers types. Every expression node may carry the static
//! type the front end attributed to it, and each `SourceUnit` carries a
//! `TypeTable` describing the declared types visible to that unit. Queries
//! here are deliberately simple: nominal subtyping over declared supertypes,
//! no boxing, and no generic inference.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use super::Name;

/// Fully qualified name of the root of the reference hierarchy.
pub const OBJECT: &str = "java.lang.Object";

/// Fully qualified name of the scoped-resource capability.
pub const AUTO_CLOSEABLE: &str = "java.lang.AutoCloseable";

/// Primitive value types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Char => "char",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    pub fn from_keyword(text: &str) -> Option<Self> {
        Some(match text {
            "boolean" => Primitive::Boolean,
            "byte" => Primitive::Byte,
            "short" => Primitive::Short,
            "char" => Primitive::Char,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            _ => return None,
        })
    }
}

/// A static type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Primitive(Primitive),
    /// A declared class or interface, with type arguments if parameterized.
    Class { name: Name, args: Vec<Type> },
    Array(Box<Type>),
    /// A method or class type parameter.
    TypeVar(Name),
    /// The type of the `null` literal.
    Null,
    Void,
    /// The front end could not attribute a type.
    Unknown,
}

impl Type {
    pub fn class(name: &str) -> Self {
        Type::Class {
            name: Name::new(name),
            args: Vec::new(),
        }
    }

    pub fn generic(name: &str, args: Vec<Type>) -> Self {
        Type::Class {
            name: Name::new(name),
            args,
        }
    }

    pub fn int() -> Self {
        Type::Primitive(Primitive::Int)
    }

    /// Parse a type spelled as in a method pattern: a primitive keyword,
    /// `void`, a qualified class name, or any of those followed by `[]`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if let Some(element) = text.strip_suffix("[]") {
            return Type::Array(Box::new(Type::parse(element)));
        }
        if text == "void" {
            return Type::Void;
        }
        match Primitive::from_keyword(text) {
            Some(prim) => Type::Primitive(prim),
            None => Type::class(text),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    /// Reference types: classes, arrays, type variables and `null`.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::Class { .. } | Type::Array(_) | Type::TypeVar(_) | Type::Null
        )
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Type::Unknown)
    }

    /// Whether a type variable occurs anywhere in this type.
    pub fn mentions_type_var(&self) -> bool {
        match self {
            Type::TypeVar(_) => true,
            Type::Class { args, .. } => args.iter().any(Type::mentions_type_var),
            Type::Array(element) => element.mentions_type_var(),
            _ => false,
        }
    }

    pub fn class_name(&self) -> Option<&Name> {
        match self {
            Type::Class { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(prim) => f.write_str(prim.keyword()),
            Type::Class { name, args } => {
                f.write_str(name.simple())?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Type::Array(element) => write!(f, "{element}[]"),
            Type::TypeVar(name) => f.write_str(name),
            Type::Null => f.write_str("null"),
            Type::Void => f.write_str("void"),
            Type::Unknown => f.write_str("var"),
        }
    }
}

/// A resolved method signature.
///
/// Method-call nodes carry the signature the front end resolved them to;
/// class entries in the `TypeTable` list the signatures they declare.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodSig {
    pub declaring_type: Name,
    pub name: Name,
    pub param_types: Vec<Type>,
    pub return_type: Type,
    /// The method declares its own type parameters.
    pub generic: bool,
}

impl MethodSig {
    pub fn new(declaring_type: &str, name: &str, param_types: Vec<Type>, return_type: Type) -> Self {
        MethodSig {
            declaring_type: Name::new(declaring_type),
            name: Name::new(name),
            param_types,
            return_type,
            generic: false,
        }
    }

    #[must_use]
    pub fn generic(mut self) -> Self {
        self.generic = true;
        self
    }

    pub fn arity(&self) -> usize {
        self.param_types.len()
    }
}

/// A declared class or interface.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ClassInfo {
    pub name: Name,
    pub supertypes: Vec<Name>,
    pub methods: Vec<MethodSig>,
}

impl ClassInfo {
    pub fn new(name: &str) -> Self {
        ClassInfo {
            name: Name::new(name),
            supertypes: Vec::new(),
            methods: Vec::new(),
        }
    }

    #[must_use]
    pub fn extends(mut self, supertype: &str) -> Self {
        self.supertypes.push(Name::new(supertype));
        self
    }

    /// Add a method declared by this class. The declaring type is set to
    /// this class regardless of what `sig` says.
    #[must_use]
    pub fn method(mut self, mut sig: MethodSig) -> Self {
        sig.declaring_type = self.name.clone();
        self.methods.push(sig);
        self
    }
}

/// Declared types visible to one compilation unit.
#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    classes: FxHashMap<Name, ClassInfo>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable::default()
    }

    pub fn insert(&mut self, info: ClassInfo) {
        self.classes.insert(info.name.clone(), info);
    }

    #[must_use]
    pub fn with(mut self, info: ClassInfo) -> Self {
        self.insert(info);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(&Name::new(name))
    }

    /// The class and all of its transitive supertypes, nearest first.
    ///
    /// Breadth-first and cycle-safe. Undeclared supertypes are yielded by
    /// name but contribute no further ancestors.
    pub fn lineage(&self, name: &Name) -> Vec<Name> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([name.clone()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(info) = self.classes.get(&current) {
                queue.extend(info.supertypes.iter().cloned());
            }
            order.push(current);
        }
        order
    }

    /// Nominal subtyping. Primitives are subtypes only of themselves; `null`
    /// is a subtype of every reference type; every reference type is a
    /// subtype of `Object`. Type arguments must match exactly when both
    /// sides name the same class.
    pub fn is_subtype(&self, sub: &Type, sup: &Type) -> bool {
        if sub == sup {
            return true;
        }
        match (sub, sup) {
            (Type::Null, sup) => sup.is_reference(),
            (sub, Type::Class { name, .. }) if name == OBJECT && sub.is_reference() => true,
            (
                Type::Class {
                    name: sub_name,
                    args: sub_args,
                },
                Type::Class {
                    name: sup_name,
                    args: sup_args,
                },
            ) => {
                if sub_name == sup_name {
                    return sup_args.is_empty() || sub_args == sup_args;
                }
                sup_args.is_empty() && self.lineage(sub_name).contains(sup_name)
            }
            (Type::Array(sub_elem), Type::Array(sup_elem)) => {
                sub_elem.is_reference() && self.is_subtype(sub_elem, sup_elem)
            }
            _ => false,
        }
    }

    /// Assignment compatibility without boxing or primitive widening.
    pub fn is_assignable(&self, from: &Type, to: &Type) -> bool {
        from.is_known() && to.is_known() && self.is_subtype(from, to)
    }

    /// Whether values of `ty` can own a scoped resource: the type extends
    /// `AutoCloseable`, or it (or a supertype) declares a zero-argument
    /// `close`.
    pub fn is_closeable(&self, ty: &Type) -> bool {
        let Some(name) = ty.class_name() else {
            return false;
        };
        self.lineage(name).iter().any(|ancestor| {
            ancestor == AUTO_CLOSEABLE
                || self.classes.get(ancestor).is_some_and(|info| {
                    info.methods
                        .iter()
                        .any(|m| m.name == "close" && m.param_types.is_empty())
                })
        })
    }

    /// Methods named `method` visible on `owner`, including inherited ones.
    /// An inherited signature hidden by an override with the same
    /// parameter types is reported once (nearest declaration wins).
    pub fn methods_named(&self, owner: &Name, method: &str) -> Vec<&MethodSig> {
        let mut found: Vec<&MethodSig> = Vec::new();
        for ancestor in self.lineage(owner) {
            let Some(info) = self.classes.get(&ancestor) else {
                continue;
            };
            for sig in info.methods.iter().filter(|m| m.name == method) {
                if !found.iter().any(|f| f.param_types == sig.param_types) {
                    found.push(sig);
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests;
