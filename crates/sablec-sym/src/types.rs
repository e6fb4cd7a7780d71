//! Structural types and the interning type store.
//!
//! Every Sable type is a [`Type`] value interned behind `Rc` by the
//! [`TypeStore`]. Equality is structural; the store guarantees one canonical
//! instance per equivalence class, so `Rc::ptr_eq` on store-issued handles
//! is a complete equality test.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use sablec_util::FxHashMap;

/// The built-in primitive types.
///
/// Discriminants are stable; they identify primitives across a compilation
/// and order the kinds for table-driven bootstrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PrimitiveKind {
    Int = 0,
    Float = 1,
    Double = 2,
    Bool = 3,
    Char = 4,
    Void = 5,
}

impl PrimitiveKind {
    /// All primitive kinds, in discriminant order.
    pub const ALL: [PrimitiveKind; 6] = [
        PrimitiveKind::Int,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::Void,
    ];

    /// The source-level identifier of this primitive.
    pub fn identifier(self) -> &'static str {
        match self {
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Void => "void",
        }
    }

    /// Whether implicit numeric conversions apply to this primitive.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int | PrimitiveKind::Float | PrimitiveKind::Double
        )
    }

    /// Resolves a source identifier to a primitive kind.
    pub fn from_identifier(name: &str) -> Option<PrimitiveKind> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.identifier() == name)
    }
}

/// A structural type.
///
/// Obtain instances through [`TypeStore::get_or_intern`]; constructing a
/// `Type` directly is only the first half of interning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    /// A built-in primitive.
    Primitive(PrimitiveKind),

    /// Fixed-size array. `len` is a compile-time constant, strictly
    /// positive.
    Array { elem: Rc<Type>, len: usize },

    /// A named struct with ordered fields. The map preserves declaration
    /// order and gives O(1) name-to-index resolution.
    Struct {
        name: String,
        fields: IndexMap<String, Rc<Type>>,
    },

    /// A function signature.
    Function {
        ret: Rc<Type>,
        params: Vec<Rc<Type>>,
    },

    /// The reified type of a parenthesized comma-separated value group,
    /// before it is known whether the group initializes a struct or an
    /// array.
    ArgList { elems: Vec<Rc<Type>> },
}

impl Type {
    /// Whether implicit numeric conversions apply.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Primitive(kind) if kind.is_numeric())
    }

    /// Whether this is a specific primitive.
    pub fn is_primitive(&self, kind: PrimitiveKind) -> bool {
        matches!(self, Type::Primitive(k) if *k == kind)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function { .. })
    }

    /// Element type of an array, if this is one.
    pub fn elem_type(&self) -> Option<Rc<Type>> {
        match self {
            Type::Array { elem, .. } => Some(Rc::clone(elem)),
            _ => None,
        }
    }

    /// Return type of a function, if this is one.
    pub fn return_type(&self) -> Option<Rc<Type>> {
        match self {
            Type::Function { ret, .. } => Some(Rc::clone(ret)),
            _ => None,
        }
    }

    /// Parameter types of a function, if this is one.
    pub fn param_types(&self) -> Option<&[Rc<Type>]> {
        match self {
            Type::Function { params, .. } => Some(params),
            _ => None,
        }
    }

    /// Type of a struct field, looked up by name.
    pub fn field_type(&self, field: &str) -> Option<Rc<Type>> {
        match self {
            Type::Struct { fields, .. } => fields.get(field).map(Rc::clone),
            _ => None,
        }
    }

    /// Declaration index of a struct field.
    pub fn field_index(&self, field: &str) -> Option<usize> {
        match self {
            Type::Struct { fields, .. } => fields.get_index_of(field),
            _ => None,
        }
    }

    /// The stable string name used to intern and look up this type.
    ///
    /// - primitive / struct: their identifier
    /// - array: `"<elem>[N]"`
    /// - function: `"fn(<p1>,<p2>,...)-><ret>"`
    /// - argument list: `"args(<t1>,<t2>,...)"`
    pub fn mangled_name(&self) -> String {
        match self {
            Type::Primitive(kind) => kind.identifier().to_string(),
            Type::Struct { name, .. } => name.clone(),
            Type::Array { elem, len } => Self::mangle_array(elem, *len),
            Type::Function { ret, params } => Self::mangle_function(ret, params),
            Type::ArgList { elems } => Self::mangle_arg_list(elems),
        }
    }

    /// Mangled name of an array type without building the type.
    pub fn mangle_array(elem: &Rc<Type>, len: usize) -> String {
        format!("{}[{}]", elem.mangled_name(), len)
    }

    /// Mangled name of a function type without building the type.
    pub fn mangle_function(ret: &Rc<Type>, params: &[Rc<Type>]) -> String {
        let params = params
            .iter()
            .map(|p| p.mangled_name())
            .collect::<Vec<_>>()
            .join(",");
        format!("fn({})->{}", params, ret.mangled_name())
    }

    /// Mangled name of an argument-list type without building the type.
    pub fn mangle_arg_list(elems: &[Rc<Type>]) -> String {
        let elems = elems
            .iter()
            .map(|e| e.mangled_name())
            .collect::<Vec<_>>()
            .join(",");
        format!("args({})", elems)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mangled_name())
    }
}

/// The per-compilation interning registry for structural types.
///
/// The store pre-interns the six primitives at construction, so primitive
/// lookup is infallible. All other types are interned on first use.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use sablec_sym::{PrimitiveKind, Type, TypeStore};
///
/// let mut store = TypeStore::new();
/// let int = store.primitive(PrimitiveKind::Int);
///
/// let a = store.get_or_intern(Type::Array { elem: Rc::clone(&int), len: 4 });
/// let b = store.get_or_intern(Type::Array { elem: int, len: 4 });
/// assert!(Rc::ptr_eq(&a, &b));
/// ```
#[derive(Debug)]
pub struct TypeStore {
    /// Canonical instance per mangled name.
    types: FxHashMap<String, Rc<Type>>,
    /// Primitive handles indexed by `PrimitiveKind` discriminant.
    primitives: [Rc<Type>; 6],
}

impl TypeStore {
    /// Creates a store with the six primitives pre-interned.
    pub fn new() -> Self {
        let primitives = PrimitiveKind::ALL.map(|kind| Rc::new(Type::Primitive(kind)));

        let mut types = FxHashMap::default();
        for prim in &primitives {
            types.insert(prim.mangled_name(), Rc::clone(prim));
        }

        Self { types, primitives }
    }

    /// The canonical handle for a primitive type.
    pub fn primitive(&self, kind: PrimitiveKind) -> Rc<Type> {
        Rc::clone(&self.primitives[kind as usize])
    }

    /// Returns the canonical instance for `candidate`, interning it if this
    /// equivalence class has not been seen before.
    pub fn get_or_intern(&mut self, candidate: Type) -> Rc<Type> {
        let key = candidate.mangled_name();

        if let Some(existing) = self.types.get(&key) {
            debug_assert_eq!(**existing, candidate);
            return Rc::clone(existing);
        }

        let canonical = Rc::new(candidate);
        self.types.insert(key, Rc::clone(&canonical));
        canonical
    }

    /// Looks up an already-interned type by its mangled name.
    pub fn lookup(&self, mangled: &str) -> Option<Rc<Type>> {
        self.types.get(mangled).map(Rc::clone)
    }

    /// Number of distinct types interned so far.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(store: &TypeStore) -> Rc<Type> {
        store.primitive(PrimitiveKind::Int)
    }

    #[test]
    fn primitives_are_preinterned() {
        let store = TypeStore::new();
        assert_eq!(store.len(), 6);

        for kind in PrimitiveKind::ALL {
            let prim = store.primitive(kind);
            let looked_up = store.lookup(kind.identifier()).unwrap();
            assert!(Rc::ptr_eq(&prim, &looked_up));
        }
    }

    #[test]
    fn numeric_flags() {
        assert!(PrimitiveKind::Int.is_numeric());
        assert!(PrimitiveKind::Float.is_numeric());
        assert!(PrimitiveKind::Double.is_numeric());
        assert!(!PrimitiveKind::Bool.is_numeric());
        assert!(!PrimitiveKind::Char.is_numeric());
        assert!(!PrimitiveKind::Void.is_numeric());
    }

    #[test]
    fn structurally_equal_types_intern_to_one_instance() {
        let mut store = TypeStore::new();
        let elem = int(&store);

        let a = store.get_or_intern(Type::Array {
            elem: Rc::clone(&elem),
            len: 8,
        });
        let b = store.get_or_intern(Type::Array { elem, len: 8 });

        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn distinct_lengths_are_distinct_types() {
        let mut store = TypeStore::new();
        let elem = int(&store);

        let a = store.get_or_intern(Type::Array {
            elem: Rc::clone(&elem),
            len: 2,
        });
        let b = store.get_or_intern(Type::Array { elem, len: 3 });

        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn function_types_compare_by_signature() {
        let mut store = TypeStore::new();
        let int = int(&store);
        let double = store.primitive(PrimitiveKind::Double);

        let f1 = store.get_or_intern(Type::Function {
            ret: Rc::clone(&int),
            params: vec![Rc::clone(&int), Rc::clone(&double)],
        });
        let f2 = store.get_or_intern(Type::Function {
            ret: Rc::clone(&int),
            params: vec![int, Rc::clone(&double)],
        });
        let f3 = store.get_or_intern(Type::Function {
            ret: Rc::clone(&double),
            params: vec![double],
        });

        assert!(Rc::ptr_eq(&f1, &f2));
        assert!(!Rc::ptr_eq(&f1, &f3));
    }

    #[test]
    fn mangled_names() {
        let mut store = TypeStore::new();
        let int = int(&store);
        let double = store.primitive(PrimitiveKind::Double);

        let arr = store.get_or_intern(Type::Array {
            elem: Rc::clone(&int),
            len: 10,
        });
        assert_eq!(arr.mangled_name(), "int[10]");

        let func = store.get_or_intern(Type::Function {
            ret: Rc::clone(&double),
            params: vec![Rc::clone(&int), double],
        });
        assert_eq!(func.mangled_name(), "fn(int,double)->double");

        let args = store.get_or_intern(Type::ArgList {
            elems: vec![int, store.primitive(PrimitiveKind::Bool)],
        });
        assert_eq!(args.mangled_name(), "args(int,bool)");
    }

    #[test]
    fn struct_field_resolution() {
        let mut store = TypeStore::new();
        let int = int(&store);
        let double = store.primitive(PrimitiveKind::Double);

        let mut fields = IndexMap::new();
        fields.insert("x".to_string(), int);
        fields.insert("y".to_string(), double);

        let point = store.get_or_intern(Type::Struct {
            name: "Point".to_string(),
            fields,
        });

        assert_eq!(point.field_index("x"), Some(0));
        assert_eq!(point.field_index("y"), Some(1));
        assert_eq!(point.field_type("y").unwrap().mangled_name(), "double");
        assert_eq!(point.field_type("z"), None);
    }
}
