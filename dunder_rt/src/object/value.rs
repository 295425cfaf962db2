use std::fmt;
use std::sync::Arc;

use dunder_core::{patma, Failure};
use parking_lot::RwLock;

use super::{Function, Method, ObjectRef, Slice, TypeRef, ValueIter};

pub type ListRef = Arc<RwLock<Vec<Value>>>;

/// Representation of any runtime value.
///
/// Immediates are stored inline, everything else is reference counted so
/// cloning a `Value` never copies the underlying object.
#[derive(Clone)]
pub enum Value {
    // primitives
    None,
    Bool(bool),
    Int(i64),
    Float(f64),

    // basic compounds
    Str(Arc<str>),
    Tuple(Arc<[Value]>),
    List(ListRef),
    Slice(Slice),

    // callables
    Function(Function),
    Method(Arc<Method>),

    Iter(ValueIter),

    /// A type descriptor used as a value, i.e. a class object.
    Type(TypeRef),

    /// An instance of a user-defined type.
    Object(ObjectRef),

    /// A failure reified as a value, what `__exit__` receives.
    Error(Arc<Failure>),
}

impl Value {
    pub fn str<S: AsRef<str>>(st: S) -> Self {
        Value::Str(Arc::from(st.as_ref()))
    }

    pub fn tuple<I>(elems: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Tuple(elems.into_iter().collect())
    }

    pub fn list<I>(elems: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::List(Arc::new(RwLock::new(elems.into_iter().collect())))
    }

    /// `start:stop:step`
    pub fn slice(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        Value::Slice(Slice::new(start, stop, step))
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => self.as_int().map(|n| n as f64),
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        patma!(st.as_ref(), Value::Str(st) in self)
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        patma!(*b, Value::Bool(b) in self)
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        patma!(obj, Value::Object(obj) in self)
    }

    #[inline]
    pub fn as_type(&self) -> Option<&TypeRef> {
        patma!(ty, Value::Type(ty) in self)
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Identity comparison, the `is` operator.
    ///
    /// Reference values compare by address. Immediates, strings included,
    /// behave as if they were interned and compare by value.
    pub fn is(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Slice(a), Value::Slice(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => Arc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Method(a), Value::Method(b)) => Arc::ptr_eq(a, b),
            (Value::Iter(a), Value::Iter(b)) => a.ptr_eq(b),
            (Value::Type(a), Value::Type(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Error(a), Value::Error(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The address of a reference value, used for identity hashing.
    pub(crate) fn addr(&self) -> usize {
        match self {
            Value::Tuple(a) => Arc::as_ptr(a) as *const () as usize,
            Value::List(a) => Arc::as_ptr(a) as *const () as usize,
            Value::Function(f) => f.addr(),
            Value::Method(m) => Arc::as_ptr(m) as *const () as usize,
            Value::Iter(it) => it.addr(),
            Value::Type(ty) => Arc::as_ptr(ty) as *const () as usize,
            Value::Object(obj) => Arc::as_ptr(obj) as *const () as usize,
            Value::Error(err) => Arc::as_ptr(err) as *const () as usize,
            Value::Str(st) => st.as_ptr() as usize,
            Value::None | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Slice(_) => 0,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::None
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(st: &str) -> Self {
        Value::str(st)
    }
}

impl From<String> for Value {
    fn from(st: String) -> Self {
        Value::Str(st.into())
    }
}

impl From<Slice> for Value {
    fn from(slice: Slice) -> Self {
        Value::Slice(slice)
    }
}

impl From<TypeRef> for Value {
    fn from(ty: TypeRef) -> Self {
        Value::Type(ty)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

impl From<ValueIter> for Value {
    fn from(it: ValueIter) -> Self {
        Value::Iter(it)
    }
}

impl From<Failure> for Value {
    fn from(failure: Failure) -> Self {
        Value::Error(Arc::new(failure))
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::None, Into::into)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Str(st) => write!(f, "{:?}", st),
            Value::Tuple(elems) => {
                f.write_str("(")?;

                for (n, elem) in elems.iter().enumerate() {
                    if n > 0 {
                        f.write_str(", ")?;
                    }

                    write!(f, "{:?}", elem)?;
                }

                if elems.len() == 1 {
                    f.write_str(",")?;
                }

                f.write_str(")")
            }
            Value::List(elems) => f.debug_list().entries(elems.read().iter()).finish(),
            Value::Slice(slice) => write!(f, "{}", slice),
            Value::Function(func) => write!(f, "<function {}>", func.name()),
            Value::Method(m) => write!(f, "<bound method {} of {:?}>", m.func.name(), m.receiver),
            Value::Iter(_) => f.write_str("<iterator>"),
            Value::Type(ty) => write!(f, "<class '{}'>", ty.name()),
            Value::Object(obj) => write!(f, "<{} object at {:p}>", obj.class().name(), Arc::as_ptr(obj)),
            Value::Error(err) => write!(f, "<error {}>", err),
        }
    }
}
