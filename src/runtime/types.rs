//! Type descriptors and the traits that attach them to Rust types.
//!
//! A [`TypeDescriptor`] is the static description of one parameter or return
//! slot. Rust has no runtime reflection, so descriptors come from the
//! [`Param`] and [`IntoValue`] impls of the types a callable mentions; the
//! handler adapter collects them into a [`Signature`] once per callable.

use std::{fmt, fmt::Display};

use crate::runtime::value::{Map, Value};

/// Custom conversion hook: turns a raw value into the canonical value of the
/// target type, or explains why it cannot.
pub type Converter = fn(&Value) -> Result<Value, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl IntKind {
    /// Inclusive range of values representable both by the target type and by
    /// [`Value::Int`].
    pub fn range(self) -> (i64, i64) {
        match self {
            IntKind::I8 => (i8::MIN.into(), i8::MAX.into()),
            IntKind::I16 => (i16::MIN.into(), i16::MAX.into()),
            IntKind::I32 => (i32::MIN.into(), i32::MAX.into()),
            IntKind::I64 => (i64::MIN, i64::MAX),
            IntKind::Isize => (
                i64::try_from(isize::MIN).unwrap_or(i64::MIN),
                i64::try_from(isize::MAX).unwrap_or(i64::MAX),
            ),
            IntKind::U8 => (0, u8::MAX.into()),
            IntKind::U16 => (0, u16::MAX.into()),
            IntKind::U32 => (0, u32::MAX.into()),
            IntKind::U64 => (0, i64::MAX),
            IntKind::Usize => (0, i64::try_from(usize::MAX).unwrap_or(i64::MAX)),
        }
    }

    pub fn contains(self, value: i64) -> bool {
        let (min, max) = self.range();
        (min..=max).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

/// Shape of a type as far as coercion is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int(IntKind),
    Float(FloatKind),
    String,
    Sequence,
    Mapping,
    /// Accepts any value unchanged.
    Dynamic,
    /// Error-carrying return slot.
    Error,
}

/// Static description of an expected parameter or return type.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    name: &'static str,
    kind: Kind,
    converter: Option<Converter>,
}

impl TypeDescriptor {
    pub const fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            converter: None,
        }
    }

    /// Descriptor of the trailing error slot of a fallible callable.
    pub const fn error() -> Self {
        Self::new("Error", Kind::Error)
    }

    /// Attaches the custom-converter capability.
    ///
    /// `kind` then describes the representation the converter produces: its
    /// output must [`conform`](Self::conforms) to this descriptor.
    pub const fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn converter(&self) -> Option<Converter> {
        self.converter
    }

    pub fn has_converter(&self) -> bool {
        self.converter.is_some()
    }

    /// Whether this slot follows the trailing-error convention.
    pub fn is_fallible(&self) -> bool {
        self.kind == Kind::Error
    }

    /// Returns whether `value` already has exactly the representation this
    /// type expects.
    pub fn conforms(&self, value: &Value) -> bool {
        match (self.kind, value) {
            (Kind::Dynamic, _) => true,
            (Kind::Null, Value::Null) => true,
            (Kind::Bool, Value::Bool(_)) => true,
            (Kind::Int(int), Value::Int(v)) => int.contains(*v),
            (Kind::Float(FloatKind::F64), Value::Float(_)) => true,
            (Kind::Float(FloatKind::F32), Value::Float(v)) => {
                !v.is_finite() || v.abs() <= f64::from(f32::MAX)
            }
            (Kind::String, Value::String(_)) => true,
            (Kind::Sequence, Value::Array(_)) => true,
            (Kind::Mapping, Value::Map(_)) => true,
            (Kind::Error, Value::Null | Value::String(_)) => true,
            _ => false,
        }
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.converter.is_some() == other.converter.is_some()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.converter.is_some() {
            write!(f, "TypeDescriptor({}, {:?}, custom)", self.name, self.kind)
        } else {
            write!(f, "TypeDescriptor({}, {:?})", self.name, self.kind)
        }
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Ordered parameter and return descriptors of a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    params: Vec<TypeDescriptor>,
    returns: Vec<TypeDescriptor>,
}

impl Signature {
    pub fn new(params: Vec<TypeDescriptor>, returns: Vec<TypeDescriptor>) -> Self {
        Self { params, returns }
    }

    pub fn params(&self) -> &[TypeDescriptor] {
        &self.params
    }

    pub fn returns(&self) -> &[TypeDescriptor] {
        &self.returns
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Whether the last declared return slot carries an error.
    pub fn is_fallible(&self) -> bool {
        self.returns.last().is_some_and(TypeDescriptor::is_fallible)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(|p| p.name()).collect();
        write!(f, "fn({})", params.join(", "))?;
        match self.returns.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " -> {}", single),
            many => {
                let names: Vec<&str> = many.iter().map(|r| r.name()).collect();
                write!(f, " -> ({})", names.join(", "))
            }
        }
    }
}

/// A type that can appear as a callable parameter.
///
/// `from_value` only ever sees values that already
/// [`conform`](TypeDescriptor::conforms) to `descriptor()`; coercion happens
/// before it. Types with their own conversion rules attach a converter to
/// their descriptor.
pub trait Param: Sized {
    fn descriptor() -> TypeDescriptor;

    fn from_value(value: Value) -> Option<Self>;
}

/// A type that can appear as a single return slot.
pub trait IntoValue {
    fn descriptor() -> TypeDescriptor;

    fn into_value(self) -> Value;
}

/// The full return shape of a callable.
pub trait Returns {
    fn descriptors() -> Vec<TypeDescriptor>;

    /// Lowers the returned data to one value per declared slot.
    fn into_raw(self) -> Vec<Value>;
}

macro_rules! int_types {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Param for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::new(stringify!($ty), Kind::Int(IntKind::$kind))
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }

            impl IntoValue for $ty {
                fn descriptor() -> TypeDescriptor {
                    <$ty as Param>::descriptor()
                }

                #[allow(irrefutable_let_patterns)]
                fn into_value(self) -> Value {
                    // Only u64/usize can exceed i64; those degrade to floats.
                    if let Ok(v) = i64::try_from(self) {
                        Value::Int(v)
                    } else {
                        Value::Float(self as f64)
                    }
                }
            }
        )*
    };
}

int_types! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

impl Param for f64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("f64", Kind::Float(FloatKind::F64))
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_f64()
    }
}

impl IntoValue for f64 {
    fn descriptor() -> TypeDescriptor {
        <f64 as Param>::descriptor()
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl Param for f32 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("f32", Kind::Float(FloatKind::F32))
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_f64().map(|v| v as f32)
    }
}

impl IntoValue for f32 {
    fn descriptor() -> TypeDescriptor {
        <f32 as Param>::descriptor()
    }

    fn into_value(self) -> Value {
        Value::Float(self.into())
    }
}

impl Param for bool {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("bool", Kind::Bool)
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl IntoValue for bool {
    fn descriptor() -> TypeDescriptor {
        <bool as Param>::descriptor()
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl Param for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("String", Kind::String)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(v) => Some(v),
            _ => None,
        }
    }
}

impl IntoValue for String {
    fn descriptor() -> TypeDescriptor {
        <String as Param>::descriptor()
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl Param for Vec<Value> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("Vec<Value>", Kind::Sequence)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }
}

impl IntoValue for Vec<Value> {
    fn descriptor() -> TypeDescriptor {
        <Vec<Value> as Param>::descriptor()
    }

    fn into_value(self) -> Value {
        Value::Array(self)
    }
}

impl Param for Map {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("Map", Kind::Mapping)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }
}

impl IntoValue for Map {
    fn descriptor() -> TypeDescriptor {
        <Map as Param>::descriptor()
    }

    fn into_value(self) -> Value {
        Value::Map(self)
    }
}

impl Param for Value {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("Value", Kind::Dynamic)
    }

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl IntoValue for Value {
    fn descriptor() -> TypeDescriptor {
        <Value as Param>::descriptor()
    }

    fn into_value(self) -> Value {
        self
    }
}

impl Returns for () {
    fn descriptors() -> Vec<TypeDescriptor> {
        Vec::new()
    }

    fn into_raw(self) -> Vec<Value> {
        Vec::new()
    }
}

macro_rules! single_returns {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Returns for $ty {
                fn descriptors() -> Vec<TypeDescriptor> {
                    vec![<$ty as IntoValue>::descriptor()]
                }

                fn into_raw(self) -> Vec<Value> {
                    vec![self.into_value()]
                }
            }
        )*
    };
}

single_returns!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, Vec<Value>, Map,
    Value,
);

macro_rules! tuple_returns {
    ($($name:ident),+) => {
        impl<$($name: IntoValue),+> Returns for ($($name,)+) {
            fn descriptors() -> Vec<TypeDescriptor> {
                vec![$($name::descriptor()),+]
            }

            #[allow(non_snake_case)]
            fn into_raw(self) -> Vec<Value> {
                let ($($name,)+) = self;
                vec![$($name.into_value()),+]
            }
        }
    };
}

tuple_returns!(A, B);
tuple_returns!(A, B, C);
tuple_returns!(A, B, C, D);

impl<R: Returns, E: Display> Returns for Result<R, E> {
    fn descriptors() -> Vec<TypeDescriptor> {
        let mut descriptors = R::descriptors();
        descriptors.push(TypeDescriptor::error());
        descriptors
    }

    fn into_raw(self) -> Vec<Value> {
        match self {
            Ok(values) => {
                let mut raw = values.into_raw();
                raw.push(Value::Null);
                raw
            }
            Err(err) => {
                let mut raw = vec![Value::Null; R::descriptors().len()];
                raw.push(Value::String(err.to_string()));
                raw
            }
        }
    }
}
