//! # Value Model
//!
//! Rust has no runtime reflection, so values that flow through the query-string
//! serializer describe themselves through [`QueryValue`]:
//!
//! - [`QueryValue::descriptor`] gives the runtime type identity (a [`TypeId`]),
//!   a readable type name and the [`TypeShape`] used to pick a write strategy.
//! - [`QueryValue::view`] gives a borrowed structural [`ValueView`] that writers
//!   walk without knowing the concrete type.
//!
//! The shape is a closed set: `Dynamic`, `Dictionary`, `Sequence`,
//! `Structured` and `Scalar`. `Option<T>`, `Box<dyn QueryValue>`,
//! `Arc<dyn QueryValue>` and `serde_json::Value` are `Dynamic`: their actual
//! shape is only known once a value is in hand, so writers re-dispatch on the
//! value they wrap.
//!
//! ## Plain structs
//!
//! ```rust
//! use commandwire::query_value_struct;
//!
//! struct Pet {
//!     name: String,
//!     age: u32,
//!     owner: Option<String>,
//! }
//!
//! query_value_struct!(Pet { name, age, owner });
//!
//! let pet = Pet { name: "Rex".into(), age: 3, owner: None };
//! let encoded = commandwire::query_string::serialize_to_string(&pet).unwrap();
//! assert_eq!(encoded, "name=Rex&age=3");
//! ```

use indexmap::IndexMap;
use std::any::{type_name, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Strategy-relevant shape of a type, decided once per concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    /// Untyped or nullable wrapper whose real shape is only known per value
    Dynamic,
    /// Iterable key/value pairs
    Dictionary,
    /// Ordered items
    Sequence,
    /// Class-like value with named members
    Structured {
        /// Writable member names in declaration order
        fields: &'static [&'static str],
        /// The type also exposes the generic-sequence capability
        iterable: bool,
    },
    /// Primitive rendered as a single token
    Scalar,
}

/// Runtime identity and shape of a [`QueryValue`] implementor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Cache key for memoized write functions
    pub id: TypeId,
    /// Fully qualified type name, for logs and errors
    pub name: &'static str,
    /// Shape used by strategy selection
    pub shape: TypeShape,
}

impl TypeDescriptor {
    /// Describe `T` with the given shape.
    #[must_use]
    pub fn of<T: ?Sized + 'static>(shape: TypeShape) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            shape,
        }
    }
}

/// A single-token value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Float32(f32),
    Char(char),
    Str(&'a str),
}

/// Borrowed items of a sequence view.
pub type Items<'a> = Box<dyn Iterator<Item = &'a dyn QueryValue> + 'a>;

/// Borrowed `(key, value)` pairs of a dictionary view.
pub type Entries<'a> = Box<dyn Iterator<Item = (&'a dyn QueryValue, &'a dyn QueryValue)> + 'a>;

/// Structural view of a value.
pub enum ValueView<'a> {
    /// Absent value (`None`, JSON `null`)
    Null,
    Scalar(Scalar<'a>),
    Sequence(Items<'a>),
    Dictionary(Entries<'a>),
    /// Named members in declaration order
    Structured(Vec<(&'static str, &'a dyn QueryValue)>),
    /// Wrapped value; re-dispatch on its own runtime type
    Dynamic(&'a dyn QueryValue),
}

impl ValueView<'_> {
    /// Short name of the variant, used in shape-mismatch errors.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueView::Null => "null",
            ValueView::Scalar(_) => "scalar",
            ValueView::Sequence(_) => "sequence",
            ValueView::Dictionary(_) => "dictionary",
            ValueView::Structured(_) => "structured",
            ValueView::Dynamic(_) => "dynamic",
        }
    }
}

/// A value the query-string serializer can write.
pub trait QueryValue: Send + Sync + 'static {
    /// Runtime type identity and shape.
    fn descriptor(&self) -> TypeDescriptor;

    /// Structural view of this value.
    fn view(&self) -> ValueView<'_>;
}

/// Follow `Dynamic` views down to the concrete value.
///
/// Returns `None` when the value, or anything it wraps, is null.
#[must_use]
pub fn resolve(value: &dyn QueryValue) -> Option<&dyn QueryValue> {
    let mut current = value;
    loop {
        match current.view() {
            ValueView::Null => return None,
            ValueView::Dynamic(inner) => current = inner,
            _ => return Some(current),
        }
    }
}

macro_rules! scalar_value {
    ($($ty:ty => |$v:ident| $view:expr),* $(,)?) => {$(
        impl QueryValue for $ty {
            fn descriptor(&self) -> TypeDescriptor {
                TypeDescriptor::of::<$ty>(TypeShape::Scalar)
            }

            fn view(&self) -> ValueView<'_> {
                let $v = self;
                ValueView::Scalar($view)
            }
        }
    )*};
}

scalar_value! {
    bool => |v| Scalar::Bool(*v),
    i8 => |v| Scalar::Int(i64::from(*v)),
    i16 => |v| Scalar::Int(i64::from(*v)),
    i32 => |v| Scalar::Int(i64::from(*v)),
    i64 => |v| Scalar::Int(*v),
    isize => |v| Scalar::Int(*v as i64),
    u8 => |v| Scalar::UInt(u64::from(*v)),
    u16 => |v| Scalar::UInt(u64::from(*v)),
    u32 => |v| Scalar::UInt(u64::from(*v)),
    u64 => |v| Scalar::UInt(*v),
    usize => |v| Scalar::UInt(*v as u64),
    f32 => |v| Scalar::Float32(*v),
    f64 => |v| Scalar::Float(*v),
    char => |v| Scalar::Char(*v),
    String => |v| Scalar::Str(v.as_str()),
    &'static str => |v| Scalar::Str(v),
}

impl<T: QueryValue> QueryValue for Option<T> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Option<T>>(TypeShape::Dynamic)
    }

    fn view(&self) -> ValueView<'_> {
        match self {
            Some(inner) => ValueView::Dynamic(inner),
            None => ValueView::Null,
        }
    }
}

impl QueryValue for Box<dyn QueryValue> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Box<dyn QueryValue>>(TypeShape::Dynamic)
    }

    fn view(&self) -> ValueView<'_> {
        ValueView::Dynamic(self.as_ref())
    }
}

impl QueryValue for Arc<dyn QueryValue> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Arc<dyn QueryValue>>(TypeShape::Dynamic)
    }

    fn view(&self) -> ValueView<'_> {
        ValueView::Dynamic(self.as_ref())
    }
}

impl<T: QueryValue> QueryValue for Vec<T> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Vec<T>>(TypeShape::Sequence)
    }

    fn view(&self) -> ValueView<'_> {
        ValueView::Sequence(Box::new(self.iter().map(|item| item as &dyn QueryValue)))
    }
}

impl<K, V, S> QueryValue for IndexMap<K, V, S>
where
    K: QueryValue,
    V: QueryValue,
    S: Send + Sync + 'static,
{
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<IndexMap<K, V, S>>(TypeShape::Dictionary)
    }

    fn view(&self) -> ValueView<'_> {
        ValueView::Dictionary(Box::new(
            self.iter()
                .map(|(k, v)| (k as &dyn QueryValue, v as &dyn QueryValue)),
        ))
    }
}

impl<K, V> QueryValue for BTreeMap<K, V>
where
    K: QueryValue,
    V: QueryValue,
{
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<BTreeMap<K, V>>(TypeShape::Dictionary)
    }

    fn view(&self) -> ValueView<'_> {
        ValueView::Dictionary(Box::new(
            self.iter()
                .map(|(k, v)| (k as &dyn QueryValue, v as &dyn QueryValue)),
        ))
    }
}

impl<K, V, S> QueryValue for HashMap<K, V, S>
where
    K: QueryValue,
    V: QueryValue,
    S: Send + Sync + 'static,
{
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<HashMap<K, V, S>>(TypeShape::Dictionary)
    }

    fn view(&self) -> ValueView<'_> {
        ValueView::Dictionary(Box::new(
            self.iter()
                .map(|(k, v)| (k as &dyn QueryValue, v as &dyn QueryValue)),
        ))
    }
}

impl QueryValue for serde_json::Number {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<serde_json::Number>(TypeShape::Scalar)
    }

    fn view(&self) -> ValueView<'_> {
        let scalar = if let Some(i) = self.as_i64() {
            Scalar::Int(i)
        } else if let Some(u) = self.as_u64() {
            Scalar::UInt(u)
        } else {
            Scalar::Float(self.as_f64().unwrap_or(f64::NAN))
        };
        ValueView::Scalar(scalar)
    }
}

impl QueryValue for serde_json::Map<String, serde_json::Value> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<serde_json::Map<String, serde_json::Value>>(TypeShape::Dictionary)
    }

    fn view(&self) -> ValueView<'_> {
        ValueView::Dictionary(Box::new(
            self.iter()
                .map(|(k, v)| (k as &dyn QueryValue, v as &dyn QueryValue)),
        ))
    }
}

impl QueryValue for serde_json::Value {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<serde_json::Value>(TypeShape::Dynamic)
    }

    fn view(&self) -> ValueView<'_> {
        use serde_json::Value;
        match self {
            Value::Null => ValueView::Null,
            Value::Bool(b) => ValueView::Dynamic(b),
            Value::Number(n) => ValueView::Dynamic(n),
            Value::String(s) => ValueView::Dynamic(s),
            Value::Array(items) => ValueView::Dynamic(items),
            Value::Object(map) => ValueView::Dynamic(map),
        }
    }
}

/// Implement [`QueryValue`] with a `Structured` shape for a plain struct.
///
/// Every listed field must itself implement [`QueryValue`]. Fields are written
/// in the order given here.
#[macro_export]
macro_rules! query_value_struct {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::value::QueryValue for $ty {
            fn descriptor(&self) -> $crate::value::TypeDescriptor {
                $crate::value::TypeDescriptor::of::<$ty>($crate::value::TypeShape::Structured {
                    fields: &[$(stringify!($field)),*],
                    iterable: false,
                })
            }

            fn view(&self) -> $crate::value::ValueView<'_> {
                $crate::value::ValueView::Structured(vec![
                    $((stringify!($field), &self.$field as &dyn $crate::value::QueryValue)),*
                ])
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_unwraps_nested_dynamic() {
        let boxed: Box<dyn QueryValue> = Box::new(Some(7_i32));
        let resolved = resolve(&boxed).map(|v| v.descriptor());
        assert_eq!(resolved, Some(TypeDescriptor::of::<i32>(TypeShape::Scalar)));
    }

    #[test]
    fn test_resolve_none_is_null() {
        let absent: Option<String> = None;
        assert!(resolve(&absent).is_none());
        assert!(resolve(&serde_json::Value::Null).is_none());
    }

    #[test]
    fn test_json_number_views() {
        let n = serde_json::Number::from(-4);
        assert!(matches!(n.view(), ValueView::Scalar(Scalar::Int(-4))));
        let f = serde_json::Number::from_f64(1.5).unwrap();
        assert!(matches!(f.view(), ValueView::Scalar(Scalar::Float(x)) if x == 1.5));
    }

    #[test]
    fn test_distinct_types_have_distinct_ids() {
        let a = Vec::<i32>::new().descriptor();
        let b = Vec::<i64>::new().descriptor();
        assert_ne!(a.id, b.id);
        assert_eq!(a.shape, TypeShape::Sequence);
    }
}
