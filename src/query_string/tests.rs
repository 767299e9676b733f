use super::*;
use crate::mode::{ModeState, Sink};
use crate::value::{Scalar, TypeShape, ValueView};
use indexmap::IndexMap;
use std::any::TypeId;
use std::fmt;

struct Tags(Vec<String>);

impl QueryValue for Tags {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Tags>(TypeShape::Structured {
            fields: &["0"],
            iterable: true,
        })
    }

    fn view(&self) -> ValueView<'_> {
        ValueView::Sequence(Box::new(self.0.iter().map(|t| t as &dyn QueryValue)))
    }
}

struct Empty;

impl QueryValue for Empty {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Empty>(TypeShape::Structured {
            fields: &[],
            iterable: false,
        })
    }

    fn view(&self) -> ValueView<'_> {
        ValueView::Structured(Vec::new())
    }
}

struct Liar;

/// Accepts `budget` bytes of output, then fails every write.
struct Budgeted {
    budget: usize,
}

impl fmt::Write for Budgeted {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.len() > self.budget {
            return Err(fmt::Error);
        }
        self.budget -= s.len();
        Ok(())
    }
}

impl QueryValue for Liar {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Liar>(TypeShape::Dictionary)
    }

    fn view(&self) -> ValueView<'_> {
        ValueView::Scalar(Scalar::Int(1))
    }
}

#[test]
fn test_strategy_priorities() {
    assert_eq!(
        select_strategy(&None::<i32>.descriptor()),
        WriteStrategy::LateBound
    );
    assert_eq!(
        select_strategy(&IndexMap::<String, i32>::new().descriptor()),
        WriteStrategy::Dictionary
    );
    assert_eq!(select_strategy(&5_u8.descriptor()), WriteStrategy::Generic);
    assert_eq!(
        select_strategy(&Vec::<i32>::new().descriptor()),
        WriteStrategy::Generic
    );
}

#[test]
fn test_iterable_struct_uses_generic_writer() {
    let tags = Tags(vec!["a".into(), "b".into()]);
    assert_eq!(select_strategy(&tags.descriptor()), WriteStrategy::Generic);
    let serializer = QueryStringSerializer::new();
    assert_eq!(serializer.serialize_to_string(&tags).unwrap(), "[a,b]");
}

#[test]
fn test_struct_without_members_falls_through() {
    assert_eq!(select_strategy(&Empty.descriptor()), WriteStrategy::Generic);
    let serializer = QueryStringSerializer::new();
    assert_eq!(serializer.serialize_to_string(&Empty).unwrap(), "{}");
}

#[test]
fn test_cache_memoizes_per_type() {
    let serializer = QueryStringSerializer::new();
    let mut map = IndexMap::new();
    map.insert("k", 1);

    serializer.serialize_to_string(&map).unwrap();
    serializer.serialize_to_string(&map).unwrap();

    let cache = serializer.cache();
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.synthesized(), 1);
    assert_eq!(
        cache.strategy_of(TypeId::of::<IndexMap<&'static str, i32>>()),
        Some(WriteStrategy::Dictionary)
    );
}

#[test]
fn test_late_bound_caches_the_runtime_type() {
    let serializer = QueryStringSerializer::new();
    let boxed: Box<dyn QueryValue> = Box::new(vec![1_i64, 2]);
    assert_eq!(serializer.serialize_to_string(&boxed).unwrap(), "[1,2]");

    let cache = serializer.cache();
    assert!(cache.contains(TypeId::of::<Box<dyn QueryValue>>()));
    assert!(cache.contains(TypeId::of::<Vec<i64>>()));
}

#[test]
fn test_writer_given_wrong_shape_errors() {
    let serializer = QueryStringSerializer::new();
    let err = serializer.serialize_to_string(&Liar).unwrap_err();
    assert!(matches!(
        err,
        SerializeError::ShapeMismatch {
            expected: "dictionary",
            found: "scalar"
        }
    ));
}

#[test]
fn test_failed_dictionary_write_restores_mode() {
    let mut map = IndexMap::new();
    map.insert("first", "one");
    map.insert("second", "two words");
    let mut nested = IndexMap::new();
    nested.insert("outer", map.clone());

    // "first=one&second=two%20words": fail inside the first key, inside the
    // second key, and inside the second value.
    for budget in [3, 12, 20] {
        let cache = WriteFnCache::new();
        let mut out = Budgeted { budget };
        let mut sink = Sink::new(&mut out, &cache);

        let err = write_dictionary(&mut sink, &map).unwrap_err();
        assert!(matches!(err, SerializeError::Format(_)), "budget {budget}");
        assert_eq!(sink.mode(), ModeState::default(), "budget {budget}");
    }

    // "outer={first:one,...}": fail inside the nested map.
    let cache = WriteFnCache::new();
    let mut out = Budgeted { budget: 12 };
    let mut sink = Sink::new(&mut out, &cache);
    assert!(write_dictionary(&mut sink, &nested).is_err());
    assert_eq!(sink.mode(), ModeState::default());
}

#[test]
fn test_write_to_custom_sink() {
    let serializer = QueryStringSerializer::new();
    let mut out = String::from("?");
    serializer.write_to(&mut out, &vec![("x", 1)].into_iter().collect::<IndexMap<_, _>>()).unwrap();
    assert_eq!(out, "?x=1");
}
