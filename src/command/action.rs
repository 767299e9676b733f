//! Typed actions and the per-controller registration table.
//!
//! An action is any `Fn(&C, A1, ..., An) -> R` where every argument type
//! implements [`FromLiteral`] and `R` is an [`ActionOutcome`]. Methods work
//! directly:
//!
//! ```rust
//! use commandwire::command::{ActionTable, Controller};
//!
//! struct Greeter;
//!
//! impl Greeter {
//!     fn hello(&self, name: String) {
//!         println!("hello {name}");
//!     }
//! }
//!
//! impl Controller for Greeter {
//!     fn register_actions(actions: &mut ActionTable<Self>) {
//!         actions.action("Hello", Greeter::hello);
//!     }
//! }
//! ```

use super::error::BoxError;
use crate::literal::{FromLiteral, LiteralError};
use serde::Serialize;
use std::any::type_name;
use std::sync::Arc;

/// Name, arity and parameter types of a registered action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSignature {
    pub name: String,
    pub arity: usize,
    pub parameter_types: Vec<&'static str>,
}

/// Why a bound action did not complete.
#[derive(Debug)]
pub enum ActionError {
    /// Argument `index` could not be converted to its parameter type
    Conversion { index: usize, source: LiteralError },
    /// The action body returned an error
    Failed(BoxError),
}

/// Return types an action may have. The success value is discarded.
pub trait ActionOutcome {
    fn into_outcome(self) -> Result<(), BoxError>;
}

impl ActionOutcome for () {
    fn into_outcome(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<T, E> ActionOutcome for Result<T, E>
where
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<(), BoxError> {
        self.map(|_| ()).map_err(Into::into)
    }
}

/// A callable bound to controller type `C` taking the argument tuple `Args`.
pub trait Action<C, Args>: Send + Sync + 'static {
    const ARITY: usize;

    fn parameter_types() -> Vec<&'static str>;

    /// Convert `arguments` and run the action. `arguments.len()` equals `ARITY`.
    fn call(&self, controller: &C, arguments: &[String]) -> Result<(), ActionError>;
}

fn convert<T: FromLiteral>(arguments: &[String], index: usize) -> Result<T, ActionError> {
    let literal = arguments.get(index).map(String::as_str).unwrap_or_default();
    T::from_literal(literal).map_err(|source| ActionError::Conversion { index, source })
}

macro_rules! impl_action {
    ($arity:expr; $($arg:ident => $index:tt),*) => {
        impl<C, F, R, $($arg,)*> Action<C, ($($arg,)*)> for F
        where
            F: Fn(&C, $($arg),*) -> R + Send + Sync + 'static,
            R: ActionOutcome,
            $($arg: FromLiteral,)*
        {
            const ARITY: usize = $arity;

            fn parameter_types() -> Vec<&'static str> {
                vec![$(type_name::<$arg>()),*]
            }

            #[allow(non_snake_case, unused_variables)]
            fn call(&self, controller: &C, arguments: &[String]) -> Result<(), ActionError> {
                $(let $arg = convert::<$arg>(arguments, $index)?;)*
                (self)(controller, $($arg),*)
                    .into_outcome()
                    .map_err(ActionError::Failed)
            }
        }
    };
}

impl_action!(0;);
impl_action!(1; A1 => 0);
impl_action!(2; A1 => 0, A2 => 1);
impl_action!(3; A1 => 0, A2 => 1, A3 => 2);
impl_action!(4; A1 => 0, A2 => 1, A3 => 2, A4 => 3);
impl_action!(5; A1 => 0, A2 => 1, A3 => 2, A4 => 3, A5 => 4);
impl_action!(6; A1 => 0, A2 => 1, A3 => 2, A4 => 3, A5 => 4, A6 => 5);

type ErasedCall<C> = Box<dyn Fn(&C, &[String]) -> Result<(), ActionError> + Send + Sync>;

pub(crate) struct DeclaredAction<C> {
    pub(crate) signature: ActionSignature,
    call: ErasedCall<C>,
}

/// Actions of one controller type, in declaration order.
pub struct ActionTable<C> {
    declared: Vec<DeclaredAction<C>>,
}

impl<C: Send + Sync + 'static> ActionTable<C> {
    pub(crate) fn new() -> Self {
        Self {
            declared: Vec::new(),
        }
    }

    /// Declare an action. When two actions share a name and arity, the one
    /// declared first is the one invoked.
    pub fn action<Args, H>(&mut self, name: &str, handler: H) -> &mut Self
    where
        H: Action<C, Args>,
    {
        self.declared.push(DeclaredAction {
            signature: ActionSignature {
                name: name.to_string(),
                arity: H::ARITY,
                parameter_types: H::parameter_types(),
            },
            call: Box::new(move |controller, arguments| handler.call(controller, arguments)),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    /// Bind every declared action to a shared controller instance.
    pub(crate) fn bind(self, instance: Arc<C>) -> Vec<BoundAction> {
        self.declared
            .into_iter()
            .map(|declared| {
                let instance = Arc::clone(&instance);
                let call = declared.call;
                BoundAction {
                    signature: declared.signature,
                    call: Box::new(move |arguments| call(instance.as_ref(), arguments)),
                }
            })
            .collect()
    }
}

/// An action closed over its controller instance.
pub(crate) struct BoundAction {
    pub(crate) signature: ActionSignature,
    call: Box<dyn Fn(&[String]) -> Result<(), ActionError> + Send + Sync>,
}

impl BoundAction {
    pub(crate) fn call(&self, arguments: &[String]) -> Result<(), ActionError> {
        (self.call)(arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Counter {
        total: Mutex<i64>,
    }

    impl Counter {
        fn add(&self, a: i64, b: i64) {
            *self.total.lock().unwrap() += a + b;
        }

        fn set(&self, value: i64) -> Result<i64, std::num::TryFromIntError> {
            let checked = u8::try_from(value)?;
            *self.total.lock().unwrap() = i64::from(checked);
            Ok(value)
        }
    }

    #[test]
    fn test_signatures_record_arity_and_types() {
        let mut table = ActionTable::<Counter>::new();
        table
            .action("Add", Counter::add)
            .action("Reset", |c: &Counter| *c.total.lock().unwrap() = 0);
        let names: Vec<_> = table.declared.iter().map(|d| d.signature.clone()).collect();
        assert_eq!(names[0].arity, 2);
        assert_eq!(names[0].parameter_types, vec!["i64", "i64"]);
        assert_eq!(names[1].arity, 0);
        assert!(names[1].parameter_types.is_empty());
    }

    #[test]
    fn test_bound_call_converts_in_order() {
        let counter = Arc::new(Counter::default());
        let mut table = ActionTable::<Counter>::new();
        table.action("Add", Counter::add);
        let bound = table.bind(Arc::clone(&counter));

        bound[0].call(&["2".into(), "40".into()]).unwrap();
        assert_eq!(*counter.total.lock().unwrap(), 42);
    }

    #[test]
    fn test_conversion_error_reports_index() {
        let mut table = ActionTable::<Counter>::new();
        table.action("Add", Counter::add);
        let bound = table.bind(Arc::new(Counter::default()));

        let err = bound[0].call(&["1".into(), "x".into()]).unwrap_err();
        assert!(matches!(err, ActionError::Conversion { index: 1, .. }));
    }

    #[test]
    fn test_result_error_is_failure() {
        let mut table = ActionTable::<Counter>::new();
        table.action("Set", Counter::set);
        let bound = table.bind(Arc::new(Counter::default()));

        assert!(bound[0].call(&["7".into()]).is_ok());
        let err = bound[0].call(&["700".into()]).unwrap_err();
        assert!(matches!(err, ActionError::Failed(_)));
    }
}
