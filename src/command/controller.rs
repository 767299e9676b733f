use super::action::{ActionSignature, ActionTable, BoundAction};
use std::any::type_name;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A command target registered under a name.
pub trait Controller: Send + Sync + 'static {
    /// Name used in the `<name>://` part of a command URI. Defaults to the
    /// unqualified type name.
    fn controller_name(&self) -> String {
        short_type_name(type_name::<Self>()).to_string()
    }

    /// Declare this controller's actions, in the order they are matched.
    fn register_actions(actions: &mut ActionTable<Self>)
    where
        Self: Sized;
}

/// `my_crate::echo::Echo<T>` → `Echo`
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// One registered controller instance and its resolution index.
pub(crate) struct ControllerEntry {
    pub(crate) type_name: &'static str,
    actions: Vec<BoundAction>,
    /// action name → arity → position in `actions`
    index: HashMap<String, HashMap<usize, usize>>,
}

impl ControllerEntry {
    pub(crate) fn new<C: Controller>(name: &str, instance: C) -> Self {
        let mut table = ActionTable::new();
        C::register_actions(&mut table);
        let actions = table.bind(Arc::new(instance));

        let mut index: HashMap<String, HashMap<usize, usize>> = HashMap::new();
        for (position, action) in actions.iter().enumerate() {
            let by_arity = index.entry(action.signature.name.clone()).or_default();
            if by_arity.contains_key(&action.signature.arity) {
                debug!(
                    controller = %name,
                    action = %action.signature.name,
                    arity = action.signature.arity,
                    "Action shadowed by an earlier declaration with the same arity"
                );
                continue;
            }
            by_arity.insert(action.signature.arity, position);
        }

        Self {
            type_name: type_name::<C>(),
            actions,
            index,
        }
    }

    /// First declared action with this name and arity.
    pub(crate) fn resolve(&self, action: &str, arity: usize) -> Option<&BoundAction> {
        let position = self.index.get(action)?.get(&arity)?;
        self.actions.get(*position)
    }

    pub(crate) fn signatures(&self) -> Vec<ActionSignature> {
        self.actions.iter().map(|a| a.signature.clone()).collect()
    }
}

/// Controller name → instance. Read-only once built.
#[derive(Default)]
pub struct ControllerRegistry {
    controllers: indexmap::IndexMap<String, ControllerEntry>,
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance under its controller name. A later controller with
    /// the same name replaces the earlier one.
    pub fn register<C: Controller>(&mut self, instance: C) {
        let name = instance.controller_name();
        let entry = ControllerEntry::new(&name, instance);
        let action_count = entry.actions.len();
        let type_name = entry.type_name;

        if let Some(replaced) = self.controllers.insert(name.clone(), entry) {
            warn!(
                controller = %name,
                replaced_type = replaced.type_name,
                new_type = type_name,
                "Controller name registered twice, keeping the later instance"
            );
        }

        info!(
            controller = %name,
            controller_type = type_name,
            actions = action_count,
            "Controller registered"
        );
    }

    pub(crate) fn get(&self, name: &str) -> Option<&ControllerEntry> {
        self.controllers.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.controllers.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.controllers.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Controller for Plain {
        fn register_actions(actions: &mut ActionTable<Self>) {
            actions
                .action("Go", |_: &Plain, _: i32| ())
                .action("Go", |_: &Plain, _: String| ())
                .action("Go", |_: &Plain| ());
        }
    }

    struct Renamed;

    impl Controller for Renamed {
        fn controller_name(&self) -> String {
            "Plain".to_string()
        }

        fn register_actions(_: &mut ActionTable<Self>) {}
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("a::b::Echo"), "Echo");
        assert_eq!(short_type_name("a::Wrap<b::Inner>"), "Wrap");
        assert_eq!(short_type_name("Bare"), "Bare");
    }

    #[test]
    fn test_first_declared_action_wins() {
        let entry = ControllerEntry::new("Plain", Plain);
        let resolved = entry.resolve("Go", 1).unwrap();
        assert_eq!(resolved.signature.parameter_types, vec!["i32"]);
        assert_eq!(entry.resolve("Go", 0).unwrap().signature.arity, 0);
        assert!(entry.resolve("Go", 2).is_none());
        assert!(entry.resolve("go", 1).is_none());
    }

    #[test]
    fn test_later_registration_replaces_earlier() {
        let mut registry = ControllerRegistry::new();
        registry.register(Plain);
        registry.register(Renamed);
        assert_eq!(registry.len(), 1);
        let entry = registry.get("Plain").unwrap();
        assert!(entry.type_name.ends_with("Renamed"));
        assert!(entry.resolve("Go", 0).is_none());
    }
}
