use super::action::{ActionError, ActionSignature};
use super::controller::{Controller, ControllerRegistry};
use super::error::{CommandError, HandlerPanic};
use crate::ids::InvocationId;
use crate::path_info::PathInfo;
use crate::runtime_config::RuntimeConfig;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, error, info};

const SCHEME_SEPARATOR: &str = "://";

/// Builds a [`CommandProcessor`] from an ordered list of controllers.
#[derive(Default)]
pub struct CommandProcessorBuilder {
    registry: ControllerRegistry,
    config: Option<RuntimeConfig>,
}

impl CommandProcessorBuilder {
    /// Register a controller. Order matters only when two controllers share a
    /// name: the later one wins.
    #[must_use]
    pub fn controller<C: Controller>(mut self, instance: C) -> Self {
        self.registry.register(instance);
        self
    }

    #[must_use]
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Finish the registry. Without an explicit config, the environment is read.
    #[must_use]
    pub fn build(self) -> CommandProcessor {
        let config = self.config.unwrap_or_else(RuntimeConfig::from_env);
        info!(
            controllers = self.registry.len(),
            catch_panics = config.catch_panics,
            "Command processor ready"
        );
        CommandProcessor {
            registry: self.registry,
            config,
        }
    }
}

/// Routes `Controller://Action/arg0/arg1` strings to registered actions.
pub struct CommandProcessor {
    registry: ControllerRegistry,
    config: RuntimeConfig,
}

impl CommandProcessor {
    #[must_use]
    pub fn builder() -> CommandProcessorBuilder {
        CommandProcessorBuilder::default()
    }

    /// Parse, resolve and run one command. The action's return value is
    /// discarded.
    pub fn invoke(&self, command_uri: &str) -> Result<(), CommandError> {
        let invocation_id = InvocationId::generate();

        let mut parts = command_uri.split(SCHEME_SEPARATOR);
        let (controller_name, remainder) = match (parts.next(), parts.next(), parts.next()) {
            (Some(controller), Some(remainder), None) => (controller, remainder),
            _ => {
                debug!(
                    invocation_id = %invocation_id,
                    command_uri = %command_uri,
                    "Rejected command without exactly one '://'"
                );
                return Err(CommandError::MalformedCommandUri {
                    uri: command_uri.to_string(),
                    reason: format!("expected exactly one '{SCHEME_SEPARATOR}' separator"),
                });
            }
        };

        let path = PathInfo::parse(remainder).map_err(|e| CommandError::MalformedCommandUri {
            uri: command_uri.to_string(),
            reason: e.to_string(),
        })?;

        let controller = self.registry.get(controller_name).ok_or_else(|| {
            debug!(
                invocation_id = %invocation_id,
                controller = %controller_name,
                "Unknown controller"
            );
            CommandError::UnknownController {
                name: controller_name.to_string(),
            }
        })?;

        let action_name = path.action_name();
        let arguments = path.arguments();
        let action = controller
            .resolve(action_name, arguments.len())
            .ok_or_else(|| CommandError::NoMatchingMethod {
                controller: controller_name.to_string(),
                action: action_name.to_string(),
                arity: arguments.len(),
            })?;

        debug!(
            invocation_id = %invocation_id,
            controller = %controller_name,
            action = %action_name,
            arity = arguments.len(),
            parameter_types = ?action.signature.parameter_types,
            "Action resolved"
        );

        let started = Instant::now();
        let outcome = if self.config.catch_panics {
            match catch_unwind(AssertUnwindSafe(|| action.call(arguments))) {
                Ok(outcome) => outcome,
                Err(payload) => {
                    let panic = HandlerPanic::from_payload(payload.as_ref());
                    error!(
                        invocation_id = %invocation_id,
                        controller = %controller_name,
                        action = %action_name,
                        panic_message = %panic.message,
                        "Action panicked"
                    );
                    return Err(CommandError::InvocationFailure {
                        controller: controller_name.to_string(),
                        action: action_name.to_string(),
                        source: Box::new(panic),
                    });
                }
            }
        } else {
            action.call(arguments)
        };

        match outcome {
            Ok(()) => {
                info!(
                    invocation_id = %invocation_id,
                    controller = %controller_name,
                    action = %action_name,
                    execution_time_us = started.elapsed().as_micros() as u64,
                    "Command invoked"
                );
                Ok(())
            }
            Err(ActionError::Conversion { index, source }) => {
                debug!(
                    invocation_id = %invocation_id,
                    controller = %controller_name,
                    action = %action_name,
                    index,
                    error = %source,
                    "Argument conversion failed"
                );
                Err(CommandError::ArgumentConversionFailure {
                    controller: controller_name.to_string(),
                    action: action_name.to_string(),
                    index,
                    source,
                })
            }
            Err(ActionError::Failed(source)) => {
                error!(
                    invocation_id = %invocation_id,
                    controller = %controller_name,
                    action = %action_name,
                    error = %source,
                    "Action failed"
                );
                Err(CommandError::InvocationFailure {
                    controller: controller_name.to_string(),
                    action: action_name.to_string(),
                    source,
                })
            }
        }
    }

    #[must_use]
    pub fn config(&self) -> RuntimeConfig {
        self.config
    }

    /// Registered controller names, in registration order.
    #[must_use]
    pub fn controllers(&self) -> Vec<&str> {
        self.registry.names().collect()
    }

    #[must_use]
    pub fn has_controller(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Declared actions of a controller, in declaration order.
    #[must_use]
    pub fn actions(&self, controller: &str) -> Option<Vec<ActionSignature>> {
        self.registry.get(controller).map(|entry| entry.signatures())
    }
}
