use crate::literal::LiteralError;

/// Error type carried as the cause of an invocation failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Whether a command could not be routed or its target failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The command could not be parsed, resolved or converted
    Resolution,
    /// The resolved action ran and failed
    Invocation,
}

/// Failure of [`CommandProcessor::invoke`](super::CommandProcessor::invoke).
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("malformed command uri '{uri}': {reason}")]
    MalformedCommandUri { uri: String, reason: String },

    #[error("unknown controller '{name}'")]
    UnknownController { name: String },

    #[error("controller '{controller}' has no action '{action}' taking {arity} argument(s)")]
    NoMatchingMethod {
        controller: String,
        action: String,
        arity: usize,
    },

    #[error("argument {index} of {controller}.{action} is invalid: {source}")]
    ArgumentConversionFailure {
        controller: String,
        action: String,
        index: usize,
        #[source]
        source: LiteralError,
    },

    #[error("{controller}.{action} failed: {source}")]
    InvocationFailure {
        controller: String,
        action: String,
        #[source]
        source: BoxError,
    },
}

impl CommandError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            CommandError::InvocationFailure { .. } => ErrorCategory::Invocation,
            _ => ErrorCategory::Resolution,
        }
    }

    /// Original failure of the action, for invocation failures.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            CommandError::InvocationFailure { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Cause recorded when an action body panics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("action panicked: {message}")]
pub struct HandlerPanic {
    pub message: String,
}

impl HandlerPanic {
    pub(crate) fn from_payload(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            format!("{payload:?}")
        };
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let unknown = CommandError::UnknownController {
            name: "Ghost".into(),
        };
        assert_eq!(unknown.category(), ErrorCategory::Resolution);
        assert!(unknown.cause().is_none());

        let failed = CommandError::InvocationFailure {
            controller: "Echo".into(),
            action: "Fail".into(),
            source: Box::new(HandlerPanic {
                message: "boom".into(),
            }),
        };
        assert_eq!(failed.category(), ErrorCategory::Invocation);
        assert_eq!(failed.to_string(), "Echo.Fail failed: action panicked: boom");
    }

    #[test]
    fn test_panic_payloads() {
        let from_str = HandlerPanic::from_payload(&"static message");
        assert_eq!(from_str.message, "static message");
        let from_string = HandlerPanic::from_payload(&String::from("owned"));
        assert_eq!(from_string.message, "owned");
    }
}
