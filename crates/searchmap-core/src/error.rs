use std::fmt;

use thiserror::Error;

use crate::types::WriteOperation;

/// Where an operator appeared when it was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorContext {
    Filter,
    Order,
}

impl fmt::Display for OperatorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter => f.write_str("filter"),
            Self::Order => f.write_str("order"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported {context} operator {operator}")]
    UnsupportedOperator { context: OperatorContext, operator: String },

    #[error("Attempted to {operation} a record without an ID")]
    MissingIdentifier { operation: WriteOperation },

    #[error("Invalid argument: {0}")]
    ArgumentType(String),

    #[error("No mapping registered for attribute '{0}'")]
    UnknownAttribute(String),

    #[error("Cannot load property '{property}': {message}")]
    Conversion { property: String, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl Error {
    pub fn unsupported_filter(operator: impl Into<String>) -> Self {
        Self::UnsupportedOperator { context: OperatorContext::Filter, operator: operator.into() }
    }

    pub fn unsupported_order(operator: impl Into<String>) -> Self {
        Self::UnsupportedOperator { context: OperatorContext::Order, operator: operator.into() }
    }

    pub fn conversion(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion { property: property.into(), message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
