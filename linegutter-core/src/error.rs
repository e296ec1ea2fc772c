use crate::registry::{InstanceId, NodeKey};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GutterError {
    #[error("Host {0:?} is already attached")]
    AlreadyAttached(NodeKey),

    #[error("Host {0:?} is not attached")]
    NotAttached(NodeKey),

    /// The platform has no node key for this element.
    #[error("Element is not attached")]
    UnknownElement,

    #[error("No instance with id {0:?}")]
    UnknownInstance(InstanceId),

    #[error("Watchers have been shut down")]
    ShutDown,

    #[error("Host is detached from the document")]
    Detached,

    #[error("Measured {name} is not a usable pixel value: {value}")]
    InvalidMetric { name: &'static str, value: f64 },

    #[error("Platform error: {0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, GutterError>;
