//! Error and result types.
//!
//! `SectionError` covers caller-contract violations of the sectioner. The
//! boxed `DynError` alias is used by the data sources and config loading,
//! where failures come from I/O and parsing.

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Input that cannot be grouped into sections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    #[error("profile {user_id} has no channel membership record")]
    MissingMembership { user_id: String },

    #[error("profile {user_id} has an empty username")]
    MalformedUsername { user_id: String },
}

/// Attach a lazily built context message to a fallible result.
pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug, thiserror::Error)]
#[error("{context}: {source}")]
pub struct WithContextError {
    pub context: String,
    #[source]
    pub source: DynError,
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(WithContextError {
                context: f(),
                source: e.into(),
            }) as DynError
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct SimpleError(pub String);

impl SimpleError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

pub fn simple_error(msg: impl Into<String>) -> DynError {
    Box::new(SimpleError::new(msg))
}
