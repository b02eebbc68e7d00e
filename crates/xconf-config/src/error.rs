//! Compilation error types.

use xconf_core::errors::{ERROR_DECODE, ERROR_IO, ERROR_SCHEMA, ERROR_SYNTAX, ERROR_VALIDATION};

/// Coarse classification of a [`ConfigError`], independent of context layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Syntax,
    Schema,
    Validation,
    Decode,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Io => ERROR_IO,
            ErrorKind::Syntax => ERROR_SYNTAX,
            ErrorKind::Schema => ERROR_SCHEMA,
            ErrorKind::Validation => ERROR_VALIDATION,
            ErrorKind::Decode => ERROR_DECODE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported config format")]
    UnsupportedFormat,

    #[error("unknown {direction} protocol \"{name}\" (field \"{field}\")")]
    UnknownProtocol {
        direction: &'static str,
        field: &'static str,
        name: String,
    },
    #[error("unknown allocation strategy: {0}")]
    UnknownStrategy(String),
    #[error("unknown sniffing protocol: {0}")]
    UnknownSniffProtocol(String),
    #[error("unknown domain override protocol: {0}")]
    UnknownDomainOverride(String),
    #[error("unknown \"xudpProxyUDP443\": {0}")]
    InvalidPolicy(String),
    #[error("unknown {field}: {value}")]
    UnknownValue { field: &'static str, value: String },

    #[error("invalid \"{field}\" for protocol \"{protocol}\": {source}")]
    Decode {
        protocol: String,
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    MissingPort(&'static str),
    #[error("not enough ports. concurrency = {concurrency} ports: {ports}")]
    InsufficientPorts { concurrency: u32, ports: String },
    #[error("{0}")]
    Unsupported(String),
    #[error("proxySettings.tag is conflicted with sockopt.dialerProxy")]
    Conflict,
    #[error("{protocol}: {reason}")]
    InvalidSettings { protocol: &'static str, reason: String },
    #[error("validation: {0}")]
    Validation(String),

    #[error("{context} > {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::Io(_) => ErrorKind::Io,
            ConfigError::Json(_)
            | ConfigError::Yaml(_)
            | ConfigError::Toml(_)
            | ConfigError::UnsupportedFormat => ErrorKind::Syntax,
            ConfigError::UnknownProtocol { .. }
            | ConfigError::UnknownStrategy(_)
            | ConfigError::UnknownSniffProtocol(_)
            | ConfigError::UnknownDomainOverride(_)
            | ConfigError::InvalidPolicy(_)
            | ConfigError::UnknownValue { .. } => ErrorKind::Schema,
            ConfigError::Decode { .. } => ErrorKind::Decode,
            ConfigError::MissingPort(_)
            | ConfigError::InsufficientPorts { .. }
            | ConfigError::Unsupported(_)
            | ConfigError::Conflict
            | ConfigError::InvalidSettings { .. }
            | ConfigError::Validation(_) => ErrorKind::Validation,
            ConfigError::Context { source, .. } => source.kind(),
        }
    }

    /// The innermost error beneath any context layers.
    pub fn root_cause(&self) -> &ConfigError {
        let mut err = self;
        while let ConfigError::Context { source, .. } = err {
            err = source;
        }
        err
    }

    pub fn context(self, context: impl Into<String>) -> Self {
        ConfigError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    pub(crate) fn unknown(field: &'static str, value: impl Into<String>) -> Self {
        ConfigError::UnknownValue {
            field,
            value: value.into(),
        }
    }

    pub(crate) fn invalid(protocol: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidSettings {
            protocol,
            reason: reason.into(),
        }
    }
}

/// Attach a step description to an error while keeping its cause.
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T, ConfigError>;

    fn with_context<F, S>(self, f: F) -> Result<T, ConfigError>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T, ConfigError> {
    fn context(self, context: impl Into<String>) -> Result<T, ConfigError> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F, S>(self, f: F) -> Result<T, ConfigError>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_sees_through_context() {
        let err = ConfigError::InvalidPolicy("bogus".into())
            .context("failed to build mux config")
            .context("outbound \"proxy\"");
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(matches!(err.root_cause(), ConfigError::InvalidPolicy(p) if p == "bogus"));
    }

    #[test]
    fn context_is_rendered_before_cause() {
        let result: Result<(), ConfigError> = Err(ConfigError::Conflict);
        let err = result.context("failed to build outbound").unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to build outbound > proxySettings.tag is conflicted with sockopt.dialerProxy"
        );
    }

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(ErrorKind::Validation.as_str(), "validation");
        assert_eq!(ErrorKind::Decode.as_str(), "decode");
    }
}
