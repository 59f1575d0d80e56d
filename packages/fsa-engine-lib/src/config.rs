use std::{fmt::Display, path::Path, str::FromStr};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub trait IntoOr<T> {
    fn into_or(self, or: T) -> T;
}

impl<T> IntoOr<Option<T>> for Option<T> {
    fn into_or(self, or: Option<T>) -> Option<T> {
        match self {
            Some(t) => Some(t),
            None => or,
        }
    }
}

impl<T> IntoOr<T> for Option<T> {
    fn into_or(self, or: T) -> T {
        self.unwrap_or(or)
    }
}

/// Reads a TOML file into the partial form of a config.
fn read_partial<P: AsRef<Path>, T: for<'de> Deserialize<'de>>(file_path: P) -> anyhow::Result<T> {
    let canonic_path = std::fs::canonicalize(&file_path)
        .with_context(|| format!("config file {} not found", file_path.as_ref().display()))?;
    let content = std::fs::read_to_string(&canonic_path)?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", canonic_path.display()))
}

/// Declares a config struct together with its `Partial` form, in which every
/// field is optional.
///
/// Fields are written `name: Type = default`. A field whose partial type is
/// not `Option<Type>` names it with `as`, e.g. a nested config
/// `logger: LoggerConfig as Option<PartialLoggerConfig> = LoggerConfig::default()`.
macro_rules! config {
    (@partial $ty:ty as $partial:ty) => { $partial };
    (@partial $ty:ty) => { Option<$ty> };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($field:ident : $ty:ty $(as $partial:ty)? = $default:expr),* $(,)?
        }
    ) => {
        paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone, Serialize)]
            $vis struct $name {
                $($field: $ty,)*
            }

            #[derive(Debug, Clone, Default, Deserialize)]
            $vis struct [<Partial $name>] {
                $($field: config!(@partial $ty $(as $partial)?),)*
            }

            impl $name {
                pub fn from_partial(partial: [<Partial $name>]) -> Self {
                    Self {
                        $($field: partial.$field.into_or($default),)*
                    }
                }

                pub fn from_toml(content: &str) -> anyhow::Result<Self> {
                    Ok(Self::from_partial(toml::from_str(content)?))
                }

                pub fn from_file<P: AsRef<Path>>(file_path: P) -> anyhow::Result<Self> {
                    Ok(Self::from_partial(read_partial(file_path)?))
                }

                pub fn from_optional_file<P: AsRef<Path>>(
                    file_path: Option<P>,
                ) -> anyhow::Result<Self> {
                    match file_path {
                        Some(p) => Self::from_file(p),
                        None => Ok(Self::default()),
                    }
                }

                $(
                    pub fn [<with_ $field>](mut self, $field: $ty) -> Self {
                        self.$field = $field;
                        self
                    }

                    pub fn [<set_ $field>](&mut self, $field: $ty) {
                        self.$field = $field;
                    }

                    pub fn [<get_ $field>](&self) -> &$ty {
                        &self.$field
                    }
                )*
            }

            impl Default for $name {
                fn default() -> Self {
                    $name {
                        $($field: $default,)*
                    }
                }
            }

            impl IntoOr<$name> for Option<[<Partial $name>]> {
                fn into_or(self, or: $name) -> $name {
                    match self {
                        Some(t) => $name::from_partial(t),
                        None => or,
                    }
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "info" | "inf" => Ok(LogLevel::Info),
            "warn" | "warning" | "war" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "Debug"),
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Warn => write!(f, "Warn"),
            LogLevel::Error => write!(f, "Error"),
        }
    }
}

config! {
    pub struct LoggerConfig {
        enabled: bool = false,
        log_file: bool = false,
        log_level: LogLevel = LogLevel::Warn,
    }
}

config! {
    /// Limits a caller puts on simulation requests before handing them to the
    /// engine. The engine itself runs every request to completion.
    pub struct GuardConfig {
        max_input_length: Option<usize> as Option<usize> = None,
    }
}

impl GuardConfig {
    /// Checks an input against the configured limit.
    pub fn check_input(&self, input: &str) -> anyhow::Result<()> {
        if let Some(max) = self.max_input_length {
            let length = input.chars().count();
            if length > max {
                anyhow::bail!("input has {} symbols, the limit is {}", length, max);
            }
        }

        Ok(())
    }
}

config! {
    pub struct EngineConfig {
        logger: LoggerConfig as Option<PartialLoggerConfig> = LoggerConfig::default(),
        guard: GuardConfig as Option<PartialGuardConfig> = GuardConfig::default(),
    }
}
