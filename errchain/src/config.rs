//! Process-wide settings for wrapping.
//!
//! [`current`] is read on every [`crate::wrap`]. It is fixed on first use,
//! either from [`install`] or from the environment:
//!
//! - `ERRCHAIN_STACK_DEPTH`: frames per stack snapshot, `0` disables them
//! - `ERRCHAIN_STACK_SKIP`: extra frames dropped above the wrapping call

use crate::stack::StackOpts;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const ENV_STACK_DEPTH: &str = "ERRCHAIN_STACK_DEPTH";
pub const ENV_STACK_SKIP: &str = "ERRCHAIN_STACK_SKIP";

/// Configuration for wrapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stack options used by [`crate::wrap`]
    pub stack: StackOpts,
}

impl Config {
    pub fn with_stack(mut self, stack: StackOpts) -> Self {
        self.stack = stack;
        self
    }

    /// Defaults overridden by the `ERRCHAIN_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `ERRCHAIN_*` keys.
    /// Unparsable values are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(depth) = read(&lookup, ENV_STACK_DEPTH) {
            config.stack.depth = depth;
        }
        if let Some(skip) = read(&lookup, ENV_STACK_SKIP) {
            config.stack.skip = skip;
        }
        config
    }
}

fn read<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, value = %raw, error = %err, "ignoring invalid errchain setting");
            None
        }
    }
}

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Set the process configuration.
///
/// Fails, handing `config` back, once the configuration was installed or
/// already read by a wrap.
pub fn install(config: Config) -> std::result::Result<(), Config> {
    CONFIG.set(config)?;
    tracing::debug!(?config, "installed errchain configuration");
    Ok(())
}

/// The process configuration, loaded from the environment on first use
pub fn current() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}
