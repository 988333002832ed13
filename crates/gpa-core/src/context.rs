//! Keyed store passed from stage to stage.

use std::collections::BTreeMap;

use crate::error::{PipelineError, Result};
use crate::value::{ContextValue, FromContextValue};

/// Values produced so far in a run, keyed by name.
///
/// Reads return owned clones; DataFrames share their column buffers, so the
/// clone is shallow and later writes never alias an earlier read.
#[derive(Debug, Clone, Default)]
pub struct PipelineContext {
    values: BTreeMap<String, ContextValue>,
}

impl PipelineContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns a copy of the value under `key`.
    pub fn get(&self, key: &str) -> Result<ContextValue> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| PipelineError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Returns the value under `key` converted to `T`.
    pub fn get_as<T: FromContextValue>(&self, key: &str) -> Result<T> {
        T::from_context_value(self.get(key)?).map_err(|other| PipelineError::TypeMismatch {
            key: key.to_string(),
            expected: T::KIND,
            found: other.kind(),
        })
    }

    /// Returns copies of the values under `keys`, in the requested order.
    pub fn get_many<S: AsRef<str>>(&self, keys: &[S]) -> Result<Vec<ContextValue>> {
        keys.iter().map(|key| self.get(key.as_ref())).collect()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys currently present, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
