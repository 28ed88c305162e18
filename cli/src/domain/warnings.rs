//! Warning accumulation for multi-step remote operations.
//!
//! Every remote call may emit advisory warnings alongside its result. A
//! [`Reply`] pairs the two so warnings travel with errors as well as values,
//! and [`Warnings`] collects them in emission order across steps.

use serde::Serialize;

use crate::domain::error::ApiError;

/// Ordered, append-only sequence of human-readable warnings.
///
/// Insertion order is emission order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Warnings(Vec<String>);

impl Warnings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single warning.
    pub fn push(&mut self, warning: impl Into<String>) {
        self.0.push(warning.into());
    }

    /// Append every warning from `other`, preserving its order.
    pub fn append(&mut self, other: Warnings) {
        self.0.extend(other.0);
    }

    /// Take the warnings out of `reply` and hand back its result.
    ///
    /// This is the single step of a short-circuiting pipeline: warnings are
    /// recorded before the caller gets a chance to bail on the error.
    pub fn absorb<T>(&mut self, reply: Reply<T>) -> Result<T, ApiError> {
        self.append(reply.warnings);
        reply.result
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for Warnings {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> From<Vec<S>> for Warnings {
    fn from(items: Vec<S>) -> Self {
        items.into_iter().collect()
    }
}

impl IntoIterator for Warnings {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Warnings {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A result together with the warnings emitted while producing it.
///
/// Returned by every gateway call and every application service, so that a
/// failing step can never drop warnings gathered before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply<T> {
    pub result: Result<T, ApiError>,
    pub warnings: Warnings,
}

impl<T> Reply<T> {
    pub fn ok(value: T, warnings: impl Into<Warnings>) -> Self {
        Self {
            result: Ok(value),
            warnings: warnings.into(),
        }
    }

    pub fn err(error: ApiError, warnings: impl Into<Warnings>) -> Self {
        Self {
            result: Err(error),
            warnings: warnings.into(),
        }
    }

    /// Build a reply from a result and an already-collected accumulator.
    pub fn from_parts(result: Result<T, ApiError>, warnings: Warnings) -> Self {
        Self { result, warnings }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        Reply {
            result: self.result.map(f),
            warnings: self.warnings,
        }
    }

    pub fn into_parts(self) -> (Result<T, ApiError>, Warnings) {
        (self.result, self.warnings)
    }
}
