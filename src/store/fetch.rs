use crate::error::{Error, Result};

/// Outcome of [`fetch_or_create`].
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Existing(T),
    Created(T),
}

impl<T> Fetched<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Existing(value) | Self::Created(value) => value,
        }
    }

    pub fn get(&self) -> &T {
        match self {
            Self::Existing(value) | Self::Created(value) => value,
        }
    }

    #[must_use]
    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Idempotent insert-without-update keyed on a natural identifier.
///
/// `lookup` returns every row matching the key. No match runs `create`, one
/// match is returned untouched, and more than one is an integrity conflict:
/// the key was assumed unique.
pub fn fetch_or_create<T, L, C>(what: &str, key: &str, lookup: L, create: C) -> Result<Fetched<T>>
where
    L: FnOnce() -> Result<Vec<T>>,
    C: FnOnce() -> Result<T>,
{
    let mut found = lookup()?;

    match found.len() {
        0 => create().map(Fetched::Created),
        1 => Ok(Fetched::Existing(found.remove(0))),
        n => {
            tracing::error!(kind = what, key, matches = n, "Multiple rows match a unique key");
            Err(Error::IntegrityConflict(format!(
                "{n} {what} rows match '{key}'"
            )))
        }
    }
}
