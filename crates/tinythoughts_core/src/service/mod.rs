//! Observable CRUD façades over the repositories.
//!
//! # Responsibility
//! - Validate caller input before anything reaches the store.
//! - After every successful write, re-run the list query and publish it.
//! - Report failures as typed `ServiceError`s and log them.
//!
//! # Invariants
//! - A rejected or failed write never changes the published list.
//! - Services never bypass repository validation.

pub mod collection_service;
pub mod thought_service;
pub mod thread_service;

use crate::model::collection::CollectionId;
use crate::model::thought::ThoughtId;
use crate::model::thread::ThreadId;
use crate::model::validation::ValidationError;
use crate::repo::{RepoError, RepoResult};
use log::{debug, error, info};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned by façade services.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected; store and published list are untouched.
    Validation(ValidationError),
    CollectionNotFound(CollectionId),
    ThreadNotFound(ThreadId),
    ThoughtNotFound(ThoughtId),
    /// Batch delete referenced a row outside the published list.
    IndexOutOfRange { index: usize, len: usize },
    /// Storage failure; the write was dropped.
    Store(RepoError),
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::CollectionNotFound(id) => write!(f, "collection not found: {id}"),
            Self::ThreadNotFound(id) => write!(f, "thread not found: {id}"),
            Self::ThoughtNotFound(id) => write!(f, "thought not found: {id}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is outside the current list of {len}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::CollectionNotFound(id) => Self::CollectionNotFound(id),
            RepoError::ThreadNotFound(id) => Self::ThreadNotFound(id),
            RepoError::ThoughtNotFound(id) => Self::ThoughtNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Logs a failed operation. Rejections stay at debug level.
pub(crate) fn report(event: &'static str, err: &ServiceError) {
    match err {
        ServiceError::Validation(_) | ServiceError::IndexOutOfRange { .. } => {
            debug!("event={event} module=service status=rejected reason={err}");
        }
        ServiceError::Store(_) => {
            error!("event={event} module=service status=error error_code=store_failed error={err}");
        }
        _ => {
            debug!("event={event} module=service status=not_found error={err}");
        }
    }
}

/// Converts a repository result, logging the failure under `event`.
pub(crate) fn logged<T>(event: &'static str, result: RepoResult<T>) -> ServiceResult<T> {
    result.map_err(|err| {
        let err: ServiceError = err.into();
        report(event, &err);
        err
    })
}

/// Runs one write against `repo` and logs its outcome.
///
/// Callers republish their list after an `Ok`.
pub(crate) fn run_write<R, T>(
    repo: &R,
    event: &'static str,
    op: impl FnOnce(&R) -> RepoResult<T>,
) -> ServiceResult<T> {
    let value = logged(event, op(repo))?;
    info!("event={event} module=service status=ok");
    Ok(value)
}

/// Maps an index set over the published list to the ids it points at.
pub(crate) fn ids_at<T, Id>(
    items: &[T],
    indices: &BTreeSet<usize>,
    id_of: impl Fn(&T) -> Id,
) -> ServiceResult<Vec<Id>> {
    indices
        .iter()
        .map(|&index| {
            items
                .get(index)
                .map(&id_of)
                .ok_or(ServiceError::IndexOutOfRange {
                    index,
                    len: items.len(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ids_at, run_write, ServiceError};
    use crate::model::validation::ValidationError;
    use crate::repo::RepoError;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    #[test]
    fn run_write_maps_repository_errors() {
        let id = Uuid::new_v4();
        let err = run_write(&(), "thread_update", |_| -> Result<(), _> {
            Err(RepoError::ThreadNotFound(id))
        })
        .unwrap_err();
        assert!(matches!(err, ServiceError::ThreadNotFound(found) if found == id));

        let err = run_write(&(), "thought_create", |_| -> Result<(), _> {
            Err(ValidationError::BlankContent.into())
        })
        .unwrap_err();
        assert!(err.is_validation());

        let value = run_write(&7_u8, "noop", |repo| Ok(*repo + 1)).unwrap();
        assert_eq!(value, 8);
    }

    #[test]
    fn ids_at_rejects_indices_past_the_list() {
        let items = ["a", "b"];
        let picked = ids_at(&items, &BTreeSet::from([1]), |item| item.to_string()).unwrap();
        assert_eq!(picked, vec!["b".to_string()]);

        let err = ids_at(&items, &BTreeSet::from([0, 2]), |item| item.to_string()).unwrap_err();
        assert!(matches!(err, ServiceError::IndexOutOfRange { index: 2, len: 2 }));
    }
}
