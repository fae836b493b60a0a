use color_eyre::eyre::{eyre, Report};
use thiserror::Error;

use super::{PlanningStoreError, UserStoreError};

#[derive(Debug, Error)]
pub enum PlanningAPIError {
    #[error("Invalid form")]
    InvalidForm(#[from] validator::ValidationErrors),
    #[error("Validation error")]
    ValidationError(#[from] ValidationError),
    #[error("Multiple assignment is not allowed for this entry")]
    MultipleAssignmentNotAllowed,
    #[error("Could not retrieve all employees")]
    EmployeesNotFound,
    #[error("User is not enabled or doesn't have the proper role")]
    EmployeeNotEligible,
    #[error("Cannot create new planning entry on archived project")]
    ArchivedProject,
    #[error("Start cannot be after end")]
    StartAfterEnd,
    #[error("Unknown rotation frequency type: {0}")]
    UnknownRotationFrequency(String),
    #[error("Missing group header")]
    MissingGroup,
    #[error("Group not found: {0}")]
    GroupNotFound(String),
    #[error("Resource with ID not found: {0}")]
    IDNotFoundError(uuid::Uuid),
    #[error("Resource with ID already exists: {0}")]
    IDExistsError(uuid::Uuid),
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl From<PlanningStoreError> for PlanningAPIError {
    fn from(e: PlanningStoreError) -> Self {
        match e {
            PlanningStoreError::NotFound(id) => Self::IDNotFoundError(id),
            PlanningStoreError::IdConflict(id) => Self::IDExistsError(id),
            e => Self::UnexpectedError(eyre!(e)),
        }
    }
}

impl From<UserStoreError> for PlanningAPIError {
    fn from(e: UserStoreError) -> Self {
        match e {
            UserStoreError::UserNotFound(id) => Self::IDNotFoundError(id),
            e => Self::UnexpectedError(eyre!(e)),
        }
    }
}

#[derive(Debug, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: String) -> Self {
        Self(message)
    }

    pub fn as_ref(&self) -> &String {
        &self.0
    }
}
