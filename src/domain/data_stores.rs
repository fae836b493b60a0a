use color_eyre::eyre::Report;
use thiserror::Error;
use uuid::Uuid;

use super::{
    EntryId, PlanningAssignment, PlanningAssignmentDetail, PlanningEntry,
    Project, ProjectId, User, UserId,
};

/// Persisted entities expose their id so stores can insert or replace them
/// generically. An entity without an id has not been stored yet.
pub trait Identifiable {
    fn id(&self) -> Option<Uuid>;
    fn set_id(&mut self, id: Uuid);

    fn ensure_id(&mut self) -> Uuid {
        match self.id() {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                self.set_id(id);
                id
            }
        }
    }
}

/// Projects, planning entries and assignments of a single group.
#[async_trait::async_trait]
pub trait PlanningStore {
    async fn get_projects(&self) -> Result<Vec<Project>, PlanningStoreError>;
    async fn get_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Project, PlanningStoreError>;
    /// Inserts when the project has no id, replaces otherwise.
    async fn upsert_project(
        &self,
        project: Project,
    ) -> Result<Project, PlanningStoreError>;

    async fn get_entry(
        &self,
        entry_id: &EntryId,
    ) -> Result<PlanningEntry, PlanningStoreError>;
    async fn get_entries_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<PlanningEntry>, PlanningStoreError>;
    /// Inserts when the entry has no id, replaces (or creates) otherwise.
    async fn upsert_entry(
        &self,
        entry: PlanningEntry,
    ) -> Result<PlanningEntry, PlanningStoreError>;

    /// Non-cancelled assignments of an entry.
    async fn get_active_assignments(
        &self,
        entry_id: &EntryId,
    ) -> Result<Vec<PlanningAssignment>, PlanningStoreError>;
    async fn upsert_assignments(
        &self,
        assignments: Vec<PlanningAssignment>,
    ) -> Result<(), PlanningStoreError>;
    /// Every assignment of an employee joined with its entry and project.
    /// Assignments whose entry no longer exists are left out.
    async fn get_assignment_details(
        &self,
        employee_id: &UserId,
    ) -> Result<Vec<PlanningAssignmentDetail>, PlanningStoreError>;
}

#[derive(Debug, Error)]
pub enum PlanningStoreError {
    #[error("Resource not found: {0}")]
    NotFound(Uuid),
    /// The id is already taken by a record of another group.
    #[error("Resource ID already in use: {0}")]
    IdConflict(Uuid),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for PlanningStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::IdConflict(a), Self::IdConflict(b)) => a == b,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// User directory of a single group.
#[async_trait::async_trait]
pub trait UserStore {
    async fn add_user(&self, user: User) -> Result<(), UserStoreError>;
    async fn get_user(&self, user_id: &UserId) -> Result<User, UserStoreError>;
    /// Returns the users found; callers compare lengths to detect unknown ids.
    async fn find_users_by_ids(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<User>, UserStoreError>;
    async fn find_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> Result<User, UserStoreError>;
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found: {0}")]
    UserNotFound(Uuid),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UserAlreadyExists, Self::UserAlreadyExists) => true,
            (Self::UserNotFound(a), Self::UserNotFound(b)) => a == b,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}
