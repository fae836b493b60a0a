use chrono::{DateTime, NaiveDateTime, Utc};
use color_eyre::eyre::eyre;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::domain::{
    AssignmentId, Comment, EntryId, Group, Identifiable, PlanningAssignment,
    PlanningAssignmentDetail, PlanningEntry, PlanningStore, PlanningStoreError,
    Project, ProjectId, ProjectName, ProjectType, UserId,
};

/// Planning documents of one group. Every statement filters on `group_name`.
pub struct PostgresPlanningStore {
    pool: PgPool,
    group: Group,
}

impl PostgresPlanningStore {
    pub fn new(pool: PgPool, group: Group) -> Self {
        Self { pool, group }
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    project_name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    archived: bool,
    project_type: String,
}

impl TryFrom<ProjectRow> for Project {
    type Error = PlanningStoreError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: Some(ProjectId::new(row.id)),
            name: ProjectName::parse(&row.project_name)
                .map_err(PlanningStoreError::UnexpectedError)?,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            archived: row.archived,
            project_type: row
                .project_type
                .parse::<ProjectType>()
                .map_err(|e| PlanningStoreError::UnexpectedError(eyre!(e)))?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: Uuid,
    project_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    start_at: NaiveDateTime,
    end_at: NaiveDateTime,
    employee_ids: Vec<Uuid>,
    multiple_assignment: bool,
    title: String,
    description: Option<String>,
    comments: Json<Vec<Comment>>,
}

impl From<EntryRow> for PlanningEntry {
    fn from(row: EntryRow) -> Self {
        PlanningEntry {
            id: Some(EntryId::new(row.id)),
            project_id: ProjectId::new(row.project_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
            start: row.start_at,
            end: row.end_at,
            employee_ids: row.employee_ids.into_iter().map(UserId::new).collect(),
            multiple_assignment: row.multiple_assignment,
            title: row.title,
            description: row.description,
            comments: row.comments.0,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AssignmentRow {
    id: Uuid,
    entry_id: Uuid,
    employee_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    send_date: DateTime<Utc>,
    cancelled: bool,
}

impl From<AssignmentRow> for PlanningAssignment {
    fn from(row: AssignmentRow) -> Self {
        PlanningAssignment {
            id: AssignmentId::new(row.id),
            entry_id: EntryId::new(row.entry_id),
            employee_id: UserId::new(row.employee_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
            send_date: row.send_date,
            cancelled: row.cancelled,
        }
    }
}

const PROJECT_COLUMNS: &str = "id, project_name, description, created_at, \
     updated_at, archived, project_type";
const ENTRY_COLUMNS: &str = "id, project_id, created_at, updated_at, start_at, \
     end_at, employee_ids, multiple_assignment, title, description, comments";
const ASSIGNMENT_COLUMNS: &str = "id, entry_id, employee_id, created_at, \
     updated_at, send_date, cancelled";

fn unexpected(e: sqlx::Error) -> PlanningStoreError {
    PlanningStoreError::UnexpectedError(eyre!(e))
}

/// An upsert that touched no row hit an id owned by another group.
fn ensure_owned(rows_affected: u64, id: Uuid) -> Result<(), PlanningStoreError> {
    match rows_affected {
        0 => Err(PlanningStoreError::IdConflict(id)),
        _ => Ok(()),
    }
}

#[async_trait::async_trait]
impl PlanningStore for PostgresPlanningStore {
    #[tracing::instrument(name = "Getting projects from PostgreSQL", skip_all)]
    async fn get_projects(&self) -> Result<Vec<Project>, PlanningStoreError> {
        let rows: Vec<ProjectRow> = sqlx::query_as(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects \
             WHERE group_name = $1 ORDER BY created_at"
        ))
        .bind(self.group.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        rows.into_iter().map(Project::try_from).collect()
    }

    #[tracing::instrument(name = "Getting project from PostgreSQL", skip_all)]
    async fn get_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Project, PlanningStoreError> {
        let row: ProjectRow = sqlx::query_as(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects \
             WHERE id = $1 AND group_name = $2"
        ))
        .bind(project_id.as_ref())
        .bind(self.group.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PlanningStoreError::NotFound(*project_id.as_ref())
            }
            e => unexpected(e),
        })?;

        row.try_into()
    }

    #[tracing::instrument(name = "Upserting project in PostgreSQL", skip_all)]
    async fn upsert_project(
        &self,
        mut project: Project,
    ) -> Result<Project, PlanningStoreError> {
        let id = project.ensure_id();
        let result = sqlx::query(
            r#"
            INSERT INTO projects (id, group_name, project_name, description,
                created_at, updated_at, archived, project_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                project_name = EXCLUDED.project_name,
                description = EXCLUDED.description,
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at,
                archived = EXCLUDED.archived,
                project_type = EXCLUDED.project_type
            WHERE projects.group_name = EXCLUDED.group_name
            "#,
        )
        .bind(id)
        .bind(self.group.as_ref())
        .bind(project.name.as_ref())
        .bind(&project.description)
        .bind(project.created_at)
        .bind(project.updated_at)
        .bind(project.archived)
        .bind(project.project_type.as_str())
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        ensure_owned(result.rows_affected(), id)?;

        Ok(project)
    }

    #[tracing::instrument(name = "Getting entry from PostgreSQL", skip_all)]
    async fn get_entry(
        &self,
        entry_id: &EntryId,
    ) -> Result<PlanningEntry, PlanningStoreError> {
        let row: EntryRow = sqlx::query_as(&format!(
            "SELECT {ENTRY_COLUMNS} FROM planning_entries \
             WHERE id = $1 AND group_name = $2"
        ))
        .bind(entry_id.as_ref())
        .bind(self.group.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PlanningStoreError::NotFound(*entry_id.as_ref())
            }
            e => unexpected(e),
        })?;

        Ok(row.into())
    }

    #[tracing::instrument(
        name = "Getting project entries from PostgreSQL",
        skip_all
    )]
    async fn get_entries_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<PlanningEntry>, PlanningStoreError> {
        let rows: Vec<EntryRow> = sqlx::query_as(&format!(
            "SELECT {ENTRY_COLUMNS} FROM planning_entries \
             WHERE project_id = $1 AND group_name = $2 ORDER BY start_at"
        ))
        .bind(project_id.as_ref())
        .bind(self.group.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(rows.into_iter().map(PlanningEntry::from).collect())
    }

    #[tracing::instrument(name = "Upserting entry in PostgreSQL", skip_all)]
    async fn upsert_entry(
        &self,
        mut entry: PlanningEntry,
    ) -> Result<PlanningEntry, PlanningStoreError> {
        let id = entry.ensure_id();
        let employee_ids: Vec<Uuid> =
            entry.employee_ids.iter().map(|id| *id.as_ref()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO planning_entries (id, group_name, project_id,
                created_at, updated_at, start_at, end_at, employee_ids,
                multiple_assignment, title, description, comments)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                project_id = EXCLUDED.project_id,
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at,
                start_at = EXCLUDED.start_at,
                end_at = EXCLUDED.end_at,
                employee_ids = EXCLUDED.employee_ids,
                multiple_assignment = EXCLUDED.multiple_assignment,
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                comments = EXCLUDED.comments
            WHERE planning_entries.group_name = EXCLUDED.group_name
            "#,
        )
        .bind(id)
        .bind(self.group.as_ref())
        .bind(entry.project_id.as_ref())
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .bind(entry.start)
        .bind(entry.end)
        .bind(&employee_ids)
        .bind(entry.multiple_assignment)
        .bind(&entry.title)
        .bind(&entry.description)
        .bind(Json(&entry.comments))
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        ensure_owned(result.rows_affected(), id)?;

        Ok(entry)
    }

    #[tracing::instrument(
        name = "Getting active assignments from PostgreSQL",
        skip_all
    )]
    async fn get_active_assignments(
        &self,
        entry_id: &EntryId,
    ) -> Result<Vec<PlanningAssignment>, PlanningStoreError> {
        let rows: Vec<AssignmentRow> = sqlx::query_as(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM planning_assignments \
             WHERE entry_id = $1 AND group_name = $2 AND NOT cancelled"
        ))
        .bind(entry_id.as_ref())
        .bind(self.group.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(rows.into_iter().map(PlanningAssignment::from).collect())
    }

    #[tracing::instrument(
        name = "Bulk upserting assignments in PostgreSQL",
        skip_all
    )]
    async fn upsert_assignments(
        &self,
        assignments: Vec<PlanningAssignment>,
    ) -> Result<(), PlanningStoreError> {
        let mut transaction = self.pool.begin().await.map_err(unexpected)?;

        for assignment in &assignments {
            let result = sqlx::query(
                r#"
                INSERT INTO planning_assignments (id, group_name, entry_id,
                    employee_id, created_at, updated_at, send_date, cancelled)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (id) DO UPDATE SET
                    updated_at = EXCLUDED.updated_at,
                    send_date = EXCLUDED.send_date,
                    cancelled = EXCLUDED.cancelled
                WHERE planning_assignments.group_name = EXCLUDED.group_name
                "#,
            )
            .bind(assignment.id.as_ref())
            .bind(self.group.as_ref())
            .bind(assignment.entry_id.as_ref())
            .bind(assignment.employee_id.as_ref())
            .bind(assignment.created_at)
            .bind(assignment.updated_at)
            .bind(assignment.send_date)
            .bind(assignment.cancelled)
            .execute(&mut *transaction)
            .await
            .map_err(unexpected)?;
            // Dropping the transaction rolls back the rows written so far.
            ensure_owned(result.rows_affected(), *assignment.id.as_ref())?;
        }

        transaction.commit().await.map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(
        name = "Getting assignment details from PostgreSQL",
        skip_all
    )]
    async fn get_assignment_details(
        &self,
        employee_id: &UserId,
    ) -> Result<Vec<PlanningAssignmentDetail>, PlanningStoreError> {
        let assignments: Vec<AssignmentRow> = sqlx::query_as(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM planning_assignments \
             WHERE employee_id = $1 AND group_name = $2"
        ))
        .bind(employee_id.as_ref())
        .bind(self.group.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let entry_ids: Vec<Uuid> =
            assignments.iter().map(|row| row.entry_id).collect();
        let entries: Vec<EntryRow> = sqlx::query_as(&format!(
            "SELECT {ENTRY_COLUMNS} FROM planning_entries \
             WHERE id = ANY($1) AND group_name = $2"
        ))
        .bind(&entry_ids)
        .bind(self.group.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        let entries: Vec<PlanningEntry> =
            entries.into_iter().map(PlanningEntry::from).collect();

        let project_ids: Vec<Uuid> =
            entries.iter().map(|e| *e.project_id.as_ref()).collect();
        let projects: Vec<ProjectRow> = sqlx::query_as(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects \
             WHERE id = ANY($1) AND group_name = $2"
        ))
        .bind(&project_ids)
        .bind(self.group.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        let projects = projects
            .into_iter()
            .map(Project::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut details: Vec<PlanningAssignmentDetail> = assignments
            .into_iter()
            .map(PlanningAssignment::from)
            .filter_map(|assignment| {
                let entry = entries
                    .iter()
                    .find(|e| e.id == Some(assignment.entry_id))?
                    .clone();
                let project = projects
                    .iter()
                    .find(|p| p.id == Some(entry.project_id))
                    .cloned();
                Some(PlanningAssignmentDetail {
                    assignment,
                    entry,
                    project,
                })
            })
            .collect();
        details.sort_by(|a, b| a.entry.start.cmp(&b.entry.start));

        Ok(details)
    }
}
