use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    EntryId, Identifiable, PlanningAssignment, PlanningAssignmentDetail,
    PlanningEntry, PlanningStore, PlanningStoreError, Project, ProjectId,
    UserId,
};

/// In-memory collection of identifiable documents.
pub struct Collection<T> {
    documents: HashMap<Uuid, T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            documents: HashMap::new(),
        }
    }
}

impl<T: Identifiable + Clone> Collection<T> {
    pub fn upsert(&mut self, mut document: T) -> T {
        let id = document.ensure_id();
        self.documents.insert(id, document.clone());
        document
    }

    pub fn get(&self, id: &Uuid) -> Option<&T> {
        self.documents.get(id)
    }

    pub fn find<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.documents
            .values()
            .filter(|document| predicate(document))
            .cloned()
            .collect()
    }
}

#[derive(Default)]
pub struct HashmapPlanningStore {
    projects: RwLock<Collection<Project>>,
    entries: RwLock<Collection<PlanningEntry>>,
    assignments: RwLock<Collection<PlanningAssignment>>,
}

#[async_trait::async_trait]
impl PlanningStore for HashmapPlanningStore {
    async fn get_projects(&self) -> Result<Vec<Project>, PlanningStoreError> {
        let mut projects = self.projects.read().await.find(|_| true);
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(projects)
    }

    async fn get_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Project, PlanningStoreError> {
        self.projects
            .read()
            .await
            .get(project_id.as_ref())
            .cloned()
            .ok_or(PlanningStoreError::NotFound(*project_id.as_ref()))
    }

    async fn upsert_project(
        &self,
        project: Project,
    ) -> Result<Project, PlanningStoreError> {
        Ok(self.projects.write().await.upsert(project))
    }

    async fn get_entry(
        &self,
        entry_id: &EntryId,
    ) -> Result<PlanningEntry, PlanningStoreError> {
        self.entries
            .read()
            .await
            .get(entry_id.as_ref())
            .cloned()
            .ok_or(PlanningStoreError::NotFound(*entry_id.as_ref()))
    }

    async fn get_entries_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<PlanningEntry>, PlanningStoreError> {
        let mut entries = self
            .entries
            .read()
            .await
            .find(|entry| &entry.project_id == project_id);
        entries.sort_by(|a, b| a.start.cmp(&b.start));
        Ok(entries)
    }

    async fn upsert_entry(
        &self,
        entry: PlanningEntry,
    ) -> Result<PlanningEntry, PlanningStoreError> {
        Ok(self.entries.write().await.upsert(entry))
    }

    async fn get_active_assignments(
        &self,
        entry_id: &EntryId,
    ) -> Result<Vec<PlanningAssignment>, PlanningStoreError> {
        Ok(self.assignments.read().await.find(|assignment| {
            &assignment.entry_id == entry_id && !assignment.cancelled
        }))
    }

    async fn upsert_assignments(
        &self,
        assignments: Vec<PlanningAssignment>,
    ) -> Result<(), PlanningStoreError> {
        let mut collection = self.assignments.write().await;
        for assignment in assignments {
            collection.upsert(assignment);
        }
        Ok(())
    }

    async fn get_assignment_details(
        &self,
        employee_id: &UserId,
    ) -> Result<Vec<PlanningAssignmentDetail>, PlanningStoreError> {
        let assignments = self
            .assignments
            .read()
            .await
            .find(|assignment| &assignment.employee_id == employee_id);
        let entries = self.entries.read().await;
        let projects = self.projects.read().await;

        let mut details: Vec<PlanningAssignmentDetail> = assignments
            .into_iter()
            .filter_map(|assignment| {
                let entry = entries.get(assignment.entry_id.as_ref())?.clone();
                let project = projects.get(entry.project_id.as_ref()).cloned();
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
