mod get_project;
mod list_projects;
mod upsert_project;

pub use get_project::get_project;
pub use list_projects::list_projects;
pub use upsert_project::{upsert_project, UpsertProjectRequest};
