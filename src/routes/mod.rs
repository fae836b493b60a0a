pub mod planning;
pub mod projects;
