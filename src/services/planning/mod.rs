mod employees;
mod notify;
mod orchestrator;
mod projects;
mod reconcile;
mod upsert;
mod validator;


pub use employees::*;
pub use notify::*;
pub use orchestrator::*;
pub use projects::*;
pub use reconcile::*;
pub use upsert::*;
pub use validator::*;
