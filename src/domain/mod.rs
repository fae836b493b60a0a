mod availability;
mod data_stores;
mod email;
mod email_client;
mod entry_id;
mod error;
mod group;
mod planning;
mod project;
mod project_id;
mod shift;
mod user;
mod user_id;

pub use availability::*;
pub use data_stores::*;
pub use email::*;
pub use email_client::*;
pub use entry_id::*;
pub use error::*;
pub use group::*;
pub use planning::*;
pub use project::*;
pub use project_id::*;
pub use shift::*;
pub use user::*;
pub use user_id::*;
