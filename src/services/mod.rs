pub mod data_stores;
mod group_registry;
#[cfg(test)]
mod mock_email_client;
mod notification_queue;
pub mod planning;
pub mod postmark_email_client;

pub use group_registry::*;
#[cfg(test)]
pub use mock_email_client::*;
pub use notification_queue::*;
