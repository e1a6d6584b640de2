// ABOUTME: Command handlers behind the tagkeep CLI.
// ABOUTME: Load stored state, run a lifecycle operation, and persist the result.

mod runtime_connection;
mod secret;
mod tag;

pub use runtime_connection::connect_local;
pub use secret::{create_secret, destroy_secret, refresh_secret, show_secret};
pub use tag::{apply_tag, destroy_tag, refresh_tag, show_tag};
