pub mod bouts;
pub mod connection;
pub mod fighters;
pub mod ledger;
pub mod models;
pub mod setup;

pub use connection::{create_pool, get_connection, DbConn, DbPool};
pub use ledger::{append_bouts, load_ledger, replace_ledger, AppendSummary};
pub use models::*;
