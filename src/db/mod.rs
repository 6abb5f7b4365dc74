pub mod connection;
pub mod escrows;

pub use connection::{bootstrap_db, Database};
#[cfg(test)]
pub use connection::init_db;
pub use escrows::{find_by_address, select_needing_data};
