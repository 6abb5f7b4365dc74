mod artifact;
mod statement;

pub use artifact::write_artifact;
pub use statement::{emit, UpdateStatement};
