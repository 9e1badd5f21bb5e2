//! Representative lookup by ZIP and vote-card filtering.

mod lookup;
mod matcher;

pub use lookup::{is_valid_zip, resolve, Representative};
pub use matcher::{filter, VoteCard};
