//! Domain logic shared by the database and API crates.
//!
//! Nothing in here performs I/O directly: the comment tree builder is a pure
//! transformation, and the vote reconciler talks to storage only through the
//! [`vote_store::VoteStore`] port.

pub mod comment_tree;
pub mod discussion;
pub mod error;
pub mod reconciler;
pub mod types;
pub mod vote_store;
pub mod votes;

#[cfg(any(test, feature = "testing"))]
pub mod memory;
