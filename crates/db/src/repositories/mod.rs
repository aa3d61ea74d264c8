//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. [`PgVoteStore`] is the exception:
//! it borrows one connection so the vote reconciler can run inside a
//! transaction.

pub mod comment_repo;
pub mod discussion_repo;
pub mod vote_repo;

pub use comment_repo::CommentRepo;
pub use discussion_repo::DiscussionRepo;
pub use vote_repo::{PgVoteStore, VoteRepo};
