//! git-stepwise - incremental repository migration for Git remotes
//!
//! Pushes an existing repository's history to a new remote in bounded-size
//! batches instead of one monolithic push, so a network interruption or a
//! remote-side size limit only fails a small, resumable batch. Progress is
//! recorded as lightweight tags so an interrupted run can be resumed without
//! redoing work that already landed.

pub mod error;
pub mod migrate;
pub mod repo;
pub mod types;
pub mod walk;
