//! CLI operation mode handlers.
//!
//! - [`locate`]: Print the function region around a byte offset
//! - [`detect_paths`]: Print file paths mentioned in a text file
//! - [`submit`]: Commit a manifest of edits and open a pull request
//! - [`update_branch`]: Commit a manifest of edits onto an existing branch
//! - [`pull_requests`]: List, approve, comment on, merge or close pull
//!   requests and delete branches
//!
//! Output formatting utilities are in [`output`].

pub mod detect_paths;
pub mod locate;
pub mod output;
pub mod pull_requests;
pub mod submit;
pub mod update_branch;

#[cfg(test)]
pub mod test_utils;
