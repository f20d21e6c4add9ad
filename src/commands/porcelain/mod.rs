//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files for commit
//! - `commit`: Create a new commit
//! - `log`: Show the first-parent history of a commit
//! - `tag`: List or create tags
//! - `status`: Show working tree status

pub mod add;
pub mod commit;
pub mod init;
pub mod log;
pub mod status;
pub mod tag;
