//! Plumbing commands (low-level operations)
//!
//! Plumbing commands give direct access to objects, the index and references.
//!
//! ## Commands
//!
//! - `hash-object`: Compute object ID and optionally store in database
//! - `cat-file`: Print an object's body, type or size
//! - `ls-tree`: List contents of a tree object
//! - `ls-files`: List staged paths
//! - `rev-parse`: Resolve a name to a digest
//! - `check-ignore`: Report which paths the ignore rules exclude

pub mod cat_file;
pub mod check_ignore;
pub mod hash_object;
pub mod ls_files;
pub mod ls_tree;
pub mod rev_parse;
