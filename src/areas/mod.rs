//! Core repository components
//!
//! - `config`: The `[core]` section of `.git/config`
//! - `database`: Loose object store under `.git/objects`
//! - `index`: Staging area (`.git/index`)
//! - `refs`: HEAD, branches and tags
//! - `repository`: Facade tying the components together
//! - `workspace`: Working tree file system access

pub mod config;
pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
