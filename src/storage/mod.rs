pub mod db;
mod drafts;
pub mod models;
mod tables;

pub use db::{Database, DatabaseError};
pub use tables::*;
