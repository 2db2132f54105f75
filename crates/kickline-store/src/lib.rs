// Library root: SQLite reference store for the kickline engine.

pub mod db;
pub mod source;

pub use db::Database;
