//! PostgreSQL schema description.

/// Schema metadata for PostgreSQL tables.
///
/// All methods return `&'static str` so statements can be assembled at
/// compile time via `const_format::concatcp!`. This trait performs no I/O.
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}
