//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result, RoundsError};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Enable foreign keys for this connection
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        // Execute the schema SQL
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        // Apply migrations for existing databases
        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Check if care_label column exists in stops table
        let has_care_label_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('stops') WHERE name = 'care_label'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        // Add care_label column if it doesn't exist
        if !has_care_label_column {
            self.connection
                .execute(
                    "ALTER TABLE stops ADD COLUMN care_label TEXT NOT NULL DEFAULT ''",
                    [],
                )
                .map_err(|e| {
                    RoundsError::database("Failed to add care_label column to stops table", e)
                })?;
        }

        Ok(())
    }
}
