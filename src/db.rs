//! Traits shared by the SQLite stores and the function that sets up the
//! application database.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    models::{InvestmentPlan, Subscription, Transaction, Transfer, User},
};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create the table for the model if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for mapping from a `rusqlite::Row` to a concrete rust type.
pub trait MapRow {
    /// The type built from the row.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row contains the table
    /// columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a column cannot be converted into the corresponding rust type.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type, reading from the column `offset`.
    ///
    /// This is useful when tables have been joined and more than one type is
    /// built from a single row.
    ///
    /// # Errors
    /// Returns an error if a column cannot be converted into the corresponding rust type.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// Create the tables for all the domain models.
///
/// Foreign keys are switched on for `connection`, so this should be called
/// on every new connection before it is used.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    User::create_table(connection)?;
    InvestmentPlan::create_table(connection)?;
    Transaction::create_table(connection)?;
    Subscription::create_table(connection)?;
    Transfer::create_table(connection)?;

    Ok(())
}
