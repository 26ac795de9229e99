//! Storage for [Transfer]s between users.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewTransfer, Status, Transfer, TransferDetails, UserID, Username},
};

/// Handles the creation and retrieval of transfers.
pub trait TransferStore {
    /// Record a completed transfer.
    ///
    /// This does not check the sender's balance; see
    /// [transfer_funds](crate::transfer::transfer_funds) for that.
    fn create_transfer(&self, transfer: NewTransfer) -> Result<Transfer, Error>;

    /// Get the transfers sent by a user, newest first.
    fn get_sent_transfers(&self, user_id: UserID) -> Result<Vec<TransferDetails>, Error>;

    /// Get the transfers received by a user, newest first.
    fn get_received_transfers(&self, user_id: UserID) -> Result<Vec<TransferDetails>, Error>;

    /// Get every transfer, newest first.
    fn get_all_transfers(&self) -> Result<Vec<TransferDetails>, Error>;
}

const SELECT_TRANSFER_DETAILS: &str = "SELECT t.id, t.sender_id, t.receiver_id, t.amount, \
    t.status, t.timestamp, sender.username, receiver.username
    FROM transfer t
    INNER JOIN user sender ON sender.id = t.sender_id
    INNER JOIN user receiver ON receiver.id = t.receiver_id";

fn map_details_row(row: &Row) -> Result<TransferDetails, rusqlite::Error> {
    let transfer = Transfer::map_row(row)?;
    let sender_username: String = row.get(6)?;
    let receiver_username: String = row.get(7)?;

    Ok(TransferDetails {
        transfer,
        sender_username: Username::new_unchecked(&sender_username),
        receiver_username: Username::new_unchecked(&receiver_username),
    })
}

fn query_transfer_details(
    connection: &Connection,
    filter: &str,
    user_id: Option<UserID>,
) -> Result<Vec<TransferDetails>, Error> {
    let mut statement = connection.prepare(&format!(
        "{SELECT_TRANSFER_DETAILS} {filter} ORDER BY t.timestamp DESC, t.id DESC"
    ))?;

    let rows = match user_id {
        Some(user_id) => statement.query_map(&[(":user_id", &user_id.as_i64())], map_details_row)?,
        None => statement.query_map([], map_details_row)?,
    };

    rows.map(|maybe_details| maybe_details.map_err(Error::from))
        .collect()
}

impl TransferStore for Connection {
    fn create_transfer(&self, transfer: NewTransfer) -> Result<Transfer, Error> {
        let timestamp = OffsetDateTime::now_utc();
        let status = Status::Completed;

        self.execute(
            "INSERT INTO transfer (sender_id, receiver_id, amount, status, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                transfer.sender_id.as_i64(),
                transfer.receiver_id.as_i64(),
                transfer.amount,
                status,
                timestamp,
            ),
        )?;

        Ok(Transfer {
            id: self.last_insert_rowid(),
            sender_id: transfer.sender_id,
            receiver_id: transfer.receiver_id,
            amount: transfer.amount,
            status,
            timestamp,
        })
    }

    fn get_sent_transfers(&self, user_id: UserID) -> Result<Vec<TransferDetails>, Error> {
        query_transfer_details(self, "WHERE t.sender_id = :user_id", Some(user_id))
    }

    fn get_received_transfers(&self, user_id: UserID) -> Result<Vec<TransferDetails>, Error> {
        query_transfer_details(self, "WHERE t.receiver_id = :user_id", Some(user_id))
    }

    fn get_all_transfers(&self) -> Result<Vec<TransferDetails>, Error> {
        query_transfer_details(self, "", None)
    }
}

impl CreateTable for Transfer {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS transfer (
                id INTEGER PRIMARY KEY,
                sender_id INTEGER NOT NULL,
                receiver_id INTEGER NOT NULL,
                amount INTEGER NOT NULL,
                status TEXT NOT NULL DEFAULT 'completed',
                timestamp TEXT NOT NULL,
                FOREIGN KEY(sender_id) REFERENCES user(id) ON DELETE CASCADE,
                FOREIGN KEY(receiver_id) REFERENCES user(id) ON DELETE CASCADE
            )",
            (),
        )?;

        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transfer_sender ON transfer(sender_id)",
            (),
        )?;
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transfer_receiver ON transfer(receiver_id)",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Transfer {
    type ReturnType = Transfer;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transfer {
            id: row.get(offset)?,
            sender_id: UserID::new(row.get(offset + 1)?),
            receiver_id: UserID::new(row.get(offset + 2)?),
            amount: row.get(offset + 3)?,
            status: row.get(offset + 4)?,
            timestamp: row.get(offset + 5)?,
        })
    }
}
