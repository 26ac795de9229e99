use time::OffsetDateTime;

use crate::{
    models::{DatabaseID, Status, UserID, Username},
    money::Money,
};

/// The ID of a [Transfer].
pub type TransferId = DatabaseID;

/// Wallet balance moved from one user to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    /// The ID of the transfer.
    pub id: TransferId,
    /// The user the money came from.
    pub sender_id: UserID,
    /// The user the money went to.
    pub receiver_id: UserID,
    /// How much was moved.
    pub amount: Money,
    /// Where the transfer is in its processing.
    pub status: Status,
    /// When the transfer was made, in UTC.
    pub timestamp: OffsetDateTime,
}

/// A transfer that has not been saved yet.
///
/// Transfers are recorded as [Status::Completed].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransfer {
    /// The user sending the money.
    pub sender_id: UserID,
    /// The user receiving the money.
    pub receiver_id: UserID,
    /// How much to move.
    pub amount: Money,
}

/// A transfer with the usernames of both parties.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferDetails {
    /// The stored transfer.
    pub transfer: Transfer,
    /// The name of the sender.
    pub sender_username: Username,
    /// The name of the receiver.
    pub receiver_username: Username,
}
