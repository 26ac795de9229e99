//! Derives wallet balances from the append-only tables.

use rusqlite::Connection;

use crate::{Error, models::UserID, money::Money};

/// Computes wallet balances.
pub trait BalanceStore {
    /// The wallet balance of `user_id`:
    /// deposits − withdrawals − investments − transfers sent + transfers received.
    ///
    /// The balance is computed from the current rows on every call and may
    /// be negative. Transactions count whatever their status.
    fn wallet_balance(&self, user_id: UserID) -> Result<Money, Error>;
}

impl BalanceStore for Connection {
    fn wallet_balance(&self, user_id: UserID) -> Result<Money, Error> {
        self.query_row(
            "SELECT
                (SELECT COALESCE(SUM(amount), 0) FROM wallet_transaction
                    WHERE user_id = :user_id AND transaction_type = 'deposit')
              - (SELECT COALESCE(SUM(amount), 0) FROM wallet_transaction
                    WHERE user_id = :user_id AND transaction_type = 'withdrawal')
              - (SELECT COALESCE(SUM(invested_amount), 0) FROM subscription
                    WHERE user_id = :user_id)
              - (SELECT COALESCE(SUM(amount), 0) FROM transfer
                    WHERE sender_id = :user_id)
              + (SELECT COALESCE(SUM(amount), 0) FROM transfer
                    WHERE receiver_id = :user_id)",
            &[(":user_id", &user_id.as_i64())],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
    }
}
