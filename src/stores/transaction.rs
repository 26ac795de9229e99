//! Storage for deposit and withdrawal requests.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{
        NewTransaction, Status, Transaction, TransactionDetails, UserID, Username,
    },
};

/// Handles the creation and retrieval of [Transaction]s.
///
/// Transactions are append-only: there is no way to edit or delete one.
pub trait TransactionStore {
    /// Record a deposit or withdrawal request with the status [Status::Pending].
    fn create_transaction(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Get the transactions of one user, newest first.
    fn get_transactions_for_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// Get every user's transactions, newest first.
    fn get_all_transactions(&self) -> Result<Vec<TransactionDetails>, Error>;
}

impl TransactionStore for Connection {
    fn create_transaction(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let created_at = OffsetDateTime::now_utc();
        let status = Status::Pending;

        self.execute(
            "INSERT INTO wallet_transaction
            (user_id, transaction_type, amount, method, created_at, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                transaction.user_id.as_i64(),
                transaction.transaction_type,
                transaction.amount,
                transaction.method,
                created_at,
                status,
            ),
        )?;

        Ok(Transaction {
            id: self.last_insert_rowid(),
            user_id: transaction.user_id,
            transaction_type: transaction.transaction_type,
            amount: transaction.amount,
            method: transaction.method,
            created_at,
            status,
        })
    }

    fn get_transactions_for_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        let mut statement = self.prepare(
            "SELECT id, user_id, transaction_type, amount, method, created_at, status
            FROM wallet_transaction
            WHERE user_id = :user_id
            ORDER BY created_at DESC, id DESC",
        )?;
        let rows = statement.query_map(&[(":user_id", &user_id.as_i64())], Transaction::map_row)?;

        rows.map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    fn get_all_transactions(&self) -> Result<Vec<TransactionDetails>, Error> {
        let mut statement = self.prepare(
            "SELECT t.id, t.user_id, t.transaction_type, t.amount, t.method, t.created_at,
                t.status, u.username
            FROM wallet_transaction t
            INNER JOIN user u ON u.id = t.user_id
            ORDER BY t.created_at DESC, t.id DESC",
        )?;
        let rows = statement.query_map([], |row| {
            let transaction = Transaction::map_row(row)?;
            let username: String = row.get(7)?;

            Ok(TransactionDetails {
                transaction,
                username: Username::new_unchecked(&username),
            })
        })?;

        rows.map(|maybe_details| maybe_details.map_err(Error::from))
            .collect()
    }
}

impl CreateTable for Transaction {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS wallet_transaction (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                transaction_type TEXT NOT NULL,
                amount INTEGER NOT NULL,
                method TEXT NOT NULL,
                created_at TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE
            )",
            (),
        )?;

        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_wallet_transaction_user
            ON wallet_transaction(user_id)",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Transaction {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transaction {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            transaction_type: row.get(offset + 2)?,
            amount: row.get(offset + 3)?,
            method: row.get(offset + 4)?,
            created_at: row.get(offset + 5)?,
            status: row.get(offset + 6)?,
        })
    }
}

#[cfg(test)]
mod transaction_store_tests {
    use crate::{
        models::{NewTransaction, PaymentMethod, Status, TransactionType, UserID},
        money::Money,
        stores::{
            TransactionStore,
            test_utils::{get_test_connection, insert_test_user},
        },
    };

    #[test]
    fn new_transactions_are_pending() {
        let connection = get_test_connection();
        let user = insert_test_user(&connection, "layla");

        let transaction = connection
            .create_transaction(NewTransaction {
                user_id: user.id,
                transaction_type: TransactionType::Deposit,
                amount: Money::from_dinar(50),
                method: PaymentMethod::Cash,
            })
            .unwrap();

        assert_eq!(transaction.status, Status::Pending);
        assert_eq!(
            connection.get_transactions_for_user(user.id).unwrap(),
            vec![transaction]
        );
    }

    #[test]
    fn transactions_of_other_users_are_not_returned() {
        let connection = get_test_connection();
        let layla = insert_test_user(&connection, "layla");
        let omar = insert_test_user(&connection, "omar");
        connection
            .create_transaction(NewTransaction {
                user_id: omar.id,
                transaction_type: TransactionType::Withdrawal,
                amount: Money::from_dinar(5),
                method: PaymentMethod::Bank,
            })
            .unwrap();

        assert!(connection.get_transactions_for_user(layla.id).unwrap().is_empty());
    }

    #[test]
    fn transaction_for_unknown_user_is_rejected() {
        let connection = get_test_connection();

        let result = connection.create_transaction(NewTransaction {
            user_id: UserID::new(99),
            transaction_type: TransactionType::Deposit,
            amount: Money::from_dinar(5),
            method: PaymentMethod::Paypal,
        });

        assert!(result.is_err());
    }

    #[test]
    fn all_transactions_include_usernames_newest_first() {
        let connection = get_test_connection();
        let layla = insert_test_user(&connection, "layla");
        let omar = insert_test_user(&connection, "omar");
        for (user_id, method) in [(layla.id, PaymentMethod::QrCode), (omar.id, PaymentMethod::Bank)]
        {
            connection
                .create_transaction(NewTransaction {
                    user_id,
                    transaction_type: TransactionType::Deposit,
                    amount: Money::from_dinar(1),
                    method,
                })
                .unwrap();
        }

        let got = connection.get_all_transactions().unwrap();

        let usernames: Vec<&str> = got.iter().map(|details| details.username.as_ref()).collect();
        assert_eq!(usernames, ["omar", "layla"]);
        assert_eq!(got[1].transaction.method, PaymentMethod::QrCode);
    }
}
