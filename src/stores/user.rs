//! Defines the user store trait and its implementation for SQLite.

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewUser, PasswordHash, User, UserID, Username},
};

/// Handles the creation and retrieval of [User] objects.
pub trait UserStore {
    /// Create a new user.
    ///
    /// # Errors
    /// Returns [Error::DuplicateUsername] if the username is taken.
    fn create_user(&self, new_user: NewUser) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has the ID `id`.
    fn get_user(&self, id: UserID) -> Result<User, Error>;

    /// Get a user by their exact username.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has the username.
    fn get_user_by_username(&self, username: &str) -> Result<User, Error>;
}

impl UserStore for Connection {
    fn create_user(&self, new_user: NewUser) -> Result<User, Error> {
        let date_joined = OffsetDateTime::now_utc();

        self.execute(
            "INSERT INTO user (username, email, password, is_staff, date_joined)
            VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                new_user.username.as_ref(),
                new_user.email.to_string(),
                new_user.password_hash.as_ref(),
                new_user.is_staff,
                date_joined,
            ),
        )?;

        Ok(User {
            id: UserID::new(self.last_insert_rowid()),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            is_staff: new_user.is_staff,
            date_joined,
        })
    }

    fn get_user(&self, id: UserID) -> Result<User, Error> {
        self.prepare(
            "SELECT id, username, email, password, is_staff, date_joined
            FROM user WHERE id = :id",
        )?
        .query_row(&[(":id", &id.as_i64())], User::map_row)
        .map_err(|error| error.into())
    }

    fn get_user_by_username(&self, username: &str) -> Result<User, Error> {
        self.prepare(
            "SELECT id, username, email, password, is_staff, date_joined
            FROM user WHERE username = :username",
        )?
        .query_row(&[(":username", username)], User::map_row)
        .map_err(|error| error.into())
    }
}

impl CreateTable for User {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                email TEXT NOT NULL,
                password TEXT NOT NULL,
                is_staff INTEGER NOT NULL DEFAULT 0,
                date_joined TEXT NOT NULL
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for User {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_username: String = row.get(offset + 1)?;
        let raw_email: String = row.get(offset + 2)?;
        let raw_password_hash: String = row.get(offset + 3)?;

        Ok(User {
            id: UserID::new(row.get(offset)?),
            username: Username::new_unchecked(&raw_username),
            email: EmailAddress::new_unchecked(raw_email),
            password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            is_staff: row.get(offset + 4)?,
            date_joined: row.get(offset + 5)?,
        })
    }
}

#[cfg(test)]
mod user_store_tests {
    use email_address::EmailAddress;

    use crate::{
        Error,
        models::{NewUser, PasswordHash, UserID, Username},
        stores::{
            UserStore,
            test_utils::{get_test_connection, insert_test_user},
        },
    };

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: Username::new_unchecked(username),
            email: EmailAddress::new_unchecked("user@example.com"),
            password_hash: PasswordHash::new_unchecked("hunter2hash"),
            is_staff: false,
        }
    }

    #[test]
    fn create_user_succeeds() {
        let connection = get_test_connection();

        let user = connection.create_user(new_user("layla")).unwrap();

        assert!(user.id.as_i64() > 0);
        assert_eq!(user.username.as_ref(), "layla");
        assert!(!user.is_staff);
    }

    #[test]
    fn create_user_fails_on_duplicate_username() {
        let connection = get_test_connection();
        connection.create_user(new_user("layla")).unwrap();

        let result = connection.create_user(new_user("layla"));

        assert_eq!(result, Err(Error::DuplicateUsername));
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let connection = get_test_connection();
        connection.create_user(new_user("layla")).unwrap();

        assert!(connection.create_user(new_user("Layla")).is_ok());
    }

    #[test]
    fn get_user_returns_created_user() {
        let connection = get_test_connection();
        let want = connection
            .create_user(NewUser {
                is_staff: true,
                ..new_user("omar")
            })
            .unwrap();

        let got = connection.get_user(want.id).unwrap();

        assert_eq!(got.id, want.id);
        assert_eq!(got.username, want.username);
        assert_eq!(got.email, want.email);
        assert_eq!(got.password_hash, want.password_hash);
        assert!(got.is_staff);
    }

    #[test]
    fn get_user_fails_on_missing_id() {
        let connection = get_test_connection();

        assert_eq!(connection.get_user(UserID::new(42)), Err(Error::NotFound));
    }

    #[test]
    fn get_user_by_username_succeeds() {
        let connection = get_test_connection();
        let want = insert_test_user(&connection, "sara");

        let got = connection.get_user_by_username("sara").unwrap();

        assert_eq!(got.id, want.id);
    }

    #[test]
    fn get_user_by_username_fails_on_unknown_name() {
        let connection = get_test_connection();
        insert_test_user(&connection, "sara");

        assert_eq!(
            connection.get_user_by_username("SARA"),
            Err(Error::NotFound)
        );
    }
}
