//! Storage for [Subscription]s.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewSubscription, Subscription, SubscriptionDetails, UserID, Username},
};

/// Handles the creation and retrieval of subscriptions to investment plans.
pub trait SubscriptionStore {
    /// Record that a user invested in a plan.
    fn create_subscription(&self, subscription: NewSubscription) -> Result<Subscription, Error>;

    /// Get the subscriptions of one user, newest first.
    fn get_subscriptions_for_user(
        &self,
        user_id: UserID,
    ) -> Result<Vec<SubscriptionDetails>, Error>;

    /// Get every subscription, newest first.
    fn get_all_subscriptions(&self) -> Result<Vec<SubscriptionDetails>, Error>;
}

const SELECT_SUBSCRIPTION_DETAILS: &str = "SELECT s.id, s.user_id, s.plan_id, \
    s.invested_amount, s.subscribed_at, u.username, p.name
    FROM subscription s
    INNER JOIN user u ON u.id = s.user_id
    INNER JOIN investment_plan p ON p.id = s.plan_id";

fn map_details_row(row: &Row) -> Result<SubscriptionDetails, rusqlite::Error> {
    let subscription = Subscription::map_row(row)?;
    let username: String = row.get(5)?;

    Ok(SubscriptionDetails {
        subscription,
        username: Username::new_unchecked(&username),
        plan_name: row.get(6)?,
    })
}

impl SubscriptionStore for Connection {
    fn create_subscription(&self, subscription: NewSubscription) -> Result<Subscription, Error> {
        let subscribed_at = OffsetDateTime::now_utc();

        self.execute(
            "INSERT INTO subscription (user_id, plan_id, invested_amount, subscribed_at)
            VALUES (?1, ?2, ?3, ?4)",
            (
                subscription.user_id.as_i64(),
                subscription.plan_id,
                subscription.invested_amount,
                subscribed_at,
            ),
        )?;

        Ok(Subscription {
            id: self.last_insert_rowid(),
            user_id: subscription.user_id,
            plan_id: subscription.plan_id,
            invested_amount: subscription.invested_amount,
            subscribed_at,
        })
    }

    fn get_subscriptions_for_user(
        &self,
        user_id: UserID,
    ) -> Result<Vec<SubscriptionDetails>, Error> {
        let mut statement = self.prepare(&format!(
            "{SELECT_SUBSCRIPTION_DETAILS}
            WHERE s.user_id = :user_id
            ORDER BY s.subscribed_at DESC, s.id DESC"
        ))?;
        let rows = statement.query_map(&[(":user_id", &user_id.as_i64())], map_details_row)?;

        rows.map(|maybe_details| maybe_details.map_err(Error::from))
            .collect()
    }

    fn get_all_subscriptions(&self) -> Result<Vec<SubscriptionDetails>, Error> {
        let mut statement = self.prepare(&format!(
            "{SELECT_SUBSCRIPTION_DETAILS} ORDER BY s.subscribed_at DESC, s.id DESC"
        ))?;
        let rows = statement.query_map([], map_details_row)?;

        rows.map(|maybe_details| maybe_details.map_err(Error::from))
            .collect()
    }
}

impl CreateTable for Subscription {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS subscription (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                plan_id INTEGER NOT NULL,
                invested_amount INTEGER NOT NULL,
                subscribed_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE,
                FOREIGN KEY(plan_id) REFERENCES investment_plan(id) ON DELETE CASCADE
            )",
            (),
        )?;

        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_subscription_user ON subscription(user_id)",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Subscription {
    type ReturnType = Subscription;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Subscription {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            plan_id: row.get(offset + 2)?,
            invested_amount: row.get(offset + 3)?,
            subscribed_at: row.get(offset + 4)?,
        })
    }
}

#[cfg(test)]
mod subscription_store_tests {
    use crate::{
        models::NewSubscription,
        money::Money,
        stores::{
            SubscriptionStore,
            test_utils::{get_test_connection, insert_test_plan, insert_test_user},
        },
    };

    #[test]
    fn create_subscription_succeeds() {
        let connection = get_test_connection();
        let user = insert_test_user(&connection, "layla");
        let plan = insert_test_plan(&connection, "Gold", Money::from_dinar(100));

        let subscription = connection
            .create_subscription(NewSubscription {
                user_id: user.id,
                plan_id: plan.id,
                invested_amount: Money::from_dinar(150),
            })
            .unwrap();

        let got = connection.get_subscriptions_for_user(user.id).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].subscription, subscription);
        assert_eq!(got[0].plan_name, "Gold");
        assert_eq!(got[0].username.as_ref(), "layla");
    }

    #[test]
    fn subscription_to_unknown_plan_is_rejected() {
        let connection = get_test_connection();
        let user = insert_test_user(&connection, "layla");

        let result = connection.create_subscription(NewSubscription {
            user_id: user.id,
            plan_id: 7,
            invested_amount: Money::from_dinar(150),
        });

        assert!(result.is_err());
    }

    #[test]
    fn all_subscriptions_include_every_user() {
        let connection = get_test_connection();
        let plan = insert_test_plan(&connection, "Gold", Money::ZERO);
        for username in ["layla", "omar"] {
            let user = insert_test_user(&connection, username);
            connection
                .create_subscription(NewSubscription {
                    user_id: user.id,
                    plan_id: plan.id,
                    invested_amount: Money::from_dinar(10),
                })
                .unwrap();
        }

        let got = connection.get_all_subscriptions().unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].username.as_ref(), "omar");
    }
}
