//! Storage for [InvestmentPlan]s.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{InvestmentPlan, NewPlan, PlanId},
};

/// Handles the creation and retrieval of investment plans.
pub trait PlanStore {
    /// Save a new plan.
    fn create_plan(&self, plan: NewPlan) -> Result<InvestmentPlan, Error>;

    /// Get a plan by its ID, whether it is active or not.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no plan has the ID `id`.
    fn get_plan(&self, id: PlanId) -> Result<InvestmentPlan, Error>;

    /// Get the plans users can subscribe to, in the order they were added.
    fn get_active_plans(&self) -> Result<Vec<InvestmentPlan>, Error>;

    /// Get every plan, in the order they were added.
    fn get_all_plans(&self) -> Result<Vec<InvestmentPlan>, Error>;
}

const SELECT_PLAN: &str = "SELECT id, name, description, annual_rate, min_amount, \
    duration_months, is_active FROM investment_plan";

impl PlanStore for Connection {
    fn create_plan(&self, plan: NewPlan) -> Result<InvestmentPlan, Error> {
        self.execute(
            "INSERT INTO investment_plan
            (name, description, annual_rate, min_amount, duration_months, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &plan.name,
                &plan.description,
                plan.annual_rate,
                plan.min_amount,
                plan.duration_months,
                plan.is_active,
            ),
        )?;

        Ok(InvestmentPlan {
            id: self.last_insert_rowid(),
            name: plan.name,
            description: plan.description,
            annual_rate: plan.annual_rate,
            min_amount: plan.min_amount,
            duration_months: plan.duration_months,
            is_active: plan.is_active,
        })
    }

    fn get_plan(&self, id: PlanId) -> Result<InvestmentPlan, Error> {
        self.prepare(&format!("{SELECT_PLAN} WHERE id = :id"))?
            .query_row(&[(":id", &id)], InvestmentPlan::map_row)
            .map_err(|error| error.into())
    }

    fn get_active_plans(&self) -> Result<Vec<InvestmentPlan>, Error> {
        self.prepare(&format!("{SELECT_PLAN} WHERE is_active = 1 ORDER BY id ASC"))?
            .query_map([], InvestmentPlan::map_row)?
            .map(|maybe_plan| maybe_plan.map_err(Error::from))
            .collect()
    }

    fn get_all_plans(&self) -> Result<Vec<InvestmentPlan>, Error> {
        self.prepare(&format!("{SELECT_PLAN} ORDER BY id ASC"))?
            .query_map([], InvestmentPlan::map_row)?
            .map(|maybe_plan| maybe_plan.map_err(Error::from))
            .collect()
    }
}

impl CreateTable for InvestmentPlan {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS investment_plan (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                annual_rate REAL NOT NULL,
                min_amount INTEGER NOT NULL,
                duration_months INTEGER NOT NULL CHECK (duration_months > 0),
                is_active INTEGER NOT NULL DEFAULT 1
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for InvestmentPlan {
    type ReturnType = InvestmentPlan;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(InvestmentPlan {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            description: row.get(offset + 2)?,
            annual_rate: row.get(offset + 3)?,
            min_amount: row.get(offset + 4)?,
            duration_months: row.get(offset + 5)?,
            is_active: row.get(offset + 6)?,
        })
    }
}
