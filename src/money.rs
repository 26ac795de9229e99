//! Amounts of Jordanian dinar.
//!
//! Amounts are kept as a whole number of piastres (1/100 of a dinar) so that
//! sums computed by SQLite are exact. They are converted to [Decimal] for
//! parsing and display.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub},
};

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

/// The number of decimal places amounts are stored with.
const SCALE: u32 = 2;

/// The most digits an amount may have, decimal places included.
const MAX_DIGITS: u32 = 10;

/// The smallest amount accepted by the deposit, withdrawal, subscription and
/// transfer forms.
pub const MIN_FORM_AMOUNT: Money = Money::from_minor_units(100);

/// Errors for amounts entered by a user.
///
/// The messages are shown to the user as-is next to the form field.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum AmountError {
    /// The field was left empty.
    #[error("هذا الحقل مطلوب.")]
    Required,

    /// The input is not a number.
    #[error("أدخل رقماً.")]
    NotANumber,

    /// The input has more than two decimal places.
    #[error("تأكد من ألا يوجد أكثر من 2 منازل عشرية.")]
    TooManyDecimalPlaces,

    /// The input has more than ten digits in total.
    #[error("تأكد من ألا يوجد أكثر من 10 أرقام إجمالاً.")]
    TooManyDigits,

    /// The amount is smaller than the minimum accepted by the form.
    #[error("تأكد من أن هذه القيمة أكبر من أو تساوي {0}.")]
    BelowMinimum(Money),
}

/// A signed amount of money in dinar, accurate to the piastre.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// No money at all.
    pub const ZERO: Money = Money(0);

    /// Create an amount from a number of piastres, e.g. `1050` is 10.50 dinar.
    pub const fn from_minor_units(piastres: i64) -> Self {
        Self(piastres)
    }

    /// Create an amount from a whole number of dinar.
    pub const fn from_dinar(dinar: i64) -> Self {
        Self(dinar * 100)
    }

    /// The amount as a number of piastres.
    pub fn minor_units(&self) -> i64 {
        self.0
    }

    /// The amount as a decimal number of dinar with two decimal places.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, SCALE)
    }

    /// Convert a decimal number of dinar into an amount.
    ///
    /// # Errors
    ///
    /// Returns an [AmountError] if `value` has more than two decimal places
    /// or more than ten digits.
    pub fn from_decimal(value: Decimal) -> Result<Self, AmountError> {
        let value = value.normalize();

        if value.scale() > SCALE {
            return Err(AmountError::TooManyDecimalPlaces);
        }

        let limit = Decimal::from(10_i64.pow(MAX_DIGITS - SCALE));
        if value.abs() >= limit {
            return Err(AmountError::TooManyDigits);
        }

        (value * Decimal::ONE_HUNDRED)
            .to_i64()
            .map(Self)
            .ok_or(AmountError::TooManyDigits)
    }

    /// Parse an amount typed into a form field and check that it is at
    /// least `minimum`.
    ///
    /// # Errors
    ///
    /// Returns an [AmountError] describing the first problem found with
    /// `input`.
    pub fn parse_form_input(input: &str, minimum: Money) -> Result<Self, AmountError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(AmountError::Required);
        }

        let value: Decimal = input.parse().map_err(|_| AmountError::NotANumber)?;
        let amount = Self::from_decimal(value)?;

        if amount < minimum {
            return Err(AmountError::BelowMinimum(minimum));
        }

        Ok(amount)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_decimal().fmt(f)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Money)
    }
}
