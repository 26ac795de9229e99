use std::{fmt::Display, str::FromStr};

use crate::models::{UnknownVariant, impl_text_column};

/// Where a deposit, withdrawal or transfer is in its processing.
///
/// Deposits and withdrawals start as [Status::Pending]; transfers are
/// recorded as [Status::Completed]. Nothing in the application moves a row
/// from one status to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Waiting to be processed by staff.
    Pending,
    /// Finished.
    Completed,
}

impl Status {
    /// The value stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
        }
    }

    /// The label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "قيد المعالجة",
            Status::Completed => "مكتمل",
        }
    }
}

impl FromStr for Status {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Status::Pending),
            "completed" => Ok(Status::Completed),
            other => Err(UnknownVariant::new("status", other)),
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl_text_column!(Status);

#[cfg(test)]
mod status_tests {
    use super::Status;

    #[test]
    fn parses_stored_values() {
        assert_eq!("pending".parse(), Ok(Status::Pending));
        assert_eq!("completed".parse(), Ok(Status::Completed));
        assert!("done".parse::<Status>().is_err());
    }
}
