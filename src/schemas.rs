use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type UserName = String;

/// Fixed monthly dues, in won.
pub const MONTHLY_DUES: i64 = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteStatus {
    Attendance,
    Absence,
    Undecided,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    Paid,
    Rest,
}

impl DepositStatus {
    pub fn amount(self) -> i64 {
        match self {
            DepositStatus::Paid => MONTHLY_DUES,
            DepositStatus::Rest => 0,
        }
    }
}

/// A `YYYY-MM` month key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(String);

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("month must look like YYYY-MM, got {0:?}")]
pub struct InvalidMonth(pub String);

impl Month {
    pub fn parse(value: &str) -> Result<Month, InvalidMonth> {
        let well_formed = value.len() == 7
            && value
                .char_indices()
                .all(|(i, c)| if i == 4 { c == '-' } else { c.is_ascii_digit() });
        if !well_formed {
            return Err(InvalidMonth(value.to_string()));
        }
        NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
            .map(|_| Month(value.to_string()))
            .map_err(|_| InvalidMonth(value.to_string()))
    }

    pub fn of(date: NaiveDate) -> Month {
        Month(format!("{:04}-{:02}", date.year(), date.month()))
    }

    // Only the HTTP edge should call this, ledger code takes the month explicitly.
    pub fn current() -> Month {
        Month::of(Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Month {
    type Error = InvalidMonth;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Month::parse(&value)
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Vote {
    pub name: UserName,
    pub status: VoteStatus,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredDeposit")]
pub struct Deposit {
    pub name: UserName,
    amount: i64,
    pub month: Month,
    pub status: DepositStatus,
    pub timestamp: i64,
}

impl Deposit {
    pub fn new(name: UserName, status: DepositStatus, month: Month, timestamp: i64) -> Deposit {
        Deposit {
            name,
            amount: status.amount(),
            month,
            status,
            timestamp,
        }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }
}

// The on-disk shape. Whatever amount was stored, it is recomputed from status.
#[derive(Deserialize)]
struct StoredDeposit {
    name: UserName,
    #[serde(default)]
    #[allow(dead_code)]
    amount: i64,
    month: Month,
    status: DepositStatus,
    timestamp: i64,
}

impl From<StoredDeposit> for Deposit {
    fn from(stored: StoredDeposit) -> Self {
        Deposit::new(stored.name, stored.status, stored.month, stored.timestamp)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Document {
    pub votes: Vec<Vote>,
    pub deposits: Vec<Deposit>,
}
