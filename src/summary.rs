use crate::deposits::{collected_total, month_roster, paid_count};
use crate::schemas::{Deposit, Document, Month, UserName};
use crate::votes::attendees;
use serde::Serialize;

/// What the front page shows for one month.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: Month,
    pub attendance_count: usize,
    pub attendees: Vec<UserName>,
    pub deposits: Vec<Deposit>,
    pub paid_count: usize,
    pub collected: i64,
    pub payment_url: Option<String>,
}

pub fn summarize(document: &Document, month: Month, payment_url: Option<String>) -> MonthSummary {
    let attendees = attendees(document);
    MonthSummary {
        attendance_count: attendees.len(),
        attendees,
        deposits: month_roster(document, &month).into_iter().cloned().collect(),
        paid_count: paid_count(document, &month),
        collected: collected_total(document, &month),
        payment_url,
        month,
    }
}
