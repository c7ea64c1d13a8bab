use crate::error::AppError;
use crate::ledger::{require_name, upsert_by_key, Keyed};
use crate::schemas::{Deposit, DepositStatus, Document, Month};

impl Keyed for Deposit {
    fn same_key(&self, other: &Self) -> bool {
        self.name == other.name && self.month == other.month
    }
}

/// Records dues for one `(name, month)` pair, replacing any earlier record
/// for the same pair.
pub fn upsert_deposit(
    document: &mut Document,
    name: &str,
    status: DepositStatus,
    month: &Month,
    timestamp: i64,
) -> Result<(), AppError> {
    let name = require_name(name)?;
    upsert_by_key(
        &mut document.deposits,
        Deposit::new(name.to_string(), status, month.clone(), timestamp),
    );
    Ok(())
}

pub fn delete_deposit(document: &mut Document, name: &str, month: &Month) {
    document
        .deposits
        .retain(|deposit| !(deposit.name == name && &deposit.month == month));
}

pub fn month_roster<'a>(document: &'a Document, month: &Month) -> Vec<&'a Deposit> {
    document
        .deposits
        .iter()
        .filter(|deposit| &deposit.month == month)
        .collect()
}

pub fn paid_count(document: &Document, month: &Month) -> usize {
    month_roster(document, month)
        .into_iter()
        .filter(|deposit| deposit.status == DepositStatus::Paid)
        .count()
}

pub fn collected_total(document: &Document, month: &Month) -> i64 {
    month_roster(document, month)
        .into_iter()
        .map(Deposit::amount)
        .sum()
}
