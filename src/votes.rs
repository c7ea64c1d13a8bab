use crate::error::AppError;
use crate::ledger::{require_name, upsert_by_key, Keyed};
use crate::schemas::{Document, UserName, Vote, VoteStatus};

impl Keyed for Vote {
    fn same_key(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Records `status` for `name`, keeping the vote's position if it already
/// exists. The timestamp is refreshed even when the status is unchanged.
pub fn upsert_vote(
    document: &mut Document,
    name: &str,
    status: VoteStatus,
    timestamp: i64,
) -> Result<(), AppError> {
    let name = require_name(name)?;
    upsert_by_key(
        &mut document.votes,
        Vote {
            name: name.to_string(),
            status,
            timestamp,
        },
    );
    Ok(())
}

pub fn delete_vote(document: &mut Document, name: &str) {
    document.votes.retain(|vote| vote.name != name);
}

pub fn attendees(document: &Document) -> Vec<UserName> {
    document
        .votes
        .iter()
        .filter(|vote| vote.status == VoteStatus::Attendance)
        .map(|vote| vote.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(document: &Document) -> Vec<&str> {
        document.votes.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn first_vote_appends_one_record() {
        let mut document = Document::default();

        upsert_vote(&mut document, "Kim", VoteStatus::Attendance, 1).unwrap();

        assert_eq!(
            document.votes,
            vec![Vote {
                name: "Kim".to_string(),
                status: VoteStatus::Attendance,
                timestamp: 1,
            }]
        );
        assert!(document.deposits.is_empty());
    }

    #[test]
    fn revote_updates_in_place() {
        let mut document = Document::default();
        upsert_vote(&mut document, "Kim", VoteStatus::Attendance, 1).unwrap();
        upsert_vote(&mut document, "Lee", VoteStatus::Absence, 2).unwrap();

        upsert_vote(&mut document, "Kim", VoteStatus::Undecided, 3).unwrap();

        assert_eq!(names(&document), vec!["Kim", "Lee"]);
        assert_eq!(document.votes[0].status, VoteStatus::Undecided);
        assert_eq!(document.votes[0].timestamp, 3);
    }

    #[test]
    fn same_status_still_refreshes_timestamp() {
        let mut document = Document::default();
        upsert_vote(&mut document, "Kim", VoteStatus::Attendance, 1).unwrap();

        upsert_vote(&mut document, "Kim", VoteStatus::Attendance, 9).unwrap();

        assert_eq!(document.votes.len(), 1);
        assert_eq!(document.votes[0].timestamp, 9);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut document = Document::default();
        upsert_vote(&mut document, "kim", VoteStatus::Attendance, 1).unwrap();
        upsert_vote(&mut document, "Kim", VoteStatus::Absence, 2).unwrap();

        assert_eq!(names(&document), vec!["kim", "Kim"]);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut document = Document::default();

        let result = upsert_vote(&mut document, "", VoteStatus::Attendance, 1);

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(document.votes.is_empty());
    }

    #[test]
    fn delete_removes_and_is_idempotent() {
        let mut document = Document::default();
        upsert_vote(&mut document, "Kim", VoteStatus::Attendance, 1).unwrap();

        delete_vote(&mut document, "Kim");
        assert!(document.votes.is_empty());

        let before = document.clone();
        delete_vote(&mut document, "Kim");
        assert_eq!(document, before);
    }

    #[test]
    fn attendees_keep_document_order() {
        let mut document = Document::default();
        upsert_vote(&mut document, "Kim", VoteStatus::Attendance, 1).unwrap();
        upsert_vote(&mut document, "Lee", VoteStatus::Undecided, 2).unwrap();
        upsert_vote(&mut document, "Park", VoteStatus::Attendance, 3).unwrap();
        upsert_vote(&mut document, "Choi", VoteStatus::Absence, 4).unwrap();

        assert_eq!(attendees(&document), vec!["Kim", "Park"]);
    }
}
