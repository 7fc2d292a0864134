use crate::{ChangeNotification, RecordId, RelevanceTracker};

/// Returns the first affected id the view currently displays, if any.
///
/// Scanning stops at the first hit: a single refresh reloads the whole set.
pub fn first_relevant<'a>(
    relevance: &RelevanceTracker,
    notification: &'a ChangeNotification,
) -> Option<&'a RecordId> {
    notification
        .affected
        .iter()
        .find(|id| relevance.contains(id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tracker_never_matches() {
        let tracker = RelevanceTracker::new();
        let notification = ChangeNotification::new(["a", "b"]);
        assert_eq!(first_relevant(&tracker, &notification), None);
    }

    #[test]
    fn finds_the_displayed_id() {
        let mut tracker = RelevanceTracker::new();
        tracker.replace_all([RecordId::from("b")]);
        let notification = ChangeNotification::new(["a", "b"]);
        assert_eq!(
            first_relevant(&tracker, &notification),
            Some(&RecordId::from("b"))
        );
    }
}
