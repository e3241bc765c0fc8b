// Identifier Lookup - resolve one record by its integer id
//
// Shared by the client view (against the session's store) and the server
// path (against a catalog fetched for the request). Both go through
// `find_by_id`, so the same catalog contents and id give the same answer.

use crate::record::Record;

/// First record whose id equals `id`. Duplicate ids resolve to the earliest in order.
pub fn find_by_id<'a, I, R>(records: I, id: i64) -> Option<&'a R>
where
    I: IntoIterator<Item = &'a R>,
    R: AsRef<Record> + 'a + ?Sized,
{
    records
        .into_iter()
        .find(|r| AsRef::<Record>::as_ref(*r).id == id)
}

/// Parse the id segment of a detail route.
///
/// Surrounding whitespace is ignored; anything that is not entirely a base-10
/// integer gives `None`, which callers render as not found. Trailing garbage is
/// rejected: "12abc" and "1.5" are not ids 12 and 1.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

// ============================================================================
// CLIENT LOOKUP RESULT
// ============================================================================

/// Client-side lookup outcome. `Loading` is transient and must not be shown
/// as a genuine absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientLookup<T> {
    /// The store has not finished loading
    Loading,
    /// The store failed to load; nothing can be resolved this session
    Unavailable,
    NotFound,
    Found(T),
}

impl<T> ClientLookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            ClientLookup::Found(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ClientLookup::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample() -> Vec<Record> {
        vec![
            Record::new(1, "Bulbasaur").with_types(["Grass", "Poison"]).with_stat("HP", 45),
            Record::new(2, "Ivysaur").with_types(["Grass", "Poison"]),
        ]
    }

    #[test]
    fn test_found() {
        let records = sample();
        let ivysaur = find_by_id(&records, 2).unwrap();
        assert_eq!(ivysaur.english_name(), "Ivysaur");
    }

    #[test]
    fn test_not_found() {
        assert!(find_by_id(&sample(), 999).is_none());
        assert!(find_by_id(&Vec::<Record>::new(), 1).is_none());
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let records = vec![
            Record::new(5, "First"),
            Record::new(6, "Other"),
            Record::new(5, "Second"),
        ];
        assert_eq!(find_by_id(&records, 5).unwrap().english_name(), "First");
    }

    #[test]
    fn test_works_over_shared_records() {
        let shared: Vec<Arc<Record>> = sample().into_iter().map(Arc::new).collect();
        let plain = sample();

        let a = find_by_id(&shared, 1).map(|r| &**r);
        let b = find_by_id(&plain, 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("25"), Some(25));
        assert_eq!(parse_id(" 7 "), Some(7));
        assert_eq!(parse_id("-3"), Some(-3));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("1.5"), None);
        assert_eq!(parse_id("12abc"), None);
    }

    #[test]
    fn test_client_lookup_found() {
        assert_eq!(ClientLookup::Found(3).found(), Some(3));
        assert_eq!(ClientLookup::<i32>::NotFound.found(), None);
        assert!(ClientLookup::<i32>::Loading.is_loading());
        assert!(!ClientLookup::<i32>::Unavailable.is_loading());
    }
}
