// Filter Engine - case-insensitive substring narrowing of the catalog for display

use crate::record::Record;

/// Maximum number of records a filtered view ever holds.
pub const DISPLAY_CAP: usize = 20;

/// Records whose english name contains `query` (case-insensitive), in catalog
/// order, truncated to [`DISPLAY_CAP`].
///
/// Works over anything that derefs to a [`Record`], so it applies equally to
/// a decoded `Vec<Record>`, the store's shared records, or its own output.
pub fn apply<'a, I, R>(records: I, query: &str) -> Vec<&'a R>
where
    I: IntoIterator<Item = &'a R>,
    R: AsRef<Record> + 'a + ?Sized,
{
    let needle = query.to_lowercase();

    records
        .into_iter()
        .filter(|r| matches((*r).as_ref(), &needle))
        .take(DISPLAY_CAP)
        .collect()
}

/// `needle` must already be lowercased
fn matches(record: &Record, needle: &str) -> bool {
    needle.is_empty() || record.english_name().to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(n: i64) -> Vec<Record> {
        (1..=n).map(|i| Record::new(i, format!("Mon{:03}", i))).collect()
    }

    fn sample() -> Vec<Record> {
        vec![
            Record::new(1, "Bulbasaur").with_types(["Grass", "Poison"]).with_stat("HP", 45),
            Record::new(2, "Ivysaur").with_types(["Grass", "Poison"]),
            Record::new(3, "Venusaur").with_types(["Grass", "Poison"]),
            Record::new(4, "Charmander").with_types(["Fire"]),
        ]
    }

    fn ids(records: &[&Record]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_substring_match() {
        let records = sample();
        let result = apply(&records, "bul");
        assert_eq!(ids(&result), vec![1]);
        assert_eq!(result[0], &records[0]);
    }

    #[test]
    fn test_empty_query_returns_first_twenty_in_order() {
        let records = catalog(151);
        let result = apply(&records, "");

        assert_eq!(result.len(), DISPLAY_CAP);
        assert_eq!(ids(&result), (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_case_insensitive() {
        let records = sample();
        for variant in ["saur", "SAUR", "SaUr"] {
            assert_eq!(ids(&apply(&records, variant)), vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_every_result_contains_query() {
        let records = sample();
        for query in ["a", "SAUR", "char", "x", ""] {
            for r in apply(&records, query) {
                assert!(r.english_name().to_lowercase().contains(&query.to_lowercase()));
            }
        }
    }

    #[test]
    fn test_never_more_than_cap() {
        let records = catalog(500);
        for query in ["", "mon", "1", "mon1"] {
            assert!(apply(&records, query).len() <= DISPLAY_CAP);
        }
        // "mon1" matches Mon100..Mon199, well over the cap
        assert_eq!(apply(&records, "mon1").len(), DISPLAY_CAP);
    }

    #[test]
    fn test_idempotent() {
        let records = catalog(300);
        for query in ["", "mon2", "MON00"] {
            let once = apply(&records, query);
            let twice = apply(once.iter().copied(), query);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(apply(&sample(), "pikachu").is_empty());
        assert!(apply(&Vec::<Record>::new(), "").is_empty());
    }

    #[test]
    fn test_short_catalog_unchanged_by_empty_query() {
        let records = sample();
        assert_eq!(ids(&apply(&records, "")), vec![1, 2, 3, 4]);
    }
}
