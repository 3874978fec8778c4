//! Ownership filtering
//!
//! On-chain owner fields hold an identity hash, never the address. A record
//! belongs to the connected wallet when its owner literal equals the
//! canonical string of the wallet's hash, compared exactly.

use lodive_core::{DecodedRecord, Owned};
use lodive_crypto::IdentityHash;

/// True when `owner` is the canonical form of `current`
pub fn is_owned_by(owner: &str, current: &IdentityHash) -> bool {
    owner == current.to_string()
}

/// Records whose `owner_field` matches `current`; empty when no wallet is connected
pub fn filter_owned(
    records: &[DecodedRecord],
    owner_field: &str,
    current: Option<&IdentityHash>,
) -> Vec<DecodedRecord> {
    let Some(current) = current else {
        return Vec::new();
    };
    let expected = current.to_string();
    records
        .iter()
        .filter(|record| record.get(owner_field) == Some(expected.as_str()))
        .cloned()
        .collect()
}

/// Typed variant of [`filter_owned`] using each record's owner field
pub fn filter_owned_records<R: Owned + Clone>(records: &[R], current: Option<&IdentityHash>) -> Vec<R> {
    let Some(current) = current else {
        return Vec::new();
    };
    let expected = current.to_string();
    records
        .iter()
        .filter(|record| record.owner() == expected)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodive_core::{EventRecord, VenueRecord};

    fn venue(id: u32, owner: &str) -> DecodedRecord {
        DecodedRecord::from_pairs([
            ("venue_id", format!("{}field", id)),
            ("commission", "5u8".to_string()),
            ("venue_owner", owner.to_string()),
        ])
    }

    #[test]
    fn test_keeps_exact_matches_only() {
        let h1 = IdentityHash::from_u128(11);
        let records = vec![venue(1, "11field"), venue(2, "12field"), venue(3, "11field")];

        let owned = filter_owned(&records, "venue_owner", Some(&h1));
        assert_eq!(owned, vec![records[0].clone(), records[2].clone()]);
    }

    #[test]
    fn test_no_wallet_means_nothing_owned() {
        let records = vec![venue(1, "11field")];
        assert!(filter_owned(&records, "venue_owner", None).is_empty());
    }

    #[test]
    fn test_no_normalisation() {
        let h1 = IdentityHash::from_u128(11);
        let records = vec![venue(1, "11FIELD"), venue(2, " 11field"), venue(3, "11")];
        assert!(filter_owned(&records, "venue_owner", Some(&h1)).is_empty());
    }

    #[test]
    fn test_missing_owner_field() {
        let h1 = IdentityHash::from_u128(11);
        let records = vec![venue(1, "11field")];
        assert!(filter_owned(&records, "event_owner", Some(&h1)).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let h1 = IdentityHash::from_u128(11);
        let records = vec![venue(1, "11field"), venue(2, "12field")];
        let once = filter_owned(&records, "venue_owner", Some(&h1));
        let twice = filter_owned(&once, "venue_owner", Some(&h1));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_typed_filter() {
        let h2 = IdentityHash::from_u128(22);
        let venues = vec![
            VenueRecord {
                venue_id: "1field".to_string(),
                commission: 5,
                venue_owner: "21field".to_string(),
            },
            VenueRecord {
                venue_id: "2field".to_string(),
                commission: 5,
                venue_owner: "22field".to_string(),
            },
        ];
        let owned = filter_owned_records(&venues, Some(&h2));
        assert_eq!(owned, vec![venues[1].clone()]);
        assert!(filter_owned_records::<EventRecord>(&[], Some(&h2)).is_empty());
        assert!(filter_owned_records(&venues, None).is_empty());
    }

    #[test]
    fn test_is_owned_by() {
        let h = IdentityHash::from_u128(7);
        assert!(is_owned_by("7field", &h));
        assert!(!is_owned_by("7", &h));
    }
}
