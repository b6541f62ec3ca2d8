//! Conversion between addon ids (`tmdb:<id>`) and raw TMDB ids.
use crate::error::AddonError;
use crate::models::ContentKind;

pub const ID_NAMESPACE: &str = "tmdb";

/// Extracts the TMDB id from an addon id. Only `tmdb:` followed by ASCII digits is accepted.
pub fn parse_external_id(external: &str) -> Result<u64, AddonError> {
    let invalid = || AddonError::InvalidIdentifierFormat(external.to_string());
    let digits = external
        .strip_prefix(ID_NAMESPACE)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(invalid)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    digits.parse().map_err(|_| invalid())
}

/// Both kinds share the `tmdb` namespace; TMDB ids are only unique per family,
/// so the kind travels alongside the id in every request.
pub fn format_external_id(_kind: ContentKind, tmdb_id: u64) -> String {
    format!("{ID_NAMESPACE}:{tmdb_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_valid_ids() {
        for raw in ["tmdb:0", "tmdb:550", "tmdb:1399", "tmdb:18446744073709551615"] {
            for kind in [ContentKind::Movie, ContentKind::Series] {
                let id = parse_external_id(raw).unwrap();
                assert_eq!(format_external_id(kind, id), raw);
            }
        }
    }

    #[test]
    fn leading_zeros_resolve_to_the_same_tmdb_id() {
        assert_eq!(parse_external_id("tmdb:000123").unwrap(), 123);
    }

    #[test]
    fn rejects_malformed_ids() {
        for raw in [
            "",
            "550",
            "tmdb:",
            "tmdb:abc",
            "tmdb:12a",
            "tmdb:-12",
            "tmdb:+12",
            "tmdb: 12",
            "tmdb:12 ",
            "tt0111161",
            "imdb:550",
            "TMDB:550",
            "xtmdb:550",
            "tmdb:550:1",
            "tmdb:99999999999999999999999",
        ] {
            match parse_external_id(raw) {
                Err(AddonError::InvalidIdentifierFormat(got)) => assert_eq!(got, raw),
                other => panic!("expected invalid format for {:?}, got {:?}", raw, other),
            }
        }
    }
}
