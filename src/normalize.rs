use crate::models::Status;

/// Maps a raw signing-status value onto the two canonical statuses.
/// Unknown and missing values both fall back to unsigned.
pub fn normalize_status(raw: Option<&str>) -> Status {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        Some("sign") | Some("signed") => Status::Signed,
        Some("unsign") | Some("unsigned") => Status::Unsigned,
        _ => Status::Unsigned,
    }
}

/// Coerces a raw volume cell to a number; non-numeric and missing become 0.
pub fn coerce_volume(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Coerces a raw has-volume cell to a flag; anything non-numeric or zero is false.
pub fn coerce_flag(raw: Option<&str>) -> bool {
    coerce_volume(raw) != 0.0
}

/// Trims an optional text cell, turning empty strings into absent values.
pub fn clean_optional(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_synonyms_collapse_to_two_values() {
        assert_eq!(normalize_status(Some("sign")), Status::Signed);
        assert_eq!(normalize_status(Some("Signed")), Status::Signed);
        assert_eq!(normalize_status(Some("  UNSIGN ")), Status::Unsigned);
        assert_eq!(normalize_status(Some("unsigned")), Status::Unsigned);
    }

    #[test]
    fn unknown_and_missing_status_default_to_unsigned() {
        assert_eq!(normalize_status(Some("pending")), Status::Unsigned);
        assert_eq!(normalize_status(Some("")), Status::Unsigned);
        assert_eq!(normalize_status(None), Status::Unsigned);
    }

    #[test]
    fn status_normalization_is_idempotent() {
        for raw in ["sign", "unsign", "signed", "unsigned", "junk", ""] {
            let once = normalize_status(Some(raw));
            let twice = normalize_status(Some(once.as_str()));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn volume_coercion_zeroes_junk() {
        assert_eq!(coerce_volume(Some("1500")), 1500.0);
        assert_eq!(coerce_volume(Some(" 12.5 ")), 12.5);
        assert_eq!(coerce_volume(Some("N/A")), 0.0);
        assert_eq!(coerce_volume(Some("")), 0.0);
        assert_eq!(coerce_volume(None), 0.0);
    }

    #[test]
    fn volume_coercion_is_idempotent() {
        let once = coerce_volume(Some("42"));
        let twice = coerce_volume(Some(&once.to_string()));
        assert_eq!(once, twice);
    }

    #[test]
    fn flag_coercion() {
        assert!(coerce_flag(Some("1")));
        assert!(!coerce_flag(Some("0")));
        assert!(!coerce_flag(Some("no")));
        assert!(!coerce_flag(None));
    }

    #[test]
    fn empty_optionals_become_absent() {
        assert_eq!(clean_optional(Some("  ".to_string())), None);
        assert_eq!(clean_optional(Some(" Jersey ".to_string())), Some("Jersey".to_string()));
        assert_eq!(clean_optional(None), None);
    }
}
