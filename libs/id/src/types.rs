//! Typed identifier definitions.

use crate::define_id;

// Reconciliation records bind one declared spec to at most one external
// object. The record identifier is stable for the record's whole life.
define_id!(RecordId, "rec");

// One reconciliation pass (observe then act) for a single record. Used for
// log correlation; a fresh one is minted per engine invocation.
define_id!(PassId, "pass");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_roundtrip() {
        let id = RecordId::new();
        let s = id.to_string();
        let parsed: RecordId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_record_id_prefix() {
        let id = RecordId::new();
        assert!(id.to_string().starts_with("rec_"));
    }

    #[test]
    fn test_record_id_invalid_prefix() {
        let result: Result<RecordId, _> = "pass_01HV4Z2WQXKJNM8GPQY6VBKC3D".parse();
        assert!(matches!(
            result.unwrap_err(),
            crate::IdError::InvalidPrefix { .. }
        ));
    }

    #[test]
    fn test_record_id_missing_separator() {
        let result: Result<RecordId, _> = "rec01HV4Z2WQXKJNM8GPQY6VBKC3D".parse();
        assert!(matches!(result.unwrap_err(), crate::IdError::MissingSeparator));
    }

    #[test]
    fn test_record_id_empty() {
        let result: Result<RecordId, _> = "".parse();
        assert!(matches!(result.unwrap_err(), crate::IdError::Empty));
    }

    #[test]
    fn test_record_id_invalid_ulid() {
        let result: Result<RecordId, _> = "rec_invalid".parse();
        assert!(matches!(result.unwrap_err(), crate::IdError::InvalidUlid(_)));
    }

    #[test]
    fn test_record_id_json_roundtrip() {
        let id = RecordId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_record_id_sortable() {
        let id1 = RecordId::new();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = RecordId::new();
        // ULIDs are time-ordered, so id1 < id2
        assert!(id1 < id2);
    }
}
