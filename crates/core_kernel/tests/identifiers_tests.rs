//! Unit tests for the identifiers module

use core_kernel::{AccountAddress, ClaimId};
use core_kernel::identifiers::IdentifierError;

mod claim_id_tests {
    use super::*;

    #[test]
    fn test_next_is_monotonic() {
        let first = ClaimId::new(0);
        assert_eq!(first.next(), ClaimId::new(1));
        assert!(first < first.next());
    }

    #[test]
    fn test_display_has_prefix() {
        let id = ClaimId::new(12);
        assert!(id.to_string().starts_with(ClaimId::prefix()));
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert_eq!(
            "-1".parse::<ClaimId>(),
            Err(IdentifierError::InvalidClaimId("-1".to_string()))
        );
    }

    #[test]
    fn test_u64_conversion() {
        let id = ClaimId::from(9u64);
        let raw: u64 = id.into();
        assert_eq!(raw, 9);
        assert_eq!(id.value(), 9);
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ClaimId::new(3)).unwrap(), "3");
    }
}

mod account_address_tests {
    use super::*;

    #[test]
    fn test_canonical_lowercase() {
        let address = AccountAddress::new("0xAbC0000000000000000000000000000000000001").unwrap();
        assert_eq!(address.as_str(), "0xabc0000000000000000000000000000000000001");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: AccountAddress = serde_json::from_str("\"0xDEAD\"").unwrap();
        assert_eq!(ok.as_str(), "0xdead");
        assert!(serde_json::from_str::<AccountAddress>("\"\"").is_err());
    }

    #[test]
    fn test_serialize_canonical() {
        let address: AccountAddress = "0xBEEF".parse().unwrap();
        assert_eq!(serde_json::to_string(&address).unwrap(), "\"0xbeef\"");
    }
}
