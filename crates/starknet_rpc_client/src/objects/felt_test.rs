use pretty_assertions::assert_eq;
use serde_json::json;

use super::{ChainId, Felt, Fee, TransactionVersion};

#[test]
fn felt_parses_hex_and_decimal() {
    assert_eq!("0x1f".parse::<Felt>().unwrap(), Felt::from(31_u64));
    assert_eq!("31".parse::<Felt>().unwrap(), Felt::from(31_u64));
    assert!("0xzz".parse::<Felt>().is_err());
    assert!("not a number".parse::<Felt>().is_err());
}

#[test]
fn felt_serde() {
    let felt = Felt::from(255_u64);
    assert_eq!(serde_json::to_value(felt).unwrap(), json!("0xff"));
    assert_eq!(serde_json::from_value::<Felt>(json!("0xff")).unwrap(), felt);
    assert_eq!(serde_json::from_value::<Felt>(json!("255")).unwrap(), felt);
    assert_eq!(serde_json::from_value::<Felt>(json!(255)).unwrap(), felt);
    assert!(serde_json::from_value::<Felt>(json!(-1)).is_err());
    assert_eq!(serde_json::from_value::<Fee>(json!("0xff")).unwrap(), Fee(felt));
}

#[test]
fn fee_larger_than_u64_round_trips_through_u128() {
    let max_fee: Felt = "9999999999999999999999999999999999".parse().unwrap();
    assert_eq!(max_fee.to_u128(), Some(9999999999999999999999999999999999_u128));
    assert_eq!(Felt::from(9999999999999999999999999999999999_u128), max_fee);
    assert_eq!(TransactionVersion::query_two().0.to_u128(), None);
}

#[test]
fn chain_id_short_string() {
    let chain_id = ChainId("0x534e5f474f45524c49".parse().unwrap());
    assert_eq!(chain_id.as_short_string(), Some("SN_GOERLI".to_owned()));
}
