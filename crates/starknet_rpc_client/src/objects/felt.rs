#[cfg(test)]
#[path = "felt_test.rs"]
mod felt_test;

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use starknet_core::types::FieldElement;
use starknet_core::utils::parse_cairo_short_string;

/// A field element of the Starknet prime field.
///
/// Serialized as a `0x`-prefixed hex string, which is the format of the Starknet JSON-RPC.
/// Deserialized from a hex string, a decimal string or an unsigned integer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Felt(pub FieldElement);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{value} is not a valid field element.")]
pub struct FeltParseError {
    pub value: String,
}

impl Felt {
    pub const ZERO: Felt = Felt(FieldElement::ZERO);
    pub const ONE: Felt = Felt(FieldElement::ONE);
    pub const TWO: Felt = Felt(FieldElement::TWO);

    /// Returns the value as a `u128`, or `None` if it does not fit.
    pub fn to_u128(&self) -> Option<u128> {
        u128::try_from(self.0).ok()
    }
}

impl Default for Felt {
    fn default() -> Self {
        Felt::ZERO
    }
}

impl From<FieldElement> for Felt {
    fn from(value: FieldElement) -> Self {
        Felt(value)
    }
}

impl From<Felt> for FieldElement {
    fn from(value: Felt) -> Self {
        value.0
    }
}

impl From<u128> for Felt {
    fn from(value: u128) -> Self {
        Felt(FieldElement::from(value))
    }
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        Felt(FieldElement::from(value))
    }
}

impl FromStr for Felt {
    type Err = FeltParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = match value.strip_prefix("0x") {
            Some(_) => FieldElement::from_hex_be(value).ok(),
            None => FieldElement::from_dec_str(value).ok(),
        };
        parsed.map(Felt).ok_or_else(|| FeltParseError { value: value.to_owned() })
    }
}

impl Display for Felt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl Serialize for Felt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Felt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FeltVisitor;

        impl<'de> Visitor<'de> for FeltVisitor {
            type Value = Felt;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a hex string, a decimal string or an unsigned integer")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Felt::from(value))
            }

            fn visit_u128<E: de::Error>(self, value: u128) -> Result<Self::Value, E> {
                Ok(Felt::from(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                u64::try_from(value)
                    .map(Felt::from)
                    .map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
            }
        }

        deserializer.deserialize_any(FeltVisitor)
    }
}

// Newtypes over Felt with the same serialization.
macro_rules! felt_newtype {
    ($($(#[$attr:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$attr])*
            #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(pub Felt);

            impl Display for $name {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    Display::fmt(&self.0, f)
                }
            }

            impl FromStr for $name {
                type Err = FeltParseError;

                fn from_str(value: &str) -> Result<Self, Self::Err> {
                    Ok($name(value.parse()?))
                }
            }
        )*
    };
}

felt_newtype!(
    /// The address of a deployed contract.
    ContractAddress,
    /// The hash of a Sierra contract class.
    ClassHash,
    /// The hash of the CASM compiled from a Sierra contract class.
    CompiledClassHash,
    /// The nonce of an account.
    Nonce,
    /// A fee, in Wei.
    Fee,
    TransactionHash,
    /// The version of a transaction.
    TransactionVersion,
    /// The chain id, a Cairo short string such as `SN_GOERLI`.
    ChainId,
);

impl TransactionVersion {
    pub const TWO: TransactionVersion = TransactionVersion(Felt::TWO);

    /// The version of a declare v2 transaction that is only meant for fee estimation:
    /// 2^128 + 2. Nodes refuse to include such transactions in a block.
    pub fn query_two() -> TransactionVersion {
        TransactionVersion(Felt(
            FieldElement::from_hex_be("0x100000000000000000000000000000002")
                .expect("2^128 + 2 is a valid field element."),
        ))
    }
}

impl ChainId {
    /// Decodes the chain id as a Cairo short string.
    pub fn as_short_string(&self) -> Option<String> {
        parse_cairo_short_string(&self.0 .0).ok()
    }
}
