use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::objects::felt::Felt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    Latest,
    Pending,
}

/// A block reference as accepted by the Starknet JSON-RPC.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlockId {
    Tag(BlockTag),
    Number(u64),
    Hash(Felt),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Invalid block id {0}. Expected `latest`, `pending`, a block number or a 0x-prefixed block \
     hash."
)]
pub struct BlockIdParseError(pub String);

impl FromStr for BlockId {
    type Err = BlockIdParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "latest" => Ok(BlockId::Tag(BlockTag::Latest)),
            "pending" => Ok(BlockId::Tag(BlockTag::Pending)),
            _ if value.starts_with("0x") => value
                .parse()
                .map(BlockId::Hash)
                .map_err(|_| BlockIdParseError(value.to_owned())),
            _ => value
                .parse()
                .map(BlockId::Number)
                .map_err(|_| BlockIdParseError(value.to_owned())),
        }
    }
}

impl Display for BlockId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Tag(BlockTag::Latest) => write!(f, "latest"),
            BlockId::Tag(BlockTag::Pending) => write!(f, "pending"),
            BlockId::Number(number) => write!(f, "{number}"),
            BlockId::Hash(hash) => write!(f, "{hash}"),
        }
    }
}

impl Serialize for BlockId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlockId::Tag(tag) => tag.serialize(serializer),
            BlockId::Number(number) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("block_number", number)?;
                map.end()
            }
            BlockId::Hash(hash) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("block_hash", hash)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for BlockId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
