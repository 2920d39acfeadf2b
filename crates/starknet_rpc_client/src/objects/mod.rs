pub mod block_id;
pub mod felt;
pub mod response;
pub mod transaction;
