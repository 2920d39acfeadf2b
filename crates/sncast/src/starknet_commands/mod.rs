pub mod declare;
pub mod nonce;
