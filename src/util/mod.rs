pub mod digest;

pub use digest::{digest128, digest128_hex, DIGEST_LEN};
