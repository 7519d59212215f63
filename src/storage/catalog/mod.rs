pub mod codec;
pub mod store;

pub use codec::{decode_set, encode_set};
pub use store::CatalogStore;
