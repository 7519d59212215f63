pub mod dispatcher;
pub mod key_pool;

pub use dispatcher::{CallOutcome, Degraded, Dispatcher};
pub use key_pool::{mask_key, KeyPool};
