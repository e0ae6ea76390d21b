// verge_client/src/services/mod.rs

pub mod order_backend;
pub mod order_history;

pub use order_backend::HttpOrderBackend;
pub use order_history::{Booking, OrderHistory, OrderStatus, OrderSummary};
