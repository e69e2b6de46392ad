//! Message and MessageHandler
pub mod types;
pub use types::*;

pub mod handlers;
pub use handlers::HandleMsg;
pub use handlers::MessageHandler;

pub use crate::measure::QueryReport;
