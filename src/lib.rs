pub mod config;
pub mod containers;
pub mod error;
pub mod logging;
pub mod model;
pub mod page;
pub mod routes;
pub mod session;
pub mod store;
pub mod views;

#[cfg(test)]
mod testing;

pub use config::{Config, ApiSettings, LogSettings};
pub use containers::{Bills, NewBill, SubmitOutcome, UploadOutcome, UploadSession};
pub use error::{BilledError, Result};
pub use model::{Bill, BillStatus, FormattedBill, NewBillRecord, User, UserType};
pub use routes::{Navigator, Route};
pub use session::{FileSession, MemorySession, SessionStore};
pub use store::{BillsApi, HttpStore};
