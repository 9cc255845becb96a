mod bill;
mod format;
mod user;

pub use bill::{Bill, BillStatus, FormattedBill, NewBillRecord};
pub use format::{format_date, format_status, parse_leading_int};
pub use user::{User, UserType, USER_KEY};
