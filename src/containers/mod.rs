mod bills;
mod new_bill;

pub use bills::Bills;
pub use new_bill::{
    NewBill, SubmitOutcome, UploadOutcome, UploadSession, DEFAULT_PCT, INVALID_FILE_MESSAGE,
};
