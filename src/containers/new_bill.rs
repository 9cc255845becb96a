use crate::error::BilledError;
use crate::model::{parse_leading_int, Bill, BillStatus, NewBillRecord, User};
use crate::page::{FileInput, NewBillForm, Page};
use crate::routes::{Navigator, Route};
use crate::session::SessionStore;
use crate::store::{BillsApi, CreateHeaders, CreateRequest, FormData, UpdateRequest};

pub const INVALID_FILE_MESSAGE: &str = "Seuls les fichiers JPG, JPEG et PNG sont autorisés.";

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Percentage applied when the form leaves it blank
pub const DEFAULT_PCT: i64 = 20;

/// What the server handed back for an uploaded receipt
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSession {
    pub file_name: String,
    pub file_url: String,
    pub bill_id: String,
}

#[derive(Debug)]
pub enum UploadOutcome {
    /// The input holds no file
    NoFile,
    /// Unsupported extension; the user was alerted and the input cleared
    Rejected,
    Uploaded(UploadSession),
    Failed(BilledError),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Submitted(Bill),
    Failed(BilledError),
}

/// Controller behind the new-bill form.
///
/// The receipt upload and the form submission are independent steps. Submit
/// does not wait for an upload: whatever upload state exists is sent along.
pub struct NewBill<'a> {
    page: &'a dyn Page,
    navigator: &'a dyn Navigator,
    store: &'a dyn BillsApi,
    user: Option<User>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub bill_id: Option<String>,
}

impl<'a> NewBill<'a> {
    pub fn new(
        page: &'a dyn Page,
        navigator: &'a dyn Navigator,
        store: &'a dyn BillsApi,
        session: &dyn SessionStore,
    ) -> Self {
        Self {
            page,
            navigator,
            store,
            user: User::from_session(session),
            file_url: None,
            file_name: None,
            bill_id: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Upload state, once a receipt upload has completed
    pub fn upload_session(&self) -> Option<UploadSession> {
        Some(UploadSession {
            file_name: self.file_name.clone()?,
            file_url: self.file_url.clone()?,
            bill_id: self.bill_id.clone()?,
        })
    }

    /// Validate the picked receipt and upload it
    pub fn handle_change_file(&mut self, input: &mut FileInput) -> UploadOutcome {
        let Some(file) = input.files.first().cloned() else {
            return UploadOutcome::NoFile;
        };

        let path = if input.value.is_empty() {
            file.name.as_str()
        } else {
            input.value.as_str()
        };
        let file_name = trailing_segment(path).to_string();

        if !has_allowed_extension(&file_name) {
            tracing::info!(file_name = %file_name, "rejected receipt with unsupported extension");
            self.page.alert(INVALID_FILE_MESSAGE);
            input.value.clear();
            return UploadOutcome::Rejected;
        }

        let mut data = FormData::new();
        data.append_file("file", file);
        if let Some(email) = self.user.as_ref().and_then(|u| u.email.as_deref()) {
            data.append("email", email);
        }

        let request = CreateRequest {
            data,
            headers: CreateHeaders {
                no_content_type: true,
            },
        };

        match self.store.create(request) {
            Ok(created) => {
                tracing::info!(bill_id = %created.key, file_name = %file_name, "receipt uploaded");
                self.bill_id = Some(created.key.clone());
                self.file_url = Some(created.file_url.clone());
                self.file_name = Some(file_name.clone());
                UploadOutcome::Uploaded(UploadSession {
                    file_name,
                    file_url: created.file_url,
                    bill_id: created.key,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, file_name = %file_name, "receipt upload failed");
                UploadOutcome::Failed(e)
            }
        }
    }

    /// Bill record built from the form and the current upload state
    pub fn bill_record(&self, form: &NewBillForm) -> NewBillRecord {
        NewBillRecord {
            expense_type: form.expense_type.clone(),
            name: form.expense_name.clone(),
            amount: parse_leading_int(&form.amount).unwrap_or(0),
            date: form.datepicker.clone(),
            vat: form.vat.clone(),
            pct: parse_leading_int(&form.pct).unwrap_or(DEFAULT_PCT),
            commentary: form.commentary.clone(),
            file_url: self.file_url.clone(),
            file_name: self.file_name.clone(),
            status: BillStatus::Pending,
        }
    }

    /// Complete the bill and return to the bills page on success
    pub fn handle_submit(&self, form: &NewBillForm) -> SubmitOutcome {
        let record = self.bill_record(form);
        let data = match serde_json::to_string(&record) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode bill");
                return SubmitOutcome::Failed(e.into());
            }
        };

        let request = UpdateRequest {
            data,
            selector: self.bill_id.clone().unwrap_or_default(),
        };

        match self.store.update(request) {
            Ok(bill) => {
                tracing::info!(id = %bill.id, "bill submitted");
                self.navigator.navigate(Route::Bills, None);
                SubmitOutcome::Submitted(bill)
            }
            Err(e) => {
                tracing::error!(error = %e, "bill submission failed");
                SubmitOutcome::Failed(e)
            }
        }
    }
}

/// Last path segment, accepting both separators
fn trailing_segment(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn has_allowed_extension(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        None => false,
    }
}
