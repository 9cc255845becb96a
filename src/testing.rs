//! Test doubles for the controllers' collaborators.

use std::cell::{Cell, RefCell};
use std::io;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use crate::error::{BilledError, Result};
use crate::model::{Bill, BillStatus, NewBillRecord};
use crate::page::Page;
use crate::routes::{Navigator, Route};
use crate::store::{BillsApi, CreateRequest, CreateResponse, UpdateRequest};

type Reply<T> = std::result::Result<T, String>;

/// In-memory bills API recording every call
pub struct FakeStore {
    list_reply: Reply<Vec<Bill>>,
    create_reply: Reply<CreateResponse>,
    update_error: Option<String>,
    pub list_calls: Cell<usize>,
    pub creates: RefCell<Vec<CreateRequest>>,
    pub updates: RefCell<Vec<UpdateRequest>>,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self {
            list_reply: Ok(Vec::new()),
            create_reply: Ok(CreateResponse {
                file_url: "https://localhost:3456/images/test.jpg".to_string(),
                key: "1234".to_string(),
            }),
            update_error: None,
            list_calls: Cell::new(0),
            creates: RefCell::new(Vec::new()),
            updates: RefCell::new(Vec::new()),
        }
    }
}

impl FakeStore {
    pub fn with_bills(bills: Vec<Bill>) -> Self {
        Self {
            list_reply: Ok(bills),
            ..Self::default()
        }
    }

    pub fn failing_list(message: &str) -> Self {
        Self {
            list_reply: Err(message.to_string()),
            ..Self::default()
        }
    }

    pub fn uploading(file_url: &str, key: &str) -> Self {
        Self {
            create_reply: Ok(CreateResponse {
                file_url: file_url.to_string(),
                key: key.to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn failing_create(message: &str) -> Self {
        Self {
            create_reply: Err(message.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_update(message: &str) -> Self {
        Self {
            update_error: Some(message.to_string()),
            ..Self::default()
        }
    }
}

impl BillsApi for FakeStore {
    fn list(&self) -> Result<Vec<Bill>> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.list_reply.clone().map_err(BilledError::Api)
    }

    fn create(&self, request: CreateRequest) -> Result<CreateResponse> {
        self.creates.borrow_mut().push(request);
        self.create_reply.clone().map_err(BilledError::Api)
    }

    fn update(&self, request: UpdateRequest) -> Result<Bill> {
        self.updates.borrow_mut().push(request.clone());
        if let Some(message) = &self.update_error {
            return Err(BilledError::Api(message.clone()));
        }

        let record: NewBillRecord = serde_json::from_str(&request.data)?;
        Ok(Bill {
            id: request.selector,
            expense_type: record.expense_type,
            name: record.name,
            amount: record.amount,
            date: record.date,
            vat: record.vat,
            pct: record.pct,
            commentary: Some(record.commentary),
            file_url: record.file_url,
            file_name: record.file_name,
            status: BillStatus::Pending,
            ..Bill::default()
        })
    }
}

/// Navigator remembering every request
#[derive(Default)]
pub struct RecordingNavigator {
    pub calls: RefCell<Vec<(Route, Option<String>)>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route, message: Option<&str>) {
        self.calls
            .borrow_mut()
            .push((route, message.map(str::to_string)));
    }
}

#[derive(Default)]
pub struct RecordingPage {
    pub alerts: RefCell<Vec<String>>,
    pub modals: RefCell<Vec<String>>,
}

impl Page for RecordingPage {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn open_modal(&self, file_url: &str) {
        self.modals.borrow_mut().push(file_url.to_string());
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber that captures formatted events
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (out, logs)
}
