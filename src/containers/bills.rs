use crate::error::Result;
use crate::model::{format_date, format_status, Bill, FormattedBill, User};
use crate::page::{IconEye, Page};
use crate::routes::{Navigator, Route};
use crate::session::SessionStore;
use crate::store::BillsApi;

/// Controller behind the employee's bills page
pub struct Bills<'a> {
    page: &'a dyn Page,
    navigator: &'a dyn Navigator,
    store: &'a dyn BillsApi,
    user: Option<User>,
}

impl<'a> Bills<'a> {
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
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn handle_click_new_bill(&self) {
        self.navigator.navigate(Route::NewBill, None);
    }

    pub fn handle_click_icon_eye(&self, icon: &IconEye) {
        self.page.open_modal(&icon.bill_url);
    }

    /// Fetch bills and prepare them for display, in the order the API returned them.
    ///
    /// A failed fetch sends the user to the error page with the failure's
    /// message and is still returned to the caller.
    pub fn get_bills(&self) -> Result<Vec<FormattedBill>> {
        let bills = match self.store.list() {
            Ok(bills) => bills,
            Err(e) => {
                let message = e.to_string();
                tracing::error!(error = %message, "failed to list bills");
                self.navigator.navigate(Route::ErrorPage, Some(&message));
                return Err(e);
            }
        };

        Ok(bills.into_iter().map(format_bill).collect())
    }
}

fn format_bill(bill: Bill) -> FormattedBill {
    let status = format_status(bill.status).to_string();
    let date = match format_date(&bill.date) {
        Ok(date) => date,
        Err(e) => {
            tracing::warn!(error = %e, id = %bill.id, "keeping unformatted date");
            bill.date.clone()
        }
    };

    FormattedBill::new(bill, date, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BillStatus, USER_KEY};
    use crate::session::MemorySession;
    use crate::testing::{capture_logs, FakeStore, RecordingNavigator, RecordingPage};

    fn employee_session() -> MemorySession {
        let session = MemorySession::default();
        session
            .set_item(
                USER_KEY,
                r#"{"type":"Employee","email":"employee@test.tld"}"#,
            )
            .unwrap();
        session
    }

    fn fixture_bills() -> Vec<Bill> {
        vec![
            Bill {
                id: "47qAXb6fIm2zOKkLzMro".to_string(),
                expense_type: "Hôtel et logement".to_string(),
                name: "encore".to_string(),
                amount: 400,
                date: "2004-04-04".to_string(),
                vat: "80".to_string(),
                pct: 20,
                file_url: Some("https://test.storage.tld/v0/b/billable.png".to_string()),
                status: BillStatus::Pending,
                ..Bill::default()
            },
            Bill {
                id: "BeKy5Mo4jkmdfPGYpTxZ".to_string(),
                expense_type: "Transports".to_string(),
                name: "test1".to_string(),
                amount: 100,
                date: "2001-01-01".to_string(),
                status: BillStatus::Refused,
                ..Bill::default()
            },
            Bill {
                id: "UIUZtnPQvnbFnB0ozvJh".to_string(),
                expense_type: "Services en ligne".to_string(),
                name: "test3".to_string(),
                amount: 300,
                date: "2003-03-03".to_string(),
                status: BillStatus::Accepted,
                ..Bill::default()
            },
        ]
    }

    #[test]
    fn test_get_bills_formats_every_bill() {
        let page = RecordingPage::default();
        let navigator = RecordingNavigator::default();
        let store = FakeStore::with_bills(fixture_bills());
        let session = employee_session();
        let bills = Bills::new(&page, &navigator, &store, &session);

        let result = bills.get_bills().unwrap();

        assert_eq!(result.len(), 3);
        for bill in &result {
            assert!(!bill.date.is_empty());
            assert!(!bill.status_label.is_empty());
            assert!(!bill.row_date.is_empty());
        }
        assert_eq!(result[0].date, "4 Avr. 04");
        assert_eq!(result[0].row_date, "2004-04-04");
        assert_eq!(result[0].status_label, "En attente");
        assert_eq!(result[1].status_label, "Refusé");
        assert!(navigator.calls.borrow().is_empty());
    }

    #[test]
    fn test_get_bills_keeps_received_order() {
        let page = RecordingPage::default();
        let navigator = RecordingNavigator::default();
        let store = FakeStore::with_bills(fixture_bills());
        let session = employee_session();
        let bills = Bills::new(&page, &navigator, &store, &session);

        let ids: Vec<String> = bills
            .get_bills()
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();

        assert_eq!(
            ids,
            vec![
                "47qAXb6fIm2zOKkLzMro",
                "BeKy5Mo4jkmdfPGYpTxZ",
                "UIUZtnPQvnbFnB0ozvJh"
            ]
        );
    }

    #[test]
    fn test_get_bills_keeps_unparseable_date() {
        let page = RecordingPage::default();
        let navigator = RecordingNavigator::default();
        let store = FakeStore::with_bills(vec![Bill {
            id: "bad-date".to_string(),
            date: "invalid-date".to_string(),
            status: BillStatus::Pending,
            ..Bill::default()
        }]);
        let session = employee_session();
        let bills = Bills::new(&page, &navigator, &store, &session);

        let (result, logs) = capture_logs(|| bills.get_bills());
        let result = result.unwrap();

        assert_eq!(result[0].date, "invalid-date");
        assert_eq!(result[0].row_date, "invalid-date");
        assert!(logs.contains("keeping unformatted date"));
        assert!(logs.contains("bad-date"));
    }

    #[test]
    fn test_get_bills_failure_navigates_to_error_page() {
        let page = RecordingPage::default();
        let navigator = RecordingNavigator::default();
        let store = FakeStore::failing_list("API error");
        let session = employee_session();
        let bills = Bills::new(&page, &navigator, &store, &session);

        let err = bills.get_bills().unwrap_err();

        assert_eq!(err.to_string(), "API error");
        assert_eq!(
            *navigator.calls.borrow(),
            vec![(Route::ErrorPage, Some("API error".to_string()))]
        );
    }

    #[test]
    fn test_get_bills_404_and_500() {
        for message in ["Erreur 404", "Erreur 500"] {
            let page = RecordingPage::default();
            let navigator = RecordingNavigator::default();
            let store = FakeStore::failing_list(message);
            let session = employee_session();
            let bills = Bills::new(&page, &navigator, &store, &session);

            assert!(bills.get_bills().is_err());
            assert_eq!(
                navigator.calls.borrow()[0],
                (Route::ErrorPage, Some(message.to_string()))
            );
        }
    }

    #[test]
    fn test_click_new_bill_navigates() {
        let page = RecordingPage::default();
        let navigator = RecordingNavigator::default();
        let store = FakeStore::default();
        let session = employee_session();
        let bills = Bills::new(&page, &navigator, &store, &session);

        bills.handle_click_new_bill();

        assert_eq!(*navigator.calls.borrow(), vec![(Route::NewBill, None)]);
        assert_eq!(store.list_calls.get(), 0);
    }

    #[test]
    fn test_click_icon_eye_opens_modal() {
        let page = RecordingPage::default();
        let navigator = RecordingNavigator::default();
        let store = FakeStore::default();
        let session = employee_session();
        let bills = Bills::new(&page, &navigator, &store, &session);

        bills.handle_click_icon_eye(&IconEye {
            bill_url: "https://test.storage.tld/v0/b/billable.png".to_string(),
        });

        assert_eq!(
            *page.modals.borrow(),
            vec!["https://test.storage.tld/v0/b/billable.png".to_string()]
        );
        assert_eq!(store.list_calls.get(), 0);
        assert!(navigator.calls.borrow().is_empty());
    }

    #[test]
    fn test_reads_user_from_session() {
        let page = RecordingPage::default();
        let navigator = RecordingNavigator::default();
        let store = FakeStore::default();
        let session = employee_session();
        let bills = Bills::new(&page, &navigator, &store, &session);

        assert_eq!(
            bills.user().and_then(|u| u.email.as_deref()),
            Some("employee@test.tld")
        );
    }
}
