//! Terminal rendering of the pages.

use tabled::{settings::Style, Table, Tabled};

use crate::model::FormattedBill;

#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "TYPE")]
    expense_type: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

/// Order bills newest first by their stored date
pub fn sort_for_display(bills: &mut [FormattedBill]) {
    bills.sort_by(|a, b| b.row_date.cmp(&a.row_date));
}

/// Bills page; expects bills already in display order
pub fn render_bills(bills: &[FormattedBill]) -> String {
    let mut out = String::from("Mes notes de frais\n");

    if bills.is_empty() {
        out.push_str("No bills yet. Use 'billed new-bill' to submit one.");
        return out;
    }

    let rows: Vec<BillRow> = bills
        .iter()
        .enumerate()
        .map(|(idx, bill)| BillRow {
            index: idx + 1,
            expense_type: bill.expense_type.clone(),
            name: bill.name.clone(),
            date: bill.date.clone(),
            amount: format!("{} €", bill.amount),
            status: bill.status_label.clone(),
        })
        .collect();

    out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    out
}

pub fn render_error(message: Option<&str>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!("Erreur\n{message}"),
        _ => "Erreur".to_string(),
    }
}
