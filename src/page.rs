//! What the controllers read from and ask of the mounted page.

/// User-facing side effects owned by the page
pub trait Page {
    /// Show a blocking message to the user
    fn alert(&self, message: &str);

    /// Open a preview of the receipt at `file_url`
    fn open_modal(&self, file_url: &str);
}

/// A file picked in the file input
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Single-file input. `value` is the path the user picked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileInput {
    pub files: Vec<SelectedFile>,
    pub value: String,
}

impl FileInput {
    pub fn with_file(value: impl Into<String>, file: SelectedFile) -> Self {
        Self {
            files: vec![file],
            value: value.into(),
        }
    }
}

/// Values of the new-bill form fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBillForm {
    pub expense_type: String,
    pub expense_name: String,
    pub datepicker: String,
    pub amount: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

/// The eye icon on a bills row, carrying the receipt URL
#[derive(Debug, Clone, PartialEq)]
pub struct IconEye {
    pub bill_url: String,
}
