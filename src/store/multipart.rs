use crate::page::SelectedFile;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FormField {
    Text { name: String, value: String },
    File { name: String, file: SelectedFile },
}

/// Ordered multipart/form-data payload; the transport does the encoding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: Vec<FormField>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: &str, value: &str) {
        self.fields.push(FormField::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    pub fn append_file(&mut self, name: &str, file: SelectedFile) {
        self.fields.push(FormField::File {
            name: name.to_string(),
            file,
        });
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|field| match field {
            FormField::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn file(&self, name: &str) -> Option<&SelectedFile> {
        self.fields.iter().find_map(|field| match field {
            FormField::File { name: n, file } if n == name => Some(file),
            _ => None,
        })
    }

    pub(crate) fn into_fields(self) -> Vec<FormField> {
        self.fields
    }
}
