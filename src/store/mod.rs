mod http;
mod multipart;

pub use http::HttpStore;
pub use multipart::FormData;

use serde::Deserialize;

use crate::error::Result;
use crate::model::Bill;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateHeaders {
    /// Let the transport pick the content type (multipart boundary)
    pub no_content_type: bool,
}

/// Receipt upload that opens a new bill
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub data: FormData,
    pub headers: CreateHeaders,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    pub file_url: String,
    /// Identifier of the bill opened by the upload
    pub key: String,
}

/// Completion of a bill opened by [`CreateRequest`]
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    /// JSON-encoded bill record
    pub data: String,
    /// Id of the bill to update
    pub selector: String,
}

/// Remote persistence for bills
pub trait BillsApi {
    fn list(&self) -> Result<Vec<Bill>>;
    fn create(&self, request: CreateRequest) -> Result<CreateResponse>;
    fn update(&self, request: UpdateRequest) -> Result<Bill>;
}
