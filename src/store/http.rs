use reqwest::blocking::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use ureq::Agent;

use crate::error::{BilledError, Result};
use crate::model::Bill;
use crate::store::multipart::FormField;
use crate::store::{BillsApi, CreateRequest, CreateResponse, FormData, UpdateRequest};

#[derive(Debug, Deserialize)]
struct LoginResponse {
    jwt: String,
}

/// Remote bills API over HTTP.
///
/// JSON calls go through the ureq agent; receipt uploads need a multipart
/// body and go through a blocking reqwest client.
pub struct HttpStore {
    agent: Agent,
    uploader: reqwest::blocking::Client,
    base_url: String,
    jwt: Option<String>,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration, jwt: Option<String>) -> Result<Self> {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        let uploader = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            agent,
            uploader,
            base_url: base_url.trim_end_matches('/').to_string(),
            jwt,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorization(&self) -> Option<String> {
        self.jwt.as_ref().map(|jwt| format!("Bearer {jwt}"))
    }

    /// Exchange credentials for an API token
    pub fn login(&self, email: &str, password: &str) -> Result<String> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .agent
            .post(&self.url("/auth/login"))
            .header("Content-Type", "application/json")
            .send(serde_json::to_vec(&body)?)?;

        let login: LoginResponse = read_json(response)?;
        tracing::info!(email, "logged in");
        Ok(login.jwt)
    }
}

impl BillsApi for HttpStore {
    fn list(&self) -> Result<Vec<Bill>> {
        let mut request = self.agent.get(&self.url("/bills"));
        if let Some(auth) = self.authorization() {
            request = request.header("Authorization", &auth);
        }

        let bills: Vec<Bill> = read_json(request.call()?)?;
        tracing::debug!(count = bills.len(), "listed bills");
        Ok(bills)
    }

    /// Upload a receipt. The multipart encoder sets the content type and
    /// boundary, so `headers.no_content_type` needs no extra handling.
    fn create(&self, request: CreateRequest) -> Result<CreateResponse> {
        let mut builder = self
            .uploader
            .post(self.url("/bills"))
            .multipart(multipart_form(request.data)?);
        if let Some(auth) = self.authorization() {
            builder = builder.header("Authorization", auth);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(BilledError::Api(format!("Erreur {status}")));
        }

        let created: CreateResponse = serde_json::from_str(&response.text()?)?;
        tracing::debug!(key = %created.key, "uploaded receipt");
        Ok(created)
    }

    fn update(&self, request: UpdateRequest) -> Result<Bill> {
        let mut builder = self
            .agent
            .patch(&self.url(&format!("/bills/{}", request.selector)));
        if let Some(auth) = self.authorization() {
            builder = builder.header("Authorization", &auth);
        }

        let response = builder
            .header("Content-Type", "application/json")
            .send(request.data.as_bytes())?;

        let bill: Bill = read_json(response)?;
        tracing::debug!(id = %bill.id, "updated bill");
        Ok(bill)
    }
}

fn multipart_form(data: FormData) -> Result<Form> {
    let mut form = Form::new();
    for field in data.into_fields() {
        form = match field {
            FormField::Text { name, value } => form.text(name, value),
            FormField::File { name, file } => form.part(
                name,
                Part::bytes(file.bytes)
                    .file_name(file.name)
                    .mime_str(&file.content_type)?,
            ),
        };
    }
    Ok(form)
}

/// Decode a 2xx JSON body; other statuses become "Erreur <status>"
fn read_json<T: DeserializeOwned>(mut response: ureq::http::Response<ureq::Body>) -> Result<T> {
    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        return Err(BilledError::Api(format!("Erreur {status}")));
    }

    let body = response.body_mut().read_to_string()?;
    Ok(serde_json::from_str(&body)?)
}
