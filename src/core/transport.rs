use crate::core::auth;
use crate::core::fields::PATH_XPUB;
use crate::domain::model::{Metadata, Xpub};
use crate::utils::error::{BuxError, Result};
use bitcoin::bip32::Xpriv;
use bitcoin::secp256k1::SecretKey;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    pub server: String,
    pub xpriv: Option<String>,
    pub admin_key: Option<String>,
    pub access_key: Option<String>,
    pub sign_request: bool,
    pub debug: bool,
    pub timeout: Option<Duration>,
}

/// HTTP transport to a BUX server.
///
/// Holds the caller's keys and one shared `reqwest::Client`. Every call is a
/// single request/response exchange; dropping the returned future cancels it.
pub struct TransportHttp {
    server: String,
    client: Client,
    pub(crate) xpriv: Option<Xpriv>,
    pub(crate) admin_xpriv: Option<Xpriv>,
    access_key: Option<String>,
    pub(crate) sign_request: bool,
    pub(crate) debug: bool,
}

impl TransportHttp {
    pub fn new(options: TransportOptions) -> Result<Self> {
        let xpriv = options.xpriv.as_deref().map(Xpriv::from_str).transpose()?;
        let admin_xpriv = options
            .admin_key
            .as_deref()
            .map(Xpriv::from_str)
            .transpose()?;

        // 提早驗證 access key，避免在送出請求時才失敗
        if let Some(key) = &options.access_key {
            SecretKey::from_str(key)?;
        }

        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            server: options.server.trim_end_matches('/').to_string(),
            client: builder.build()?,
            xpriv,
            admin_xpriv,
            access_key: options.access_key,
            sign_request: options.sign_request,
            debug: options.debug,
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn has_admin_key(&self) -> bool {
        self.admin_xpriv.is_some()
    }

    pub(crate) fn admin_key(&self) -> Result<&Xpriv> {
        self.admin_xpriv.as_ref().ok_or(BuxError::AdminKeyError)
    }

    /// Get the xpub record of the configured user key.
    pub async fn get_xpub(&self) -> Result<Xpub> {
        let xpub: Xpub = self
            .do_http_request(
                Method::GET,
                PATH_XPUB,
                String::new(),
                self.xpriv.as_ref(),
                self.sign_request,
            )
            .await?;
        if self.debug {
            tracing::info!("xpub: {}", xpub.id);
        }

        Ok(xpub)
    }

    /// Send one authenticated request and decode the JSON response.
    ///
    /// With an xpriv the request is either fully signed or only carries the
    /// xpub header; without one, the access key signs it. Having neither is an
    /// error before anything is sent.
    pub(crate) async fn do_http_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: String,
        xpriv: Option<&Xpriv>,
        sign: bool,
    ) -> Result<T> {
        let auth_headers = match xpriv {
            Some(xpriv) if sign => auth::create_signature(xpriv, &body)?.headers(),
            Some(xpriv) => vec![(auth::AUTH_HEADER, auth::xpub_string(xpriv))],
            None => match &self.access_key {
                Some(key) => auth::create_signature_access_key(key, &body)?.headers(),
                None => return Err(BuxError::MissingKeyError),
            },
        };

        let url = format!("{}{}", self.server, path);
        tracing::debug!("📡 {} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        for (name, value) in auth_headers {
            request = request.header(name, value);
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("📡 {}: response status {}", path, status);

        let bytes = response.bytes().await?;
        if status.as_u16() >= 400 {
            let message = error_message(&bytes)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            tracing::warn!("📡 {}: request rejected ({}): {}", path, status, message);
            return Err(BuxError::ResponseError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Serialize body fields into a JSON object, in the given order.
pub(crate) fn marshal<const N: usize>(fields: [(&str, serde_json::Value); N]) -> String {
    let object: serde_json::Map<String, serde_json::Value> = fields
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    serde_json::Value::Object(object).to_string()
}

/// A missing metadata argument is sent as an empty object.
pub(crate) fn process_metadata(metadata: Option<&Metadata>) -> Metadata {
    metadata.cloned().unwrap_or_default()
}

fn error_message(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(serde_json::Value::String(message)) => Some(message),
        Ok(serde_json::Value::Object(obj)) => ["message", "error"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .or(Some(text)),
        _ => Some(text),
    }
}
