//! Invocation event and response envelope.
//!
//! The endpoint consumes one event per invocation and produces one envelope.
//! Both are plain JSON documents with camelCase keys so they can be fed in
//! by a serverless runtime or built from an HTTP request.

use std::collections::BTreeMap;
use std::io;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::ser::{Formatter, Serializer};
use serde_json::{json, Map, Value};

pub const CONTENT_TYPE_JSON: &str = "application/json";

const DEFAULT_METHOD: &str = "GET";
const DEFAULT_PATH: &str = "/";

/// One inbound invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    /// Raw text or pre-parsed JSON. `null` is treated as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_context: Option<RequestContext>,

    /// Fallback body source when `body` is absent. A key that is present
    /// but `null` reads as an empty mapping.
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub query_string_parameters: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl InvocationEvent {
    /// Event for `method path` with no body.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            raw_path: Some(path.into()),
            request_context: Some(RequestContext {
                request_id: None,
                http: Some(HttpContext {
                    method: Some(method.into()),
                }),
            }),
            ..Self::default()
        }
    }

    /// Attach a body (text or structured).
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach query string parameters.
    pub fn with_query(mut self, query: Map<String, Value>) -> Self {
        self.query_string_parameters = Some(query);
        self
    }

    /// HTTP method, `GET` when the event carries none.
    pub fn method(&self) -> &str {
        self.request_context
            .as_ref()
            .and_then(|ctx| ctx.http.as_ref())
            .and_then(|http| http.method.as_deref())
            .unwrap_or(DEFAULT_METHOD)
    }

    /// Request path; `rawPath` wins over `path`.
    pub fn path(&self) -> &str {
        self.raw_path
            .as_deref()
            .or(self.path.as_deref())
            .unwrap_or(DEFAULT_PATH)
    }

    /// Request id assigned by the hosting runtime, if any.
    pub fn runtime_request_id(&self) -> Option<&str> {
        self.request_context
            .as_ref()
            .and_then(|ctx| ctx.request_id.as_deref())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    let query = Option::<Map<String, Value>>::deserialize(deserializer)?;
    Ok(Some(query.unwrap_or_default()))
}

/// One outbound response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// Serialized JSON text.
    pub body: String,
}

impl ResponseEnvelope {
    /// JSON response with the given status.
    pub fn json(status_code: u16, body: &Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string());
        Self {
            status_code,
            headers,
            body: to_spaced_json(body),
        }
    }

    /// `{"error": message}` with the given status.
    pub fn error(status_code: u16, message: &str) -> Self {
        Self::json(status_code, &json!({ "error": message }))
    }

    /// Decode the body back into JSON.
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Single-line JSON with a space after `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn to_spaced_json(value: &Value) -> String {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, SpacedFormatter);
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(out).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}
