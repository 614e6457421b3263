//! Messages exchanged with the host
//!
//! Inbound requests are decoded leniently from a `serde_json::Value`, since a
//! missing or unknown `type` is an outcome the dispatcher reports rather than
//! a decoding failure. Outbound messages are plain serializable structs.

use crate::crawler::ProductRecord;
use crate::state::EnumerationState;
use crate::ProtocolError;
use serde::Serialize;
use serde_json::Value;

/// The `type` tag on outbound messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Get,
    Response,
}

/// Operation requested by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Enumerate the listing, optionally resuming from a `"c.b.p"` state
    List { state: Option<String> },

    /// Extract the detail record of one item
    Info { id: String },

    /// A `type` tag the worker does not understand
    Unknown(String),
}

impl Request {
    /// Interprets a decoded line as a request
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Request))` - The line carries an operation tag
    /// * `Ok(None)` - The line is not an object or has no `type` field
    /// * `Err(ProtocolError)` - A known operation has an unusable field
    pub fn from_value(value: &Value) -> Result<Option<Self>, ProtocolError> {
        let Some(object) = value.as_object() else {
            return Ok(None);
        };
        let Some(kind) = object.get("type") else {
            return Ok(None);
        };

        let kind = match kind {
            Value::String(s) => s.as_str(),
            other => return Ok(Some(Self::Unknown(other.to_string()))),
        };

        match kind {
            "list" => {
                let state = match object.get("state") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(_) => {
                        return Err(ProtocolError::InvalidField {
                            field: "state",
                            expected: "a string",
                        })
                    }
                };
                Ok(Some(Self::List { state }))
            }
            "info" => match object.get("id") {
                Some(Value::String(id)) => Ok(Some(Self::Info { id: id.clone() })),
                Some(_) => Err(ProtocolError::InvalidField {
                    field: "id",
                    expected: "a string",
                }),
                None => Err(ProtocolError::MissingField("id")),
            },
            other => Ok(Some(Self::Unknown(other.to_string()))),
        }
    }

    /// Returns true for the empty object the host may send to end a stream
    pub fn is_end_marker(value: &Value) -> bool {
        value.as_object().is_some_and(|object| object.is_empty())
    }
}

/// Asks the host to fetch a URL
#[derive(Debug, Serialize)]
pub struct FetchRequest<'a> {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub url: &'a str,
}

impl<'a> FetchRequest<'a> {
    pub fn new(url: &'a str) -> Self {
        Self {
            kind: MessageKind::Get,
            url,
        }
    }
}

/// Identifiers found on one listing page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListPage {
    #[serde(rename = "type")]
    pub kind: MessageKind,

    /// State of the page the ids came from
    pub state: EnumerationState,
    pub ids: Vec<String>,
}

/// Extracted record for one item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordReply {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub response: ProductRecord,
}

/// Operation results sent back to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    ListPage(ListPage),
    Record(RecordReply),
}

impl Response {
    pub fn list_page(state: EnumerationState, ids: Vec<String>) -> Self {
        Self::ListPage(ListPage {
            kind: MessageKind::Response,
            state,
            ids,
        })
    }

    pub fn record(record: ProductRecord) -> Self {
        Self::Record(RecordReply {
            kind: MessageKind::Response,
            response: record,
        })
    }
}
