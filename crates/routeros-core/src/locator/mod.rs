//! Resource lookup by natural key
//!
//! RouterOS collections are small, so the locator fetches the whole
//! collection once and scans it in order.

use crate::error::{Error, Result};
use crate::traits::{Method, Transport};
use serde_json::{Map, Value};
use tracing::debug;

/// Device field holding the opaque record identifier
pub const ID_FIELD: &str = ".id";

/// A live record as returned by the device
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentRecord {
    /// Device-assigned identifier (e.g. `*1A`)
    pub id: String,

    /// All fields as returned by the device, `.id` included
    pub fields: Map<String, Value>,
}

impl CurrentRecord {
    /// Build a record from a device object, requiring a string `.id`
    pub fn from_object(path: &str, fields: Map<String, Value>) -> Result<Self> {
        let id = fields
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::request(path, "record has no .id field"))?
            .to_string();

        Ok(Self { id, fields })
    }

    /// String value of a field, if present
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// REST path addressing this record inside `collection`
    pub fn path(&self, collection: &str) -> String {
        format!("{}/{}", collection.trim_end_matches('/'), self.id)
    }
}

/// Finds records in a REST collection by natural key
pub struct ResourceLocator<'a> {
    transport: &'a dyn Transport,
}

impl<'a> ResourceLocator<'a> {
    /// Create a locator over a transport
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Find the first record in `collection` whose `key_field` equals `key`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))`: A matching record
    /// - `Ok(None)`: The collection is empty or nothing matches
    /// - `Err(Error)`: The GET failed, the response was not an array, or an
    ///   entry before the match was not an object
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /rest/<collection>
    /// ```
    pub async fn find(
        &self,
        collection: &str,
        key_field: &str,
        key: &str,
    ) -> Result<Option<CurrentRecord>> {
        debug!("Looking up {}={} in {}", key_field, key, collection);

        let response = self.transport.call(Method::Get, collection, None).await?;

        let records = match response {
            Value::Array(records) => records,
            other => {
                return Err(Error::request(
                    collection,
                    format!("expected a JSON array, got: {}", json_kind(&other)),
                ));
            }
        };

        for record in records {
            let fields = match record {
                Value::Object(fields) => fields,
                other => {
                    return Err(Error::request(
                        collection,
                        format!("expected record objects, got: {}", json_kind(&other)),
                    ));
                }
            };

            if fields.get(key_field).and_then(Value::as_str) == Some(key) {
                let record = CurrentRecord::from_object(collection, fields)?;
                debug!("Found {} with id {}", key, record.id);
                return Ok(Some(record));
            }
        }

        debug!("No record with {}={} in {}", key_field, key, collection);
        Ok(None)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
