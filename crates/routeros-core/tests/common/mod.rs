//! Test doubles and common utilities for reconciliation contract tests
//!
//! [`FakeRouter`] behaves like the `ip/dns/static` collection of a real
//! device: it assigns `.id`s, fills in default TTLs and disabled flags, and
//! answers deletes with an empty body.

#![allow(dead_code)]

use async_trait::async_trait;
use routeros_core::error::{Error, Result};
use routeros_core::traits::{Method, Transport};
use serde_json::{Map, Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const DNS_STATIC: &str = "ip/dns/static";

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub payload: Option<Value>,
}

/// In-memory stand-in for a router's DNS static collection
pub struct FakeRouter {
    records: Mutex<Vec<Map<String, Value>>>,
    calls: Mutex<Vec<Call>>,
    next_id: AtomicUsize,
    /// Reject every write with this status
    reject_writes: Option<u16>,
}

impl FakeRouter {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            reject_writes: None,
        }
    }

    /// A router that answers all PUT/DELETE calls with `status`
    pub fn rejecting_writes(status: u16) -> Self {
        Self {
            reject_writes: Some(status),
            ..Self::new()
        }
    }

    /// Seed a record; fields are device-native
    pub fn with_record(self, fields: Value) -> Self {
        let Value::Object(mut fields) = fields else {
            panic!("seed record must be an object");
        };
        if !fields.contains_key(".id") {
            fields.insert(".id".to_string(), Value::String(self.allocate_id()));
        }
        self.records.lock().unwrap().push(fields);
        self
    }

    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.records.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than GET
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method != Method::Get)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn allocate_id(&self) -> String {
        format!("*{:X}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn normalise(&self, fields: &mut Map<String, Value>) {
        fields
            .entry("ttl".to_string())
            .or_insert_with(|| json!("1d"));
        fields
            .entry("disabled".to_string())
            .or_insert_with(|| json!("false"));
        fields
            .entry("dynamic".to_string())
            .or_insert_with(|| json!("false"));
    }

    fn record_id(path: &str) -> Option<&str> {
        path.strip_prefix(DNS_STATIC)?.strip_prefix('/')
    }
}

#[async_trait]
impl Transport for FakeRouter {
    async fn call(&self, method: Method, path: &str, payload: Option<&Value>) -> Result<Value> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            payload: payload.cloned(),
        });

        if method != Method::Get {
            if let Some(status) = self.reject_writes {
                return Err(Error::status(path, status, "{\"detail\":\"failure: rejected\"}"));
            }
        }

        let mut records = self.records.lock().unwrap();

        match (method, Self::record_id(path)) {
            (Method::Get, None) if path == DNS_STATIC => {
                Ok(Value::Array(records.iter().cloned().map(Value::Object).collect()))
            }
            (Method::Put, None) if path == DNS_STATIC => {
                let mut fields = match payload {
                    Some(Value::Object(fields)) => fields.clone(),
                    _ => return Err(Error::status(path, 400, "missing body")),
                };
                fields.insert(".id".to_string(), Value::String(self.allocate_id()));
                self.normalise(&mut fields);
                records.push(fields.clone());
                Ok(Value::Object(fields))
            }
            (Method::Put, Some(id)) => {
                let record = records
                    .iter_mut()
                    .find(|r| r.get(".id").and_then(Value::as_str) == Some(id))
                    .ok_or_else(|| Error::status(path, 404, "no such item"))?;
                if let Some(Value::Object(changes)) = payload {
                    for (k, v) in changes {
                        record.insert(k.clone(), v.clone());
                    }
                }
                Ok(Value::Object(record.clone()))
            }
            (Method::Delete, Some(id)) => {
                let before = records.len();
                records.retain(|r| r.get(".id").and_then(Value::as_str) != Some(id));
                if records.len() == before {
                    return Err(Error::status(path, 404, "no such item"));
                }
                Ok(Value::Object(Map::new()))
            }
            _ => Err(Error::status(path, 400, "no such command")),
        }
    }
}
