use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// What triggered a chef to emit a dumpling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    Packet,
    Interval,
}

#[derive(Debug, Error)]
pub enum DumplingError {
    #[error("invalid dumpling: {0}")]
    InvalidDumpling(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// The metadata half of a dumpling's wire representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Metadata {
    chef: String,
    kitchen: Option<String>,
    creation_time: f64,
    driver: Driver,
}

/// The exact shape a dumpling takes on the wire: `{"metadata": {...},
/// "payload": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireDumpling {
    metadata: Metadata,
    payload: Value,
}

/// A single event record: who made it, why, when, and what it carries.
///
/// Construct with [`Dumpling::new`], send with [`Dumpling::encode`], and
/// recover one with [`decode`]. A dumpling is immutable after construction —
/// there is no setter, only the constructor and the accessors below.
#[derive(Debug, Clone, PartialEq)]
pub struct Dumpling {
    chef_name: String,
    kitchen_name: Option<String>,
    driver: Driver,
    creation_time: f64,
    payload: Value,
}

impl Dumpling {
    /// Builds a dumpling with `creation_time` set to the current wall clock.
    pub fn new(
        chef_name: impl Into<String>,
        kitchen_name: Option<String>,
        driver: Driver,
        payload: Value,
    ) -> Self {
        Self::with_creation_time(chef_name, kitchen_name, driver, payload, now_epoch_secs())
    }

    /// Builds a dumpling with an explicit `creation_time`, mainly for tests.
    pub fn with_creation_time(
        chef_name: impl Into<String>,
        kitchen_name: Option<String>,
        driver: Driver,
        payload: Value,
        creation_time: f64,
    ) -> Self {
        Self {
            chef_name: chef_name.into(),
            kitchen_name,
            driver,
            creation_time,
            payload,
        }
    }

    pub fn chef_name(&self) -> &str {
        &self.chef_name
    }

    pub fn kitchen_name(&self) -> Option<&str> {
        self.kitchen_name.as_deref()
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    pub fn creation_time(&self) -> f64 {
        self.creation_time
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Produces the wire JSON. Fails if the payload is not representable in
    /// JSON (e.g. a non-finite float snuck in through a manual `Value`
    /// construction).
    pub fn encode(&self) -> Result<Vec<u8>, DumplingError> {
        let wire = WireDumpling {
            metadata: Metadata {
                chef: self.chef_name.clone(),
                kitchen: self.kitchen_name.clone(),
                creation_time: self.creation_time,
                driver: self.driver,
            },
            payload: self.payload.clone(),
        };
        serde_json::to_vec(&wire).map_err(|e| DumplingError::InvalidPayload(e.to_string()))
    }
}

/// Fails if `bytes` is not JSON, if `metadata.chef` is missing, or if
/// `driver` is not one of the two allowed literals.
pub fn decode(bytes: &[u8]) -> Result<Dumpling, DumplingError> {
    let wire: WireDumpling = serde_json::from_slice(bytes)
        .map_err(|e| DumplingError::InvalidDumpling(e.to_string()))?;

    if wire.metadata.chef.is_empty() {
        return Err(DumplingError::InvalidDumpling(
            "metadata.chef is empty".to_string(),
        ));
    }

    Ok(Dumpling {
        chef_name: wire.metadata.chef,
        kitchen_name: wire.metadata.kitchen,
        driver: wire.metadata.driver,
        creation_time: wire.metadata.creation_time,
        payload: wire.payload,
    })
}

/// Lightweight ingress check: confirms JSON parseability and the presence of
/// `metadata.chef`, without requiring `driver` to be one of the enum
/// literals. Returns the chef name — the only field the hub needs in order
/// to log and to relay the frame unchanged.
pub fn validate(bytes: &[u8]) -> Result<String, DumplingError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| DumplingError::InvalidDumpling(e.to_string()))?;

    let chef = value
        .get("metadata")
        .and_then(|m| m.get("chef"))
        .and_then(Value::as_str)
        .ok_or_else(|| DumplingError::InvalidDumpling("metadata.chef missing".to_string()))?;

    if value.get("payload").is_none() {
        return Err(DumplingError::InvalidDumpling("payload missing".to_string()));
    }

    Ok(chef.to_string())
}

fn now_epoch_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encode_decode() {
        let d = Dumpling::with_creation_time(
            "ArpChef",
            Some("kitchen-1".to_string()),
            Driver::Packet,
            serde_json::json!({"hello": 1}),
            12345.5,
        );

        let encoded = d.encode().unwrap();
        let decoded = decode(&encoded).unwrap();

        assert_eq!(d, decoded);
    }

    #[test]
    fn null_payload_round_trips() {
        let d = Dumpling::with_creation_time(
            "ArpChef",
            None,
            Driver::Interval,
            Value::Null,
            0.0,
        );

        let decoded = decode(&d.encode().unwrap()).unwrap();
        assert_eq!(decoded.payload(), &Value::Null);
        assert_eq!(decoded.kitchen_name(), None);
    }

    #[test]
    fn decode_rejects_non_json() {
        let err = decode(b"{not json").unwrap_err();
        assert!(matches!(err, DumplingError::InvalidDumpling(_)));
    }

    #[test]
    fn decode_rejects_unknown_driver() {
        let bytes = br#"{"metadata":{"chef":"X","kitchen":null,"creation_time":1.0,"driver":"other"},"payload":null}"#;
        let err = decode(bytes).unwrap_err();
        assert!(matches!(err, DumplingError::InvalidDumpling(_)));
    }

    #[test]
    fn decode_rejects_missing_chef() {
        let bytes = br#"{"metadata":{"kitchen":null,"creation_time":1.0,"driver":"packet"},"payload":null}"#;
        let err = decode(bytes).unwrap_err();
        assert!(matches!(err, DumplingError::InvalidDumpling(_)));
    }

    #[test]
    fn validate_succeeds_on_non_enum_driver() {
        let bytes = br#"{"metadata":{"chef":"X","kitchen":null,"creation_time":1.0,"driver":"other"},"payload":null}"#;
        let chef = validate(bytes).unwrap();
        assert_eq!(chef, "X");
    }

    #[test]
    fn validate_rejects_missing_chef() {
        let bytes = br#"{"metadata":{"kitchen":null},"payload":null}"#;
        assert!(validate(bytes).is_err());
    }

    #[test]
    fn validate_rejects_non_json() {
        assert!(validate(b"not json at all").is_err());
    }
}
