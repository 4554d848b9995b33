use serde_derive::Deserialize;
use serde_json::{Map, Value};

use crate::error::{DispatchError, Result};

/// Top-level webhook document: which event happened, and what to do about it.
#[derive(Deserialize, Debug, Clone)]
pub struct Payload {
    #[serde(default)]
    pub event: Event,
    #[serde(default)]
    pub action: Action,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Event {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[allow(dead_code)]
    #[serde(default)]
    pub separator: String,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Action {
    pub cmd: Option<String>,
    #[serde(default)]
    pub params: Map<String, Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientAction {
    Connected,
    Disconnected,
}

impl ClientAction {
    /// Maps the raw hostapd-style tag to a typed action, case-insensitively.
    pub fn from_raw(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("AP-STA-CONNECTED") {
            Some(ClientAction::Connected)
        } else if raw.eq_ignore_ascii_case("AP-STA-DISCONNECTED") {
            Some(ClientAction::Disconnected)
        } else {
            None
        }
    }
}

/// Accepts whole JSON numbers and strings holding an integer. Fractional
/// numbers and everything else are rejected.
pub fn coerce_interval(value: &Value) -> Result<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            })
            .ok_or_else(|| DispatchError::InvalidInterval(value.to_string())),
        Value::String(raw) => raw
            .parse::<i64>()
            .map_err(|_| DispatchError::InvalidInterval(raw.clone())),
        other => Err(DispatchError::InvalidInterval(other.to_string())),
    }
}

/// The allow-list must be a JSON array; elements are compared in string form.
pub fn coerce_only_for(value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Array(items) => Ok(items.iter().map(element_to_string).collect()),
        other => Err(DispatchError::InvalidPayload(format!(
            "\"only_for\" must be a list, got: {other}"
        ))),
    }
}

fn element_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_full_payload() {
        let payload: Payload = serde_json::from_value(json!({
            "event": {
                "name": "wireless_status_update",
                "params": {
                    "client_mac_address": "AA:BB:CC:DD:EE:FF",
                    "action": "AP-STA-CONNECTED",
                    "interface": "wlan0",
                },
                "separator": " ",
            },
            "action": {
                "cmd": "echo hi",
                "params": {"interval": 60, "only_for": ["AA:BB:CC:DD:EE:FF"]},
            },
        }))
        .unwrap();
        assert_eq!(payload.event.name, "wireless_status_update");
        assert_eq!(payload.action.cmd.as_deref(), Some("echo hi"));
    }

    #[test]
    fn test_decode_missing_action_section() {
        let payload: Payload =
            serde_json::from_value(json!({"event": {"name": "wireless_status_update"}})).unwrap();
        assert!(payload.action.cmd.is_none());
        assert!(payload.action.params.is_empty());
    }

    #[test]
    fn test_decode_missing_event_section() {
        let payload: Payload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(payload.event.name, "");
    }

    #[test]
    fn test_client_action_case_insensitive() {
        assert_eq!(
            ClientAction::from_raw("ap-sta-connected"),
            Some(ClientAction::Connected)
        );
        assert_eq!(
            ClientAction::from_raw("AP-STA-DISCONNECTED"),
            Some(ClientAction::Disconnected)
        );
        assert_eq!(ClientAction::from_raw("AP-STA-POLL-OK"), None);
    }

    #[test]
    fn test_coerce_interval() {
        assert_eq!(coerce_interval(&json!(3600)).unwrap(), 3600);
        assert_eq!(coerce_interval(&json!(-5)).unwrap(), -5);
        assert_eq!(coerce_interval(&json!("120")).unwrap(), 120);
        assert_eq!(coerce_interval(&json!(3600.0)).unwrap(), 3600);
        assert!(coerce_interval(&json!(3600.5)).is_err());
        assert!(coerce_interval(&json!("ten")).is_err());
        assert!(coerce_interval(&json!([60])).is_err());
    }

    #[test]
    fn test_coerce_only_for() {
        let allowed = coerce_only_for(&json!(["AA:BB", 7, true])).unwrap();
        assert_eq!(allowed, vec!["AA:BB", "7", "true"]);
        assert!(coerce_only_for(&json!("AA:BB")).is_err());
    }
}
