use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use log::{debug, info};

use crate::error::{DispatchError, Result};
use crate::executor::CommandRunner;
use crate::payload::{self, ClientAction, Payload};

pub const WIRELESS_STATUS_UPDATE: &str = "wireless_status_update";
pub const DEFAULT_INTERVAL_SECONDS: i64 = 3600;

/// What a successful dispatch actually did. Every variant maps to an empty
/// HTTP 200; the distinction only matters for logging and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Executed(String),
    NoCommand,
    Debounced,
    Filtered,
}

/// Owns the per-client debounce state and the command-execution seam.
/// Shared across request handlers behind an `Arc`.
pub struct Dispatcher<R> {
    runner: R,
    default_interval: i64,
    last_seen: Mutex<HashMap<String, Instant>>,
}

impl<R: CommandRunner> Dispatcher<R> {
    pub fn new(runner: R, default_interval: i64) -> Self {
        Dispatcher {
            runner,
            default_interval,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    pub async fn dispatch(&self, payload: &Payload) -> Result<DispatchOutcome> {
        self.validate(payload)?;
        self.process(payload).await
    }

    /// Checks that the payload matches a supported event shape.
    pub fn validate(&self, payload: &Payload) -> Result<()> {
        match payload.event.name.as_str() {
            WIRELESS_STATUS_UPDATE => {
                self.required_fields(payload)?;
                Ok(())
            }
            other => Err(DispatchError::UnsupportedEvent(other.to_string())),
        }
    }

    pub async fn process(&self, payload: &Payload) -> Result<DispatchOutcome> {
        if payload.event.name != WIRELESS_STATUS_UPDATE {
            return Err(DispatchError::UnsupportedEvent(payload.event.name.clone()));
        }
        let (client_mac, client_action) = self.required_fields(payload)?;

        let params = &payload.action.params;
        let interval = match params.get("interval") {
            Some(value) => payload::coerce_interval(value)?,
            None => self.default_interval,
        };

        let now = Instant::now();
        let due = {
            let mut last_seen = self.last_seen.lock().unwrap();
            let due = match last_seen.get(&client_mac) {
                // First sighting always executes.
                None => true,
                Some(last) => {
                    now.duration_since(*last).as_secs() as i64 > interval
                        || client_action == ClientAction::Connected
                }
            };
            if due {
                // Record before running the command so events arriving while
                // the child is still alive land inside the window.
                last_seen.insert(client_mac.clone(), now);
            }
            due
        };
        if !due {
            debug!("suppressing {client_action:?} from {client_mac}: within {interval}s window");
            return Ok(DispatchOutcome::Debounced);
        }

        if let Some(only_for) = params.get("only_for") {
            let allowed = payload::coerce_only_for(only_for)?;
            if !allowed.is_empty()
                && !allowed
                    .iter()
                    .any(|mac| mac.eq_ignore_ascii_case(&client_mac))
            {
                info!("{client_mac} is not in the only_for allow-list, skipping command");
                return Ok(DispatchOutcome::Filtered);
            }
        }

        let Some(cmd) = payload.action.cmd.as_deref() else {
            debug!("no command configured for {client_action:?} from {client_mac}");
            return Ok(DispatchOutcome::NoCommand);
        };

        info!("running command for {client_action:?} from {client_mac}");
        let result = self.runner.run(cmd).await?;
        if result.code != 0 {
            return Err(DispatchError::CommandFailed {
                code: result.code,
                output: result.output,
            });
        }
        info!("command output: {:?}", result.output);
        Ok(DispatchOutcome::Executed(result.output))
    }

    fn required_fields(&self, payload: &Payload) -> Result<(String, ClientAction)> {
        let params = &payload.event.params;
        let client_mac = params
            .get("client_mac_address")
            .and_then(|value| value.as_str())
            .filter(|mac| !mac.is_empty())
            .ok_or_else(|| {
                DispatchError::InvalidPayload(
                    "mandatory key \"client_mac_address\" is missing from event params"
                        .to_string(),
                )
            })?;
        let client_action = params
            .get("action")
            .and_then(|value| value.as_str())
            .and_then(ClientAction::from_raw)
            .ok_or_else(|| {
                DispatchError::InvalidPayload(format!(
                    "mandatory key \"action\" is missing or has invalid value: {:?}",
                    params.get("action")
                ))
            })?;
        Ok((client_mac.to_string(), client_action))
    }
}
