use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Whether requests carry the browser-style session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialMode {
    #[default]
    Include,
    Omit,
}

impl FromStr for CredentialMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "include" => Ok(CredentialMode::Include),
            "omit" => Ok(CredentialMode::Omit),
            other => Err(format!("unknown credential mode '{}'", other)),
        }
    }
}

/// Paths of the scheduling backend, relative to `api_base_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoints {
    pub active_doctors: String,
    pub branch_doctors: String,
    pub unbooked_slots: String,
    pub patients: String,
    pub client_appointments: String,
    pub staff_appointments: String,
    pub cancel_appointment: String,
    pub complete_appointment: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            active_doctors: "/api/doctors/active".to_string(),
            branch_doctors: "/api/receptionist/doctors".to_string(),
            unbooked_slots: "/api/slots/unbooked".to_string(),
            patients: "/api/receptionist/clients".to_string(),
            client_appointments: "/api/appointments".to_string(),
            staff_appointments: "/api/receptionist/appointments".to_string(),
            cancel_appointment: "/api/appointments/cancel".to_string(),
            complete_appointment: "/api/appointments/complete".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub credential_mode: CredentialMode,
    /// Pre-established session cookie (`name=value`), attached when credentials are included.
    pub session_cookie: Option<String>,
    /// `None` keeps the HTTP client's default (no timeout).
    pub request_timeout_secs: Option<u64>,
    pub endpoints: ApiEndpoints,
}

impl AppConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            credential_mode: CredentialMode::default(),
            session_cookie: None,
            request_timeout_secs: None,
            endpoints: ApiEndpoints::default(),
        }
    }

    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("BOOKING_API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("BOOKING_API_BASE_URL not set, using empty value");
                    String::new()
                }),
            credential_mode: env::var("BOOKING_CREDENTIAL_MODE")
                .ok()
                .and_then(|raw| match raw.parse() {
                    Ok(mode) => Some(mode),
                    Err(e) => {
                        warn!("BOOKING_CREDENTIAL_MODE invalid ({}), using include", e);
                        None
                    }
                })
                .unwrap_or_default(),
            session_cookie: env::var("BOOKING_SESSION_COOKIE")
                .ok()
                .filter(|cookie| !cookie.trim().is_empty()),
            request_timeout_secs: env::var("BOOKING_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| match raw.parse::<u64>() {
                    Ok(secs) if secs > 0 => Some(secs),
                    _ => {
                        warn!("BOOKING_REQUEST_TIMEOUT_SECS invalid ({}), requests will not time out", raw);
                        None
                    }
                }),
            endpoints: ApiEndpoints::default(),
        };

        if !config.is_configured() {
            warn!("Booking client not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.trim().is_empty()
    }

    pub fn sends_credentials(&self) -> bool {
        self.credential_mode == CredentialMode::Include
    }
}
