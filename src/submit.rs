use std::error;
use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::EventType;

/// Fixed endpoint path accepting the selection payload.
pub const SUBMIT_PATH: &str = "/api/add-events";

/// Fallback shown when the server gave no usable detail.
pub const MSG_UNKNOWN_ERROR: &str = "Wystąpił nieznany błąd.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: EventType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    pub message: String,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    /// Request could not be built or sent.
    Transport,
    /// Server answered with a non-2xx status.
    Rejected,
    /// Body of a 2xx answer did not parse.
    MalformedResponse,
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    /// Server-provided detail if any, otherwise the generic message.
    pub fn detail(&self) -> &str {
        self.message.as_deref().unwrap_or(MSG_UNKNOWN_ERROR)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Error {
        Error::new(ErrorKind::Transport, &error.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "request failed",
            ErrorKind::Rejected => "server rejected the request",
            ErrorKind::MalformedResponse => "invalid server response",
        }
    }
}

pub type SubmitResult = Result<SubmitResponse, Error>;

/// Blocking client for the event-submission endpoint. Cheap to clone; a
/// clone is handed to the worker thread performing the actual call.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Client {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Posts the selection in one request. Non-2xx answers and unparsable
    /// bodies come back as `Error`; the caller decides how to surface them.
    pub fn submit(&self, request: &SubmitRequest) -> SubmitResult {
        let url = format!("{}{}", self.base_url, SUBMIT_PATH);

        log::debug!("submitting {} events to {}", request.events.len(), url);

        let response = self.http.post(&url).json(request).send()?;
        let status = response.status();
        let body = response.text()?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|err| {
                Error::new(
                    ErrorKind::MalformedResponse,
                    &format!("could not parse response: {}", err),
                )
            })
        } else {
            log::warn!("submission rejected with status {}", status);
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail);
            Err(match detail {
                Some(detail) => Error::new(ErrorKind::Rejected, &detail),
                None => Error::from(ErrorKind::Rejected),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request() -> SubmitRequest {
        SubmitRequest {
            events: vec![
                EventRecord {
                    date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
                    kind: EventType::Duty,
                },
                EventRecord {
                    date: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
                    kind: EventType::Blood,
                },
            ],
        }
    }

    #[test]
    fn payload_uses_wire_format() {
        let json = serde_json::to_value(&request()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "events": [
                    { "date": "2025-01-05", "type": "duty" },
                    { "date": "2025-01-07", "type": "blood" },
                ]
            })
        );
    }

    #[test]
    fn successful_submission_returns_message_and_redirect() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", SUBMIT_PATH)
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"OK","redirect_url":"/x"}"#)
            .create();

        let client = Client::new(&server.url()).unwrap();
        let response = client.submit(&request()).unwrap();

        mock.assert();
        assert_eq!(response.message, "OK");
        assert_eq!(response.redirect_url.as_deref(), Some("/x"));
    }

    #[test]
    fn success_without_redirect_is_accepted() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", SUBMIT_PATH)
            .with_status(200)
            .with_body(r#"{"message":"Pomyślnie dodano 2 wydarzeń."}"#)
            .create();

        let client = Client::new(&server.url()).unwrap();
        let response = client.submit(&request()).unwrap();

        assert_eq!(response.message, "Pomyślnie dodano 2 wydarzeń.");
        assert_eq!(response.redirect_url, None);
    }

    #[test]
    fn rejection_surfaces_server_detail() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", SUBMIT_PATH)
            .with_status(400)
            .with_body(r#"{"detail":"bad date"}"#)
            .create();

        let client = Client::new(&server.url()).unwrap();
        let error = client.submit(&request()).unwrap_err();

        assert_eq!(error.detail(), "bad date");
    }

    #[test]
    fn rejection_without_detail_falls_back_to_generic_message() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", SUBMIT_PATH)
            .with_status(500)
            .with_body("gateway exploded")
            .create();

        let client = Client::new(&server.url()).unwrap();
        let error = client.submit(&request()).unwrap_err();

        assert_eq!(error.detail(), MSG_UNKNOWN_ERROR);
    }

    #[test]
    fn malformed_success_body_is_an_error() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", SUBMIT_PATH)
            .with_status(200)
            .with_body("not json")
            .create();

        let client = Client::new(&server.url()).unwrap();
        let error = client.submit(&request()).unwrap_err();

        assert!(matches!(error.kind, ErrorKind::MalformedResponse));
    }
}
