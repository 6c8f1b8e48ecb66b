//! Leaderboard submission
//!
//! Fire-and-forget: a finished session hands its score to a reporter and
//! moves on. Failures are logged and never reach the player.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Leaderboard ID for this game
pub const GAME_ID: &str = "deepwork";

/// One finished session, as sent to the leaderboard service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub game_id: String,
    pub score: u32,
}

impl ScoreSubmission {
    pub fn new(game_id: impl Into<String>, score: u32) -> Self {
        Self {
            game_id: game_id.into(),
            score,
        }
    }
}

/// Submission failures (logged only)
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to encode submission: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Request(String),

    #[error("leaderboard rejected submission with status {0}")]
    Status(u16),
}

/// Receives finished sessions. Must not block or fail visibly.
pub trait ScoreReporter {
    fn report(&mut self, submission: ScoreSubmission);
}

/// Logs submissions locally (native hosts, offline play)
#[derive(Debug, Clone, Default)]
pub struct LogReporter;

impl ScoreReporter for LogReporter {
    fn report(&mut self, submission: ScoreSubmission) {
        match serde_json::to_string(&submission) {
            Ok(json) => log::info!("Score submission: {}", json),
            Err(e) => log::error!("Failed to submit score: {}", ReportError::from(e)),
        }
    }
}

/// POSTs submissions to `{api_base}/leaderboard/submit` (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct HttpReporter {
    api_base: String,
}

#[cfg(target_arch = "wasm32")]
impl HttpReporter {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    async fn send(url: String, body: String) -> Result<(), ReportError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Request, RequestCredentials, RequestInit, Response};

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_credentials(RequestCredentials::Include);
        opts.set_body(&wasm_bindgen::JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|e| ReportError::Request(format!("{:?}", e)))?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| ReportError::Request(format!("{:?}", e)))?;

        let window = web_sys::window().ok_or_else(|| ReportError::Request("no window".into()))?;
        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ReportError::Request(format!("{:?}", e)))?;
        let response: Response = response
            .dyn_into()
            .map_err(|e| ReportError::Request(format!("{:?}", e)))?;

        if response.ok() {
            Ok(())
        } else {
            Err(ReportError::Status(response.status()))
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreReporter for HttpReporter {
    fn report(&mut self, submission: ScoreSubmission) {
        let body = match serde_json::to_string(&submission) {
            Ok(body) => body,
            Err(e) => {
                log::error!("Failed to submit score: {}", ReportError::from(e));
                return;
            }
        };
        let url = format!("{}/leaderboard/submit", self.api_base);

        wasm_bindgen_futures::spawn_local(async move {
            match Self::send(url, body).await {
                Ok(()) => log::info!("Score submitted ({})", submission.score),
                Err(e) => log::error!("Failed to submit score: {}", e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_wire_format() {
        let json = serde_json::to_string(&ScoreSubmission::new(GAME_ID, 12)).unwrap();
        assert_eq!(json, r#"{"gameId":"deepwork","score":12}"#);
    }

    #[test]
    fn test_log_reporter_never_fails() {
        let mut reporter = LogReporter;
        reporter.report(ScoreSubmission::new(GAME_ID, 0));
        reporter.report(ScoreSubmission::new("", u32::MAX));
    }
}
