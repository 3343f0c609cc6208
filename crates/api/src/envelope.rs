//! Request execution envelope.
//!
//! Every routed request runs on its own task, raced against a fixed deadline
//! and against the client going away. Whichever happens first decides the
//! response; the handler task is never cancelled and keeps running to
//! completion in the background if it loses the race.

use std::future::Future;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::app::errors;

/// Non-standard status used when the client disconnected before the handler
/// finished. Nobody is left to read it.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Terminal state of one enveloped operation.
#[derive(Debug)]
pub enum Outcome<T> {
    CompletedOk(T),
    ClientGone,
    DeadlineExceeded,
}

impl<T> Outcome<T> {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::CompletedOk(_) => "completed",
            Outcome::ClientGone => "client_gone",
            Outcome::DeadlineExceeded => "deadline_exceeded",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::CompletedOk(_))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    deadline: Duration,
}

impl Envelope {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Spawn `op` and wait for the first of: `op` finishing, `client_gone`
    /// resolving, or the deadline elapsing.
    ///
    /// Returning never waits for `op` once one of the other two has fired.
    pub async fn run<F, C>(&self, client_gone: C, op: F) -> Outcome<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
        C: Future<Output = ()>,
    {
        let mut handle = tokio::spawn(op);
        let deadline = tokio::time::sleep(self.deadline);

        tokio::select! {
            biased;
            joined = &mut handle => match joined {
                Ok(output) => Outcome::CompletedOk(output),
                Err(err) => match err.try_into_panic() {
                    Ok(payload) => std::panic::resume_unwind(payload),
                    // Only reachable while the runtime shuts down.
                    Err(_) => Outcome::ClientGone,
                },
            },
            _ = client_gone => Outcome::ClientGone,
            _ = deadline => Outcome::DeadlineExceeded,
        }
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new(bookstore_infra::config::DEFAULT_REQUEST_TIMEOUT)
    }
}

/// axum middleware running the rest of the stack inside an [`Envelope`].
///
/// The race itself runs on a supervisor task so that a dropped connection
/// (which drops this future) is still observed and logged: dropping `_alive`
/// resolves the client-gone signal.
pub async fn envelope_middleware(
    State(envelope): State<Envelope>,
    req: Request,
    next: Next,
) -> Response {
    let request_id = Uuid::now_v7();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let (_alive, gone) = oneshot::channel::<()>();
    let client_gone = async move {
        let _ = gone.await;
    };

    let supervisor = tokio::spawn(async move {
        let outcome = envelope.run(client_gone, next.run(req)).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Outcome::CompletedOk(resp) => tracing::info!(
                %request_id,
                %method,
                path = %path,
                status = resp.status().as_u16(),
                duration_ms,
                outcome = outcome.label(),
                "request completed"
            ),
            Outcome::ClientGone => tracing::warn!(
                %request_id,
                %method,
                path = %path,
                duration_ms,
                outcome = outcome.label(),
                "connection lost"
            ),
            Outcome::DeadlineExceeded => tracing::warn!(
                %request_id,
                %method,
                path = %path,
                duration_ms,
                outcome = outcome.label(),
                "request timed out"
            ),
        }

        outcome
    });

    match supervisor.await {
        Ok(Outcome::CompletedOk(resp)) => resp,
        Ok(Outcome::DeadlineExceeded) => StatusCode::GATEWAY_TIMEOUT.into_response(),
        Ok(Outcome::ClientGone) => StatusCode::from_u16(CLIENT_CLOSED_REQUEST)
            .unwrap_or(StatusCode::REQUEST_TIMEOUT)
            .into_response(),
        Err(err) => {
            tracing::error!(%request_id, error = %err, "request handler panicked");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "internal server error",
            )
        }
    }
}
