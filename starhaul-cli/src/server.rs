//! HTTP boundary: `POST /command` and `GET /state`, both answering with the
//! full game state as JSON.

use anyhow::{Context, Result};
use hyper::header::CONTENT_TYPE;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use log::{info, warn};
use serde::Deserialize;
use starhaul_game::{FallbackInterpreter, GameEngine, GameStorage};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Commands are applied one at a time behind this lock.
pub type SharedEngine<S, F> = Arc<Mutex<GameEngine<S, F>>>;

#[derive(Debug, Deserialize)]
struct CommandRequest {
    command: String,
}

/// Serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve<S, F>(engine: GameEngine<S, F>, addr: SocketAddr) -> Result<()>
where
    S: GameStorage + Send + 'static,
    F: FallbackInterpreter + Send + 'static,
{
    let shared: SharedEngine<S, F> = Arc::new(Mutex::new(engine));
    let make_svc = make_service_fn(move |_conn| {
        let shared = Arc::clone(&shared);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| route(Arc::clone(&shared), req)))
        }
    });
    let server = Server::try_bind(&addr)
        .with_context(|| format!("binding {addr}"))?
        .serve(make_svc);
    info!("listening on http://{addr}");
    server
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_err() {
                warn!("ctrl-c handler unavailable");
            }
        })
        .await
        .context("serving commands")
}

pub async fn route<S, F>(
    shared: SharedEngine<S, F>,
    req: Request<Body>,
) -> Result<Response<Body>, Infallible>
where
    S: GameStorage + Send + 'static,
    F: FallbackInterpreter + Send + 'static,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = match (&method, path.as_str()) {
        (&Method::GET, "/state") => state_response(shared).await,
        (&Method::POST, "/command") => command_response(shared, req).await,
        _ => plain(StatusCode::NOT_FOUND, "not found"),
    };
    Ok(response)
}

async fn state_response<S, F>(shared: SharedEngine<S, F>) -> Response<Body>
where
    S: GameStorage + Send + 'static,
    F: FallbackInterpreter + Send + 'static,
{
    with_engine(shared, |engine| serde_json::to_string(engine.state())).await
}

async fn command_response<S, F>(shared: SharedEngine<S, F>, req: Request<Body>) -> Response<Body>
where
    S: GameStorage + Send + 'static,
    F: FallbackInterpreter + Send + 'static,
{
    let declared = hyper::body::HttpBody::size_hint(req.body()).upper();
    if declared.is_some_and(|len| len > MAX_BODY_BYTES) {
        return plain(StatusCode::PAYLOAD_TOO_LARGE, "command body too large");
    }
    let bytes = match hyper::body::to_bytes(req.into_body()).await {
        Ok(bytes) => bytes,
        Err(err) => return plain(StatusCode::BAD_REQUEST, &format!("unreadable body: {err}")),
    };
    let request: CommandRequest = match serde_json::from_slice(&bytes) {
        Ok(request) => request,
        Err(err) => {
            return plain(
                StatusCode::BAD_REQUEST,
                &format!("expected {{\"command\": string}}: {err}"),
            );
        }
    };
    with_engine(shared, move |engine| {
        let report = engine.handle_command(&request.command);
        info!(
            "{} -> {} ({} log entries)",
            report.command,
            if report.accepted { "accepted" } else { "rejected" },
            report.entries.len()
        );
        serde_json::to_string(engine.state())
    })
    .await
}

/// Run `f` against the engine on the blocking pool; the fallback call may
/// block on network I/O.
async fn with_engine<S, F, W>(shared: SharedEngine<S, F>, f: W) -> Response<Body>
where
    S: GameStorage + Send + 'static,
    F: FallbackInterpreter + Send + 'static,
    W: FnOnce(&mut GameEngine<S, F>) -> serde_json::Result<String> + Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || {
        let mut engine = shared.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut engine)
    })
    .await;
    match outcome {
        Ok(Ok(json)) => Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json))
            .unwrap_or_else(|_| plain(StatusCode::INTERNAL_SERVER_ERROR, "response build failed")),
        Ok(Err(err)) => plain(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("state serialization failed: {err}"),
        ),
        Err(err) => plain(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("command task failed: {err}"),
        ),
    }
}

fn plain(status: StatusCode, message: &str) -> Response<Body> {
    let mut response = Response::new(Body::from(message.to_string()));
    *response.status_mut() = status;
    response
}
