//! Generative fallback over an Ollama-style `/api/generate` endpoint.
//!
//! Plain HTTP/1.1 over a `TcpStream` with connect and read timeouts and a
//! capped response size. The engine validates whatever comes back.

use log::debug;
use starhaul_game::FallbackInterpreter;
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use thiserror::Error;

use crate::config::FallbackConfig;

const DEFAULT_PORT: u16 = 11434;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const IO_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RESPONSE_BYTES: u64 = 1_048_576;

#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("generative fallback is not configured")]
    Disabled,
    #[error("invalid fallback host: {0}")]
    Host(String),
    #[error("failed to resolve fallback host {0}")]
    Resolve(String),
    #[error("fallback connection failed: {0}")]
    Connect(#[source] io::Error),
    #[error("fallback i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("fallback replied with {0}")]
    Status(String),
    #[error("malformed fallback reply: {0}")]
    Malformed(String),
}

/// The host's fallback collaborator; disabled without configuration.
#[derive(Debug, Clone, Default)]
pub struct GenerativeFallback {
    config: Option<FallbackConfig>,
}

impl GenerativeFallback {
    #[must_use]
    pub const fn new(config: Option<FallbackConfig>) -> Self {
        Self { config }
    }
}

impl FallbackInterpreter for GenerativeFallback {
    type Error = OllamaError;

    fn rewrite(&self, prompt: &str) -> Result<String, Self::Error> {
        let config = self.config.as_ref().ok_or(OllamaError::Disabled)?;
        generate(config, prompt)
    }

    fn is_enabled(&self) -> bool {
        self.config.is_some()
    }
}

/// Parse "http://127.0.0.1:11434", "https://example.com:8080", or
/// "127.0.0.1" into (hostname, port).
///
/// # Errors
///
/// Returns [`OllamaError::Host`] on an empty hostname or invalid port.
pub fn parse_host(host: &str) -> Result<(String, u16), OllamaError> {
    let bare = host
        .strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host)
        .trim_end_matches('/');
    let (hostname, port) = match bare.split_once(':') {
        Some((hostname, port)) => (
            hostname,
            port.trim()
                .parse::<u16>()
                .map_err(|_| OllamaError::Host(format!("invalid port in {host}")))?,
        ),
        None => (bare, DEFAULT_PORT),
    };
    let hostname = hostname.trim();
    if hostname.is_empty() {
        return Err(OllamaError::Host("empty hostname".to_string()));
    }
    Ok((hostname.to_string(), port))
}

/// Accept a 2xx status line such as "HTTP/1.1 200 OK".
///
/// # Errors
///
/// Returns [`OllamaError::Status`] for non-2xx codes and
/// [`OllamaError::Malformed`] for unreadable lines.
pub fn parse_http_status(status_line: &str) -> Result<u16, OllamaError> {
    let mut parts = status_line.splitn(3, ' ');
    let code = parts
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| OllamaError::Malformed(format!("status line {status_line:?}")))?;
    if (200..300).contains(&code) {
        Ok(code)
    } else {
        let reason = parts.next().unwrap_or("Unknown");
        Err(OllamaError::Status(format!("{code} {reason}")))
    }
}

fn build_request(hostname: &str, config: &FallbackConfig, body: &str) -> String {
    let auth = config
        .api_key
        .as_ref()
        .map(|key| format!("Authorization: Bearer {key}\r\n"))
        .unwrap_or_default();
    format!(
        "POST /api/generate HTTP/1.1\r\nHost: {hostname}\r\nContent-Type: application/json\r\n{auth}Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Undo `Transfer-Encoding: chunked` framing.
///
/// # Errors
///
/// Returns [`OllamaError::Malformed`] on a bad size line or truncated chunk.
pub fn decode_chunked(mut body: &[u8]) -> Result<Vec<u8>, OllamaError> {
    let malformed = |what: &str| OllamaError::Malformed(format!("chunked body: {what}"));
    let mut out = Vec::new();
    loop {
        let line_end = find(body, b"\r\n").ok_or_else(|| malformed("missing size line"))?;
        let line = std::str::from_utf8(&body[..line_end]).map_err(|_| malformed("size line"))?;
        let size_hex = line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16).map_err(|_| malformed("chunk size"))?;
        body = &body[line_end + 2..];
        if size == 0 {
            return Ok(out);
        }
        let chunk = body.get(..size).ok_or_else(|| malformed("truncated chunk"))?;
        out.extend_from_slice(chunk);
        body = body[size..]
            .strip_prefix(b"\r\n")
            .ok_or_else(|| malformed("missing chunk terminator"))?;
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn is_chunked(head: &str) -> bool {
    head.lines().skip(1).any(|line| {
        line.split_once(':').is_some_and(|(name, value)| {
            name.trim().eq_ignore_ascii_case("transfer-encoding")
                && value.to_ascii_lowercase().contains("chunked")
        })
    })
}

/// Pull the generated text out of a raw HTTP response.
///
/// # Errors
///
/// Returns an error for non-2xx statuses or a body without a `response` field.
pub fn read_generate_response(raw: &[u8]) -> Result<String, OllamaError> {
    let split = find(raw, b"\r\n\r\n")
        .ok_or_else(|| OllamaError::Malformed("missing header terminator".to_string()))?;
    let head = std::str::from_utf8(&raw[..split])
        .map_err(|_| OllamaError::Malformed("headers are not utf-8".to_string()))?;
    let status_line = head
        .lines()
        .next()
        .ok_or_else(|| OllamaError::Malformed("empty response".to_string()))?;
    parse_http_status(status_line)?;
    let body = &raw[split + 4..];
    let body = if is_chunked(head) {
        decode_chunked(body)?
    } else {
        body.to_vec()
    };
    let value: serde_json::Value =
        serde_json::from_slice(&body).map_err(|err| OllamaError::Malformed(err.to_string()))?;
    value
        .get("response")
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| OllamaError::Malformed("missing response field".to_string()))
}

/// Send one non-streaming generate request and return the generated text.
///
/// # Errors
///
/// Returns an error if the host cannot be reached, times out, answers with a
/// non-2xx status, or replies without a `response` field.
pub fn generate(config: &FallbackConfig, prompt: &str) -> Result<String, OllamaError> {
    let (hostname, port) = parse_host(&config.host)?;
    let addr = (hostname.as_str(), port)
        .to_socket_addrs()
        .map_err(|_| OllamaError::Resolve(hostname.clone()))?
        .next()
        .ok_or_else(|| OllamaError::Resolve(hostname.clone()))?;

    let body = serde_json::json!({
        "model": config.model,
        "prompt": prompt,
        "stream": false
    })
    .to_string();

    let mut stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).map_err(OllamaError::Connect)?;
    stream.set_read_timeout(Some(IO_TIMEOUT))?;
    stream.set_write_timeout(Some(IO_TIMEOUT))?;
    stream.write_all(build_request(&hostname, config, &body).as_bytes())?;

    let mut raw = Vec::new();
    stream.take(MAX_RESPONSE_BYTES).read_to_end(&mut raw)?;
    debug!("fallback replied with {} bytes", raw.len());
    read_generate_response(&raw)
}
