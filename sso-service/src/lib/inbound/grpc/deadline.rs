use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::sync::DropGuard;
use tonic::metadata::MetadataMap;

const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

/// Cancellation scope of a single RPC.
///
/// The token fires at the earlier of the client's `grpc-timeout` and the
/// server's own limit, and unconditionally when the scope is dropped, which
/// also stops the timer task.
pub struct RequestDeadline {
    token: CancellationToken,
    expires_at: Instant,
    _guard: DropGuard,
}

impl RequestDeadline {
    pub fn start(metadata: &MetadataMap, server_timeout: Duration) -> Self {
        let timeout = metadata
            .get(GRPC_TIMEOUT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_grpc_timeout)
            .map_or(server_timeout, |client_timeout| client_timeout.min(server_timeout));

        let token = CancellationToken::new();
        let expires_at = Instant::now() + timeout;

        let timer = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = timer.cancelled() => {}
                _ = tokio::time::sleep_until(expires_at) => {
                    tracing::debug!(timeout_ms = timeout.as_millis(), "request deadline reached");
                    timer.cancel();
                }
            }
        });

        Self {
            _guard: token.clone().drop_guard(),
            token,
            expires_at,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Parse a gRPC `grpc-timeout` value: up to eight ASCII digits followed by
/// one of `H`, `M`, `S`, `m`, `u`, `n`.
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    if !value.is_ascii() || value.len() < 2 {
        return None;
    }

    let (digits, unit) = value.split_at(value.len() - 1);
    if digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    match unit {
        "H" => Some(Duration::from_secs(amount * 60 * 60)),
        "M" => Some(Duration::from_secs(amount * 60)),
        "S" => Some(Duration::from_secs(amount)),
        "m" => Some(Duration::from_millis(amount)),
        "u" => Some(Duration::from_micros(amount)),
        "n" => Some(Duration::from_nanos(amount)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grpc_timeout() {
        assert_eq!(parse_grpc_timeout("1H"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_grpc_timeout("2M"), Some(Duration::from_secs(120)));
        assert_eq!(parse_grpc_timeout("10S"), Some(Duration::from_secs(10)));
        assert_eq!(parse_grpc_timeout("250m"), Some(Duration::from_millis(250)));
        assert_eq!(parse_grpc_timeout("7u"), Some(Duration::from_micros(7)));
        assert_eq!(parse_grpc_timeout("99999999n"), Some(Duration::from_nanos(99_999_999)));
    }

    #[test]
    fn test_parse_grpc_timeout_rejects_malformed() {
        assert_eq!(parse_grpc_timeout(""), None);
        assert_eq!(parse_grpc_timeout("S"), None);
        assert_eq!(parse_grpc_timeout("10"), None);
        assert_eq!(parse_grpc_timeout("10s"), None);
        assert_eq!(parse_grpc_timeout("-1S"), None);
        assert_eq!(parse_grpc_timeout("123456789S"), None);
        assert_eq!(parse_grpc_timeout("1é"), None);
    }

    #[tokio::test]
    async fn test_client_timeout_caps_server_timeout() {
        let mut metadata = MetadataMap::new();
        metadata.insert(GRPC_TIMEOUT_HEADER, "10m".parse().unwrap());

        let deadline = RequestDeadline::start(&metadata, Duration::from_secs(30));
        tokio::time::timeout(Duration::from_secs(5), deadline.token().cancelled())
            .await
            .expect("deadline never fired");
        assert!(deadline.is_expired());
    }

    #[tokio::test]
    async fn test_drop_cancels_token() {
        let deadline = RequestDeadline::start(&MetadataMap::new(), Duration::from_secs(30));
        let token = deadline.token().clone();
        assert!(!token.is_cancelled());
        assert!(!deadline.is_expired());

        drop(deadline);
        assert!(token.is_cancelled());
    }
}
