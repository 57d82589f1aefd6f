//! Per-request tracing span
//!
//! Wraps every handler so that handlers themselves hold no tracing state.

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{error, field, info, info_span, warn, Instrument};

/// Run the request inside an `http_request` span and record its outcome
pub async fn record_outcome(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let span = info_span!(
        "http_request",
        component = "HTTP server",
        method = %method,
        path = %path,
        status = field::Empty,
    );

    let response = next.run(req).instrument(span.clone()).await;
    let status = response.status();
    span.record("status", status.as_u16());

    let _enter = span.enter();
    if status.is_server_error() {
        error!("{} {} -> {}", method, path, status);
    } else if status.is_client_error() {
        warn!("{} {} -> {}", method, path, status);
    } else {
        info!("{} {} -> {}", method, path, status);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output in memory
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn app() -> Router {
        Router::new()
            .route("/ok", get(|| async { StatusCode::OK }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .layer(middleware::from_fn(record_outcome))
    }

    /// The outcome event line for `path`
    fn outcome_line(logs: &str, path: &str) -> String {
        let marker = format!("GET {} -> ", path);
        logs.lines()
            .find(|line| line.contains(&marker))
            .unwrap_or_else(|| panic!("no outcome event for {} in:\n{}", path, logs))
            .to_string()
    }

    #[tokio::test]
    async fn test_span_fields_and_level_follow_status() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = app();
        for path in ["/ok", "/missing", "/broken"] {
            let req = axum::http::Request::builder()
                .uri(path)
                .body(Body::empty())
                .unwrap();
            app.clone().oneshot(req).await.unwrap();
        }

        let output = logs.contents();

        let ok = outcome_line(&output, "/ok");
        assert!(ok.contains("INFO"), "{}", ok);
        assert!(ok.contains("http_request{"), "{}", ok);
        assert!(ok.contains("method=GET"), "{}", ok);
        assert!(ok.contains("path=/ok"), "{}", ok);
        assert!(ok.contains("status=200"), "{}", ok);

        let missing = outcome_line(&output, "/missing");
        assert!(missing.contains("WARN"), "{}", missing);
        assert!(missing.contains("status=404"), "{}", missing);

        let broken = outcome_line(&output, "/broken");
        assert!(broken.contains("ERROR"), "{}", broken);
        assert!(broken.contains("status=500"), "{}", broken);
    }
}
