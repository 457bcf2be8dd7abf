//! Connector behavior against an endpoint with nothing listening.

use std::time::Duration;

use vibectl_core::{Error, IntifaceHub};

#[tokio::test]
async fn refused_connection_reports_the_underlying_cause() {
    // Nothing listens on port 1; the connector must fail fast, not hang.
    let result = tokio::time::timeout(
        Duration::from_secs(10),
        IntifaceHub::connect("ws://127.0.0.1:1", "vibectl-test"),
    )
    .await
    .expect("connect attempt timed out");

    let err = result.err().expect("connect must fail with nothing listening");
    match &err {
        Error::Connect { endpoint, source } => {
            assert_eq!(endpoint, "ws://127.0.0.1:1");
            assert!(!source.to_string().is_empty());
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
}
