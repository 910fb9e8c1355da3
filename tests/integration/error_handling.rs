//! Failure propagation: nothing is retried, everything reaches the caller

use crate::integration::mock_server::MockServerFixture;
use gradio_adapter::{ChatParams, Error, GradioClientBuilder};
use std::io::Write;
use std::time::Duration;

#[tokio::test]
async fn test_non_2xx_surfaces_status_and_body_without_retry() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .json_mock(503, r#"{"error": "space is sleeping"}"#)
        .expect(1)
        .create_async()
        .await;

    let err = fixture
        .client()
        .completion(&ChatParams::new().message("hi"))
        .await
        .unwrap_err();

    mock.assert_async().await;
    match &err {
        Error::Remote { status, message } => {
            assert_eq!(*status, 503);
            assert!(message.contains("space is sleeping"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_transport());
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_streaming_remote_error_fails_before_any_chunk() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.json_mock(500, "boom").create_async().await;

    let result = fixture
        .client()
        .streaming(&ChatParams::new().message("hi"))
        .await;
    assert!(matches!(result, Err(Error::Remote { status: 500, .. })));
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let client = GradioClientBuilder::new()
        .base_url("http://127.0.0.1:1")
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let err = client
        .completion(&ChatParams::new().message("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "{err}");
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_slow_remote_hits_timeout() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .server
        .mock("POST", "/api/predict")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(1500));
            w.write_all(br#"{"data": ["late"]}"#)
        })
        .create_async()
        .await;

    let client = fixture
        .builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let err = client
        .completion(&ChatParams::new().message("hi"))
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "unexpected error: {err}");
    assert!(err.is_transport());
}
