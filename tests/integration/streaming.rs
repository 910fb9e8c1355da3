//! Streaming reassembly over a real HTTP body

use crate::integration::mock_server::MockServerFixture;
use futures::StreamExt;
use gradio_adapter::{ChatParams, GradioClientBuilder, StreamingChunk};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

async fn collect(fixture: &MockServerFixture) -> Vec<StreamingChunk> {
    let stream = fixture
        .client()
        .streaming(&ChatParams::new().message("hi"))
        .await
        .unwrap();
    stream.map(|c| c.unwrap()).collect().await
}

fn texts(chunks: &[StreamingChunk]) -> Vec<(&str, bool)> {
    chunks.iter().map(|c| (c.text.as_str(), c.is_finished)).collect()
}

#[tokio::test]
async fn test_sse_chunks_are_cumulative() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .sse_mock(&[r#"data: ["He"]"#, r#"data: ["llo"]"#, "data: [DONE]"])
        .create_async()
        .await;

    let chunks = collect(&fixture).await;

    mock.assert_async().await;
    assert_eq!(
        texts(&chunks),
        vec![("He", false), ("Hello", false), ("Hello", true)]
    );
    assert_eq!(chunks[2].finish_reason.as_deref(), Some("stop"));
}

#[tokio::test]
async fn test_undecodable_frame_is_passed_through_raw() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .sse_mock(&[r#"data: ["He"]"#, "data: not-json", "data: [DONE]"])
        .create_async()
        .await;

    let chunks = collect(&fixture).await;
    assert_eq!(
        texts(&chunks),
        vec![("He", false), ("not-json", false), ("He", true)]
    );
}

#[tokio::test]
async fn test_stream_without_marker_still_finishes() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .sse_mock(&[": heartbeat", r#"data: ["a"]"#, r#"data: ["b"]"#])
        .create_async()
        .await;

    let chunks = collect(&fixture).await;
    assert_eq!(
        texts(&chunks),
        vec![("a", false), ("ab", false), ("ab", true)]
    );
}

#[tokio::test]
async fn test_nothing_is_read_after_marker() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .sse_mock(&[r#"data: ["x"]"#, "data: [DONE]", r#"data: ["y"]"#])
        .create_async()
        .await;

    let chunks = collect(&fixture).await;
    assert_eq!(texts(&chunks), vec![("x", false), ("x", true)]);
}

#[tokio::test]
async fn test_cancel_ends_stream() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .sse_mock(&[r#"data: ["one"]"#, r#"data: [" two"]"#, "data: [DONE]"])
        .create_async()
        .await;

    let (mut stream, cancel) = fixture
        .client()
        .streaming_with_cancel(&ChatParams::new().message("hi"))
        .await
        .unwrap();

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.text, "one");

    cancel.cancel();
    assert!(stream.next().await.is_none());
}

/// One-shot SSE server that writes `frames` with `gap` between them, then closes.
async fn drip_server(frames: Vec<&'static str>, gap: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut req = Vec::new();
        let mut buf = [0u8; 4096];
        while !String::from_utf8_lossy(&req).contains("\"fn_index\":0}") {
            let n = sock.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            req.extend_from_slice(&buf[..n]);
        }
        sock.write_all(
            b"HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\nconnection: close\r\n\r\n",
        )
        .await
        .unwrap();
        for frame in frames {
            tokio::time::sleep(gap).await;
            if sock.write_all(format!("{frame}\n\n").as_bytes()).await.is_err() {
                return;
            }
            let _ = sock.flush().await;
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_stream_outlives_timeout_while_data_keeps_flowing() {
    let frames = vec![
        r#"data: ["t0"]"#,
        r#"data: ["t1"]"#,
        r#"data: ["t2"]"#,
        r#"data: ["t3"]"#,
        r#"data: ["t4"]"#,
        r#"data: ["t5"]"#,
        "data: [DONE]",
    ];
    let base = drip_server(frames, Duration::from_millis(400)).await;
    let client = GradioClientBuilder::new()
        .base_url(base)
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();

    let chunks: Vec<_> = client
        .streaming(&ChatParams::new().message("hi"))
        .await
        .unwrap()
        .collect()
        .await;

    let chunks: Vec<StreamingChunk> = chunks
        .into_iter()
        .map(|c| c.unwrap_or_else(|e| panic!("stream failed: {e}")))
        .collect();
    assert_eq!(chunks.len(), 7);
    assert_eq!(chunks[6].text, "t0t1t2t3t4t5");
    assert!(chunks[6].is_finished);
}

#[tokio::test]
async fn test_silent_stream_fails_with_timeout() {
    let frames = vec![r#"data: ["t0"]"#, "data: [DONE]"];
    let base = drip_server(frames, Duration::from_millis(1500)).await;
    let client = GradioClientBuilder::new()
        .base_url(base)
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();

    let mut stream = client
        .streaming(&ChatParams::new().message("hi"))
        .await
        .unwrap();

    let err = stream.next().await.unwrap().unwrap_err();
    assert!(err.is_timeout(), "unexpected error: {err}");
    assert!(stream.next().await.is_none());
}
