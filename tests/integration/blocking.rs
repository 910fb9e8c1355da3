//! The blocking client shares the async client's semantics

use crate::integration::mock_server::MockServerFixture;
use gradio_adapter::{BlockingChatOutput, ChatParams, Error};

#[test]
fn test_blocking_completion() {
    let mut fixture = MockServerFixture::new_blocking();
    let mock = fixture.json_mock(200, r#"{"data": ["hello"]}"#).create();

    let completion = fixture
        .blocking_client()
        .completion(&ChatParams::new().message("hi"))
        .unwrap();

    mock.assert();
    assert_eq!(completion.content(), "hello");
    assert_eq!(completion.usage.total_tokens, 0);
}

#[test]
fn test_blocking_streaming_matches_async_semantics() {
    let mut fixture = MockServerFixture::new_blocking();
    let _mock = fixture
        .sse_mock(&[r#"data: ["He"]"#, "data: not-json", r#"data: ["llo"]"#, "data: [DONE]"])
        .create();

    let chunks: Vec<_> = fixture
        .blocking_client()
        .streaming(&ChatParams::new().message("hi"))
        .unwrap()
        .map(|c| c.unwrap())
        .collect();

    let texts: Vec<_> = chunks
        .iter()
        .map(|c| (c.text.as_str(), c.is_finished))
        .collect();
    assert_eq!(
        texts,
        vec![
            ("He", false),
            ("not-json", false),
            ("Hello", false),
            ("Hello", true)
        ]
    );
}

#[test]
fn test_blocking_remote_error() {
    let mut fixture = MockServerFixture::new_blocking();
    let _mock = fixture.json_mock(404, "no such space").create();

    let err = fixture
        .blocking_client()
        .completion(&ChatParams::new().message("hi"))
        .unwrap_err();
    assert!(matches!(err, Error::Remote { status: 404, .. }), "{err}");
}

#[test]
fn test_blocking_execute_streams_when_asked() {
    let mut fixture = MockServerFixture::new_blocking();
    let _mock = fixture.sse_mock(&[r#"data: ["z"]"#, "data: [DONE]"]).create();

    let out = fixture
        .blocking_client()
        .execute(&ChatParams::new().message("hi"), true)
        .unwrap();
    match out {
        BlockingChatOutput::Stream(chunks) => {
            let last = chunks.last().unwrap().unwrap();
            assert!(last.is_finished);
            assert_eq!(last.text, "z");
        }
        BlockingChatOutput::Completion(_) => panic!("expected a stream"),
    }
}
