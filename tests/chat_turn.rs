//! A full chat turn: tokens in, rendered frames out, disposition decided.

use std::sync::Arc;

use async_stream::stream;
use futures_util::Stream;
use httpmock::prelude::*;
use serde_json::json;
use tokio::sync::mpsc;

use tabletalk::chat::{
    ChannelRenderSink, ChatSession, Disposition, HttpCompletionClient, MemoryRenderSink,
    QueryExtractor, RenderFrame, StreamProtocolError, TokenBuffer, decide_disposition, stream_turn,
};

fn scripted(parts: &'static [&'static str]) -> impl Stream<Item = String> {
    stream! {
        for part in parts {
            yield (*part).to_string();
        }
    }
}

#[tokio::test]
async fn streamed_turn_commits_to_the_session() {
    let mut session = ChatSession::new();
    session.begin_turn("show me the orders table").unwrap();

    let sink = MemoryRenderSink::new();
    let mut handle = sink.clone();
    let tokens = scripted(&["The", " orders", " table", " has", " 12", " columns."]);
    let final_text = stream_turn(tokens, &mut handle).await.unwrap();
    session.complete_turn(final_text.clone()).unwrap();

    assert_eq!(final_text, "The orders table has 12 columns.");
    let frames = sink.snapshot();
    assert_eq!(frames.len(), 7);
    assert_eq!(frames.iter().filter(|frame| frame.is_final).count(), 1);
    assert!(frames.last().unwrap().is_final);
    assert_eq!(session.messages().len(), 4);
    assert_eq!(session.messages()[3].content, final_text);
}

#[tokio::test]
async fn frames_reach_an_async_consumer() {
    let (tx, mut rx) = mpsc::unbounded_channel::<RenderFrame>();
    let collector = tokio::spawn(async move {
        let mut frames = Vec::new();
        while let Some(frame) = rx.recv().await {
            frames.push((frame.markup(), frame.is_final));
        }
        frames
    });

    let mut sink = ChannelRenderSink::new(tx);
    stream_turn(scripted(&["SELECT", " 1"]), &mut sink)
        .await
        .unwrap();
    drop(sink);

    let frames = collector.await.unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], ("SELECT".to_string(), false));
    assert_eq!(frames[2], ("SELECT 1".to_string(), true));
}

#[tokio::test]
async fn protocol_violation_aborts_without_recording() {
    let mut session = ChatSession::new();
    session.begin_turn("hello").unwrap();

    let mut buffer = TokenBuffer::new();
    buffer.push_token("partial").unwrap();
    buffer.end().unwrap();
    let err = buffer.push_token("late").unwrap_err();
    assert_eq!(err, StreamProtocolError::TokenAfterEnd);

    session.abort_turn().unwrap();
    assert!(!session.turn_active());
    assert_eq!(session.messages().len(), 3);
    session.begin_turn("try again").unwrap();
}

#[tokio::test]
async fn prose_answer_is_extracted_through_the_completion_api() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(json!({
                "choices": [{"message": {"content": "SELECT COUNT(*) FROM orders"}}]
            }));
        })
        .await;

    let client =
        HttpCompletionClient::new("test-key").with_endpoint(server.url("/v1/chat/completions"));
    let extractor = QueryExtractor::new(Arc::new(client));

    let answer = "you could count the rows in the orders table";
    let disposition = decide_disposition(answer, &extractor).await;

    mock.assert_async().await;
    assert_eq!(
        disposition,
        Disposition::Execute("SELECT COUNT(*) FROM orders".to_string())
    );
}

#[tokio::test]
async fn keyword_answer_skips_the_completion_api() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(500);
        })
        .await;

    let client =
        HttpCompletionClient::new("test-key").with_endpoint(server.url("/v1/chat/completions"));
    let extractor = QueryExtractor::new(Arc::new(client));

    let disposition = decide_disposition("SELECT * FROM orders LIMIT 5", &extractor).await;

    mock.assert_hits_async(0).await;
    assert_eq!(
        disposition,
        Disposition::Execute("SELECT * FROM orders LIMIT 5".to_string())
    );
}
