use crate::types::events::StreamingChunk;
use crate::BoxStream;
use futures::{stream, StreamExt};
use tokio_util::sync::CancellationToken;

/// Handle for aborting an in-flight stream.
///
/// Cancelling ends the paired stream at its next poll. The stream then drops the response
/// body, which releases the connection.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Pair a chunk stream with a handle that can stop it.
pub fn make_cancellable(
    stream: BoxStream<'static, StreamingChunk>,
) -> (BoxStream<'static, StreamingChunk>, CancelHandle) {
    let handle = CancelHandle::new();
    let token = handle.token.clone();
    let s = stream::unfold(Some(stream), move |inner| {
        let token = token.clone();
        async move {
            let mut inner = inner?;
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                item = inner.next() => item,
            };
            // On cancel `inner` is dropped here, closing the response body.
            next.map(|item| (item, Some(inner)))
        }
    });
    (Box::pin(s), handle)
}
