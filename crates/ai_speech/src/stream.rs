//! Lazily produced synthesis audio

use std::{
    fmt,
    pin::Pin,
    task::{Context, Poll},
};

use bytes::Bytes;
use futures::{
    Stream,
    stream::{BoxStream, FusedStream},
};
use tracing::{debug, warn};

use crate::error::SpeechError;

/// Audio chunks from an in-flight synthesis
///
/// Chunks are yielded in upstream order and empty chunks are skipped. The
/// stream ends after the upstream ends or after the first error. Dropping it
/// early releases the upstream connection.
pub struct AudioStream {
    inner: Option<BoxStream<'static, Result<Bytes, SpeechError>>>,
    bytes_forwarded: u64,
    chunks_forwarded: u64,
    completed: bool,
}

impl AudioStream {
    /// Wrap a chunk stream
    pub fn new<S>(inner: S) -> Self
    where
        S: Stream<Item = Result<Bytes, SpeechError>> + Send + 'static,
    {
        Self {
            inner: Some(Box::pin(inner)),
            bytes_forwarded: 0,
            chunks_forwarded: 0,
            completed: false,
        }
    }

    /// Stream that yields the given chunks and then ends
    #[must_use]
    pub fn from_chunks(chunks: Vec<Bytes>) -> Self {
        Self::new(futures::stream::iter(chunks.into_iter().map(Ok)))
    }

    /// Bytes yielded so far
    #[must_use]
    pub const fn bytes_forwarded(&self) -> u64 {
        self.bytes_forwarded
    }

    /// Non-empty chunks yielded so far
    #[must_use]
    pub const fn chunks_forwarded(&self) -> u64 {
        self.chunks_forwarded
    }

    /// Whether the upstream ended normally
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completed
    }
}

impl Stream for AudioStream {
    type Item = Result<Bytes, SpeechError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            let Some(inner) = this.inner.as_mut() else {
                return Poll::Ready(None);
            };

            match inner.as_mut().poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(chunk))) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    this.bytes_forwarded += chunk.len() as u64;
                    this.chunks_forwarded += 1;
                    return Poll::Ready(Some(Ok(chunk)));
                },
                Poll::Ready(Some(Err(e))) => {
                    this.inner = None;
                    warn!(
                        error = %e,
                        bytes_forwarded = this.bytes_forwarded,
                        "Audio stream failed mid-transfer"
                    );
                    return Poll::Ready(Some(Err(e)));
                },
                Poll::Ready(None) => {
                    this.inner = None;
                    this.completed = true;
                    debug!(
                        bytes_forwarded = this.bytes_forwarded,
                        chunks = this.chunks_forwarded,
                        "Audio stream complete"
                    );
                    return Poll::Ready(None);
                },
            }
        }
    }
}

impl FusedStream for AudioStream {
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

impl Drop for AudioStream {
    fn drop(&mut self) {
        if self.inner.is_some() {
            debug!(
                bytes_forwarded = self.bytes_forwarded,
                chunks = self.chunks_forwarded,
                "Audio stream dropped before completion, releasing upstream"
            );
        }
    }
}

impl fmt::Debug for AudioStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioStream")
            .field("bytes_forwarded", &self.bytes_forwarded)
            .field("chunks_forwarded", &self.chunks_forwarded)
            .field("completed", &self.completed)
            .field("terminated", &self.inner.is_none())
            .finish()
    }
}
