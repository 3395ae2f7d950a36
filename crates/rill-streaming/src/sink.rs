//! Ordered chunk sink with shell-first enforcement.

use std::fmt::Display;

use futures::{Sink, SinkExt};
use rill_core::{LifecyclePhase, RenderError, TimingContext};

/// State of the chunk sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    /// Initial state, shell not yet sent.
    Initial,
    /// Shell has been sent, boundary chunks can be streamed.
    ShellSent,
    /// Response has been completed.
    Completed,
}

/// Chunk sink that enforces the shell-first pattern.
///
/// Every accepted send is one flush: chunks are observed by the client in
/// send order and never coalesced here. Generic over the underlying sink
/// type so it works with any `Sink<Vec<u8>>`, including a
/// `futures::channel::mpsc::Sender`.
pub struct ChunkSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    inner: S,
    state: SinkState,
    timing: TimingContext,
    boundaries_sent: Vec<String>,
    flushes: usize,
    bytes_sent: usize,
}

impl<S, E> ChunkSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    /// Create a new chunk sink.
    pub fn new(sink: S, timing: TimingContext) -> Self {
        Self {
            inner: sink,
            state: SinkState::Initial,
            timing,
            boundaries_sent: Vec::new(),
            flushes: 0,
            bytes_sent: 0,
        }
    }

    /// Send the shell HTML. Must be called before any other chunk.
    ///
    /// The shell is the initial document chunk: doctype, head, opening body
    /// and every boundary's fallback markup.
    pub async fn send_shell(&mut self, html: &str) -> Result<(), RenderError> {
        if self.state != SinkState::Initial {
            return Err(RenderError::Stream(
                "Shell already sent or sink completed".to_string(),
            ));
        }

        self.timing.mark("shell_start");
        self.push(html.as_bytes().to_vec()).await?;
        self.timing.mark("shell_sent");
        self.state = SinkState::ShellSent;

        Ok(())
    }

    /// Send a boundary's resolution chunk. Shell must be sent first.
    pub async fn send_boundary(&mut self, name: &str, html: &str) -> Result<(), RenderError> {
        self.ensure_streamable()?;

        self.timing.mark_boundary_start(name);
        self.push(html.as_bytes().to_vec()).await?;
        self.timing.mark_boundary_sent(name);
        self.boundaries_sent.push(name.to_string());

        Ok(())
    }

    /// Send raw bytes. Shell must be sent first.
    pub async fn send_raw(&mut self, bytes: Vec<u8>) -> Result<(), RenderError> {
        self.ensure_streamable()?;
        self.push(bytes).await
    }

    /// Mark the response complete. No chunk may follow.
    pub fn complete(&mut self) -> Result<(), RenderError> {
        if self.state == SinkState::Initial {
            return Err(RenderError::ShellNotSent);
        }
        self.state = SinkState::Completed;
        self.timing.mark("complete");
        Ok(())
    }

    fn ensure_streamable(&self) -> Result<(), RenderError> {
        match self.state {
            SinkState::Initial => Err(RenderError::ShellNotSent),
            SinkState::Completed => {
                Err(RenderError::Stream("Sink already completed".to_string()))
            }
            SinkState::ShellSent => Ok(()),
        }
    }

    async fn push(&mut self, bytes: Vec<u8>) -> Result<(), RenderError> {
        self.bytes_sent += bytes.len();
        self.inner
            .send(bytes)
            .await
            .map_err(|e| RenderError::Stream(e.to_string()))?;
        self.flushes += 1;
        Ok(())
    }

    /// Number of flushes performed so far.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Total bytes sent so far.
    pub fn bytes_sent(&self) -> usize {
        self.bytes_sent
    }

    /// Boundaries whose resolution chunks have been sent, in send order.
    pub fn boundaries_sent(&self) -> &[String] {
        &self.boundaries_sent
    }

    /// Get the current lifecycle phase.
    pub fn phase(&self) -> LifecyclePhase {
        match self.state {
            SinkState::Initial => LifecyclePhase::Start,
            SinkState::ShellSent => match self.boundaries_sent.last() {
                Some(name) => LifecyclePhase::BoundarySent(name.clone()),
                None => LifecyclePhase::ShellSent,
            },
            SinkState::Completed => LifecyclePhase::Completion,
        }
    }

    /// Get timing context reference.
    pub fn timing(&self) -> &TimingContext {
        &self.timing
    }

    /// Consume the sink and return the inner value.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;
    use futures::StreamExt;

    fn sink() -> (
        ChunkSink<mpsc::Sender<Vec<u8>>, mpsc::SendError>,
        mpsc::Receiver<Vec<u8>>,
    ) {
        let (tx, rx) = mpsc::channel(8);
        (ChunkSink::new(tx, TimingContext::new()), rx)
    }

    #[tokio::test]
    async fn test_boundary_before_shell_rejected() {
        let (mut sink, _rx) = sink();
        let err = sink.send_boundary("feed", "<div></div>").await.unwrap_err();
        assert!(matches!(err, RenderError::ShellNotSent));
    }

    #[tokio::test]
    async fn test_shell_sent_only_once() {
        let (mut sink, _rx) = sink();
        sink.send_shell("<html>").await.unwrap();
        assert!(sink.send_shell("<html>").await.is_err());
    }

    #[tokio::test]
    async fn test_chunks_arrive_in_send_order() {
        let (mut sink, mut rx) = sink();
        sink.send_shell("a").await.unwrap();
        sink.send_boundary("one", "b").await.unwrap();
        sink.send_raw(b"c".to_vec()).await.unwrap();
        sink.complete().unwrap();
        drop(sink);

        let mut seen = Vec::new();
        while let Some(chunk) = rx.next().await {
            seen.push(String::from_utf8(chunk).unwrap());
        }
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_flush_count_matches_sends() {
        let (mut sink, _rx) = sink();
        sink.send_shell("shell").await.unwrap();
        sink.send_boundary("one", "x").await.unwrap();

        assert_eq!(sink.flush_count(), 2);
        assert_eq!(sink.bytes_sent(), "shell".len() + 1);
    }

    #[tokio::test]
    async fn test_no_sends_after_complete() {
        let (mut sink, _rx) = sink();
        sink.send_shell("shell").await.unwrap();
        sink.complete().unwrap();

        assert!(sink.send_raw(b"late".to_vec()).await.is_err());
        assert_eq!(sink.phase(), LifecyclePhase::Completion);
    }

    #[tokio::test]
    async fn test_phase_tracks_last_boundary() {
        let (mut sink, _rx) = sink();
        sink.send_shell("shell").await.unwrap();
        assert_eq!(sink.phase(), LifecyclePhase::ShellSent);

        sink.send_boundary("reviews", "x").await.unwrap();
        assert_eq!(
            sink.phase(),
            LifecyclePhase::BoundarySent("reviews".to_string())
        );
    }
}
