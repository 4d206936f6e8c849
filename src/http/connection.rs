use std::future::poll_fn;
use std::io::ErrorKind;
use std::pin::Pin;
use std::sync::Arc;
use std::task::Poll;

use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};

use crate::admission::{ConnectionId, ConnectionRegistry, ConnectionState};
use crate::http::parser::parse_request;
use crate::http::response::build_response;
use crate::http::validator::validate_request;
use crate::http::writer::ResponseWriter;
use crate::store::FileStore;

const READ_CHUNK: usize = 4096;

/// Result of one read cycle.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Bytes for one request.
    Data(Vec<u8>),
    /// Nothing arrived; the stream is still open.
    Empty,
    /// The peer closed the stream.
    Closed,
}

/// Owns one accepted connection and serves requests on it until the peer
/// goes away.
pub struct ConnectionHandler<T, S> {
    id: ConnectionId,
    stream: T,
    registry: ConnectionRegistry,
    store: Arc<S>,
    buffer: BytesMut,
    state: ConnectionState,
}

impl<T, S> ConnectionHandler<T, S>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
    S: FileStore,
{
    /// Registers a new live connection and wraps its stream.
    pub async fn register(stream: T, registry: ConnectionRegistry, store: Arc<S>) -> Self {
        let id = registry.register().await;
        Self {
            id,
            stream,
            registry,
            store,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Live,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Serves requests until the stream ends or fails, then releases it.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let live = self.registry.count_live().await;
        tracing::info!(connection = %self.id, live, "Serving connection");

        let result = self.serve().await;
        self.close().await;
        result
    }

    async fn serve(&mut self) -> anyhow::Result<()> {
        while self.state == ConnectionState::Live {
            let raw = match self.read_request().await {
                Ok(ReadOutcome::Data(raw)) => raw,
                Ok(ReadOutcome::Empty) => continue,
                Ok(ReadOutcome::Closed) => {
                    tracing::debug!(connection = %self.id, "Peer closed connection");
                    break;
                }
                Err(e) => return Err(e).context("reading request"),
            };

            self.respond(&raw).await.context("sending response")?;
        }

        Ok(())
    }

    /// Validates one raw request, then builds and sends the response.
    async fn respond(&mut self, raw: &[u8]) -> anyhow::Result<()> {
        let text = String::from_utf8_lossy(raw);
        let request = parse_request(&text);

        tracing::debug!(connection = %self.id, request = %text, "Received request");

        // Empty first lines are answered before admission is consulted.
        let admitted = request.first_line().is_empty()
            || self.registry.is_admitted(self.id).await;
        let status = validate_request(&request, admitted);
        let line = request.request_line();

        let response = build_response(line.as_ref(), status, self.store.as_ref()).await;
        let mut writer = ResponseWriter::new(&response);
        writer.write_to_stream(&mut self.stream).await?;

        let live = self.registry.count_live().await;
        tracing::info!(
            connection = %self.id,
            status = status.as_u16(),
            bytes = writer.len(),
            live,
            "Response sent"
        );

        Ok(())
    }

    /// Reads until nothing more is immediately available.
    ///
    /// The first read waits for data; later reads only take bytes that are
    /// already buffered by the transport.
    pub async fn read_request(&mut self) -> std::io::Result<ReadOutcome> {
        self.buffer.clear();
        self.buffer.reserve(READ_CHUNK);

        match self.stream.read_buf(&mut self.buffer).await {
            Ok(0) => return Ok(ReadOutcome::Closed),
            Ok(_) => {}
            Err(e) if is_transient(&e) => return Ok(ReadOutcome::Empty),
            Err(e) => return Err(e),
        }

        loop {
            let mut chunk = [0u8; READ_CHUNK];
            match read_ready(&mut self.stream, &mut chunk).await {
                Some(Ok(0)) => {
                    // Peer closed right behind its request; the next cycle sees EOF.
                    break;
                }
                Some(Ok(n)) => self.buffer.extend_from_slice(&chunk[..n]),
                Some(Err(e)) if is_transient(&e) => break,
                Some(Err(e)) => return Err(e),
                None => break,
            }
        }

        if self.buffer.is_empty() {
            return Ok(ReadOutcome::Empty);
        }

        Ok(ReadOutcome::Data(self.buffer.split().to_vec()))
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(connection = %self.id, error = %e, "Shutdown failed");
        }

        self.state = ConnectionState::Dead;
        self.registry.mark_dead(self.id).await;

        let live = self.registry.count_live().await;
        tracing::info!(connection = %self.id, live, "Connection closed");
    }
}

fn is_transient(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock)
}

/// Polls a single read without waiting. `None` means no bytes are ready.
async fn read_ready<R>(stream: &mut R, chunk: &mut [u8]) -> Option<std::io::Result<usize>>
where
    R: AsyncRead + Unpin,
{
    poll_fn(|cx| {
        let mut buf = ReadBuf::new(&mut chunk[..]);
        match Pin::new(&mut *stream).poll_read(cx, &mut buf) {
            Poll::Ready(Ok(())) => Poll::Ready(Some(Ok(buf.filled().len()))),
            Poll::Ready(Err(e)) => Poll::Ready(Some(Err(e))),
            Poll::Pending => Poll::Ready(None),
        }
    })
    .await
}
