//! Per-connection protocol loop.
//!
//! `Reading -> (Evaluating -> Reading)* -> Closing`. Every expression line gets
//! exactly one response line; `quit` and `shutdown` get none.

use std::io;

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufStream,
};
use tracing::{debug, warn};

use crate::domain::Service;

/// Response line sent for any line that does not evaluate.
pub const ERROR_MARKER: &str = "Error";

/// Ends this session only.
pub const QUIT_COMMAND: &str = "quit";

/// Ends this session and stops the accept loop.
pub const SHUTDOWN_COMMAND: &str = "shutdown";

/// What the accept loop should do after a session has closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerControl {
    /// Keep accepting new connections.
    Continue,
    /// Stop accepting new connections.
    Stop,
}

enum ReadLine {
    Eof,
    Line,
    Oversized,
}

/// State of one accepted connection.
pub struct Session<S> {
    stream: BufStream<S>,
    line: Vec<u8>,
    max_line_length: usize,
    service: Service,
}

/// Drive one connection to completion.
pub async fn handle_connection<S>(
    stream: S,
    service: Service,
    max_line_length: usize,
) -> ServerControl
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut session = Session::new(stream, service, max_line_length);
    session.run().await
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    #[must_use]
    pub fn new(stream: S, service: Service, max_line_length: usize) -> Self {
        Self {
            stream: BufStream::new(stream),
            line: Vec::with_capacity(max_line_length.min(4096) + 2),
            max_line_length,
            service,
        }
    }

    /// Serve lines until the peer goes away or sends a termination command.
    ///
    /// Transport errors end the session with [`ServerControl::Continue`]. The
    /// stream stays open until the session is dropped.
    pub async fn run(&mut self) -> ServerControl {
        loop {
            let read = match self.read_line().await {
                Ok(read) => read,
                Err(e) => {
                    warn!(error = %e, "read failed, closing session");
                    return ServerControl::Continue;
                }
            };

            let response = match read {
                ReadLine::Eof => {
                    debug!("peer closed the connection");
                    return ServerControl::Continue;
                }
                ReadLine::Oversized => {
                    debug!(
                        max_line_length = self.max_line_length,
                        "request line too long"
                    );
                    ERROR_MARKER.to_owned()
                }
                ReadLine::Line => {
                    let text = String::from_utf8_lossy(trim_terminator(&self.line));
                    match text.as_ref() {
                        QUIT_COMMAND => {
                            debug!("quit received");
                            return ServerControl::Continue;
                        }
                        SHUTDOWN_COMMAND => {
                            warn!("shutdown requested by client");
                            return ServerControl::Stop;
                        }
                        expr => match self.service.evaluate(expr) {
                            Ok(value) => value.to_string(),
                            Err(_) => ERROR_MARKER.to_owned(),
                        },
                    }
                }
            };

            if let Err(e) = self.respond(&response).await {
                warn!(error = %e, "write failed, closing session");
                return ServerControl::Continue;
            }
        }
    }

    /// Read one line into the buffer, never holding more than
    /// `max_line_length` plus a `\r\n` terminator.
    async fn read_line(&mut self) -> io::Result<ReadLine> {
        self.line.clear();

        let limit = self.max_line_length.saturating_add(2);
        let n = (&mut self.stream)
            .take(u64::try_from(limit).unwrap_or(u64::MAX))
            .read_until(b'\n', &mut self.line)
            .await?;

        if n == 0 {
            return Ok(ReadLine::Eof);
        }

        if !self.line.ends_with(b"\n") && n == limit {
            self.discard_rest_of_line().await?;
            return Ok(ReadLine::Oversized);
        }

        if trim_terminator(&self.line).len() > self.max_line_length {
            return Ok(ReadLine::Oversized);
        }

        Ok(ReadLine::Line)
    }

    async fn discard_rest_of_line(&mut self) -> io::Result<()> {
        loop {
            let buf = self.stream.fill_buf().await?;
            if buf.is_empty() {
                return Ok(());
            }
            match buf.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    self.stream.consume(pos + 1);
                    return Ok(());
                }
                None => {
                    let len = buf.len();
                    self.stream.consume(len);
                }
            }
        }
    }

    async fn respond(&mut self, response: &str) -> io::Result<()> {
        self.stream.write_all(response.as_bytes()).await?;
        self.stream.write_all(b"\n").await?;
        self.stream.flush().await
    }
}

/// Strip a trailing `\n` or `\r\n`.
fn trim_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
