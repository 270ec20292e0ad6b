//! One-shot client for the git proxy daemon.
//!
//! Owns the socket for exactly one invocation: connect, send the request
//! line, stream response frames to stdout, return the remote exit code.
//! No retries, no pooling, no pipelining.

use grs_common::ShimError;
use grs_common::protocol::{ProtocolError, ProxyRequest, ResponseFrame};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

#[derive(Debug)]
pub struct ProxyClient {
    stream: TcpStream,
}

impl ProxyClient {
    /// Connect to the proxy daemon at `endpoint` (`host:port`).
    ///
    /// No connect timeout is imposed; the daemon is local and either
    /// accepts or refuses immediately.
    pub async fn connect(endpoint: &str) -> Result<Self, ShimError> {
        let stream =
            TcpStream::connect(endpoint)
                .await
                .map_err(|source| ShimError::ProxyUnreachable {
                    endpoint: endpoint.to_string(),
                    source,
                })?;
        debug!(endpoint, "connected to git proxy");
        Ok(Self { stream })
    }

    /// Send the request and consume the response stream.
    ///
    /// Output frames are printed to stdout strictly in receive order. The
    /// terminal frame's exit code is returned and nothing is read or
    /// printed after it. A malformed frame, or the peer closing before a
    /// terminal frame, is a fatal protocol error — never a fabricated
    /// success code.
    pub async fn run(self, request: &ProxyRequest) -> Result<i32, ShimError> {
        let (reader, mut writer) = self.stream.into_split();

        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;

        let mut reader = BufReader::new(reader);
        let mut buf = String::new();
        let stdout = std::io::stdout();
        loop {
            buf.clear();
            let n = reader.read_line(&mut buf).await?;
            if n == 0 {
                return Err(ProtocolError::MissingTerminalFrame.into());
            }
            let frame = ResponseFrame::parse(buf.trim_end_matches(['\r', '\n']))?;
            match frame {
                ResponseFrame::Output(text) => {
                    let mut out = stdout.lock();
                    writeln!(out, "{text}")?;
                }
                ResponseFrame::Exit(code) => {
                    debug!(code, "terminal frame received");
                    return Ok(code);
                }
            }
        }
    }
}
