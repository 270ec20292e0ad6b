//! Wire protocol between the shim and the git proxy daemon.
//!
//! The client sends one JSON object on a single line and then reads
//! newline-delimited response frames until the terminal frame arrives.

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Request sent to the proxy daemon.
///
/// Serialized as a single JSON line, e.g.
/// `{"workingDir":"proj/sub","cmd":["git","status"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRequest {
    /// Working directory, relative to the caller's home directory.
    #[serde(rename = "workingDir")]
    pub working_dir: String,
    /// Full command vector; the first element is the program name.
    pub cmd: Vec<String>,
}

impl ProxyRequest {
    /// Build a request for the given home-relative directory and git arguments.
    pub fn new(working_dir: impl Into<String>, args: &[String]) -> Self {
        let mut cmd = Vec::with_capacity(args.len() + 1);
        cmd.push("git".to_string());
        cmd.extend(args.iter().cloned());
        Self {
            working_dir: working_dir.into(),
            cmd,
        }
    }
}

/// One response frame from the proxy daemon.
///
/// On the wire each frame is a two-element JSON array `[tag, payload]`:
/// tag 0 carries one line of command output, tag 1 carries the exit code
/// of the completed command and is always the last frame on the stream.
/// Anything else is a protocol violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFrame {
    /// A line of output to print verbatim.
    Output(String),
    /// The remote command's exit code; terminal.
    Exit(i32),
}

impl ResponseFrame {
    /// Parse one newline-delimited frame.
    ///
    /// The input must not include the trailing newline. Every way a frame
    /// can be malformed maps to a distinct [`ProtocolError`] so the shim
    /// fails loudly instead of guessing an exit code.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value =
            serde_json::from_str(line).map_err(|err| ProtocolError::Malformed {
                line: line.to_string(),
                reason: err.to_string(),
            })?;
        let items = value.as_array().ok_or_else(|| ProtocolError::Shape {
            line: line.to_string(),
            reason: "frame is not a JSON array",
        })?;
        if items.len() != 2 {
            return Err(ProtocolError::Shape {
                line: line.to_string(),
                reason: "frame is not a two-element array",
            });
        }
        let tag = items[0].as_i64().ok_or_else(|| ProtocolError::Shape {
            line: line.to_string(),
            reason: "frame tag is not an integer",
        })?;
        match tag {
            0 => {
                let text = items[1].as_str().ok_or_else(|| ProtocolError::Shape {
                    line: line.to_string(),
                    reason: "output frame payload is not a string",
                })?;
                Ok(Self::Output(text.to_string()))
            }
            1 => {
                let code = items[1]
                    .as_i64()
                    .and_then(|c| i32::try_from(c).ok())
                    .ok_or_else(|| ProtocolError::Shape {
                        line: line.to_string(),
                        reason: "exit frame payload is not an integer exit code",
                    })?;
                Ok(Self::Exit(code))
            }
            other => Err(ProtocolError::UnknownTag {
                tag: other,
                line: line.to_string(),
            }),
        }
    }
}

// Frames serialize to the same two-element arrays the daemon emits, so
// test servers can reuse this type.
impl Serialize for ResponseFrame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        match self {
            Self::Output(text) => {
                seq.serialize_element(&0)?;
                seq.serialize_element(text)?;
            }
            Self::Exit(code) => {
                seq.serialize_element(&1)?;
                seq.serialize_element(code)?;
            }
        }
        seq.end()
    }
}

/// A response stream that violates the frame contract.
///
/// Kept separate from the normal error taxonomy so a broken daemon is
/// never mistaken for a failing remote command.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unexpected response from proxy (invalid JSON: {reason}): {line:?}")]
    Malformed { line: String, reason: String },

    #[error("unexpected response from proxy ({reason}): {line:?}")]
    Shape { line: String, reason: &'static str },

    #[error("unknown response tag {tag} from proxy: {line:?}")]
    UnknownTag { tag: i64, line: String },

    #[error("proxy closed the connection before sending an exit code")]
    MissingTerminalFrame,
}
