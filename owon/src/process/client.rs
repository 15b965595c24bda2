use std::fmt::{Display, Formatter};
use std::io::Write;
use std::net::TcpStream;
use std::time::Duration;

use log::{debug, info};

use crate::process::receive::{FrameProgress, FramedReader, read_response};
use crate::utils::errors::ResponseError;

/// Request sent to open a capture transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartCommand {
    /// Vector data of the displayed waveform.
    Vector,
    /// Vector data of the full deep memory.
    DeepMemory,
    /// Screenshot bitmap. Not a waveform capture.
    Bitmap,
}

impl StartCommand {
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            StartCommand::Vector => b"STARTBIN",
            StartCommand::DeepMemory => b"STARTMEMDEPTH",
            StartCommand::Bitmap => b"STARTBMP",
        }
    }

    /// Whether the response is a waveform capture the decoder understands.
    pub fn is_vector(&self) -> bool {
        !matches!(self, StartCommand::Bitmap)
    }
}

impl Display for StartCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

/// Requests captures from a device over TCP.
///
/// Every request opens its own connection, which is closed when the request
/// returns, successfully or not.
#[derive(Debug, Clone)]
pub struct Client {
    host: String,
    port: u16,
    timeout: Option<Duration>,
}

impl Client {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: None,
        }
    }

    /// Sets the read/write timeout of request connections. A zero duration
    /// is rejected when connecting.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Sends `command` and reassembles the complete response.
    pub fn fetch<F>(&self, command: StartCommand, progress: F) -> Result<Vec<u8>, ResponseError>
    where
        F: FnMut(FrameProgress),
    {
        let mut stream = self.request(command)?;
        let payload = read_response(&mut stream, progress)?;

        info!(
            "Fetched {} bytes from {} ({command})",
            payload.len(),
            self.address()
        );

        Ok(payload)
    }

    /// Sends `command` and returns a reader streaming the response payload.
    ///
    /// The connection lives as long as the returned reader.
    pub fn open<F>(
        &self,
        command: StartCommand,
        progress: F,
    ) -> Result<FramedReader<TcpStream, F>, ResponseError>
    where
        F: FnMut(FrameProgress),
    {
        let stream = self.request(command)?;
        Ok(FramedReader::with_progress(stream, progress))
    }

    fn request(&self, command: StartCommand) -> Result<TcpStream, ResponseError> {
        let addr = self.address();
        let mut stream =
            TcpStream::connect((self.host.as_str(), self.port)).map_err(|source| {
                ResponseError::Connection {
                    addr: addr.clone(),
                    source,
                }
            })?;

        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;

        debug!("Connected to {addr}, sending {command}");
        stream.write_all(command.as_bytes())?;
        stream.flush()?;

        Ok(stream)
    }
}
