use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use super::protocol::{ShutdownAck, ValidationRequest, ValidationResponse, SHUTDOWN_SENTINEL};

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("validation channel io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("validation channel payload could not be decoded: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("validation channel closed by the service")]
    Closed,
}

/// Blocking client half of the validation channel. Every read and write is
/// bounded by the timeout given at connect time.
#[derive(Debug)]
pub struct ValidationChannel {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl ValidationChannel {
    pub fn connect(addr: SocketAddr, timeout: Duration) -> Result<Self, ChannelError> {
        let stream = TcpStream::connect_timeout(&addr, timeout)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        stream.set_nodelay(true)?;
        let writer = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }

    pub fn request(
        &mut self,
        request: &ValidationRequest,
    ) -> Result<ValidationResponse, ChannelError> {
        let payload = serde_json::to_string(request)?;
        self.send_line(&payload)?;
        let reply = self.read_line()?;
        Ok(serde_json::from_str(&reply)?)
    }

    /// Sends the shutdown sentinel and waits for the acknowledgment. The
    /// channel is released when this returns, whatever the outcome.
    pub fn shutdown(mut self) -> Result<ShutdownAck, ChannelError> {
        self.send_line(SHUTDOWN_SENTINEL)?;
        let reply = self.read_line()?;
        Ok(serde_json::from_str(&reply)?)
    }

    fn send_line(&mut self, line: &str) -> Result<(), ChannelError> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, ChannelError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ChannelError::Closed);
        }
        Ok(line)
    }
}
