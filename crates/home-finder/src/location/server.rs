use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use super::protocol::{ChannelMessage, ShutdownAck, ValidationResponse};
use super::rules::validate_location;

/// TCP front end for the location rules: one JSON request per line, one JSON
/// response per line.
#[derive(Debug)]
pub struct ValidationServer {
    listener: TcpListener,
}

enum ConnectionEnd {
    Disconnected,
    ShutdownRequested,
}

impl ValidationServer {
    pub async fn bind(addr: SocketAddr) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    pub fn from_listener(listener: TcpListener) -> Self {
        Self { listener }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves until a client sends the shutdown sentinel or `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()>,
    {
        let stop_requested = Arc::new(Notify::new());
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("validation service stopping on signal");
                    return Ok(());
                }
                _ = stop_requested.notified() => {
                    info!("validation service stopping at client request");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = accepted?;
                    let stop_requested = stop_requested.clone();
                    tokio::spawn(async move {
                        debug!(%peer, "validation client connected");
                        match serve_connection(stream).await {
                            Ok(ConnectionEnd::ShutdownRequested) => stop_requested.notify_one(),
                            Ok(ConnectionEnd::Disconnected) => {
                                debug!(%peer, "validation client disconnected");
                            }
                            Err(err) => warn!(%peer, error = %err, "validation connection failed"),
                        }
                    });
                }
            }
        }
    }
}

async fn serve_connection(stream: TcpStream) -> io::Result<ConnectionEnd> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match ChannelMessage::parse(&line) {
            Ok(ChannelMessage::Shutdown) => {
                write_json(&mut write_half, &ShutdownAck { acknowledged: true }).await?;
                write_half.shutdown().await?;
                return Ok(ConnectionEnd::ShutdownRequested);
            }
            Ok(ChannelMessage::Validate(request)) => {
                let outcome = validate_location(&request.city, &request.state);
                info!(
                    city = %request.city,
                    state = %request.state,
                    valid = outcome.is_valid(),
                    "validated location"
                );
                let response = ValidationResponse::from_outcome(&request, &outcome);
                write_json(&mut write_half, &response).await?;
            }
            Err(err) => {
                warn!(error = %err, "malformed validation request");
                write_json(&mut write_half, &ValidationResponse::malformed(err)).await?;
            }
        }
    }

    Ok(ConnectionEnd::Disconnected)
}

async fn write_json<W, T>(writer: &mut W, payload: &T) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = serde_json::to_vec(payload).map_err(io::Error::other)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await
}
