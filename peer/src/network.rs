//! Peer transport: one TCP stream, length-prefixed move frames and a background receive task

use crate::error::TransportError;
use log::{debug, error, info, warn};
use shared::{
    decode_move, encode_move, payload_len, Move, Role, CONNECT_TIMEOUT_SECS, FRAME_HEADER_LEN,
    MAX_FRAME_LEN,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Items handed from the receive task to the game loop. A terminal error is
/// always the last item the task sends.
type Inbound = Result<Move, TransportError>;

/// Sets up the single connection for this process: the host listens on
/// `addr` and waits for one peer, the joiner connects to it.
pub async fn establish(role: Role, addr: SocketAddr) -> Result<Connection, TransportError> {
    match role {
        Role::Host => Listener::bind(addr).await?.accept().await,
        Role::Joiner => Connection::connect(addr).await,
    }
}

pub struct Listener {
    inner: TcpListener,
    addr: SocketAddr,
}

impl Listener {
    pub async fn bind(addr: SocketAddr) -> Result<Self, TransportError> {
        let inner = TcpListener::bind(addr)
            .await
            .map_err(|source| TransportError::Bind { addr, source })?;
        let addr = inner
            .local_addr()
            .map_err(|source| TransportError::Bind { addr, source })?;

        info!("Waiting for a peer on {}...", addr);
        Ok(Self { inner, addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Accepts exactly one peer. The listening socket is closed afterwards.
    pub async fn accept(self) -> Result<Connection, TransportError> {
        let (stream, peer_addr) = self
            .inner
            .accept()
            .await
            .map_err(|source| TransportError::Accept {
                addr: self.addr,
                source,
            })?;

        info!("Peer connected from {}", peer_addr);
        Ok(Connection::from_stream(stream, peer_addr))
    }
}

/// Handle to the established stream. Owns the write half; the read half lives
/// in the receive task, which feeds `inbound`.
pub struct Connection {
    writer: OwnedWriteHalf,
    inbound: mpsc::UnboundedReceiver<Inbound>,
    reader: JoinHandle<()>,
    peer_addr: SocketAddr,
}

impl Connection {
    pub async fn connect(addr: SocketAddr) -> Result<Self, TransportError> {
        info!("Connecting to {}...", addr);

        let connect_timeout = Duration::from_secs(CONNECT_TIMEOUT_SECS);
        let stream = match timeout(connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(TransportError::Connect { addr, source }),
            Err(_) => {
                return Err(TransportError::ConnectTimeout {
                    addr,
                    timeout: connect_timeout,
                })
            }
        };

        info!("Connected to {}", addr);
        Ok(Self::from_stream(stream, addr))
    }

    fn from_stream(stream: TcpStream, peer_addr: SocketAddr) -> Self {
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to disable Nagle on {}: {}", peer_addr, e);
        }

        let (read_half, writer) = stream.into_split();
        let (inbound_tx, inbound) = mpsc::unbounded_channel();
        let reader = tokio::spawn(receive_loop(read_half, inbound_tx));

        Self {
            writer,
            inbound,
            reader,
            peer_addr,
        }
    }

    pub async fn send(&mut self, mv: Move) -> Result<(), TransportError> {
        let frame = encode_move(&mv)?;
        self.writer
            .write_all(&frame)
            .await
            .map_err(TransportError::Send)?;
        self.writer.flush().await.map_err(TransportError::Send)?;

        debug!("Sent move {} to {}", mv, self.peer_addr);
        Ok(())
    }

    /// Pops the next inbound move, waiting at most `wait`. Once the receive
    /// task has stopped this yields its terminal error, then `Closed`.
    pub async fn try_receive(&mut self, wait: Duration) -> Result<Option<Move>, TransportError> {
        match timeout(wait, self.inbound.recv()).await {
            Err(_) => Ok(None),
            Ok(Some(Ok(mv))) => Ok(Some(mv)),
            Ok(Some(Err(e))) => Err(e),
            Ok(None) => Err(TransportError::Closed),
        }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Cancels the receive task, waits for it to finish and closes the write half.
    pub async fn shutdown(mut self) {
        self.reader.abort();
        let _ = (&mut self.reader).await;

        if let Err(e) = self.writer.shutdown().await {
            debug!("Error closing connection to {}: {}", self.peer_addr, e);
        }
        info!("Connection to {} shut down", self.peer_addr);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Body of the background receive task. Runs until the peer closes the
/// stream, a frame fails to read or decode, or the connection is dropped.
async fn receive_loop<R>(mut reader: R, inbound_tx: mpsc::UnboundedSender<Inbound>)
where
    R: AsyncRead + Unpin,
{
    loop {
        match read_frame(&mut reader).await {
            Ok(Some(mv)) => {
                debug!("Received move {}", mv);
                if inbound_tx.send(Ok(mv)).is_err() {
                    debug!("Inbound queue dropped, stopping receiver");
                    return;
                }
            }
            Ok(None) => {
                info!("Connection closed by peer");
                let _ = inbound_tx.send(Err(TransportError::Closed));
                return;
            }
            Err(e) => {
                error!("Receive error: {}", e);
                let _ = inbound_tx.send(Err(e));
                return;
            }
        }
    }
}

/// Reads one frame. `Ok(None)` means the stream ended cleanly on a frame
/// boundary; ending anywhere else is an error.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Move>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; FRAME_HEADER_LEN];
    let read = reader
        .read(&mut header)
        .await
        .map_err(TransportError::Receive)?;
    if read == 0 {
        return Ok(None);
    }
    reader
        .read_exact(&mut header[read..])
        .await
        .map_err(TransportError::Receive)?;

    let len = payload_len(header)?;
    let mut payload = [0u8; MAX_FRAME_LEN];
    reader
        .read_exact(&mut payload[..len])
        .await
        .map_err(TransportError::Receive)?;

    Ok(Some(decode_move(&payload[..len])?))
}
