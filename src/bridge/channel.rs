//! Message channels to the agent

use anyhow::{Context, Result, anyhow, bail};
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Not usable yet, but expected to open
    Connecting,
    Open,
    /// Gone for good
    Closed,
}

/// Text message channel between the bridge and an agent
///
/// `recv_text` must be cancel-safe: the episode loop races it against timer
/// deadlines.
#[allow(async_fn_in_trait)]
pub trait AgentChannel {
    fn state(&self) -> ChannelState;

    async fn send_text(&mut self, text: String) -> Result<()>;

    /// Next text message, or `None` once the channel has closed
    async fn recv_text(&mut self) -> Option<String>;
}

/// WebSocket connection to an agent
pub struct WsChannel<S> {
    stream: WebSocketStream<S>,
    closed: bool,
}

impl WsChannel<MaybeTlsStream<TcpStream>> {
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _) = connect_async(url)
            .await
            .with_context(|| format!("Failed to connect to agent at {url}"))?;
        Ok(Self::new(stream))
    }
}

impl<S> WsChannel<S> {
    pub fn new(stream: WebSocketStream<S>) -> Self {
        Self {
            stream,
            closed: false,
        }
    }
}

impl<S> AgentChannel for WsChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    fn state(&self) -> ChannelState {
        if self.closed {
            ChannelState::Closed
        } else {
            ChannelState::Open
        }
    }

    async fn send_text(&mut self, text: String) -> Result<()> {
        if self.closed {
            bail!("agent channel is closed");
        }
        if let Err(err) = self.stream.send(Message::Text(text)).await {
            self.closed = true;
            return Err(err).context("Failed to send to agent");
        }
        Ok(())
    }

    async fn recv_text(&mut self) -> Option<String> {
        if self.closed {
            return None;
        }

        while let Some(frame) = self.stream.next().await {
            match frame {
                Ok(Message::Text(text)) => return Some(text),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(text),
                    Err(_) => warn!("dropping non-UTF-8 binary frame from agent"),
                },
                Ok(Message::Ping(payload)) => {
                    if self.stream.send(Message::Pong(payload)).await.is_err() {
                        break;
                    }
                }
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "agent closed the channel");
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(%err, "agent channel failed");
                    break;
                }
            }
        }

        self.closed = true;
        None
    }
}

/// In-process channel end; see [`memory_pair`]
pub struct MemoryChannel {
    tx: mpsc::UnboundedSender<String>,
    rx: mpsc::UnboundedReceiver<String>,
    closed: bool,
}

/// Two connected channel ends
pub fn memory_pair() -> (MemoryChannel, MemoryChannel) {
    let (a_tx, b_rx) = mpsc::unbounded_channel();
    let (b_tx, a_rx) = mpsc::unbounded_channel();
    (
        MemoryChannel {
            tx: a_tx,
            rx: a_rx,
            closed: false,
        },
        MemoryChannel {
            tx: b_tx,
            rx: b_rx,
            closed: false,
        },
    )
}

impl MemoryChannel {
    /// Stop receiving; the peer sees the channel as closed
    pub fn close(&mut self) {
        self.closed = true;
        self.rx.close();
    }
}

impl AgentChannel for MemoryChannel {
    fn state(&self) -> ChannelState {
        if self.closed || self.tx.is_closed() {
            ChannelState::Closed
        } else {
            ChannelState::Open
        }
    }

    async fn send_text(&mut self, text: String) -> Result<()> {
        if self.closed {
            bail!("channel is closed");
        }
        self.tx.send(text).map_err(|_| anyhow!("peer hung up"))
    }

    async fn recv_text(&mut self) -> Option<String> {
        let message = self.rx.recv().await;
        if message.is_none() {
            self.closed = true;
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_pair_round_trip() {
        let (mut bridge, mut agent) = memory_pair();
        assert_eq!(bridge.state(), ChannelState::Open);

        bridge.send_text("hello".to_string()).await.unwrap();
        assert_eq!(agent.recv_text().await.as_deref(), Some("hello"));

        agent.send_text("world".to_string()).await.unwrap();
        assert_eq!(bridge.recv_text().await.as_deref(), Some("world"));
    }

    #[tokio::test]
    async fn test_memory_peer_drop_closes() {
        let (mut bridge, agent) = memory_pair();
        drop(agent);

        assert_eq!(bridge.state(), ChannelState::Closed);
        assert!(bridge.send_text("lost".to_string()).await.is_err());
        assert_eq!(bridge.recv_text().await, None);
    }

    #[tokio::test]
    async fn test_memory_close() {
        let (mut bridge, mut agent) = memory_pair();
        agent.close();

        assert_eq!(agent.state(), ChannelState::Closed);
        assert_eq!(bridge.state(), ChannelState::Closed);
        assert_eq!(agent.recv_text().await, None);
    }

    #[tokio::test]
    async fn test_ws_channel_over_localhost() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            let mut channel = WsChannel::new(ws);
            let text = channel.recv_text().await.unwrap();
            channel.send_text(format!("echo {text}")).await.unwrap();
            channel
                .stream
                .send(Message::Binary(b"bin".to_vec()))
                .await
                .unwrap();
        });

        let mut client = WsChannel::connect(&format!("ws://{addr}")).await.unwrap();
        client.send_text("ping".to_string()).await.unwrap();
        assert_eq!(client.recv_text().await.as_deref(), Some("echo ping"));
        assert_eq!(client.recv_text().await.as_deref(), Some("bin"));

        server.await.unwrap();
        // Server task dropped its end
        assert_eq!(client.recv_text().await, None);
        assert_eq!(client.state(), ChannelState::Closed);
    }
}
