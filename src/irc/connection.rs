//! The logging session: registration handshake and receive loop.
//!
//! A [`Connection`] owns its stream and config for its whole life and moves
//! through [`ConnectionState`] in order. Reads have no timeout; a server that
//! stops talking parks the loop until the shutdown signal fires.

use super::classifier::{EventClassifier, KeywordClassifier};
use super::decoder;
use super::event::ChatEvent;
use super::transport::{self, BoxedStream};
use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::logging::LogSink;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Bytes requested per read call.
pub const RECV_BUFFER_SIZE: usize = 4096;

/// ERR_NICKNAMEINUSE as it appears in a server reply.
const NICKNAME_IN_USE: &str = " 433 ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Registered,
    Joined,
    Running,
    Closed,
}

pub struct Connection<S> {
    stream: S,
    config: ServerConfig,
    /// The nick the server accepted, `config.nick` or `config.alt_nick`.
    nick: String,
    classifier: Box<dyn EventClassifier>,
    log: Box<dyn LogSink>,
    state: ConnectionState,
    peer_closed: bool,
}

impl Connection<BoxedStream> {
    /// Open the transport described by `config`.
    pub async fn connect(config: ServerConfig, log: Box<dyn LogSink>) -> Result<Self> {
        debug!(
            state = ?ConnectionState::Disconnected,
            address = %config.address(),
            tls = config.ssl,
            "Connecting"
        );
        let stream = transport::open(&config).await?;
        Ok(Self::new(stream, config, log))
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Wrap an already connected stream.
    pub fn new(stream: S, config: ServerConfig, log: Box<dyn LogSink>) -> Self {
        Self {
            stream,
            nick: config.nick.clone(),
            config,
            classifier: Box::new(KeywordClassifier),
            log,
            state: ConnectionState::Connected,
            peer_closed: false,
        }
    }

    /// Replace the default [`KeywordClassifier`].
    pub fn with_classifier(mut self, classifier: impl EventClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    fn set_state(&mut self, state: ConnectionState) {
        debug!(from = ?self.state, to = ?state, "Connection state changed");
        self.state = state;
    }

    /// Register with NICK/USER and join the configured channel.
    ///
    /// The server greeting is drained first. If the reply to registration
    /// reports the nick as taken, one retry is made with the alternate nick.
    pub async fn handshake(&mut self) -> Result<()> {
        self.receive().await?;

        let nick = self.config.nick.clone();
        self.send(&format!("NICK {}", nick)).await?;
        let user = format!(
            "USER {} {} * {}",
            nick, self.config.user_mode, self.config.real_name
        );
        self.send(&user).await?;

        let reply = self.receive().await?;
        if reply.contains(NICKNAME_IN_USE) && !self.config.alt_nick.is_empty() {
            let alt = self.config.alt_nick.clone();
            warn!(nick = %nick, alt_nick = %alt, "Nickname in use, trying alternate");
            self.send(&format!("NICK {}", alt)).await?;
            self.nick = alt;
        }
        self.set_state(ConnectionState::Registered);

        let join = format!("JOIN {}", self.config.channel);
        self.send(&join).await?;
        self.set_state(ConnectionState::Joined);
        Ok(())
    }

    /// Receive and log until `shutdown` turns true, its sender goes away, or
    /// the transport fails.
    ///
    /// Returns `Ok(())` on shutdown and [`Error::ConnectionClosed`] when the
    /// server hangs up.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        self.set_state(ConnectionState::Running);
        info!(channel = %self.config.channel, "Logging chat");

        loop {
            if *shutdown.borrow() {
                return Ok(());
            }
            // Only the read races the shutdown signal; replies are written
            // outside the select so a PONG is never cut off half way.
            let text = tokio::select! {
                frame = self.read_frame() => frame?,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Shutdown requested");
                        return Ok(());
                    }
                    continue;
                }
            };
            self.process(&text).await?;
        }
    }

    /// Shut down both directions of the transport.
    pub async fn close(&mut self) -> Result<()> {
        let result = self.stream.shutdown().await;
        self.set_state(ConnectionState::Closed);
        result.map_err(Error::from)
    }

    /// Read one frame and react to whatever it contains.
    async fn receive(&mut self) -> Result<String> {
        let text = self.read_frame().await?;
        self.process(&text).await?;
        Ok(text)
    }

    /// Read until a carriage return arrives or the peer closes.
    ///
    /// Nothing is written here, so dropping the future mid-read only loses
    /// buffered input. The accumulated bytes are decoded in one piece so
    /// characters split across reads survive.
    async fn read_frame(&mut self) -> Result<String> {
        if self.peer_closed {
            return Err(Error::ConnectionClosed);
        }

        let mut raw = Vec::new();
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        loop {
            let n = self.stream.read(&mut buf).await?;
            if n == 0 {
                self.peer_closed = true;
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if decoder::decode(&buf[..n]).contains('\r') {
                break;
            }
        }

        Ok(decoder::decode(&raw))
    }

    /// Dispatch a frame, then report a hang-up seen while reading it.
    async fn process(&mut self, text: &str) -> Result<()> {
        self.dispatch(text).await?;
        if self.peer_closed {
            return Err(Error::ConnectionClosed);
        }
        Ok(())
    }

    async fn dispatch(&mut self, text: &str) -> Result<()> {
        for trigger in self.classifier.classify(text) {
            match ChatEvent::from_trigger(trigger, text) {
                ChatEvent::Ping => self.send("PONG").await?,
                event => self.record(&event),
            }
        }
        Ok(())
    }

    fn record(&mut self, event: &ChatEvent) {
        let Some(line) = event.log_line() else {
            return;
        };
        debug!(line = %line, "Chat event");
        if let Err(e) = self.log.append(&line) {
            warn!(error = %e, "Failed to write chat log");
        }
    }

    async fn send(&mut self, command: &str) -> Result<()> {
        self.stream
            .write_all(format!("{}\r\n", command).as_bytes())
            .await?;
        self.stream.flush().await?;
        info!("{}: {}", self.nick, command);
        Ok(())
    }
}
