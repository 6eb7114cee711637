//! Blocking TCP transport to the game server.
//!
//! One persistent connection, synchronous throughout: the bot's turn loop
//! polls for a message with a bounded read timeout, so a quiet server
//! simply yields `None` and the loop moves on to its timers.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use tracing::{debug, info};

use crate::protocol::{decode_body, ClientCommand, ProtocolError, ServerMessage, PROTOCOL_VERSION};

/// How long to keep draining the server's greeting backlog on connect.
const DRAIN_WINDOW: Duration = Duration::from_secs(1);

pub struct Connection {
    stream: TcpStream,
    recv_timeout: Duration,
}

impl Connection {
    /// Connect, flush whatever the server has queued from before our
    /// handshake, and announce our protocol version.
    pub fn open(host: &str, port: u16, recv_timeout: Duration) -> io::Result<Self> {
        let stream = TcpStream::connect((host, port))?;
        info!(host, port, "connected to game server");
        let mut conn = Self {
            stream,
            recv_timeout,
        };
        conn.drain_backlog()?;
        conn.send(&ClientCommand::Handshake {
            version: PROTOCOL_VERSION,
        })?;
        Ok(conn)
    }

    /// Read and discard until the server goes quiet. The server replays
    /// recent traffic at new connections; none of it is addressed to us
    /// yet.
    fn drain_backlog(&mut self) -> io::Result<()> {
        self.stream.set_read_timeout(Some(DRAIN_WINDOW))?;
        let mut scratch = [0u8; 4096];
        let mut drained = 0usize;
        loop {
            match self.stream.read(&mut scratch) {
                Ok(0) => break,
                Ok(n) => drained += n,
                Err(err) if is_timeout(&err) => break,
                Err(err) => return Err(err),
            }
        }
        debug!(drained, "backlog drained");
        Ok(())
    }

    pub fn send(&mut self, command: &ClientCommand) -> io::Result<()> {
        debug!(?command, "send");
        self.stream.write_all(command.encode().as_bytes())
    }

    /// Poll for one message. `Ok(None)` means the receive window elapsed
    /// with nothing to process; any other failure is real.
    pub fn poll(&mut self) -> Result<Option<ServerMessage>, ProtocolError> {
        self.stream
            .set_read_timeout(Some(self.recv_timeout))
            .map_err(ProtocolError::Io)?;
        let mut kind_buf = [0u8; 4];
        match self.stream.read_exact(&mut kind_buf) {
            Ok(()) => {}
            Err(err) if is_timeout(&err) => return Ok(None),
            Err(err) => return Err(ProtocolError::Io(err)),
        }
        // Header started; from here a timeout mid-message is a real fault.
        let mut payload_buf = [0u8; 4];
        self.stream
            .read_exact(&mut payload_buf)
            .map_err(ProtocolError::Io)?;
        let kind = u32::from_le_bytes(kind_buf);
        let payload = u32::from_le_bytes(payload_buf);
        decode_body(kind, payload, &mut self.stream).map(Some)
    }
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
