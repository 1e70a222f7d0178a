// src/owon.rs
use log::{debug, info};
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use crate::drivers::{CaptureFrame, FrameSource, TransportError};
/// The only command this client speaks. No arguments, no length prefix.
pub const TRIGGER_COMMAND: &[u8] = b"STARTMEMDEPTH";
const READ_CHUNK: usize = 4096;
/// Accumulates bytes until the reader reports a timeout.
///
/// The instrument never says how long its answer is, so a read that times out
/// is the normal end of a frame and returns whatever arrived so far (possibly
/// nothing). The reader must already carry a read timeout. End-of-stream and
/// any other I/O failure mean the connection is gone and are returned as
/// errors.
pub fn read_until_idle<R: Read>(reader: &mut R) -> Result<Vec<u8>, TransportError> {
    let mut frame = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => return Err(TransportError::Closed),
            Ok(n) => frame.extend_from_slice(&chunk[..n]),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Ok(frame);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(TransportError::Io(e)),
        }
    }
}
/// TCP session with an OWON bench oscilloscope.
pub struct OwonSession {
    addr: SocketAddr,
    stream: TcpStream,
}
impl OwonSession {
    pub fn connect(
        host: &str,
        port: u16,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let target = format!("{host}:{port}");
        let addr = target
            .to_socket_addrs()
            .map_err(|source| TransportError::Resolve {
                addr: target.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| TransportError::NoAddress(target.clone()))?;
        let stream = TcpStream::connect_timeout(&addr, connect_timeout)
            .map_err(|source| TransportError::Connect {
                addr: target,
                source,
            })?;
        stream.set_nodelay(true)?;
        // A zero duration is rejected by the socket layer.
        stream.set_read_timeout(Some(read_timeout.max(Duration::from_millis(1))))?;
        info!("connected to oscilloscope at {addr}");
        Ok(Self { addr, stream })
    }
    pub fn trigger(&mut self) -> Result<(), TransportError> {
        self.stream.write_all(TRIGGER_COMMAND)?;
        self.stream.flush()?;
        Ok(())
    }
    pub fn read_frame(&mut self) -> Result<CaptureFrame, TransportError> {
        let bytes = read_until_idle(&mut self.stream)?;
        debug!("read {} bytes from {}", bytes.len(), self.addr);
        Ok(CaptureFrame::from_bytes(&bytes))
    }
}
impl FrameSource for OwonSession {
    fn next_frame(&mut self) -> Result<CaptureFrame, TransportError> {
        self.trigger()?;
        self.read_frame()
    }
}
impl Drop for OwonSession {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}
