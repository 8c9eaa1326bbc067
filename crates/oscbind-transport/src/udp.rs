//! Non-blocking UDP transport

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use oscbind_core::{OscError, OscResult};
use oscbind_wire::{encode_message, OscMessage};

use crate::{MessageReceiver, MessageSender, ReceiveQueue, Transport};

/// UDP transport configuration
#[derive(Clone, Debug)]
pub struct UdpConfig {
    /// Local address inbound sockets bind to
    pub listen_addr: IpAddr,
    /// Size of the datagram receive buffer
    pub recv_buffer_size: usize,
    /// Allow sending to broadcast addresses
    pub broadcast: bool,
    /// Datagrams read per poll; the rest stay in the socket for the next poll
    pub max_datagrams_per_poll: usize,
}

impl Default for UdpConfig {
    fn default() -> Self {
        UdpConfig {
            listen_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            recv_buffer_size: 65_536,
            broadcast: false,
            max_datagrams_per_poll: 1024,
        }
    }
}

fn transport_err(e: io::Error) -> OscError {
    OscError::TransportError(e.to_string())
}

/// UDP transport factory
#[derive(Clone, Debug, Default)]
pub struct UdpTransport {
    config: UdpConfig,
}

impl UdpTransport {
    pub fn new(config: UdpConfig) -> Self {
        UdpTransport { config }
    }

    pub fn config(&self) -> &UdpConfig {
        &self.config
    }
}

impl Transport for UdpTransport {
    type Sender = UdpSender;
    type Receiver = UdpReceiver;

    fn connect(&mut self, host: &str, port: u16) -> OscResult<UdpSender> {
        UdpSender::connect(host, port, &self.config)
    }

    fn listen(&mut self, port: u16) -> OscResult<UdpReceiver> {
        UdpReceiver::bind(port, &self.config)
    }
}

/// Outbound UDP connection
///
/// UDP is connectionless: creating a sender only resolves the destination
/// and opens a local socket, so an unreachable peer is not an error here.
pub struct UdpSender {
    socket: UdpSocket,
    dest: SocketAddr,
}

impl UdpSender {
    pub fn connect(host: &str, port: u16, config: &UdpConfig) -> OscResult<Self> {
        let dest = (host, port)
            .to_socket_addrs()
            .map_err(|_| OscError::UnresolvedHost(host.to_owned()))?
            .next()
            .ok_or_else(|| OscError::UnresolvedHost(host.to_owned()))?;

        let local: SocketAddr = if dest.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local).map_err(transport_err)?;
        socket.set_nonblocking(true).map_err(transport_err)?;
        if config.broadcast {
            socket.set_broadcast(true).map_err(transport_err)?;
        }

        tracing::debug!(%dest, "udp sender ready");
        Ok(UdpSender { socket, dest })
    }

    /// Resolved destination
    pub fn dest(&self) -> SocketAddr {
        self.dest
    }
}

impl MessageSender for UdpSender {
    fn send(&mut self, msg: &OscMessage) -> OscResult<()> {
        let bytes = encode_message(msg)?;
        match self.socket.send_to(&bytes, self.dest) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                tracing::warn!(dest = %self.dest, address = %msg.address, "send buffer full, message dropped");
                Ok(())
            }
            Err(e) => Err(transport_err(e)),
        }
    }
}

/// Inbound UDP connection bound to a local port
pub struct UdpReceiver {
    socket: UdpSocket,
    local_addr: SocketAddr,
    buf: Vec<u8>,
    budget: usize,
    queue: ReceiveQueue,
}

impl UdpReceiver {
    pub fn bind(port: u16, config: &UdpConfig) -> OscResult<Self> {
        let socket = UdpSocket::bind((config.listen_addr, port)).map_err(|e| {
            if e.kind() == io::ErrorKind::AddrInUse {
                OscError::AddressInUse(port)
            } else {
                transport_err(e)
            }
        })?;
        socket.set_nonblocking(true).map_err(transport_err)?;
        let local_addr = socket.local_addr().map_err(transport_err)?;

        tracing::debug!(%local_addr, "udp receiver bound");
        Ok(UdpReceiver {
            socket,
            local_addr,
            buf: vec![0u8; config.recv_buffer_size],
            budget: config.max_datagrams_per_poll.max(1),
            queue: ReceiveQueue::new(),
        })
    }

    /// Get local address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Datagrams dropped because they could not be decoded
    pub fn malformed(&self) -> u64 {
        self.queue.malformed()
    }
}

impl MessageReceiver for UdpReceiver {
    fn poll(&mut self) -> OscResult<usize> {
        for _ in 0..self.budget {
            match self.socket.recv_from(&mut self.buf) {
                Ok((len, from)) => self.queue.push_datagram(&self.buf[..len], from),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                // ICMP port-unreachable from an earlier send on some platforms
                Err(e) if e.kind() == io::ErrorKind::ConnectionReset => continue,
                Err(e) => return Err(transport_err(e)),
            }
        }
        Ok(self.queue.len())
    }

    fn has_waiting_messages(&self) -> bool {
        !self.queue.is_empty()
    }

    fn next_message(&mut self) -> Option<OscMessage> {
        self.queue.pop()
    }
}
