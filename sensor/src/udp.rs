use crate::port::{ReadStatus, SensorPort, SensorReader};
use std::{
    io,
    net::{SocketAddr, ToSocketAddrs, UdpSocket},
};

const BUF_SIZE: usize = 256;

/// A sensor which sends its text fragments as udp datagrams. Each datagram
/// is treated as a complete line.
pub struct UdpPort {
    addrs: Vec<SocketAddr>,
}

impl UdpPort {
    pub fn new<A: ToSocketAddrs>(addrs: A) -> anyhow::Result<Self> {
        Ok(Self {
            addrs: addrs.to_socket_addrs()?.collect(),
        })
    }
}

impl SensorPort for UdpPort {
    type Reader = UdpReader;

    fn describe(&self) -> String {
        format!("udp {:?}", self.addrs)
    }

    fn open(self) -> anyhow::Result<UdpReader> {
        let socket = UdpSocket::bind(self.addrs.as_slice())?;
        socket.set_nonblocking(true)?;
        log::info!("Listening for sensor datagrams on {:?}", socket.local_addr());
        Ok(UdpReader {
            socket,
            buf_raw: vec![0; BUF_SIZE],
        })
    }
}

pub struct UdpReader {
    socket: UdpSocket,
    buf_raw: Vec<u8>,
}

impl UdpReader {
    pub fn local_socket_address(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

impl SensorReader for UdpReader {
    fn read_available(
        &mut self,
        buf: &mut Vec<u8>,
    ) -> anyhow::Result<ReadStatus> {
        let mut status = ReadStatus::Pending;
        loop {
            match self.socket.recv(&mut self.buf_raw) {
                Ok(size) => {
                    if size >= BUF_SIZE {
                        log::warn!("UDP message too long for buffer!");
                        continue;
                    }
                    let datagram = &self.buf_raw[..size];
                    buf.extend_from_slice(datagram);
                    if datagram.last() != Some(&b'\n') {
                        buf.push(b'\n');
                    }
                    status = ReadStatus::Data;
                }
                Err(error) => match error.kind() {
                    // There is currently no datagram available.
                    io::ErrorKind::WouldBlock => return Ok(status),
                    _ => return Err(error.into()),
                },
            }
        }
    }
}
