use crate::port::{ReadStatus, SensorPort, SensorReader};
use nix::sys::termios::BaudRate;
use std::{
    os::fd::OwnedFd,
    path::{Path, PathBuf},
};

pub const DEFAULT_BAUD_RATE: u32 = 9600;

const READ_CHUNK_SIZE: usize = 64;

/// A sensor attached to a serial tty, such as a microcontroller connected
/// over usb.
pub struct SerialPort {
    tty_path: PathBuf,
    baud_rate: u32,
}

impl SerialPort {
    pub fn new(tty_path: impl AsRef<Path>, baud_rate: u32) -> Self {
        Self {
            tty_path: tty_path.as_ref().to_path_buf(),
            baud_rate,
        }
    }
}

fn convert_baud_rate(baud_rate: u32) -> anyhow::Result<BaudRate> {
    Ok(match baud_rate {
        1200 => BaudRate::B1200,
        1800 => BaudRate::B1800,
        2400 => BaudRate::B2400,
        4800 => BaudRate::B4800,
        9600 => BaudRate::B9600,
        19200 => BaudRate::B19200,
        38400 => BaudRate::B38400,
        57600 => BaudRate::B57600,
        115200 => BaudRate::B115200,
        230400 => BaudRate::B230400,
        other => anyhow::bail!("Unsupported baud rate: {}", other),
    })
}

impl SensorPort for SerialPort {
    type Reader = SerialReader;

    fn describe(&self) -> String {
        format!("{} at {} baud", self.tty_path.display(), self.baud_rate)
    }

    fn open(self) -> anyhow::Result<SerialReader> {
        use nix::{
            fcntl::{self, OFlag},
            sys::{
                stat::Mode,
                termios::{
                    self, LocalFlags, SetArg, SpecialCharacterIndices,
                },
            },
        };
        // Check the baud rate before touching the device.
        let baud_rate = convert_baud_rate(self.baud_rate)?;
        let fd = fcntl::open(
            self.tty_path.as_path(),
            OFlag::O_RDONLY | OFlag::O_NONBLOCK | OFlag::O_NOCTTY,
            Mode::empty(),
        )?;
        let owned_fd = unsafe {
            use std::os::fd::FromRawFd;
            // fd is a valid file descriptor and the only cleanup it needs is close
            OwnedFd::from_raw_fd(fd)
        };
        let mut termios = termios::tcgetattr(&owned_fd)?;
        termios.local_flags &= !(LocalFlags::ECHO | LocalFlags::ICANON);
        // With O_NONBLOCK this makes an empty input queue report EAGAIN, so a
        // read of zero bytes only happens once the device has hung up.
        termios.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        termios.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
        termios::cfsetspeed(&mut termios, baud_rate)?;
        termios::tcsetattr(&owned_fd, SetArg::TCSANOW, &termios)?;
        Ok(SerialReader { owned_fd })
    }
}

pub struct SerialReader {
    owned_fd: OwnedFd,
}

enum Chunk {
    Bytes(usize),
    Empty,
    End,
}

fn classify_read(result: nix::Result<usize>) -> anyhow::Result<Chunk> {
    use nix::errno::Errno;
    match result {
        // The device hung up, usually because it was unplugged.
        Ok(0) | Err(Errno::EIO) | Err(Errno::ENXIO) => Ok(Chunk::End),
        Ok(nbytes) => Ok(Chunk::Bytes(nbytes)),
        Err(Errno::EAGAIN) => Ok(Chunk::Empty),
        Err(e) => Err(e.into()),
    }
}

impl SensorReader for SerialReader {
    fn read_available(
        &mut self,
        buf: &mut Vec<u8>,
    ) -> anyhow::Result<ReadStatus> {
        use nix::unistd;
        use std::os::fd::AsRawFd;
        let mut chunk = [0; READ_CHUNK_SIZE];
        let mut status = ReadStatus::Pending;
        loop {
            let result = unistd::read(self.owned_fd.as_raw_fd(), &mut chunk);
            match classify_read(result)? {
                Chunk::Bytes(nbytes) => {
                    buf.extend_from_slice(&chunk[..nbytes]);
                    status = ReadStatus::Data;
                }
                Chunk::Empty => return Ok(status),
                // Bytes read before the hang up are delivered first. The
                // next read reports the end again.
                Chunk::End if status == ReadStatus::Data => return Ok(status),
                Chunk::End => return Ok(ReadStatus::Closed),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn common_baud_rates_supported() {
        for rate in [DEFAULT_BAUD_RATE, 19200, 115200] {
            assert!(convert_baud_rate(rate).is_ok());
        }
    }

    #[test]
    fn unsupported_baud_rate_rejected() {
        assert!(convert_baud_rate(9601).is_err());
        assert!(convert_baud_rate(0).is_err());
    }

    #[test]
    fn missing_device_fails_to_open() {
        let port = SerialPort::new("/nonexistent/tty-for-undulate-test", 9600);
        assert!(port.describe().contains("9600 baud"));
        assert!(port.open().is_err());
    }

    #[test]
    fn bad_baud_rate_fails_before_opening() {
        let port = SerialPort::new("/nonexistent/tty-for-undulate-test", 7);
        let error = port.open().err().unwrap();
        assert!(error.to_string().contains("Unsupported baud rate"));
    }

    #[test]
    fn hang_up_closes_after_remaining_bytes() {
        use std::{fs::File, io::Write};
        let (read_end, write_end) = nix::unistd::pipe().unwrap();
        let mut writer = File::from(write_end);
        writer.write_all(b"POT:5\n").unwrap();
        drop(writer);
        let mut reader = SerialReader { owned_fd: read_end };
        let mut buf = Vec::new();
        assert_eq!(reader.read_available(&mut buf).unwrap(), ReadStatus::Data);
        assert_eq!(buf, b"POT:5\n");
        buf.clear();
        assert_eq!(
            reader.read_available(&mut buf).unwrap(),
            ReadStatus::Closed
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn zero_byte_read_is_end_of_stream() {
        use nix::errno::Errno;
        assert!(matches!(classify_read(Ok(0)), Ok(Chunk::End)));
        assert!(matches!(classify_read(Err(Errno::EIO)), Ok(Chunk::End)));
        assert!(matches!(classify_read(Err(Errno::EAGAIN)), Ok(Chunk::Empty)));
        assert!(matches!(classify_read(Ok(12)), Ok(Chunk::Bytes(12))));
        assert!(classify_read(Err(Errno::EBADF)).is_err());
    }
}
