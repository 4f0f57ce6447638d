//! Reads control values from an external sensor and publishes them to a
//! `SharedControlValue` for the render loop.
//!
//! The sensor sends newline separated text. Lines containing `POT:<n>` with
//! `n` between 0 and 100 update the control value and `READY:POTENTIOMETER`
//! announces that the device has started. Everything else is ignored.

pub mod channel;
pub mod framing;
pub mod notify;
pub mod port;
pub mod protocol;
pub mod replay;
pub mod serial;
pub mod udp;

pub use channel::{DEFAULT_POLL_INTERVAL, SensorTask};
pub use notify::{LogNotify, Notify, SensorEvent, Tee};
pub use port::{ReadStatus, SensorPort, SensorReader};
pub use protocol::SensorMessage;
pub use replay::ReplayPort;
pub use serial::{DEFAULT_BAUD_RATE, SerialPort};
pub use udp::UdpPort;
