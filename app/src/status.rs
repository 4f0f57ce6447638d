use std::fmt;
use undulate_engine::ControlValue;
use undulate_sensor::SensorEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connection {
    None,
    Connecting,
    Connected,
    Ready,
    Disconnected,
}

/// What the window title shows about the sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorStatus {
    pub connection: Connection,
    pub control_value: ControlValue,
}

impl SensorStatus {
    pub fn new(connection: Connection, control_value: ControlValue) -> Self {
        Self {
            connection,
            control_value,
        }
    }

    /// Returns `true` if the status changed.
    pub fn apply(&mut self, event: &SensorEvent) -> bool {
        let before = *self;
        match event {
            SensorEvent::Opened(_) => self.connection = Connection::Connected,
            SensorEvent::DeviceReady => self.connection = Connection::Ready,
            SensorEvent::ControlValueUpdated(value) => {
                self.control_value = *value
            }
            SensorEvent::OpenFailed(_)
            | SensorEvent::ReadFailed(_)
            | SensorEvent::Closed => {
                self.connection = Connection::Disconnected
            }
            SensorEvent::Received(_) => (),
        }
        *self != before
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let connection = match self.connection {
            Connection::None => "no sensor",
            Connection::Connecting => "connecting",
            Connection::Connected => "connected",
            Connection::Ready => "ready",
            Connection::Disconnected => "disconnected",
        };
        write!(f, "undulate - {} - level {}", connection, self.control_value)
    }
}
