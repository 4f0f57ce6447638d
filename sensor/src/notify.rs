use std::{fmt, sync::mpsc};
use undulate_engine::ControlValue;

/// Things that happen to a sensor connection which someone may want to know
/// about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SensorEvent {
    Opened(String),
    OpenFailed(String),
    Received(String),
    DeviceReady,
    ControlValueUpdated(ControlValue),
    ReadFailed(String),
    Closed,
}

impl fmt::Display for SensorEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Opened(port) => write!(f, "Opened sensor {}", port),
            Self::OpenFailed(e) => write!(f, "Failed to open sensor: {}", e),
            Self::Received(line) => write!(f, "Received: {}", line),
            Self::DeviceReady => write!(f, "Sensor device ready"),
            Self::ControlValueUpdated(value) => {
                write!(f, "Control value updated: {}", value)
            }
            Self::ReadFailed(e) => write!(f, "Failed to read sensor: {}", e),
            Self::Closed => write!(f, "Sensor stream closed"),
        }
    }
}

/// Receives sensor events from the background reader.
pub trait Notify: Send + 'static {
    fn notify(&mut self, event: SensorEvent);
}

/// Writes every event to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotify;

impl Notify for LogNotify {
    fn notify(&mut self, event: SensorEvent) {
        match event {
            SensorEvent::OpenFailed(_) | SensorEvent::ReadFailed(_) => {
                log::error!("{}", event)
            }
            SensorEvent::Received(_) => log::debug!("{}", event),
            _ => log::info!("{}", event),
        }
    }
}

impl Notify for mpsc::Sender<SensorEvent> {
    fn notify(&mut self, event: SensorEvent) {
        if self.send(event).is_err() {
            log::warn!("sensor event receiver has been dropped");
        }
    }
}

/// Forwards every event to both notifiers.
pub struct Tee<A, B>(pub A, pub B);

impl<A: Notify, B: Notify> Notify for Tee<A, B> {
    fn notify(&mut self, event: SensorEvent) {
        self.0.notify(event.clone());
        self.1.notify(event);
    }
}
