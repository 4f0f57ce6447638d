/// Outcome of polling an open sensor connection for data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadStatus {
    /// Some bytes were appended to the buffer.
    Data,
    /// Nothing is available right now. Try again later.
    Pending,
    /// The stream has ended and will never produce more data.
    Closed,
}

/// An open connection to a sensor. Reads never block.
pub trait SensorReader {
    fn read_available(&mut self, buf: &mut Vec<u8>)
    -> anyhow::Result<ReadStatus>;
}

/// A connection to a sensor which hasn't been opened yet. Opening consumes
/// the port, so a closed connection can't be restarted.
pub trait SensorPort {
    type Reader: SensorReader;

    /// Human readable name used in log messages.
    fn describe(&self) -> String;

    fn open(self) -> anyhow::Result<Self::Reader>;
}
