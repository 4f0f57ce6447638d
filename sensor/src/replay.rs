use crate::port::{ReadStatus, SensorPort, SensorReader};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

/// Replays a text file of previously captured sensor output, one line per
/// interval. The stream closes at the end of the file.
pub struct ReplayPort {
    path: PathBuf,
    interval: Duration,
}

impl ReplayPort {
    pub fn new(path: impl AsRef<Path>, interval: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            interval,
        }
    }
}

impl SensorPort for ReplayPort {
    type Reader = ReplayReader<BufReader<File>>;

    fn describe(&self) -> String {
        format!("replay of {}", self.path.display())
    }

    fn open(self) -> anyhow::Result<Self::Reader> {
        let file = File::open(&self.path)?;
        Ok(ReplayReader::new(BufReader::new(file), self.interval))
    }
}

pub struct ReplayReader<R: BufRead> {
    source: R,
    interval: Duration,
    next_line_due: Instant,
    line: Vec<u8>,
}

impl<R: BufRead> ReplayReader<R> {
    pub fn new(source: R, interval: Duration) -> Self {
        Self {
            source,
            interval,
            next_line_due: Instant::now(),
            line: Vec::new(),
        }
    }
}

impl<R: BufRead> SensorReader for ReplayReader<R> {
    fn read_available(
        &mut self,
        buf: &mut Vec<u8>,
    ) -> anyhow::Result<ReadStatus> {
        let now = Instant::now();
        if now < self.next_line_due {
            return Ok(ReadStatus::Pending);
        }
        // Bytes are passed through undecoded. Recordings may contain noise
        // that isn't valid utf-8.
        self.line.clear();
        if self.source.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(ReadStatus::Closed);
        }
        buf.extend_from_slice(&self.line);
        if self.line.last() != Some(&b'\n') {
            buf.push(b'\n');
        }
        self.next_line_due = now + self.interval;
        Ok(ReadStatus::Data)
    }
}
