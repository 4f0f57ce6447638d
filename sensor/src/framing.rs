/// Longest partial line kept while waiting for a newline. A device sending
/// data without newlines would otherwise grow the buffer without bound.
pub const MAX_PENDING_BYTES: usize = 4096;

/// Reassembles newline separated text from arbitrarily split chunks of
/// bytes.
#[derive(Default)]
pub struct LineFramer {
    pending: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        if self.pending.len() > MAX_PENDING_BYTES
            && !self.pending.contains(&b'\n')
        {
            log::warn!(
                "Discarding {} bytes received without a newline",
                self.pending.len()
            );
            self.pending.clear();
        }
    }

    /// Removes and returns the next complete non-empty line, without its
    /// line ending. Invalid utf-8 is replaced rather than rejected.
    pub fn next_line(&mut self) -> Option<String> {
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n')
        {
            let line = Self::decode(&self.pending[..newline]);
            self.pending.drain(..=newline);
            if !line.is_empty() {
                return Some(line);
            }
        }
        None
    }

    /// Takes whatever partial line remains, for when the stream ends.
    pub fn finish(&mut self) -> Option<String> {
        let line = Self::decode(&self.pending);
        self.pending.clear();
        if line.is_empty() { None } else { Some(line) }
    }

    fn decode(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).trim_end_matches('\r').to_string()
    }
}
