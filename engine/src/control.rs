use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
};

/// An externally supplied control value in the range 0 to 100 inclusive.
/// Values outside this range can't be constructed, so consumers never need
/// to clamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ControlValue(u8);

impl ControlValue {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// Returns `None` if `value` is greater than 100.
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Converts an arbitrary integer, rejecting anything outside 0..=100.
    pub fn from_i64(value: i64) -> Option<Self> {
        u8::try_from(value).ok().and_then(Self::new)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn ratio_01(self) -> f64 {
        self.0 as f64 / Self::MAX.0 as f64
    }
}

impl Default for ControlValue {
    fn default() -> Self {
        Self(50)
    }
}

impl fmt::Display for ControlValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Single slot mailbox holding the most recent control value. Cloned
/// handles share the same slot. Writes overwrite whatever is there and
/// reads never observe a partial update.
#[derive(Clone, Debug)]
pub struct SharedControlValue(Arc<AtomicU8>);

impl SharedControlValue {
    pub fn new(initial: ControlValue) -> Self {
        Self(Arc::new(AtomicU8::new(initial.get())))
    }

    pub fn set(&self, value: ControlValue) {
        self.0.store(value.get(), Ordering::Relaxed);
    }

    pub fn get(&self) -> ControlValue {
        // Only validated values are ever stored.
        ControlValue(self.0.load(Ordering::Relaxed))
    }
}

impl Default for SharedControlValue {
    fn default() -> Self {
        Self::new(ControlValue::default())
    }
}
