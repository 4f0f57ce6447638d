use undulate_engine::ControlValue;

pub const CONTROL_VALUE_KEY: &str = "POT:";
pub const READY: &str = "READY:POTENTIOMETER";

/// A message recognized in a line of text sent by the sensor device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorMessage {
    ControlValue(ControlValue),
    /// Sent once by the device after it starts up.
    Ready,
}

impl SensorMessage {
    /// Returns `None` for anything that isn't a recognized message,
    /// including control values outside of 0 to 100. A fragment containing
    /// the control value key is never treated as a ready message.
    pub fn parse(fragment: &str) -> Option<Self> {
        if fragment.contains(CONTROL_VALUE_KEY) {
            return Self::parse_control_value(fragment).map(Self::ControlValue);
        }
        if fragment.contains(READY) {
            return Some(Self::Ready);
        }
        None
    }

    // Uses the first occurrence of the key which is followed by at least one
    // digit. Anything after the digits is ignored.
    fn parse_control_value(fragment: &str) -> Option<ControlValue> {
        let digits = fragment.match_indices(CONTROL_VALUE_KEY).find_map(
            |(index, key)| {
                let rest = &fragment[index + key.len()..];
                let end = rest
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(rest.len());
                if end == 0 { None } else { Some(&rest[..end]) }
            },
        )?;
        let value = digits.parse::<i64>().ok()?;
        ControlValue::from_i64(value)
    }
}
