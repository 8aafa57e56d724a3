use std::fmt;
use std::str::FromStr;

use crate::frame::RequestType;

// ---- Addressing ----
pub const SYSTEM_CATEGORY: u8 = 0x00;

pub const POWER_FUNCTION: u8 = 0x00;
pub const VOLUME_FUNCTION: u8 = 0x05;
pub const MUTING_FUNCTION: u8 = 0x06;

/// One fixed request: everything before the checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub request: u8,
    pub category: u8,
    pub function: u8,
    /// For CONTROL requests the first byte is the length (data + checksum).
    pub params: &'static [u8],
}

impl CommandDescriptor {
    const fn control(function: u8, params: &'static [u8]) -> Self {
        Self {
            request: RequestType::CONTROL,
            category: SYSTEM_CATEGORY,
            function,
            params,
        }
    }

    const fn query(function: u8) -> Self {
        Self {
            request: RequestType::QUERY,
            category: SYSTEM_CATEGORY,
            function,
            params: &[0xFF, 0xFF],
        }
    }
}

pub const POWER_ON: CommandDescriptor = CommandDescriptor::control(POWER_FUNCTION, &[0x02, 0x01]);
pub const POWER_OFF: CommandDescriptor = CommandDescriptor::control(POWER_FUNCTION, &[0x02, 0x00]);
pub const POWER_QUERY: CommandDescriptor = CommandDescriptor::query(POWER_FUNCTION);
// relative volume: 0x00 up, 0x01 down
pub const VOLUME_UP: CommandDescriptor =
    CommandDescriptor::control(VOLUME_FUNCTION, &[0x03, 0x00, 0x00]);
pub const VOLUME_DOWN: CommandDescriptor =
    CommandDescriptor::control(VOLUME_FUNCTION, &[0x03, 0x00, 0x01]);
pub const MUTE_TOGGLE: CommandDescriptor = CommandDescriptor::control(MUTING_FUNCTION, &[0x02, 0x00]);

pub const DESCRIPTORS: &[&CommandDescriptor] = &[
    &POWER_ON,
    &POWER_OFF,
    &POWER_QUERY,
    &VOLUME_UP,
    &VOLUME_DOWN,
    &MUTE_TOGGLE,
];

/// Public operations, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    PowerOn,
    PowerOff,
    PowerToggle,
    VolumeUp,
    VolumeDown,
    MuteToggle,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::PowerOn,
        Operation::PowerOff,
        Operation::PowerToggle,
        Operation::VolumeUp,
        Operation::VolumeDown,
        Operation::MuteToggle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::PowerOn => "on",
            Operation::PowerOff => "off",
            Operation::PowerToggle => "power",
            Operation::VolumeUp => "volume-up",
            Operation::VolumeDown => "volume-down",
            Operation::MuteToggle => "mute",
        }
    }

    /// The single descriptor behind this operation, `None` for composites.
    pub fn descriptor(self) -> Option<&'static CommandDescriptor> {
        match self {
            Operation::PowerOn => Some(&POWER_ON),
            Operation::PowerOff => Some(&POWER_OFF),
            Operation::PowerToggle => None,
            Operation::VolumeUp => Some(&VOLUME_UP),
            Operation::VolumeDown => Some(&VOLUME_DOWN),
            Operation::MuteToggle => Some(&MUTE_TOGGLE),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for op in Operation::ALL {
            assert_eq!(op.to_string().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn unknown_name() {
        let err = "reboot".parse::<Operation>().unwrap_err();
        assert_eq!(err.to_string(), "unknown operation: reboot");
        assert!("ON".parse::<Operation>().is_err());
    }

    #[test]
    fn control_length_byte_counts_data_and_checksum() {
        for d in DESCRIPTORS.iter().filter(|d| d.request == RequestType::CONTROL) {
            assert_eq!(d.params[0] as usize, d.params.len(), "{:?}", d);
        }
    }

    #[test]
    fn only_toggle_is_composite() {
        for op in Operation::ALL {
            assert_eq!(op.descriptor().is_none(), op == Operation::PowerToggle);
        }
    }
}
