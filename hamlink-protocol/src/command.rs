//! Closed command registry for the link.
//!
//! Wire byte values are reserved and fixed:
//!
//! | Symbol       | Code | Class   |
//! |--------------|------|---------|
//! | `SD_Read`    | 0x10 | read    |
//! | `SD_Append`  | 0x11 | write   |
//! | `SD_lnAppend`| 0x12 | write   |
//! | `RTC_Read`   | 0x20 | read    |
//! | `RTC_Set`    | 0x21 | write   |
//! | `ACK`        | 0xFD | control |
//! | `NACK`       | 0xFE | control |
//! | `Abort`      | 0xFF | control |
//!
//! Command codes keep bit 7 clear; the reply to a read-class command is
//! its request code XOR 0x80, so replies and control codes never collide
//! with requests.

use crate::error::ProtocolError;

/// Acknowledge control code.
pub const ACK: u8 = 0xFD;

/// Negative-acknowledge control code.
pub const NACK: u8 = 0xFE;

/// Abort control code. Reserved; never emitted by the current exchange.
pub const ABORT: u8 = 0xFF;

/// XOR mask turning a read-class request code into its reply code.
pub const REPLY_FLAG: u8 = 0x80;

/// Commands the master can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Read the log file from the SD card.
    SdRead = 0x10,
    /// Append the payload to the SD card log.
    SdAppend = 0x11,
    /// Append the payload on a new timestamped line.
    SdLineAppend = 0x12,
    /// Read the current RTC time.
    RtcRead = 0x20,
    /// Set the RTC time from the payload.
    RtcSet = 0x21,
}

/// Registry entry: symbolic name, wire code, human-readable description
/// and reply class.
#[derive(Debug, Clone, Copy)]
pub struct CommandInfo {
    pub name: &'static str,
    pub code: u8,
    pub description: &'static str,
    /// Read-class commands elicit a response chunk from the peer;
    /// write-class commands elicit only ACK/NACK.
    pub expects_reply: bool,
}

/// Fixed command table, indexed by [`Command::ordinal`].
pub const COMMANDS: [CommandInfo; 5] = [
    CommandInfo {
        name: "SD_Read",
        code: 0x10,
        description: "SD Card Read",
        expects_reply: true,
    },
    CommandInfo {
        name: "SD_Append",
        code: 0x11,
        description: "SD Card Append",
        expects_reply: false,
    },
    CommandInfo {
        name: "SD_lnAppend",
        code: 0x12,
        description: "SD Card Newline, timestamp then append",
        expects_reply: false,
    },
    CommandInfo {
        name: "RTC_Read",
        code: 0x20,
        description: "RTC Read",
        expects_reply: true,
    },
    CommandInfo {
        name: "RTC_Set",
        code: 0x21,
        description: "RTC Set",
        expects_reply: false,
    },
];

impl Command {
    /// All commands, in registry order.
    pub const ALL: [Command; 5] = [
        Command::SdRead,
        Command::SdAppend,
        Command::SdLineAppend,
        Command::RtcRead,
        Command::RtcSet,
    ];

    /// Looks a command up by registry ordinal. `None` for ordinals past
    /// the end of the table.
    pub fn from_ordinal(ordinal: usize) -> Option<Command> {
        Self::ALL.get(ordinal).copied()
    }

    /// Looks a command up by wire code.
    pub fn from_code(code: u8) -> Result<Command, ProtocolError> {
        Command::try_from(code)
    }

    /// Position of this command in [`COMMANDS`].
    pub fn ordinal(self) -> usize {
        match self {
            Command::SdRead => 0,
            Command::SdAppend => 1,
            Command::SdLineAppend => 2,
            Command::RtcRead => 3,
            Command::RtcSet => 4,
        }
    }

    /// The one-byte wire code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Registry entry for this command.
    pub fn info(self) -> &'static CommandInfo {
        &COMMANDS[self.ordinal()]
    }

    /// Symbolic name, as it appears in the registry.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        self.info().description
    }

    /// Whether this command elicits a response chunk (read-class).
    pub fn expects_reply(self) -> bool {
        self.info().expects_reply
    }

    /// Wire code of the reply chunk answering this read-class command.
    pub fn reply_code(self) -> u8 {
        self.code() ^ REPLY_FLAG
    }
}

impl TryFrom<u8> for Command {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x10 => Ok(Command::SdRead),
            0x11 => Ok(Command::SdAppend),
            0x12 => Ok(Command::SdLineAppend),
            0x20 => Ok(Command::RtcRead),
            0x21 => Ok(Command::RtcSet),
            other => Err(ProtocolError::UnknownCommandCode(other)),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
