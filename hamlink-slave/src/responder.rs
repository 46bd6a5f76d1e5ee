//! Frame validation, acknowledgement and command dispatch.

use hamlink_protocol::{Chunk, Command, ACK, ENCODED_CHUNK_SIZE, NACK};

/// Application hook invoked for every valid chunk.
pub trait CommandHandler {
    /// Handles a decoded command. Read-class commands return the payload
    /// for the reply chunk (at most
    /// [`DATA_LENGTH`](hamlink_protocol::DATA_LENGTH) bytes); write-class
    /// commands return `None`.
    fn handle(&mut self, command: Command, payload: &[u8]) -> Option<Vec<u8>>;
}

/// What the responder wants clocked back to the master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Frame decoded cleanly: acknowledge, and for read-class commands
    /// follow up with the encoded reply chunk.
    Ack {
        response: Option<[u8; ENCODED_CHUNK_SIZE]>,
    },
    /// Frame failed validation: negative-acknowledge, nothing dispatched.
    Nack,
}

impl Reply {
    /// The single acknowledgement byte to clock out first.
    pub fn ack_byte(&self) -> u8 {
        match self {
            Reply::Ack { .. } => ACK,
            Reply::Nack => NACK,
        }
    }
}

/// Decodes completed wire frames and dispatches valid commands.
pub struct Responder<H: CommandHandler> {
    handler: H,
}

impl<H: CommandHandler> Responder<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Processes one completed wire frame: decode, acknowledge, dispatch.
    /// Invalid frames are NACKed without dispatching.
    pub fn on_frame(&mut self, wire: &[u8; ENCODED_CHUNK_SIZE]) -> Reply {
        let chunk = match Chunk::decode(wire) {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::warn!("rejecting frame: {}", e);
                return Reply::Nack;
            }
        };

        let command = match Command::from_code(chunk.header) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!("rejecting frame: {}", e);
                return Reply::Nack;
            }
        };

        tracing::debug!(
            "dispatching {} with {} payload bytes",
            command,
            chunk.payload().len()
        );
        let response = self.handler.handle(command, chunk.payload());

        if !command.expects_reply() {
            return Reply::Ack { response: None };
        }

        let payload = response.unwrap_or_default();
        match Chunk::new(command.reply_code(), &payload) {
            Ok(reply) => Reply::Ack {
                response: Some(reply.encode()),
            },
            Err(e) => {
                // Handler produced an over-long reply; acknowledge the
                // request but send nothing rather than truncate.
                tracing::warn!("{} reply rejected: {}", command, e);
                Reply::Ack { response: None }
            }
        }
    }
}
