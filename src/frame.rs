use crate::error::{AnswerCode, Error, ProtocolError, Result};
use crate::proto::command::CommandDescriptor;

/// First byte of every device response.
pub const RESPONSE_HEADER: u8 = 0x70;
/// Size of the fixed part of a response.
pub const RESPONSE_HEAD_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Control,
    Query,
}

impl RequestType {
    pub const CONTROL: u8 = 0x8C;
    pub const QUERY: u8 = 0x83;
}

impl TryFrom<u8> for RequestType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            Self::CONTROL => Ok(RequestType::Control),
            Self::QUERY => Ok(RequestType::Query),
            other => Err(Error::InvalidCommand(other)),
        }
    }
}

/// Modulo-256 sum of raw bytes.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Encodes `descriptor` as a complete frame with trailing checksum.
pub fn build_frame(descriptor: &CommandDescriptor) -> Result<Vec<u8>> {
    RequestType::try_from(descriptor.request)?;

    let mut frame = Vec::with_capacity(4 + descriptor.params.len());
    frame.push(descriptor.request);
    frame.push(descriptor.category);
    frame.push(descriptor.function);
    frame.extend_from_slice(descriptor.params);
    let sum = checksum(&frame);
    frame.push(sum);
    Ok(frame)
}

/// Checks a response once its checksum has been located.
///
/// Order matters: a corrupted response is reported as a checksum failure
/// even if its header or answer also look wrong.
pub fn validate_response(header: u8, answer: u8, received: u8, expected: u8) -> Result<()> {
    if received != expected {
        return Err(Error::Checksum { expected, received });
    }
    if header != RESPONSE_HEADER {
        return Err(ProtocolError::InvalidHeader(header).into());
    }
    match AnswerCode::from(answer) {
        AnswerCode::Success => Ok(()),
        code => Err(Error::Device(code)),
    }
}

/// Validates a 3-byte CONTROL acknowledgement.
pub fn parse_control_response(resp: [u8; RESPONSE_HEAD_LEN]) -> Result<()> {
    let [header, answer, received] = resp;
    validate_response(header, answer, received, checksum(&[header, answer]))
}

/// Validates a QUERY response given its head and the `return_size` trailing
/// bytes, returning the payload without the checksum.
pub fn parse_query_response(head: [u8; RESPONSE_HEAD_LEN], mut tail: Vec<u8>) -> Result<Vec<u8>> {
    let [header, answer, _return_size] = head;
    let received = tail.pop().ok_or(ProtocolError::MissingChecksum)?;
    let expected = checksum(&head).wrapping_add(checksum(&tail));
    validate_response(header, answer, received, expected)?;
    Ok(tail)
}
