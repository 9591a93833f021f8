//! APDU response definitions
//!
//! This module provides the response side of the ISO/IEC 7816-4 codec.

pub mod error;
pub mod status;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

use error::ResponseError;
use status::StatusWord;

/// Decoded APDU response: data followed by SW1 SW2 on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response data, possibly empty
    data: Bytes,
    /// Status word
    status: StatusWord,
}

impl Response {
    /// Create a new response with data and status
    pub fn new(data: impl Into<Bytes>, status: impl Into<StatusWord>) -> Self {
        Self {
            data: data.into(),
            status: status.into(),
        }
    }

    /// Create a success response
    pub fn success(data: impl Into<Bytes>) -> Self {
        Self::new(data, status::common::SUCCESS)
    }

    /// Parse response from raw bytes (including status word)
    pub fn from_bytes(raw: &[u8]) -> Result<Self, ResponseError> {
        let Some((data, [sw1, sw2])) = raw.split_last_chunk::<2>() else {
            debug!("Response too short: {} bytes", raw.len());
            return Err(ResponseError::Truncated(raw.len()));
        };
        let status = StatusWord::new(*sw1, *sw2);

        trace!(
            sw1 = format_args!("{:#04x}", status.sw1),
            sw2 = format_args!("{:#04x}", status.sw2),
            data_len = data.len(),
            "Parsed APDU response"
        );

        Ok(Self {
            data: Bytes::copy_from_slice(data),
            status,
        })
    }

    /// Serialize back to wire form: data, SW1, SW2
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.data.len() + 2);
        buf.put_slice(&self.data);
        buf.put_u8(self.status.sw1);
        buf.put_u8(self.status.sw2);
        buf.freeze()
    }

    /// Response data without the status word
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    /// Get the status word
    pub const fn status(&self) -> StatusWord {
        self.status
    }

    /// Check if the response indicates success (90 00)
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Data on success, `None` for any other status word
    pub fn into_success_data(self) -> Option<Bytes> {
        self.is_success().then_some(self.data)
    }
}

/// True iff SW1 = 0x90 and SW2 = 0x00
pub const fn is_success(response: &Response) -> bool {
    response.is_success()
}

impl TryFrom<&[u8]> for Response {
    type Error = ResponseError;

    fn try_from(data: &[u8]) -> Result<Self, ResponseError> {
        Self::from_bytes(data)
    }
}

impl TryFrom<Bytes> for Response {
    type Error = ResponseError;

    fn try_from(data: Bytes) -> Result<Self, ResponseError> {
        Self::from_bytes(&data)
    }
}

impl From<Response> for Bytes {
    fn from(response: Response) -> Self {
        response.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_from_bytes() {
        let resp = Response::from_bytes(&[0x04, 0xA1, 0xB2, 0xC3, 0x90, 0x00]).unwrap();
        assert_eq!(resp.data().as_ref(), &[0x04, 0xA1, 0xB2, 0xC3]);
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
        assert!(resp.is_success());

        let resp = Response::from_bytes(&[0x63, 0x00]).unwrap();
        assert!(resp.data().is_empty());
        assert!(!is_success(&resp));
    }

    #[test]
    fn test_truncated_response() {
        assert_eq!(Response::from_bytes(&[]), Err(ResponseError::Truncated(0)));
        assert_eq!(Response::from_bytes(&[0x90]), Err(ResponseError::Truncated(1)));
    }

    fn assert_round_trip(data: &[u8], status: StatusWord) {
        let response = Response::new(data.to_vec(), status);
        let wire = response.to_bytes();
        assert_eq!(wire.len(), data.len() + 2);
        assert_eq!(Response::from_bytes(&wire).unwrap(), response, "{status}");
    }

    #[test]
    fn test_round_trip_every_status_word() {
        let full: Vec<u8> = (0..u8::MAX).collect();
        for status in 0..=u16::MAX {
            assert_round_trip(&[], StatusWord::from_u16(status));
            assert_round_trip(&full, StatusWord::from_u16(status));
        }
    }

    #[test]
    fn test_round_trip_every_data_length() {
        let full: Vec<u8> = (0..u8::MAX).rev().collect();
        for len in 0..=full.len() {
            for status in (0..=u16::MAX).step_by(257) {
                assert_round_trip(&full[..len], StatusWord::from_u16(status));
            }
            assert_round_trip(&full[..len], status::common::SUCCESS);
        }
    }

    #[test]
    fn test_into_success_data() {
        let ok = Response::success(Bytes::from_static(&[0x01, 0x02]));
        assert_eq!(ok.into_success_data().as_deref(), Some(&[0x01, 0x02][..]));

        let failed = Response::new(Bytes::from_static(&[0x01]), (0x6A, 0x82));
        assert!(failed.into_success_data().is_none());
    }
}
