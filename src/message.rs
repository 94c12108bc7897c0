//! Canonical proof-binding messages.
//!
//! A proof binds to exactly one message. The proving client and the
//! verifying server must render the identical byte string: field order and
//! separators are part of the protocol surface, and any divergence silently
//! breaks every proof.

/// Tagged message variants a proof can bind to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// Binds an enrollment proof to the submitted identity attributes.
    Enrollment {
        /// Hex identity commitment submitted alongside the proof.
        commitment_hex: String,
        /// Hex digest of the identity document number.
        id_hash: String,
        /// Hex digest of the full name.
        name_hash: String,
        /// Hex digest of the date of birth.
        dob_hash: String,
        /// Approval flag from the enrollment screening step.
        approval: u32,
        /// Client-side Unix timestamp in milliseconds.
        timestamp_millis: u64,
    },
    /// Binds a login proof to a server-issued session challenge.
    Verification {
        /// Session identifier returned by challenge issuance.
        session_id: String,
        /// Client-side Unix timestamp in milliseconds.
        timestamp_millis: u64,
    },
}

impl Message {
    /// Renders the canonical byte string.
    ///
    /// Integers render as base-10 ASCII with no locale formatting, so
    /// identical field values always produce byte-identical output.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Message::Enrollment {
                commitment_hex,
                id_hash,
                name_hash,
                dob_hash,
                approval,
                timestamp_millis,
            } => format!(
                "ENROLL:commitment:{commitment_hex}:id:{id_hash}:name:{name_hash}:dob:{dob_hash}:approval:{approval}:ts:{timestamp_millis}"
            )
            .into_bytes(),
            Message::Verification {
                session_id,
                timestamp_millis,
            } => format!("VERIFY:{session_id}:{timestamp_millis}").into_bytes(),
        }
    }
}
