//! Protocol constants mandated by the upstream service.
//!
//! These values ship inside the official mobile client and are identical for every
//! installation. They are modelled as a table so simulators can build the mirrored
//! (server-side) view of the wire, not because they are configurable.

/// AES key length in bytes.
pub const KEY_LEN: usize = 16;

/// Length of one IV half in bytes (the other half is the per-message nonce).
pub const IV_HALF_LEN: usize = 8;

/// Full IV length in bytes.
pub const IV_LEN: usize = 16;

/// Number of entries in the fixed IV table.
pub const IV_TABLE_LEN: usize = 6;

/// Key the client encrypts requests with (`4D6251655468576D5A7134743677397A`).
pub const ENCRYPT_KEY: [u8; KEY_LEN] = [
    0x4D, 0x62, 0x51, 0x65, 0x54, 0x68, 0x57, 0x6D, 0x5A, 0x71, 0x34, 0x74, 0x36, 0x77, 0x39, 0x7A,
];

/// Key the client decrypts responses with (`3273357638782F413F4428472B4B6250`).
pub const DECRYPT_KEY: [u8; KEY_LEN] = [
    0x32, 0x73, 0x35, 0x76, 0x38, 0x78, 0x2F, 0x41, 0x3F, 0x44, 0x28, 0x47, 0x2B, 0x4B, 0x62, 0x50,
];

/// Fixed IV halves; an envelope's index digit selects one of these.
pub const IV_TABLE: [[u8; IV_HALF_LEN]; IV_TABLE_LEN] = [
    [0x55, 0x6A, 0x58, 0x6E, 0x32, 0x72, 0x35, 0x75], // 556A586E32723575
    [0x34, 0x74, 0x37, 0x77, 0x21, 0x7A, 0x25, 0x43], // 34743777217A2543
    [0x41, 0x3F, 0x44, 0x28, 0x47, 0x2B, 0x4B, 0x62], // 413F4428472B4B62
    [0x48, 0x40, 0x4D, 0x63, 0x51, 0x66, 0x54, 0x6A], // 48404D635166546A
    [0x61, 0x4E, 0x64, 0x52, 0x67, 0x55, 0x6B, 0x58], // 614E645267556B58
    [0x65, 0x53, 0x68, 0x56, 0x6D, 0x59, 0x71, 0x33], // 655368566D597133
];

/// IV half used for split-form decoding before any request has been encoded
/// (`4B6250655368566D`). Not part of [`IV_TABLE`].
pub const INITIAL_IV_HALF: [u8; IV_HALF_LEN] = [0x4B, 0x62, 0x50, 0x65, 0x53, 0x68, 0x56, 0x6D];

/// Key and IV material for one side of the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConstants {
    /// Key used when producing envelopes.
    pub encrypt_key: [u8; KEY_LEN],
    /// Key used when opening envelopes.
    pub decrypt_key: [u8; KEY_LEN],
    /// Ordered IV half table.
    pub iv_table: [[u8; IV_HALF_LEN]; IV_TABLE_LEN],
    /// Fallback IV half before any encode has happened.
    pub initial_iv_half: [u8; IV_HALF_LEN],
}

impl ProtocolConstants {
    /// The client's view of the wire, as shipped in the mobile app.
    pub const UPSTREAM: Self = Self {
        encrypt_key: ENCRYPT_KEY,
        decrypt_key: DECRYPT_KEY,
        iv_table: IV_TABLE,
        initial_iv_half: INITIAL_IV_HALF,
    };

    /// The opposite side of the wire: encrypts with the key the client decrypts with,
    /// and vice versa.
    pub fn mirrored(&self) -> Self {
        Self {
            encrypt_key: self.decrypt_key,
            decrypt_key: self.encrypt_key,
            iv_table: self.iv_table,
            initial_iv_half: self.initial_iv_half,
        }
    }

    /// IV half at `index`, if the index is inside the table.
    pub fn iv_half(&self, index: usize) -> Option<[u8; IV_HALF_LEN]> {
        self.iv_table.get(index).copied()
    }
}

impl Default for ProtocolConstants {
    fn default() -> Self {
        Self::UPSTREAM
    }
}

/// Concatenate a table half and a nonce into a full IV.
pub fn join_iv(half: &[u8; IV_HALF_LEN], nonce: &[u8; IV_HALF_LEN]) -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    iv[..IV_HALF_LEN].copy_from_slice(half);
    iv[IV_HALF_LEN..].copy_from_slice(nonce);
    iv
}
