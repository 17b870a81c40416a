/// Errors produced while decoding hex text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum HexError {
    /// The input was not exactly [`HEX_LEN`](crate::HEX_LEN) bytes long.
    #[error("invalid hex length: {len}")]
    InvalidLength {
        /// Length of the rejected input.
        len: usize,
    },

    /// The input contained a byte outside `[0-9a-fA-F]`.
    #[error("invalid hex byte {byte:#04x} at index {index}")]
    InvalidByte {
        /// The offending byte.
        byte: u8,
        /// Its position in the input.
        index: usize,
    },
}
