//! # huffpress
//!
//! Lossless byte-stream compression with a Huffman prefix code.
//!
//! An encoded artifact is a text header line listing `byte frequency` pairs
//! followed by the packed code bits of every source byte and a closing
//! end-of-data code. The decoder rebuilds the same tree from the header.
//!
//! ```
//! let packed = huffpress::encode_bytes(b"abracadabra")?;
//! assert_eq!(huffpress::decode_bytes(&packed)?, b"abracadabra");
//! # Ok::<(), huffpress::HuffError>(())
//! ```

pub mod bit_stream;
pub mod code_table;
pub mod codec;
pub mod error;
pub mod freq;
pub mod header;
pub mod min_pq;
pub mod tree;

pub use code_table::{Code, CodeTable};
pub use codec::{Summary, decode, decode_bytes, decode_file, encode, encode_bytes, encode_file};
pub use error::{HuffError, Result};
pub use freq::FrequencyTable;
pub use tree::HuffTree;
