//! Huffman compression of text into a self-describing container.
//!
//! ```
//! use huffman_text_coding::{Separator, compress, decompress};
//!
//! let separator = Separator::default();
//! let packed = compress("abracadabra", &separator)?;
//! assert_eq!(decompress(&packed, &separator)?, "abracadabra");
//! # Ok::<(), huffman_text_coding::HuffmanError>(())
//! ```
//!
//! A container is the escaped code table as text, one line feed, then the
//! bit-packed payload. The payload ends with the code of a NUL marker, so
//! the decoder needs no length field.

pub mod bits;
pub mod codes;
pub mod container;
pub mod error;
pub mod file;
pub mod heap;
pub mod stats;
pub mod tree;

/// One unit of the input alphabet.
pub type Symbol = char;

/// End-of-message marker appended to every text before encoding.
pub const SENTINEL: Symbol = '\0';

pub use codes::CodeTable;
pub use container::{Separator, compress, decompress};
pub use error::{HuffmanError, Result};
pub use file::{compress_file, decompress_file};
pub use stats::CompressionReport;
pub use tree::CodeTree;
