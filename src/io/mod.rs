mod error;
mod file;
mod reader;
mod record;
mod writer;

pub use error::{AddressError, ParseError, RecordError};
pub use file::{read_hex_file, write_atomically};
pub use reader::{BaseAddress, BlockReader, Blocks, parse_blocks, read_blocks};
pub use record::{Record, RecordType, START_CODE, checksum};
pub use writer::{BYTES_PER_LINE, write_intel_hex};
