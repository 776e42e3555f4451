mod error;
mod raw_dump;
mod record;

pub use error::FormatError;
pub use raw_dump::{MemoryWord, RawLine, WORD_CHARS, Words};
pub use record::{
    EOF_RECORD, MAX_RECORD_ADDRESS, address_fits, checksum, push_record, record_string,
};
