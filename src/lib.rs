pub mod convert;
pub mod error;
pub mod harness;
pub mod io;
pub mod region;

pub use convert::{
    ConversionStats, ConvertError, DumpEncoder, Encoded, Remaining, convert_file,
    convert_in_place, encode_dump, temp_path,
};
pub use error::Error;
pub use harness::{DumpSource, HarnessConfig, HarnessError, TestCase, TestKind};
pub use io::{
    EOF_RECORD, FormatError, MAX_RECORD_ADDRESS, MemoryWord, RawLine, Words, checksum,
    record_string,
};
pub use region::{HEADER_END, RegionPolicy};
