use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use crate::io::{EOF_RECORD, FormatError, RawLine, WORD_CHARS, address_fits, push_record};
use crate::region::RegionPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionStats {
    pub lines: usize,
    pub words: usize,
    pub records: usize,
    pub suppressed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub data: Vec<u8>,
    pub stats: ConversionStats,
}

/// File left on disk after a failed conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remaining {
    Original(PathBuf),
    Temporary(PathBuf),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("temporary path {} is not distinct from {}", temp.display(), path.display())]
    TempCollision { path: PathBuf, temp: PathBuf },

    #[error("failed to write {}: {source}", temp.display())]
    WriteTemp {
        path: PathBuf,
        temp: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove {}: {source}", path.display())]
    RemoveSource {
        path: PathBuf,
        temp: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to rename {} to {}: {source}", temp.display(), dest.display())]
    Rename {
        temp: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub fn remaining(&self) -> Remaining {
        match self {
            ConvertError::Read { path, .. }
            | ConvertError::Format { path, .. }
            | ConvertError::TempCollision { path, .. }
            | ConvertError::WriteTemp { path, .. }
            | ConvertError::RemoveSource { path, .. } => Remaining::Original(path.clone()),
            ConvertError::Rename { temp, .. } => Remaining::Temporary(temp.clone()),
        }
    }
}

/// Streaming encoder: feed dump rows in order, then `finish`.
#[derive(Debug)]
pub struct DumpEncoder {
    policy: RegionPolicy,
    address: u32,
    output: Vec<u8>,
    stats: ConversionStats,
}

impl DumpEncoder {
    pub fn new(policy: RegionPolicy) -> Self {
        Self {
            policy,
            address: policy.start_address(),
            output: Vec::new(),
            stats: ConversionStats::default(),
        }
    }

    /// Byte address the next word will be assigned.
    pub fn next_address(&self) -> u32 {
        self.address
    }

    /// Encode one row (terminator already stripped). Nothing is appended
    /// when the row is malformed.
    pub fn push_line(&mut self, text: &str) -> Result<(), FormatError> {
        self.stats.lines += 1;
        let line = RawLine::parse(text, self.stats.lines)?;
        self.push_words(line)
    }

    /// Byte form of [`push_line`](Self::push_line) for rows read straight
    /// from a file.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        self.stats.lines += 1;
        let line = RawLine::parse_bytes(bytes, self.stats.lines)?;
        self.push_words(line)
    }

    fn push_words(&mut self, line: RawLine<'_>) -> Result<(), FormatError> {
        let mark = (self.output.len(), self.address, self.stats);
        self.output.reserve(line.word_count() * (WORD_CHARS + 12));

        for word in line.words() {
            let emit = !self.policy.suppresses(self.address) && !word.is_zero();
            if emit && !address_fits(self.address) {
                let address = self.address;
                (self.address, self.stats) = (mark.1, mark.2);
                self.output.truncate(mark.0);
                return Err(FormatError::AddressOverflow {
                    line: self.stats.lines,
                    address,
                });
            }

            if emit && push_record(&mut self.output, self.address, &word) {
                self.stats.records += 1;
            } else {
                self.stats.suppressed += 1;
            }
            self.stats.words += 1;
            self.address = self.address.wrapping_add(4);
        }
        Ok(())
    }

    pub fn finish(mut self) -> Encoded {
        self.output.extend_from_slice(EOF_RECORD.as_bytes());
        Encoded {
            data: self.output,
            stats: self.stats,
        }
    }
}

/// Encode a whole dump held in memory.
pub fn encode_dump(input: &str, policy: RegionPolicy) -> Result<Encoded, FormatError> {
    let mut encoder = DumpEncoder::new(policy);
    for line in input.lines() {
        encoder.push_line(line)?;
    }
    Ok(encoder.finish())
}

/// Path the encoded output is staged at before replacing `dest`:
/// `dir/stem.ext` becomes `dir/stem_clean.ext`.
pub fn temp_path(dest: &Path) -> PathBuf {
    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{stem}_clean");
    if let Some(ext) = dest.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    dest.with_file_name(name)
}

/// Encode `source` and replace it with the result at `dest`.
///
/// The output is staged at [`temp_path`]`(dest)`, then `source` is removed
/// and the staged file renamed onto `dest`.
pub fn convert_file(
    source: &Path,
    policy: RegionPolicy,
    dest: &Path,
) -> Result<ConversionStats, ConvertError> {
    let temp = temp_path(dest);
    if same_path(&temp, source) || same_path(&temp, dest) {
        return Err(ConvertError::TempCollision {
            path: source.to_path_buf(),
            temp,
        });
    }

    let encoded = read_and_encode(source, policy)?;
    debug!(
        "{}: {} lines, {} words, {} records, {} suppressed",
        source.display(),
        encoded.stats.lines,
        encoded.stats.words,
        encoded.stats.records,
        encoded.stats.suppressed
    );

    if let Err(source_err) = write_temp(&temp, &encoded.data) {
        discard_temp(&temp);
        return Err(ConvertError::WriteTemp {
            path: source.to_path_buf(),
            temp,
            source: source_err,
        });
    }

    if let Err(source_err) = std::fs::remove_file(source) {
        discard_temp(&temp);
        return Err(ConvertError::RemoveSource {
            path: source.to_path_buf(),
            temp,
            source: source_err,
        });
    }

    std::fs::rename(&temp, dest).map_err(|source_err| ConvertError::Rename {
        temp: temp.clone(),
        dest: dest.to_path_buf(),
        source: source_err,
    })?;

    info!("converted {} ({:?})", dest.display(), policy);
    Ok(encoded.stats)
}

pub fn convert_in_place(path: &Path, policy: RegionPolicy) -> Result<ConversionStats, ConvertError> {
    convert_file(path, policy, path)
}

fn read_and_encode(path: &Path, policy: RegionPolicy) -> Result<Encoded, ConvertError> {
    let read_err = |source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = BufReader::new(File::open(path).map_err(read_err)?);
    let mut encoder = DumpEncoder::new(policy);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(read_err)? == 0 {
            break;
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        encoder
            .push_bytes(line)
            .map_err(|source| ConvertError::Format {
                path: path.to_path_buf(),
                source,
            })?;
    }

    Ok(encoder.finish())
}

// Lexical match, or the same location once parent directories are resolved.
fn same_path(a: &Path, b: &Path) -> bool {
    a == b || matches!((resolved(a), resolved(b)), (Some(x), Some(y)) if x == y)
}

fn resolved(path: &Path) -> Option<PathBuf> {
    if let Ok(full) = path.canonicalize() {
        return Some(full);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|p| p.join(name))
}

fn write_temp(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()
}

fn discard_temp(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!("could not remove {}: {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(encoded: &Encoded) -> Vec<String> {
        String::from_utf8(encoded.data.clone())
            .unwrap()
            .split('\n')
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_offset_start_first_word_at_0x200() {
        let encoded = encode_dump("0000000200000001\n", RegionPolicy::OffsetStart).unwrap();
        assert_eq!(
            lines(&encoded),
            vec![
                ":04008000000000017b",
                ":040081000000000279",
                ":00000001FF",
            ]
        );
    }

    #[test]
    fn test_header_skip_drops_low_addresses() {
        // 64 rows of two words cover 0x000..0x1FC; the next row starts at 0x200.
        let mut input = String::new();
        for _ in 0..64 {
            input.push_str("1111111122222222\n");
        }
        input.push_str("0000000000000013\n");
        let encoded = encode_dump(&input, RegionPolicy::HeaderSkip).unwrap();
        assert_eq!(
            lines(&encoded),
            vec![":040080000000001369", ":00000001FF"]
        );
        assert_eq!(encoded.stats.words, 130);
        assert_eq!(encoded.stats.records, 1);
        assert_eq!(encoded.stats.suppressed, 129);
    }

    #[test]
    fn test_zero_words_suppressed_address_advances() {
        let encoded = encode_dump(
            "0000000000000001\n0000000500000000\n",
            RegionPolicy::OffsetStart,
        )
        .unwrap();
        let out = lines(&encoded);
        assert_eq!(out.len(), 3);
        assert!(out[0].starts_with(":04008000"));
        assert!(out[1].starts_with(":04008300"));
        assert_eq!(out[2], EOF_RECORD);
    }

    #[test]
    fn test_eof_only_once_without_newline() {
        let encoded = encode_dump("", RegionPolicy::HeaderSkip).unwrap();
        assert_eq!(encoded.data, EOF_RECORD.as_bytes());

        let encoded = encode_dump("00000001\n", RegionPolicy::OffsetStart).unwrap();
        let text = String::from_utf8(encoded.data).unwrap();
        assert!(text.ends_with(":00000001FF"));
        assert_eq!(text.matches(EOF_RECORD).count(), 1);
    }

    #[test]
    fn test_crlf_and_missing_final_newline() {
        let a = encode_dump("00000001\r\n00000002", RegionPolicy::OffsetStart).unwrap();
        let b = encode_dump("00000001\n00000002\n", RegionPolicy::OffsetStart).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_format_error_reports_line() {
        let err = encode_dump("00000001\n0000001\n", RegionPolicy::OffsetStart).unwrap_err();
        assert_eq!(
            err,
            FormatError::InvalidWordLength {
                line: 2,
                length: 7
            }
        );
    }

    #[test]
    fn test_malformed_line_appends_nothing() {
        let mut encoder = DumpEncoder::new(RegionPolicy::OffsetStart);
        assert!(encoder.push_line("00000001zz000000").is_err());
        assert_eq!(encoder.next_address(), 0x200);
        let encoded = encoder.finish();
        assert_eq!(encoded.data, EOF_RECORD.as_bytes());
    }

    #[test]
    fn test_last_word_index_is_encoded() {
        // 0x3FFFC is word index 0xFFFF: 0xFF80 words after the 0x200 start.
        let mut input = "00000000\n".repeat(0xFF7F);
        input.push_str("00000001\n");
        let encoded = encode_dump(&input, RegionPolicy::OffsetStart).unwrap();
        assert_eq!(
            lines(&encoded),
            vec![":04ffff0000000001fd", ":00000001FF"]
        );
    }

    #[test]
    fn test_address_overflow_rejected() {
        let mut encoder = DumpEncoder::new(RegionPolicy::OffsetStart);
        for _ in 0..0xFF80 {
            encoder.push_line("00000000").unwrap();
        }
        assert_eq!(encoder.next_address(), 0x4_0000);
        let err = encoder.push_line("0000000100000000").unwrap_err();
        assert_eq!(
            err,
            FormatError::AddressOverflow {
                line: 0xFF81,
                address: 0x4_0004
            }
        );
        assert_eq!(encoder.next_address(), 0x4_0000);
        assert_eq!(encoder.finish().data, EOF_RECORD.as_bytes());
    }

    #[test]
    fn test_zero_words_past_address_field_allowed() {
        let mut input = "00000000\n".repeat(0x1_0000);
        input.push_str("0000000000000000\n");
        let encoded = encode_dump(&input, RegionPolicy::HeaderSkip).unwrap();
        assert_eq!(encoded.data, EOF_RECORD.as_bytes());
        assert_eq!(encoded.stats.words, 0x1_0002);
    }

    #[test]
    fn test_temp_path() {
        assert_eq!(
            temp_path(Path::new("./meminit.hex")),
            PathBuf::from("./meminit_clean.hex")
        );
        assert_eq!(
            temp_path(Path::new("dir/add_spike.hex")),
            PathBuf::from("dir/add_spike_clean.hex")
        );
        assert_eq!(temp_path(Path::new("dump")), PathBuf::from("dump_clean"));
    }

    #[test]
    fn test_remaining() {
        let err = ConvertError::Rename {
            temp: PathBuf::from("a_clean.hex"),
            dest: PathBuf::from("a.hex"),
            source: std::io::Error::other("boom"),
        };
        assert_eq!(
            err.remaining(),
            Remaining::Temporary(PathBuf::from("a_clean.hex"))
        );
    }
}
