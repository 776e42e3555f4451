use super::MemoryWord;

/// Fixed terminating record, written without a trailing newline.
pub const EOF_RECORD: &str = ":00000001FF";

/// Highest byte address a data record can carry: the 16-bit address field
/// holds the word index `address / 4`.
pub const MAX_RECORD_ADDRESS: u32 = 0xFFFF * 4;

const RECORD_DATA: u8 = 0x00;
const DATA_LEN: u8 = 4;

/// Two's-complement checksum of a 4-byte data record at byte address `address`.
///
/// Only the low 16 bits of the word index take part in the sum.
pub fn checksum(data: u32, address: u32) -> u8 {
    let [addr_hi, addr_lo] = ((address / 4) as u16).to_be_bytes();

    let mut sum = DATA_LEN;
    sum = sum.wrapping_add(addr_hi);
    sum = sum.wrapping_add(addr_lo);
    sum = sum.wrapping_add(RECORD_DATA);
    for b in data.to_le_bytes() {
        sum = sum.wrapping_add(b);
    }
    (!sum).wrapping_add(1)
}

/// Whether `address` fits the record address field.
pub fn address_fits(address: u32) -> bool {
    address <= MAX_RECORD_ADDRESS
}

/// Append the data record for `word` at byte address `address`.
/// All-zero words produce nothing; returns whether a record was written.
///
/// Addresses past [`MAX_RECORD_ADDRESS`] are never written; callers that
/// must not lose data check [`address_fits`] first.
pub fn push_record(output: &mut Vec<u8>, address: u32, word: &MemoryWord<'_>) -> bool {
    if word.is_zero() || !address_fits(address) {
        return false;
    }

    let [index_hi, index_lo] = ((address / 4) as u16).to_be_bytes();
    output.push(b':');
    push_hex_byte(output, DATA_LEN);
    push_hex_byte(output, index_hi);
    push_hex_byte(output, index_lo);
    push_hex_byte(output, RECORD_DATA);
    output.extend_from_slice(word.text.as_bytes());
    push_hex_byte(output, checksum(word.value, address));
    output.push(b'\n');
    true
}

/// Single-record convenience form of [`push_record`].
pub fn record_string(address: u32, word: &MemoryWord<'_>) -> Option<String> {
    let mut output = Vec::with_capacity(22);
    if !push_record(&mut output, address, word) {
        return None;
    }
    String::from_utf8(output).ok()
}

const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

fn push_hex_byte(output: &mut Vec<u8>, byte: u8) {
    output.push(HEX_CHARS[(byte >> 4) as usize]);
    output.push(HEX_CHARS[(byte & 0x0F) as usize]);
}
