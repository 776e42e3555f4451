/// Byte address below which the simulation dump holds the loader preamble.
pub const HEADER_END: u32 = 0x200;

/// Address bookkeeping rules for one class of input dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionPolicy {
    /// Counter starts at 0; records below [`HEADER_END`] are dropped.
    HeaderSkip,
    /// Counter starts at [`HEADER_END`]; nothing is dropped by address.
    OffsetStart,
}

impl RegionPolicy {
    pub fn start_address(self) -> u32 {
        match self {
            RegionPolicy::HeaderSkip => 0,
            RegionPolicy::OffsetStart => HEADER_END,
        }
    }

    pub fn suppresses(self, address: u32) -> bool {
        match self {
            RegionPolicy::HeaderSkip => address < HEADER_END,
            RegionPolicy::OffsetStart => false,
        }
    }
}
