use std::io::{self, Read};

/// Number of distinct byte values.
pub const SYMBOLS: usize = 256;

/// Byte value whose code doubles as the end-of-data marker.
pub const SENTINEL: u8 = 0;

const READ_CHUNK: usize = 8 * 1024;

/// Occurrence count for every byte value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOLS],
}

impl FrequencyTable {
    pub fn from_counts(counts: [u64; SYMBOLS]) -> Self {
        FrequencyTable { counts }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; SYMBOLS];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        FrequencyTable { counts }
    }

    /// Counts every byte the reader yields until EOF.
    pub fn from_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut counts = [0u64; SYMBOLS];
        let mut buf = [0u8; READ_CHUNK];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            for &byte in &buf[..n] {
                counts[byte as usize] += 1;
            }
        }
        Ok(FrequencyTable { counts })
    }

    /// Adds the one synthetic occurrence of [`SENTINEL`] that terminates
    /// every coded body.
    pub fn with_sentinel(mut self) -> Self {
        self.counts[SENTINEL as usize] += 1;
        self
    }

    /// Inverse of [`with_sentinel`](Self::with_sentinel); `None` when the
    /// table has no sentinel occurrence to remove.
    pub fn without_sentinel(&self) -> Option<Self> {
        let mut counts = self.counts;
        counts[SENTINEL as usize] = counts[SENTINEL as usize].checked_sub(1)?;
        Some(FrequencyTable { counts })
    }

    pub fn get(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// `(byte, count)` for every byte with a nonzero count, ascending by byte.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(byte, &count)| (byte as u8, count))
    }

    /// Number of byte values that occur at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Sum of all counts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0u64, |acc, &c| acc.saturating_add(c))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        FrequencyTable {
            counts: [0; SYMBOLS],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn counts_each_byte() {
        let table = FrequencyTable::from_bytes(b"aaabbc");
        assert_eq!(table.get(b'a'), 3);
        assert_eq!(table.get(b'b'), 2);
        assert_eq!(table.get(b'c'), 1);
        assert_eq!(table.get(b'd'), 0);
        assert_eq!(table.distinct(), 3);
        assert_eq!(table.total(), 6);
    }

    #[test]
    fn reader_matches_slice_counting() {
        let data: Vec<u8> = (0..20_000u32).map(|i| (i * 7 % 251) as u8).collect();
        let from_reader = FrequencyTable::from_reader(&mut Cursor::new(&data)).unwrap();
        assert_eq!(from_reader, FrequencyTable::from_bytes(&data));
    }

    #[test]
    fn sentinel_round_trip() {
        let table = FrequencyTable::from_bytes(b"\0xy").with_sentinel();
        assert_eq!(table.get(SENTINEL), 2);
        let real = table.without_sentinel().unwrap();
        assert_eq!(real.get(SENTINEL), 1);
        assert!(FrequencyTable::default().without_sentinel().is_none());
    }

    #[test]
    fn total_saturates() {
        let mut counts = [0u64; SYMBOLS];
        counts[1] = u64::MAX;
        counts[2] = 5;
        assert_eq!(FrequencyTable::from_counts(counts).total(), u64::MAX);
    }

    #[test]
    fn iter_is_ascending_and_skips_zeros() {
        let table = FrequencyTable::from_bytes(b"zay");
        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(pairs, vec![(b'a', 1), (b'y', 1), (b'z', 1)]);
    }
}
