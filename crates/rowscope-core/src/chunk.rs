//! Adaptive page sizing.

use crate::config::PagingConfig;

/// Page size for a table with `total_rows` matching rows.
///
/// Thresholds are half-open: 1000 rows already gets 2000-row pages.
pub fn advise_chunk_size(total_rows: u64) -> u32 {
    match total_rows {
        0..=999 => 500,
        1_000..=9_999 => 2_000,
        10_000..=99_999 => 5_000,
        _ => 10_000,
    }
}

/// Chunk size to use after observing `total_rows`, honouring a fixed
/// override from configuration.
pub fn next_chunk_size(config: &PagingConfig, total_rows: u64) -> u32 {
    match config.chunk_size_override {
        Some(fixed) => fixed,
        None => advise_chunk_size(total_rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(advise_chunk_size(0), 500);
        assert_eq!(advise_chunk_size(999), 500);
        assert_eq!(advise_chunk_size(1_000), 2_000);
        assert_eq!(advise_chunk_size(9_999), 2_000);
        assert_eq!(advise_chunk_size(10_000), 5_000);
        assert_eq!(advise_chunk_size(99_999), 5_000);
        assert_eq!(advise_chunk_size(100_000), 10_000);
        assert_eq!(advise_chunk_size(u64::MAX), 10_000);
    }

    #[test]
    fn test_override_bypasses_advisor() {
        let config = PagingConfig::default().with_fixed_chunk_size(250);
        assert_eq!(next_chunk_size(&config, 0), 250);
        assert_eq!(next_chunk_size(&config, 1_000_000), 250);

        let config = PagingConfig::default();
        assert_eq!(next_chunk_size(&config, 50_000), 5_000);
    }
}
