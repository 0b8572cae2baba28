//! Per-version symbol tables for reading QR codes (model 2, versions 1–40).
//!
//! Rows are indexed by error-correction level in `L, M, Q, H` order,
//! columns by `version - 1`.

use super::ErrorCorrection;

/// Error-correction codewords in each block.
const ECC_CODEWORDS_PER_BLOCK: [[u8; 40]; 4] = [
    [
        7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

/// Number of error-correction blocks.
const NUM_BLOCKS: [[u8; 40]; 4] = [
    [
        1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

pub(super) fn ecc_codewords_per_block(version: usize, ec: ErrorCorrection) -> usize {
    usize::from(ECC_CODEWORDS_PER_BLOCK[ec.ordinal()][version - 1])
}

pub(super) fn num_blocks(version: usize, ec: ErrorCorrection) -> usize {
    usize::from(NUM_BLOCKS[ec.ordinal()][version - 1])
}

/// Side length in modules.
pub(super) fn symbol_size(version: usize) -> usize {
    17 + 4 * version
}

/// Modules left for codewords once every function pattern is placed,
/// including the remainder bits.
pub(super) fn raw_data_modules(version: usize) -> usize {
    let mut result = (16 * version + 128) * version + 64;
    if version >= 2 {
        let num_align = version / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if version >= 7 {
            result -= 36;
        }
    }
    result
}

/// Row/column centers of the alignment patterns, ascending.
pub(super) fn alignment_positions(version: usize) -> Vec<usize> {
    if version == 1 {
        return Vec::new();
    }
    let num_align = version / 7 + 2;
    let step = if version == 32 {
        26
    } else {
        (version * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
    };
    let mut positions = vec![6];
    let mut pos = symbol_size(version) - 7;
    for _ in 0..num_align - 1 {
        positions.insert(1, pos);
        pos -= step;
    }
    positions
}

/// Character count field width for a segment mode indicator.
pub(super) fn count_bits(mode: u32, version: usize) -> Option<u32> {
    let column = match version {
        1..=9 => 0,
        10..=26 => 1,
        _ => 2,
    };
    let widths: [u32; 3] = match mode {
        0b0001 => [10, 12, 14],
        0b0010 => [9, 11, 13],
        0b0100 => [8, 16, 16],
        0b1000 => [8, 10, 12],
        _ => return None,
    };
    Some(widths[column])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_one_has_26_codewords() {
        assert_eq!(raw_data_modules(1) / 8, 26);
        assert_eq!(symbol_size(1), 21);
    }

    #[test]
    fn codeword_totals_match_known_capacities() {
        // total codewords per version from the symbol capacity table
        assert_eq!(raw_data_modules(7) / 8, 196);
        assert_eq!(raw_data_modules(10) / 8, 346);
        assert_eq!(raw_data_modules(40) / 8, 3706);
    }

    #[test]
    fn alignment_positions_match_reference() {
        assert!(alignment_positions(1).is_empty());
        assert_eq!(alignment_positions(2), vec![6, 18]);
        assert_eq!(alignment_positions(7), vec![6, 22, 38]);
        assert_eq!(alignment_positions(15), vec![6, 26, 48, 70]);
        assert_eq!(alignment_positions(32), vec![6, 34, 60, 86, 112, 138]);
        assert_eq!(alignment_positions(40), vec![6, 30, 58, 86, 114, 142, 170]);
    }

    #[test]
    fn blocks_divide_codewords() {
        for version in 1..=40 {
            for ec in [
                ErrorCorrection::L,
                ErrorCorrection::M,
                ErrorCorrection::Q,
                ErrorCorrection::H,
            ] {
                let raw = raw_data_modules(version) / 8;
                let blocks = num_blocks(version, ec);
                let ecc = ecc_codewords_per_block(version, ec);
                assert!(raw / blocks > ecc, "v{version} {ec:?} leaves no data");
            }
        }
    }

    #[test]
    fn count_bits_by_version_range() {
        assert_eq!(count_bits(0b0100, 1), Some(8));
        assert_eq!(count_bits(0b0100, 10), Some(16));
        assert_eq!(count_bits(0b0001, 27), Some(14));
        assert_eq!(count_bits(0b0111, 1), None);
    }
}
