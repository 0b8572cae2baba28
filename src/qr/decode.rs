//! Grid sampling and payload decoding for a located symbol.
//!
//! Given three finder centers, the module grid is sampled for a few
//! candidate versions around the one implied by the finder spacing. A
//! candidate is accepted when its format information matches a BCH code
//! word, every block's Reed–Solomon syndromes are zero, and the segments
//! parse into a non-empty payload.

use super::ErrorCorrection;
use super::detect::{BitMatrix, FinderTriple};
use super::tables;

/// Format words may differ from a valid code word in this many bits.
const MAX_FORMAT_ERRORS: u32 = 3;

const ALPHANUMERIC: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Sampled module grid, `true` for dark.
struct Grid {
    size: usize,
    modules: Vec<bool>,
}

impl Grid {
    fn get(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.size + x]
    }
}

pub(super) fn decode_symbol(m: &BitMatrix, triple: &FinderTriple) -> Option<String> {
    let estimate = estimate_version(triple);
    let mut candidates = vec![estimate];
    for delta in [1, 2] {
        candidates.push(estimate - delta);
        candidates.push(estimate + delta);
    }

    for version in candidates.into_iter().filter(|v| (1..=40).contains(v)) {
        let version = version as usize;
        let grid = sample(m, triple, version);
        let Some((ec, mask)) = read_format(&grid) else {
            continue;
        };
        let codewords = read_codewords(&grid, version, mask);
        let Some(data) = split_blocks(&codewords, version, ec) else {
            log::debug!("version {version} {ec:?}: Reed-Solomon check failed");
            continue;
        };
        let Some(bytes) = parse_segments(&data, version) else {
            continue;
        };
        if bytes.is_empty() {
            continue;
        }
        log::debug!("decoded version {version} {ec:?} mask {mask}: {} bytes", bytes.len());
        return Some(bytes_to_text(bytes));
    }
    None
}

fn estimate_version(t: &FinderTriple) -> i64 {
    let module = (t.top_left.module + t.top_right.module + t.bottom_left.module) / 3.0;
    let span = |ax: f32, ay: f32, bx: f32, by: f32| ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
    let across = span(t.top_left.x, t.top_left.y, t.top_right.x, t.top_right.y);
    let down = span(t.top_left.x, t.top_left.y, t.bottom_left.x, t.bottom_left.y);
    // finder centers sit 3.5 modules in from each edge
    let size = (across + down) / 2.0 / module + 7.0;
    ((size - 17.0) / 4.0).round() as i64
}

fn sample(m: &BitMatrix, t: &FinderTriple, version: usize) -> Grid {
    let size = tables::symbol_size(version);
    let span = (size - 7) as f32;
    let (ax, ay) = (t.top_left.x, t.top_left.y);
    let (rx, ry) = ((t.top_right.x - ax) / span, (t.top_right.y - ay) / span);
    let (dx, dy) = ((t.bottom_left.x - ax) / span, (t.bottom_left.y - ay) / span);

    let mut modules = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            // the top-left finder center is the center of module (3, 3)
            let (c, r) = (col as f32 - 3.0, row as f32 - 3.0);
            let x = ax + c * rx + r * dx;
            let y = ay + c * ry + r * dy;
            modules.push(m.is_dark(x.floor() as i64, y.floor() as i64));
        }
    }
    Grid { size, modules }
}

fn format_word(ec: ErrorCorrection, mask: u8) -> u32 {
    let data = (ec.format_bits() << 3) | u32::from(mask);
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    ((data << 10) | rem) ^ 0x5412
}

/// Both copies of the 15-bit format information, bit 0 first.
fn format_copies(grid: &Grid) -> (u32, u32) {
    let size = grid.size;
    let mut positions_a: Vec<(usize, usize)> = (0..=5).map(|i| (8, i)).collect();
    positions_a.extend([(8, 7), (8, 8), (7, 8)]);
    positions_a.extend((9..15).map(|i| (14 - i, 8)));

    let mut positions_b: Vec<(usize, usize)> = (0..8).map(|i| (size - 1 - i, 8)).collect();
    positions_b.extend((8..15).map(|i| (8, size - 15 + i)));

    let read = |positions: &[(usize, usize)]| {
        positions
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &(x, y))| acc | (u32::from(grid.get(x, y)) << i))
    };
    (read(&positions_a), read(&positions_b))
}

fn read_format(grid: &Grid) -> Option<(ErrorCorrection, u8)> {
    let (a, b) = format_copies(grid);
    let mut best: Option<(u32, ErrorCorrection, u8)> = None;
    for ec in [
        ErrorCorrection::L,
        ErrorCorrection::M,
        ErrorCorrection::Q,
        ErrorCorrection::H,
    ] {
        for mask in 0..8u8 {
            let word = format_word(ec, mask);
            let distance = (word ^ a).count_ones().min((word ^ b).count_ones());
            if best.is_none_or(|(d, _, _)| distance < d) {
                best = Some((distance, ec, mask));
            }
        }
    }
    best.filter(|(d, _, _)| *d <= MAX_FORMAT_ERRORS)
        .map(|(_, ec, mask)| (ec, mask))
}

/// Modules that carry finder, timing, alignment, format or version
/// patterns rather than data.
fn function_modules(version: usize) -> Vec<bool> {
    let size = tables::symbol_size(version);
    let mut function = vec![false; size * size];
    let mut mark = |x: usize, y: usize| {
        function[y * size + x] = true;
    };

    for i in 0..size {
        mark(6, i);
        mark(i, 6);
    }
    // finders with their separators and format areas
    for i in 0..9 {
        for j in 0..9 {
            mark(i, j);
        }
        for j in 0..8 {
            mark(size - 8 + j, i);
            mark(i, size - 8 + j);
        }
    }
    let positions = tables::alignment_positions(version);
    let last = positions.len().saturating_sub(1);
    for (i, &cy) in positions.iter().enumerate() {
        for (j, &cx) in positions.iter().enumerate() {
            let on_finder = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
            if on_finder {
                continue;
            }
            for dy in 0..5 {
                for dx in 0..5 {
                    mark(cx + dx - 2, cy + dy - 2);
                }
            }
        }
    }
    if version >= 7 {
        for i in 0..18 {
            let (a, b) = (size - 11 + i % 3, i / 3);
            mark(a, b);
            mark(b, a);
        }
    }
    function
}

fn mask_bit(mask: u8, x: usize, y: usize) -> bool {
    match mask {
        0 => (x + y) % 2 == 0,
        1 => y % 2 == 0,
        2 => x % 3 == 0,
        3 => (x + y) % 3 == 0,
        4 => (x / 3 + y / 2) % 2 == 0,
        5 => x * y % 2 + x * y % 3 == 0,
        6 => (x * y % 2 + x * y % 3) % 2 == 0,
        _ => ((x + y) % 2 + x * y % 3) % 2 == 0,
    }
}

/// Unmasked codewords in placement order, remainder bits dropped.
fn read_codewords(grid: &Grid, version: usize, mask: u8) -> Vec<u8> {
    let size = grid.size;
    let function = function_modules(version);
    let total = tables::raw_data_modules(version) / 8;
    let mut codewords = vec![0u8; total];
    let mut bit = 0;

    let mut right = size as i64 - 1;
    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        let upward = ((right + 1) & 2) == 0;
        for vert in 0..size {
            for j in 0..2 {
                let x = (right - j) as usize;
                let y = if upward { size - 1 - vert } else { vert };
                if function[y * size + x] || bit >= total * 8 {
                    continue;
                }
                if grid.get(x, y) ^ mask_bit(mask, x, y) {
                    codewords[bit / 8] |= 0x80 >> (bit % 8);
                }
                bit += 1;
            }
        }
        right -= 2;
    }
    codewords
}

fn gf_mul(x: u8, y: u8) -> u8 {
    let mut z: u32 = 0;
    for i in (0..8).rev() {
        z = (z << 1) ^ ((z >> 7) * 0x11d);
        z ^= ((u32::from(y) >> i) & 1) * u32::from(x);
    }
    z as u8
}

/// Whether `block` (data then ECC, highest coefficient first) evaluates to
/// zero at every root of the generator polynomial.
fn syndromes_clear(block: &[u8], ecc_len: usize) -> bool {
    let mut root = 1u8;
    for _ in 0..ecc_len {
        let value = block.iter().fold(0u8, |acc, &b| gf_mul(acc, root) ^ b);
        if value != 0 {
            return false;
        }
        root = gf_mul(root, 0x02);
    }
    true
}

/// De-interleave codewords into blocks and return the data codewords.
fn split_blocks(codewords: &[u8], version: usize, ec: ErrorCorrection) -> Option<Vec<u8>> {
    let num_blocks = tables::num_blocks(version, ec);
    let ecc_len = tables::ecc_codewords_per_block(version, ec);
    let raw = codewords.len();
    let short_blocks = num_blocks - raw % num_blocks;
    let short_len = raw / num_blocks;

    // short blocks hold one fewer data codeword; that slot is skipped
    let skipped = short_len - ecc_len;
    let mut blocks = vec![Vec::with_capacity(short_len + 1); num_blocks];
    let mut stream = codewords.iter();
    for i in 0..=short_len {
        for (j, block) in blocks.iter_mut().enumerate() {
            if i == skipped && j < short_blocks {
                continue;
            }
            block.push(*stream.next()?);
        }
    }

    let mut data = Vec::with_capacity(raw);
    for block in &blocks {
        if !syndromes_clear(block, ecc_len) {
            return None;
        }
        data.extend_from_slice(&block[..block.len() - ecc_len]);
    }
    Some(data)
}

struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl BitReader<'_> {
    fn remaining(&self) -> usize {
        self.data.len() * 8 - self.position
    }

    fn read(&mut self, bits: u32) -> Option<u32> {
        if bits as usize > self.remaining() {
            return None;
        }
        let mut value = 0;
        for _ in 0..bits {
            let byte = self.data[self.position / 8];
            let bit = (byte >> (7 - self.position % 8)) & 1;
            value = (value << 1) | u32::from(bit);
            self.position += 1;
        }
        Some(value)
    }
}

/// Concatenated segment bytes. Kanji segments yield their Shift JIS byte
/// pairs, which are also how multi-byte UTF-8 text can end up encoded.
fn parse_segments(data: &[u8], version: usize) -> Option<Vec<u8>> {
    let mut reader = BitReader { data, position: 0 };
    let mut out = Vec::new();

    while reader.remaining() >= 4 {
        let mode = reader.read(4)?;
        match mode {
            0b0000 => break,
            0b0001 => {
                let mut count = reader.read(tables::count_bits(mode, version)?)?;
                while count > 0 {
                    let (digits, bits) = match count {
                        1 => (1, 4),
                        2 => (2, 7),
                        _ => (3, 10),
                    };
                    let value = reader.read(bits)?;
                    let text = format!("{value:0width$}", width = digits as usize);
                    if text.len() != digits as usize {
                        return None;
                    }
                    out.extend_from_slice(text.as_bytes());
                    count -= digits;
                }
            }
            0b0010 => {
                let mut count = reader.read(tables::count_bits(mode, version)?)?;
                while count >= 2 {
                    let value = reader.read(11)? as usize;
                    out.push(*ALPHANUMERIC.get(value / 45)?);
                    out.push(*ALPHANUMERIC.get(value % 45)?);
                    count -= 2;
                }
                if count == 1 {
                    out.push(*ALPHANUMERIC.get(reader.read(6)? as usize)?);
                }
            }
            0b0100 => {
                let count = reader.read(tables::count_bits(mode, version)?)?;
                for _ in 0..count {
                    out.push(reader.read(8)? as u8);
                }
            }
            0b1000 => {
                let count = reader.read(tables::count_bits(mode, version)?)?;
                for _ in 0..count {
                    let value = reader.read(13)?;
                    let packed = ((value / 0xc0) << 8) | (value % 0xc0);
                    let code = if (packed >> 8) < 0x1f {
                        packed + 0x8140
                    } else {
                        packed + 0xc140
                    };
                    out.extend_from_slice(&(code as u16).to_be_bytes());
                }
            }
            0b0111 => {
                // ECI designator: 1, 2 or 3 bytes by prefix; text is read as UTF-8 regardless
                let first = reader.read(8)?;
                if first & 0x80 == 0x80 {
                    let extra = if first & 0xc0 == 0x80 { 8 } else { 16 };
                    reader.read(extra)?;
                }
            }
            0b0011 => {
                // structured append: sequence and parity, ignored
                reader.read(16)?;
            }
            0b0101 => {}
            0b1001 => {
                reader.read(8)?;
            }
            _ => return None,
        }
    }
    Some(out)
}

/// UTF-8 when valid, otherwise ISO 8859-1.
fn bytes_to_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_words_match_reference_values() {
        // level M, mask 0 and level L, mask 4 from the format information table
        assert_eq!(format_word(ErrorCorrection::M, 0), 0b101010000010010);
        assert_eq!(format_word(ErrorCorrection::L, 4), 0b110011000101111);
    }

    #[test]
    fn function_modules_leave_room_for_data() {
        for version in [1, 2, 6, 7, 14, 40] {
            let free = function_modules(version).iter().filter(|f| !**f).count();
            assert_eq!(free, tables::raw_data_modules(version), "version {version}");
        }
    }

    #[test]
    fn gf_mul_basics() {
        assert_eq!(gf_mul(0, 0x53), 0);
        assert_eq!(gf_mul(1, 0x53), 0x53);
        assert_eq!(gf_mul(0x80, 0x02), 0x1d);
    }

    #[test]
    fn syndromes_detect_corruption() {
        // "01234567" at version 1-M: data codewords and their ECC
        let mut block = vec![
            0x10, 0x20, 0x0c, 0x56, 0x61, 0x80, 0xec, 0x11, 0xec, 0x11, 0xec, 0x11, 0xec, 0x11,
            0xec, 0x11, 0xa5, 0x24, 0xd4, 0xc1, 0xed, 0x36, 0xc7, 0x87, 0x2c, 0x55,
        ];
        assert!(syndromes_clear(&block, 10));
        block[3] ^= 0x01;
        assert!(!syndromes_clear(&block, 10));
    }

    #[test]
    fn parses_mixed_segments() {
        // numeric "01234567" in version 1
        let data = [0x10, 0x20, 0x0c, 0x56, 0x61, 0x80, 0xec, 0x11];
        assert_eq!(parse_segments(&data, 1).unwrap(), b"01234567");
    }

    #[test]
    fn parses_kanji_segment() {
        // mode 1000, count 2, then 0x935f and 0xe4aa
        let data = [0x80, 0x26, 0xcf, 0xea, 0xa8, 0x00];
        assert_eq!(
            parse_segments(&data, 1).unwrap(),
            vec![0x93, 0x5f, 0xe4, 0xaa]
        );
    }

    #[test]
    fn unknown_mode_fails() {
        assert!(parse_segments(&[0b0110_0000, 0], 1).is_none());
    }

    #[test]
    fn latin1_fallback_for_invalid_utf8() {
        assert_eq!(bytes_to_text(vec![b'c', 0xe9]), "cé");
        assert_eq!(bytes_to_text("ok ✓".as_bytes().to_vec()), "ok ✓");
    }
}
