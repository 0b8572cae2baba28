//! Binarization and finder pattern detection.
//!
//! A finder pattern crossed through its center reads dark-light-dark-light-dark
//! in a 1:1:3:1:1 ratio along both axes. Rows are scanned top to bottom for
//! that run pattern, each hit is confirmed by a vertical cross-check and a
//! second horizontal pass through the refined center, and hits that land on
//! the same pattern are averaged together.

use image::RgbaImage;

/// Contrast below which an image can't hold a readable code.
const MIN_CONTRAST: u32 = 32;

/// Candidates beyond this many are ignored when pairing up triples.
const MAX_CANDIDATES: usize = 24;

/// Thresholded image, `true` for dark.
pub(super) struct BitMatrix {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl BitMatrix {
    /// Threshold at the midpoint between the darkest and lightest luma.
    /// Transparent pixels are composited over white first.
    pub(super) fn from_image(image: &RgbaImage) -> Option<Self> {
        let lumas: Vec<u32> = image.pixels().map(|p| luma(p.0)).collect();
        let min = lumas.iter().copied().min()?;
        let max = lumas.iter().copied().max()?;
        if max - min < MIN_CONTRAST {
            return None;
        }
        let threshold = (min + max) / 2;
        Some(Self {
            width: image.width() as usize,
            height: image.height() as usize,
            bits: lumas.into_iter().map(|l| l < threshold).collect(),
        })
    }

    pub(super) fn pixel(&self, x: i64, y: i64) -> Option<bool> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.bits[y as usize * self.width + x as usize])
    }

    /// Dark test with everything outside the image treated as light.
    pub(super) fn is_dark(&self, x: i64, y: i64) -> bool {
        self.pixel(x, y).unwrap_or(false)
    }
}

fn luma([r, g, b, a]: [u8; 4]) -> u32 {
    let over_white = |c: u8| (u32::from(c) * u32::from(a) + 255 * (255 - u32::from(a))) / 255;
    (299 * over_white(r) + 587 * over_white(g) + 114 * over_white(b)) / 1000
}

/// Center of a confirmed finder pattern, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct FinderPattern {
    pub x: f32,
    pub y: f32,
    /// Estimated module size in pixels.
    pub module: f32,
    hits: u32,
}

impl FinderPattern {
    fn distance(&self, other: &FinderPattern) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Three finder patterns arranged as a symbol's corners.
#[derive(Debug, Clone, Copy)]
pub(super) struct FinderTriple {
    pub top_left: FinderPattern,
    pub top_right: FinderPattern,
    pub bottom_left: FinderPattern,
}

fn is_finder_ratio(counts: &[usize; 5]) -> bool {
    let total: usize = counts.iter().sum();
    if total < 7 {
        return false;
    }
    let module = total as f32 / 7.0;
    let tolerance = module / 2.0;
    let off = |count: usize, modules: f32| (count as f32 - module * modules).abs();
    off(counts[0], 1.0) < tolerance
        && off(counts[1], 1.0) < tolerance
        && off(counts[2], 3.0) < 3.0 * tolerance
        && off(counts[3], 1.0) < tolerance
        && off(counts[4], 1.0) < tolerance
}

/// Read the five finder runs crossing `(x, y)` along `(dx, dy)`.
///
/// Returns the run lengths and the offset from `(x, y)` to the center of
/// the middle run, or `None` when the runs aren't finder-shaped.
fn cross_runs(m: &BitMatrix, x: i64, y: i64, dx: i64, dy: i64) -> Option<([usize; 5], f32)> {
    if !m.is_dark(x, y) {
        return None;
    }
    let at = |k: i64| m.pixel(x + k * dx, y + k * dy);
    // walk from `start` while the color matches; returns the run length
    // and the first step past it
    let walk = |start: i64, step: i64, dark: bool| {
        let mut k = start;
        while at(k) == Some(dark) {
            k += step;
        }
        ((k - start).unsigned_abs() as usize, k)
    };

    // middle run: from `first` (<= 0) to `last` (>= 0)
    let (_, before) = walk(0, -1, true);
    let first = before + 1;
    let (_, after) = walk(0, 1, true);
    let last = after - 1;

    let (c1, k) = walk(before, -1, false);
    let (c0, _) = walk(k, -1, true);
    let (c3, k) = walk(after, 1, false);
    let (c4, _) = walk(k, 1, true);
    let c2 = (last - first + 1) as usize;

    let counts = [c0, c1, c2, c3, c4];
    if counts.contains(&0) || !is_finder_ratio(&counts) {
        return None;
    }
    Some((counts, first as f32 + c2 as f32 / 2.0))
}

/// Runs of equal color along row `y`, as `(start, length, dark)`.
fn row_runs(m: &BitMatrix, y: i64) -> Vec<(usize, usize, bool)> {
    let mut runs: Vec<(usize, usize, bool)> = Vec::new();
    for x in 0..m.width {
        let dark = m.is_dark(x as i64, y);
        match runs.last_mut() {
            Some(run) if run.2 == dark => run.1 += 1,
            _ => runs.push((x, 1, dark)),
        }
    }
    runs
}

/// Confirmed finder patterns in the order they were first seen.
pub(super) fn find_finders(m: &BitMatrix) -> Vec<FinderPattern> {
    let mut found: Vec<FinderPattern> = Vec::new();
    for y in 0..m.height as i64 {
        let runs = row_runs(m, y);
        for window in runs.windows(5) {
            if !window[0].2 {
                continue;
            }
            let counts = [
                window[0].1,
                window[1].1,
                window[2].1,
                window[3].1,
                window[4].1,
            ];
            if !is_finder_ratio(&counts) {
                continue;
            }
            let row_total: usize = counts.iter().sum();
            let col = (window[2].0 as f32 + window[2].1 as f32 / 2.0).floor() as i64;

            let Some((v_counts, v_offset)) = cross_runs(m, col, y, 0, 1) else {
                continue;
            };
            let v_total: usize = v_counts.iter().sum();
            if 5 * v_total.abs_diff(row_total) >= 2 * row_total {
                continue;
            }
            let cy = y as f32 + v_offset;
            let Some((h_counts, h_offset)) = cross_runs(m, col, cy.floor() as i64, 1, 0) else {
                continue;
            };
            let cx = col as f32 + h_offset;
            let module = (h_counts.iter().sum::<usize>() + v_total) as f32 / 14.0;
            merge(&mut found, cx, cy, module);
        }
    }
    found.retain(|f| f.hits >= 2);
    found
}

fn merge(found: &mut Vec<FinderPattern>, x: f32, y: f32, module: f32) {
    for f in found.iter_mut() {
        if (f.x - x).abs() <= f.module
            && (f.y - y).abs() <= f.module
            && (f.module - module).abs() <= f.module.max(1.0)
        {
            let n = f.hits as f32;
            f.x = (f.x * n + x) / (n + 1.0);
            f.y = (f.y * n + y) / (n + 1.0);
            f.module = (f.module * n + module) / (n + 1.0);
            f.hits += 1;
            return;
        }
    }
    found.push(FinderPattern {
        x,
        y,
        module,
        hits: 1,
    });
}

/// Every plausible corner arrangement, earliest-seen patterns first.
pub(super) fn candidate_triples(finders: &[FinderPattern]) -> Vec<FinderTriple> {
    let finders = &finders[..finders.len().min(MAX_CANDIDATES)];
    let mut triples = Vec::new();
    for i in 0..finders.len() {
        for j in i + 1..finders.len() {
            for k in j + 1..finders.len() {
                if let Some(t) = orient(finders[i], finders[j], finders[k]) {
                    triples.push(t);
                }
            }
        }
    }
    triples
}

/// Arrange three patterns as top-left, top-right, bottom-left when they
/// form an isosceles right triangle of compatible module sizes.
fn orient(p: FinderPattern, q: FinderPattern, r: FinderPattern) -> Option<FinderTriple> {
    let (pq, pr, qr) = (p.distance(&q), p.distance(&r), q.distance(&r));
    // the corner sits opposite the longest side
    let (corner, b, c) = if qr >= pq && qr >= pr {
        (p, q, r)
    } else if pr >= pq {
        (q, p, r)
    } else {
        (r, p, q)
    };

    let modules = [corner.module, b.module, c.module];
    let smallest = modules.iter().copied().fold(f32::INFINITY, f32::min);
    let largest = modules.iter().copied().fold(0.0, f32::max);
    if largest > smallest * 1.5 {
        return None;
    }

    let (bx, by) = (b.x - corner.x, b.y - corner.y);
    let (cx, cy) = (c.x - corner.x, c.y - corner.y);
    let (lb, lc) = ((bx * bx + by * by).sqrt(), (cx * cx + cy * cy).sqrt());
    let module = (corner.module + b.module + c.module) / 3.0;
    // version 1 puts finder centers 14 modules apart
    if lb.min(lc) < 12.0 * module || lb.min(lc) < lb.max(lc) * 0.85 {
        return None;
    }
    let cos = (bx * cx + by * cy) / (lb * lc);
    if cos.abs() > 0.1 {
        return None;
    }

    // y grows downward, so a clockwise turn from b to c means b is top-right
    if bx * cy - by * cx > 0.0 {
        Some(FinderTriple {
            top_left: corner,
            top_right: b,
            bottom_left: c,
        })
    } else {
        Some(FinderTriple {
            top_left: corner,
            top_right: c,
            bottom_left: b,
        })
    }
}
