use std::ops::Deref;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::Canvas;

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub const ALL: [MaskPattern; 8] = [
        MaskPattern(0),
        MaskPattern(1),
        MaskPattern(2),
        MaskPattern(3),
        MaskPattern(4),
        MaskPattern(5),
        MaskPattern(6),
        MaskPattern(7),
    ];

    /// Panics if `pattern` is not in 0..8. See [`MaskPattern::try_new`] for a
    /// fallible version.
    pub fn new(pattern: u8) -> Self {
        assert!(pattern < 8, "Invalid masking pattern: {pattern}");
        Self(pattern)
    }

    pub fn try_new(pattern: u8) -> QRResult<Self> {
        if pattern >= 8 {
            return Err(QRError::InvalidMaskingPattern);
        }
        Ok(Self(pattern))
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        let rc = r as i32 * c as i32;
        (rc & 1) + (rc % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        let rc = r as i32 * c as i32;
        ((rc & 1) + (rc % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        let rc = r as i32 * c as i32;
        (((r + c) & 1) as i32 + (rc % 3)) & 1 == 0
    }
}

impl MaskPattern {
    // Returns a predicate over (row, col); true means the module is inverted
    pub fn mask_functions(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Mask pattern is always below 8"),
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

/// Tries all 8 masks and keeps the one with the lowest penalty. Ties go to the
/// lower mask index.
#[cfg(not(feature = "parallel"))]
pub(crate) fn apply_best_mask(canvas: &mut Canvas) -> (MaskPattern, u32) {
    let mut best = (u32::MAX, MaskPattern(0));
    for m in MaskPattern::ALL {
        canvas.apply_mask(m);
        let pen = compute_total_penalty(canvas);
        if pen < best.0 {
            best = (pen, m);
        }
        // Masking is an involution so applying it again reverts the grid
        canvas.apply_mask(m);
    }
    let (pen, best_mask) = best;
    canvas.apply_mask(best_mask);
    (best_mask, pen)
}

/// Tries all 8 masks and keeps the one with the lowest penalty. Ties go to the
/// lower mask index.
#[cfg(feature = "parallel")]
pub(crate) fn apply_best_mask(canvas: &mut Canvas) -> (MaskPattern, u32) {
    let (pen, best_mask) = MaskPattern::ALL
        .par_iter()
        .map(|&m| {
            let mut canvas = canvas.clone();
            canvas.apply_mask(m);
            (compute_total_penalty(&canvas), m)
        })
        .min()
        .unwrap_or((u32::MAX, MaskPattern(0)));
    canvas.apply_mask(best_mask);
    (best_mask, pen)
}

pub(crate) fn compute_total_penalty(canvas: &Canvas) -> u32 {
    let adj_pen = compute_adjacent_penalty(canvas);
    let blk_pen = compute_block_penalty(canvas);
    let fp_pen_h = compute_finder_pattern_penalty(canvas, true);
    let fp_pen_v = compute_finder_pattern_penalty(canvas, false);
    let bal_pen = compute_balance_penalty(canvas);
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

// Same colored runs of 5 or more in a row or column: 3 + (len - 5)
fn compute_adjacent_penalty(canvas: &Canvas) -> u32 {
    let mut pen = 0;
    let w = canvas.width();
    let mut cols = vec![(Color::Light, 0); w];
    for r in 0..w {
        let mut last = Color::Light;
        let mut consec_row_len = 0;
        for (c, col) in cols.iter_mut().enumerate() {
            let clr = *canvas.get(r as i16, c as i16);
            if c == 0 || last != clr {
                last = clr;
                consec_row_len = 0;
            }
            consec_row_len += 1;
            pen += run_penalty(consec_row_len);

            if r == 0 || col.0 != clr {
                col.0 = clr;
                col.1 = 0;
            }
            col.1 += 1;
            pen += run_penalty(col.1);
        }
    }
    pen
}

#[inline]
fn run_penalty(len: usize) -> u32 {
    match len {
        5 => PENALTY_N1,
        _ if len > 5 => 1,
        _ => 0,
    }
}

fn compute_block_penalty(canvas: &Canvas) -> u32 {
    let mut pen = 0;
    let w = canvas.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *canvas.get(r, c);
            if clr == *canvas.get(r + 1, c)
                && clr == *canvas.get(r, c + 1)
                && clr == *canvas.get(r + 1, c + 1)
            {
                pen += PENALTY_N2;
            }
        }
    }
    pen
}

// Scans each line keeping the lengths of the last 7 runs. The modules beyond
// either edge count as a light run of width w.
fn compute_finder_pattern_penalty(canvas: &Canvas, is_hor: bool) -> u32 {
    let mut pen = 0;
    let w = canvas.width();
    for i in 0..w as i16 {
        let get = |j: i16| if is_hor { *canvas.get(i, j) } else { *canvas.get(j, i) };
        let mut history = RunHistory::new(w);
        let mut run_clr = Color::Light;
        let mut run_len = 0;
        for j in 0..w as i16 {
            let clr = get(j);
            if clr == run_clr {
                run_len += 1;
                continue;
            }
            history.push(run_len);
            if run_clr == Color::Light {
                pen += history.count_patterns() * PENALTY_N3;
            }
            run_clr = clr;
            run_len = 1;
        }
        pen += history.terminate_and_count(run_clr, run_len) * PENALTY_N3;
    }
    pen
}

struct RunHistory {
    runs: [usize; 7],
    w: usize,
}

impl RunHistory {
    fn new(w: usize) -> Self {
        Self { runs: [0; 7], w }
    }

    fn push(&mut self, mut len: usize) {
        // First run of the line is padded with the light border
        if self.runs[0] == 0 {
            len += self.w;
        }
        self.runs.copy_within(0..6, 1);
        self.runs[0] = len;
    }

    // Matches of dark:light:dark:light:dark = 1:1:3:1:1 with a light run of at
    // least 4 on one side and at least 1 on the other
    fn count_patterns(&self) -> u32 {
        let rh = &self.runs;
        let n = rh[1];
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        let left = core && rh[0] >= n * 4 && rh[6] >= n;
        let right = core && rh[6] >= n * 4 && rh[0] >= n;
        left as u32 + right as u32
    }

    fn terminate_and_count(&mut self, run_clr: Color, mut run_len: usize) -> u32 {
        if run_clr == Color::Dark {
            self.push(run_len);
            run_len = 0;
        }
        // Light border after the last module
        run_len += self.w;
        self.push(run_len);
        self.count_patterns()
    }
}

// 10 points for every 5% the dark ratio deviates from 50%
fn compute_balance_penalty(canvas: &Canvas) -> u32 {
    let dark_cnt = canvas.count_dark_modules();
    let w = canvas.width();
    let tot = w * w;
    let k = ((dark_cnt * 20).abs_diff(tot * 10) + tot - 1) / tot - 1;
    k as u32 * PENALTY_N4
}


// Global constants
//------------------------------------------------------------------------------

static PENALTY_N1: u32 = 3;

static PENALTY_N2: u32 = 3;

static PENALTY_N3: u32 = 40;

static PENALTY_N4: u32 = 10;
