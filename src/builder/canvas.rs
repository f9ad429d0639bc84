use std::ops::Deref;

use crate::common::{
    debug::debug_log,
    error::{QRError, QRResult},
    iter::EncRegionIter,
    mask::MaskPattern,
    metadata::{
        generate_format_info_qr, Color, ECLevel, Version, FORMAT_INFO_BIT_LEN,
        FORMAT_INFO_COORDS_QR_MAIN, FORMAT_INFO_COORDS_QR_SIDE, VERSION_INFO_BIT_LEN,
    },
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

/// Mutable grid the symbol is drawn on. Tracks which modules are function
/// modules so masking and data placement can skip them.
#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct Canvas {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// Canvas utils
//------------------------------------------------------------------------------

impl Canvas {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    // Final colors, row major
    pub fn into_modules(self) -> Vec<bool> {
        self.grid.into_iter().map(|m| bool::from(*m)).collect()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    // Negative indices wrap from the far edge
    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "Row out of bounds: {r}");
        debug_assert!(-w <= c && c < w, "Column out of bounds: {c}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r as usize) * self.w + c as usize
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl Canvas {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // 7x7 pattern centered at (r, c) with its light separator clipped at the edges
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                let clr = match (i, j) {
                    (4 | -4, _) | (_, 4 | -4) => Color::Light,
                    (3 | -3, _) | (_, 3 | -3) => Color::Dark,
                    (2 | -2, _) | (_, 2 | -2) => Color::Light,
                    _ => Color::Dark,
                };
                self.set(r + i, c + j, Module::Func(clr));
            }
        }
    }
}


// Timing & alignment patterns
//------------------------------------------------------------------------------

impl Canvas {
    // Row 6 and column 6 between the finder separators, dark on even indices
    fn draw_timing_patterns(&mut self) {
        let last = self.w as i16 - 9;
        self.draw_line(6, 8, 6, last);
        self.draw_line(8, 6, last, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, Module::Func(Color::from(j & 1 == 0)));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, Module::Func(Color::from(i & 1 == 0)));
            }
        }
    }

    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        let last = poses.len().saturating_sub(1);
        for (i, &r) in poses.iter().enumerate() {
            for (j, &c) in poses.iter().enumerate() {
                // Three corners overlap the finder patterns
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                self.draw_alignment_pattern_at(r as i16, c as i16);
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        for i in -2..=2 {
            for j in -2..=2 {
                let clr = match (i, j) {
                    (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Color::Dark,
                    _ => Color::Light,
                };
                self.set(r + i, c + j, Module::Func(clr));
            }
        }
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl Canvas {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        let off = Module::Format(Color::Light);
        let on = Module::Format(Color::Dark);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_QR_MAIN);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_QR_SIDE);
        // Always dark module beside the bottom left separator
        self.set(-8, 8, on);
    }

    // Two 6x3 copies beside the top right and bottom left finders, lsb first
    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let ver_info = self.ver.info();
        let w = self.w as i16;
        for i in 0..VERSION_INFO_BIT_LEN as i16 {
            let clr = Color::from((ver_info >> i) & 1 == 1);
            let a = w - 11 + i % 3;
            let b = i / 3;
            self.set(b, a, Module::Version(clr));
            self.set(a, b, Module::Version(clr));
        }
    }

    // Coords are ordered most significant bit first
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            self.set(r, c, if number & mask == 0 { off_clr } else { on_clr });
            mask >>= 1;
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl Canvas {
    /// Draws finder, timing and alignment patterns, version info and reserves
    /// the format area.
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_patterns();
        self.draw_alignment_patterns();
        self.draw_version_info();
        self.reserve_format_area();
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl Canvas {
    /// Places the final codewords msb first along the zig-zag path, then fills
    /// the remainder bits with light modules.
    pub fn draw_encoding_region(&mut self, codewords: &[u8]) -> QRResult<()> {
        if codewords.len() != self.ver.total_codewords() {
            return Err(QRError::Internal("Codeword count doesn't match version capacity"));
        }

        let mut coords = EncRegionIter::new(self.ver);
        let mut placed = 0;
        for &byte in codewords {
            for i in (0..8).rev() {
                let module = Module::Data(Color::from((byte >> i) & 1 == 1));
                for (r, c) in coords.by_ref() {
                    if matches!(self.get(r, c), Module::Empty) {
                        self.set(r, c, module);
                        placed += 1;
                        break;
                    }
                }
            }
        }
        if placed != codewords.len() << 3 {
            return Err(QRError::Internal("Ran out of modules while placing codewords"));
        }

        let rem = self.fill_remainder_bits(coords);
        debug_log!("Placed {placed} data bits and {rem} remainder bits");

        if self.grid.contains(&Module::Empty) {
            return Err(QRError::Internal("Empty module left after placing data"));
        }
        Ok(())
    }

    fn fill_remainder_bits(&mut self, coords: impl Iterator<Item = (i16, i16)>) -> usize {
        let mut filled = 0;
        for (r, c) in coords {
            if matches!(self.get(r, c), Module::Empty) {
                self.set(r, c, Module::Data(Color::Light));
                filled += 1;
            }
        }
        debug_assert_eq!(filled, self.ver.remainder_bits(), "Unexpected remainder bit count");
        filled
    }

    /// Xors the data modules with the pattern and redraws the format info.
    /// Applying the same pattern twice restores the data.
    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_functions();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if mask_fn(r, c) {
                    if let Module::Data(clr) = self.get(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
        let format_info = generate_format_info_qr(self.ecl, pattern);
        self.draw_format_info(format_info);
    }
}

#[cfg(test)]
mod encoding_region_tests {
    use super::{Canvas, Module};
    use crate::common::error::QRError;
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{Color, ECLevel, Version};

    // HELLO WORLD at 1-M with ecc appended
    static CODEWORDS: &[u8; 26] =
        b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11\xc4#'w\xeb\xd7\xe7\xe2]\x17";

    fn drawn_canvas() -> Canvas {
        let mut canvas = Canvas::new(Version::MIN, ECLevel::M);
        canvas.draw_all_function_patterns();
        canvas.draw_encoding_region(CODEWORDS).unwrap();
        canvas
    }

    #[test]
    fn test_first_codeword_placement() {
        let canvas = drawn_canvas();
        // 0x20 = 0010_0000 starting bottom right, moving up in column pairs
        let first: Vec<Module> =
            [(20, 20), (20, 19), (19, 20), (19, 19), (18, 20), (18, 19), (17, 20), (17, 19)]
                .iter()
                .map(|&(r, c)| canvas.get(r, c))
                .collect();
        let exp: Vec<Module> = [false, false, true, false, false, false, false, false]
            .iter()
            .map(|&b| Module::Data(Color::from(b)))
            .collect();
        assert_eq!(first, exp);
    }

    #[test]
    fn test_no_empty_modules() {
        let canvas = drawn_canvas();
        assert!(!canvas.grid.contains(&Module::Empty));
    }

    #[test]
    fn test_wrong_codeword_count() {
        let mut canvas = Canvas::new(Version::MIN, ECLevel::M);
        canvas.draw_all_function_patterns();
        let res = canvas.draw_encoding_region(&CODEWORDS[..25]);
        assert!(matches!(res, Err(QRError::Internal(_))));
    }

    #[test]
    fn test_remainder_bits_are_light() {
        // Version 2 has 7 remainder bits, placed at the end of the path in the
        // bottom left data area
        let ver = Version(2);
        let mut canvas = Canvas::new(ver, ECLevel::L);
        canvas.draw_all_function_patterns();
        canvas.draw_encoding_region(&vec![0xFF; ver.total_codewords()]).unwrap();
        let light = canvas.grid.iter().filter(|m| **m == Module::Data(Color::Light)).count();
        assert_eq!(light, 7);
    }

    #[test]
    fn test_mask_involution() {
        let canvas = drawn_canvas();
        for m in MaskPattern::ALL {
            let mut masked = canvas.clone();
            masked.apply_mask(m);
            assert_ne!(masked.grid, canvas.grid);
            masked.apply_mask(m);
            let is_data = |m: &&Module| matches!(m, Module::Data(_));
            let unmasked: Vec<_> = masked.grid.iter().filter(is_data).collect();
            let orig: Vec<_> = canvas.grid.iter().filter(is_data).collect();
            assert_eq!(unmasked, orig);
        }
    }

    #[test]
    fn test_mask_leaves_function_modules() {
        let canvas = drawn_canvas();
        let mut masked = canvas.clone();
        masked.apply_mask(MaskPattern::new(3));
        for (a, b) in canvas.grid.iter().zip(masked.grid.iter()) {
            if let Module::Func(_) | Module::Version(_) = a {
                assert_eq!(a, b);
            }
        }
        assert_eq!(masked.mask(), Some(MaskPattern::new(3)));
    }
}
