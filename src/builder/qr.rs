use std::fmt::Write;

use image::{GrayImage, Luma};

use super::canvas::Canvas;
use crate::common::{
    error::{QRError, QRResult},
    mask::MaskPattern,
    metadata::{ECLevel, Version},
};

/// A finished QR symbol. Immutable; modules are dark (`true`) or light.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QR {
    ver: Version,
    ecl: ECLevel,
    mask: MaskPattern,
    w: usize,
    modules: Vec<bool>,
}

// QR
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn from_canvas(canvas: Canvas) -> QRResult<Self> {
        let mask = canvas.mask().ok_or(QRError::Internal("Canvas was never masked"))?;
        let (ver, ecl, w) = (canvas.version(), canvas.ec_level(), canvas.width());
        let modules = canvas.into_modules();
        Ok(Self { ver, ecl, mask, w, modules })
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    /// Side length in modules, `4 * version + 17`.
    pub fn width(&self) -> usize {
        self.w
    }

    /// Error correction level actually used, which may be higher than the one
    /// requested when boosting is on.
    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> MaskPattern {
        self.mask
    }

    /// Color of the module at column `x` and row `y`. Coordinates outside the
    /// symbol read as light.
    pub fn get(&self, x: i32, y: i32) -> bool {
        let w = self.w as i32;
        if !(0..w).contains(&x) || !(0..w).contains(&y) {
            return false;
        }
        self.modules[(y * w + x) as usize]
    }

    pub fn metadata(&self) -> String {
        format!("{{ Version: {}, Ec level: {:?}, Mask: {} }}", self.ver, self.ecl, *self.mask)
    }

    pub fn count_dark_modules(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }
}


// Render
//------------------------------------------------------------------------------

impl QR {
    /// Grayscale image with `module_sz` pixels per module and a 4 module quiet zone.
    pub fn render(&self, module_sz: u32) -> GrayImage {
        let qz_sz = QUIET_ZONE as u32 * module_sz;
        let qr_sz = self.w as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = GrayImage::from_pixel(total_sz, total_sz, Luma([255]));
        for i in qz_sz..qz_sz + qr_sz {
            for j in qz_sz..qz_sz + qr_sz {
                let r = (i - qz_sz) / module_sz;
                let c = (j - qz_sz) / module_sz;
                if self.get(c as i32, r as i32) {
                    canvas.put_pixel(j, i, Luma([0]));
                }
            }
        }

        canvas
    }

    /// Text art with a 4 module quiet zone. Light modules are drawn as blocks
    /// so the symbol reads on a dark terminal.
    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = QUIET_ZONE * module_sz;
        let qr_sz = self.w * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::with_capacity(total_sz * (total_sz + 1) * 3);
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push('█');
                    continue;
                }
                let r = ((i - qz_sz) / module_sz) as i32;
                let c = ((j - qz_sz) / module_sz) as i32;
                canvas.push(if self.get(c, r) { ' ' } else { '█' });
            }
            canvas.push('\n');
        }

        canvas
    }

    /// Path data with one unit square per dark module, offset by `border`.
    pub fn to_svg_path(&self, border: i32) -> QRResult<String> {
        if border < 0 {
            return Err(QRError::InvalidBorder);
        }
        let w = self.w as i32;
        if border.checked_mul(2).and_then(|b| b.checked_add(w)).is_none() {
            return Err(QRError::InvalidBorder);
        }

        let mut path = String::new();
        for y in 0..w {
            for x in 0..w {
                if !self.get(x, y) {
                    continue;
                }
                if !path.is_empty() {
                    path.push(' ');
                }
                // Writing to a String can't fail
                let _ = write!(path, "M{},{}h1v1h-1z", x + border, y + border);
            }
        }
        Ok(path)
    }

    /// Standalone SVG document, white background and black modules, with a light
    /// border of `border` modules.
    pub fn to_svg(&self, border: i32) -> QRResult<String> {
        let path = self.to_svg_path(border)?;
        let dim = self.w as i32 + border * 2;

        let mut res = String::with_capacity(path.len() + 400);
        res.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        res.push_str(
            "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \
             \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n",
        );
        let _ = writeln!(
            res,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
             viewBox=\"0 0 {dim} {dim}\" stroke=\"none\">"
        );
        res.push_str("\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n");
        let _ = writeln!(res, "\t<path d=\"{path}\" fill=\"#000000\"/>");
        res.push_str("</svg>\n");
        Ok(res)
    }
}


// Global constants
//------------------------------------------------------------------------------

static QUIET_ZONE: usize = 4;
