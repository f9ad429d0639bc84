mod canvas;
mod ec;
mod qr;

pub(crate) use canvas::Canvas;
#[cfg(test)]
pub(crate) use canvas::Module;
pub use qr::QR;

use crate::common::{
    codec::{boost_ec_level, encode_with_version, find_version, Segment},
    debug::{debug_enabled, debug_log},
    error::{QRError, QRResult},
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};
use ec::{add_ecc_and_interleave, error_correction_capacity};

#[derive(Debug, Clone, Copy)]
enum Source<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
    Segments(&'a [Segment]),
}

/// Configurable QR construction. Defaults to ec level M, versions 1 to 40,
/// automatic mask selection and ec level boosting.
///
/// ```
/// use qrweave::{ECLevel, QRBuilder, Version};
///
/// let qr = QRBuilder::new("HELLO WORLD")
///     .ec_level(ECLevel::Q)
///     .min_version(Version::new(2).unwrap())
///     .boost_ecl(false)
///     .build()
///     .unwrap();
/// assert_eq!(*qr.version(), 2);
/// assert_eq!(qr.ec_level(), ECLevel::Q);
/// ```
pub struct QRBuilder<'a> {
    source: Source<'a>,
    ec_level: ECLevel,
    min_version: Version,
    max_version: Version,
    mask: Option<MaskPattern>,
    boost_ecl: bool,
}

impl<'a> QRBuilder<'a> {
    /// Text is split into a single numeric, alphanumeric or byte segment,
    /// whichever is most compact.
    pub fn new(text: &'a str) -> Self {
        Self::with_source(Source::Text(text))
    }

    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self::with_source(Source::Bytes(data))
    }

    pub fn from_segments(segs: &'a [Segment]) -> Self {
        Self::with_source(Source::Segments(segs))
    }

    fn with_source(source: Source<'a>) -> Self {
        Self {
            source,
            ec_level: ECLevel::M,
            min_version: Version::MIN,
            max_version: Version::MAX,
            mask: None,
            boost_ecl: true,
        }
    }

    /// Minimum ec level. May be raised when boosting is on.
    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    /// Pins the version by setting both ends of the range.
    pub fn version(&mut self, version: Version) -> &mut Self {
        self.min_version = version;
        self.max_version = version;
        self
    }

    pub fn min_version(&mut self, version: Version) -> &mut Self {
        self.min_version = version;
        self
    }

    pub fn max_version(&mut self, version: Version) -> &mut Self {
        self.max_version = version;
        self
    }

    /// Forces a mask instead of picking the one with the lowest penalty.
    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn boost_ecl(&mut self, boost_ecl: bool) -> &mut Self {
        self.boost_ecl = boost_ecl;
        self
    }

    pub fn metadata(&self) -> String {
        let mask = match self.mask {
            Some(m) => format!("{}", *m),
            None => "Auto".to_string(),
        };
        format!(
            "{{ Versions: {}..={}, Ec level: {:?}, Mask: {}, Boost: {} }}",
            self.min_version, self.max_version, self.ec_level, mask, self.boost_ecl
        )
    }
}


// Build
//------------------------------------------------------------------------------

impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug_log!("\nGenerating QR {}...", self.metadata());

        debug_log!("Encoding data...");
        let owned;
        let segs = match self.source {
            Source::Text(text) => {
                owned = Segment::make_segments(text);
                &owned[..]
            }
            Source::Bytes(data) => {
                owned = vec![Segment::make_bytes(data)?];
                &owned[..]
            }
            Source::Segments(segs) => segs,
        };

        debug_log!("Finding best version...");
        let (version, used_bits) =
            find_version(segs, self.ec_level, self.min_version, self.max_version)?;
        debug_log!("Version {version} fits {used_bits} bits");

        let ec_level = if self.boost_ecl {
            let boosted = boost_ec_level(used_bits, version, self.ec_level);
            if boosted != self.ec_level {
                debug_log!("Boosted ec level from {:?} to {boosted:?}", self.ec_level);
            }
            boosted
        } else {
            self.ec_level
        };

        let data = encode_with_version(segs, version, ec_level)?;
        let qr = build_from_data(&data, version, ec_level, self.mask)?;

        if debug_enabled() {
            report(&qr, used_bits);
        }
        Ok(qr)
    }
}

// Draws the symbol for a complete set of data codewords
fn build_from_data(
    data: &[u8],
    version: Version,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
) -> QRResult<QR> {
    debug_log!("Constructing payload with ecc & interleaving...");
    let codewords = add_ecc_and_interleave(data, version, ec_level)?;

    debug_log!("Drawing functional patterns...");
    let mut canvas = Canvas::new(version, ec_level);
    canvas.draw_all_function_patterns();

    debug_log!("Drawing encoding region...");
    canvas.draw_encoding_region(&codewords)?;

    match mask {
        Some(m) => {
            debug_log!("Applying mask {}...", *m);
            canvas.apply_mask(m);
        }
        None => {
            debug_log!("Finding & applying best mask...");
            let (m, pen) = apply_best_mask(&mut canvas);
            debug_log!("Mask {} has the lowest penalty {pen}", *m);
        }
    }

    QR::from_canvas(canvas)
}

fn report(qr: &QR, used_bits: usize) {
    let version = qr.version();
    let ec_level = qr.ec_level();
    let total_modules = qr.width() * qr.width();
    let dark_modules = qr.count_dark_modules();
    let light_modules = total_modules - dark_modules;
    let data_cap = version.data_codewords(ec_level);

    debug_log!("QR generated successfully!");
    debug_log!("Report:");
    debug_log!("{}", qr.metadata());
    debug_log!(
        "Data capacity: {data_cap}, Error capacity: {}",
        error_correction_capacity(version, ec_level)
    );
    debug_log!(
        "Encoded size: {}, Utilization: {}%",
        used_bits.div_ceil(8),
        used_bits.div_ceil(8) * 100 / data_cap
    );
    debug_log!(
        "Dark Cells: {dark_modules}, Light Cells: {light_modules}, Balance: {}\n",
        dark_modules * 100 / total_modules
    );
}

// Entry points
//------------------------------------------------------------------------------

impl QR {
    /// Encodes text with automatic segment mode, version and mask. The ec level
    /// is a minimum and may be boosted if the chosen version has room.
    pub fn encode_text(text: &str, ecl: ECLevel) -> QRResult<QR> {
        QRBuilder::new(text).ec_level(ecl).build()
    }

    /// Encodes arbitrary bytes as a single byte mode segment.
    pub fn encode_binary(data: &[u8], ecl: ECLevel) -> QRResult<QR> {
        QRBuilder::from_bytes(data).ec_level(ecl).build()
    }

    pub fn encode_segments(segs: &[Segment], ecl: ECLevel) -> QRResult<QR> {
        QRBuilder::from_segments(segs).ec_level(ecl).build()
    }

    /// Low level constructor from already padded data codewords. Their count
    /// must equal the data capacity of `version` at `ecl`. Ecc is added here.
    pub fn from_codewords(
        version: Version,
        ecl: ECLevel,
        data_codewords: &[u8],
        mask: Option<MaskPattern>,
    ) -> QRResult<QR> {
        if data_codewords.len() != version.data_codewords(ecl) {
            return Err(QRError::InvalidCodewordCount);
        }
        build_from_data(data_codewords, version, ecl, mask)
    }
}

#[cfg(test)]
mod builder_tests {
    use test_case::test_case;

    use super::{add_ecc_and_interleave, encode_with_version, Canvas, Module, QRBuilder, QR};
    use crate::common::{
        codec::Segment,
        error::QRError,
        mask::MaskPattern,
        metadata::{ECLevel, Version},
    };

    #[test]
    fn test_hello_world() {
        let qr = QR::encode_text("HELLO WORLD", ECLevel::L).unwrap();
        assert_eq!(qr.version(), Version::MIN);
        assert_eq!(qr.width(), 21);
        assert!(qr.get(0, 0));
        // 74 data bits fit Q (104) but not H (72)
        assert_eq!(qr.ec_level(), ECLevel::Q);
    }

    #[test]
    fn test_hello_world_center_is_data() {
        let segs = Segment::make_segments("HELLO WORLD");
        let data = encode_with_version(&segs, Version::MIN, ECLevel::Q).unwrap();
        let codewords = add_ecc_and_interleave(&data, Version::MIN, ECLevel::Q).unwrap();

        let mut canvas = Canvas::new(Version::MIN, ECLevel::Q);
        canvas.draw_all_function_patterns();
        canvas.draw_encoding_region(&codewords).unwrap();
        assert!(matches!(canvas.get(10, 10), Module::Data(_)));
        assert!(matches!(canvas.get(6, 10), Module::Func(_)));
    }

    #[test]
    fn test_no_boost() {
        let qr =
            QRBuilder::new("HELLO WORLD").ec_level(ECLevel::L).boost_ecl(false).build().unwrap();
        assert_eq!(qr.ec_level(), ECLevel::L);
    }

    #[test]
    fn test_boost_stops_at_first_misfit() {
        // 41 digits fill 1-L exactly, nothing higher fits
        let data = "1".repeat(41);
        let qr = QR::encode_text(&data, ECLevel::L).unwrap();
        assert_eq!((*qr.version(), qr.ec_level()), (1, ECLevel::L));
    }

    #[test]
    fn test_empty_text() {
        let qr = QR::encode_text("", ECLevel::L).unwrap();
        assert_eq!(*qr.version(), 1);
        assert_eq!(qr.ec_level(), ECLevel::H);
    }

    #[test]
    fn test_capacity_boundary() {
        let ok = QRBuilder::new(&"1".repeat(41)).version(Version::MIN).ec_level(ECLevel::L).build();
        assert!(ok.is_ok());

        let mut prev = 0;
        for n in 42..46 {
            let data = "1".repeat(n);
            let res = QRBuilder::new(&data).version(Version::MIN).ec_level(ECLevel::L).build();
            match res {
                Err(QRError::DataTooLong { required, available }) => {
                    assert_eq!(available, 152);
                    assert!(required > available);
                    assert!(required >= prev);
                    prev = required;
                }
                other => panic!("Expected DataTooLong, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_version_range() {
        let qr =
            QRBuilder::new("HELLO WORLD").min_version(Version::new(5).unwrap()).build().unwrap();
        assert_eq!(*qr.version(), 5);
        assert_eq!(qr.width(), 37);

        let res = QRBuilder::new("HELLO WORLD")
            .min_version(Version::new(5).unwrap())
            .max_version(Version::new(4).unwrap())
            .build();
        assert_eq!(res.unwrap_err(), QRError::InvalidVersionRange);
    }

    #[test_case(0)]
    #[test_case(3)]
    #[test_case(7)]
    fn test_forced_mask(m: u8) {
        let mask = MaskPattern::new(m);
        let qr = QRBuilder::new("https://example.com").mask(mask).build().unwrap();
        assert_eq!(qr.mask(), mask);
    }

    #[test]
    fn test_auto_mask_is_deterministic() {
        let a = QR::encode_text("The quick brown fox", ECLevel::Q).unwrap();
        let b = QR::encode_text("The quick brown fox", ECLevel::Q).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_binary() {
        let qr = QR::encode_binary(&[0x00, 0xFF, 0x10], ECLevel::M).unwrap();
        assert_eq!(*qr.version(), 1);
        let res = QR::encode_binary(&vec![0u8; 2954], ECLevel::L);
        assert!(matches!(res, Err(QRError::DataTooLong { .. })));
    }

    #[test]
    fn test_encode_segments_matches_text() {
        let segs = Segment::make_segments("314159265358979323846264338327950288419716939937510");
        let a = QR::encode_segments(&segs, ECLevel::M).unwrap();
        let b = QR::encode_text("314159265358979323846264338327950288419716939937510", ECLevel::M)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_kanji_segment() {
        let segs = [Segment::make_kanji("点茗").unwrap()];
        let qr = QRBuilder::from_segments(&segs).ec_level(ECLevel::L).boost_ecl(false).build();
        let qr = qr.unwrap();

        let mut data = vec![0x80, 0x26, 0xCF, 0xEA, 0xA8, 0x00];
        data.extend([0xEC, 0x11].iter().cycle().take(13));
        let exp = QR::from_codewords(Version::MIN, ECLevel::L, &data, None).unwrap();
        assert_eq!(qr, exp);
    }

    #[test]
    fn test_from_codewords() {
        let data = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11";
        let qr = QR::from_codewords(Version::MIN, ECLevel::M, data, Some(MaskPattern::new(2)))
            .unwrap();
        assert_eq!(qr.mask(), MaskPattern::new(2));
        assert_eq!(qr.ec_level(), ECLevel::M);

        let res = QR::from_codewords(Version::MIN, ECLevel::M, &data[..15], None);
        assert_eq!(res.unwrap_err(), QRError::InvalidCodewordCount);
    }

    #[test]
    fn test_from_codewords_matches_builder() {
        let data = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11";
        let a = QR::from_codewords(Version::MIN, ECLevel::M, data, None).unwrap();
        let b = QRBuilder::new("HELLO WORLD").boost_ecl(false).build().unwrap();
        assert_eq!(a, b);
    }
}
