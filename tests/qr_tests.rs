use image::GrayImage;

fn decode(img: &GrayImage) -> (usize, String) {
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        img.width() as usize,
        img.height() as usize,
        |x, y| img.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "Expected exactly one symbol");
    let (meta, content) = grids[0].decode().expect("Failed to read QR");
    (meta.version.0, content)
}

#[cfg(test)]
mod qr_proptests {
    use prop::string::string_regex;
    use proptest::prelude::*;

    use qrweave::*;

    use super::decode;

    pub fn ec_level_strategy() -> BoxedStrategy<ECLevel> {
        prop_oneof![Just(ECLevel::L), Just(ECLevel::M), Just(ECLevel::Q), Just(ECLevel::H)].boxed()
    }

    pub fn qr_strategy(regex: &str, max_sz: usize) -> impl Strategy<Value = (ECLevel, String)> {
        let pattern = format!(r"{regex}{{1,{max_sz}}}");
        (ec_level_strategy(), string_regex(&pattern).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn proptest_numeric(params in qr_strategy("[0-9]", 600)) {
            let (ecl, data) = params;

            let qr = QRBuilder::new(&data).ec_level(ecl).build().unwrap();
            prop_assert!(qr.ec_level() >= ecl);

            let (ver, decoded) = decode(&qr.render(3));
            prop_assert_eq!(ver, *qr.version());
            prop_assert_eq!(data, decoded);
        }

        #[test]
        fn proptest_alphanumeric(params in qr_strategy(r"[0-9A-Z $%*+\-./:]", 400)) {
            let (ecl, data) = params;

            let qr = QRBuilder::new(&data).ec_level(ecl).build().unwrap();
            prop_assert!(qr.ec_level() >= ecl);

            let (ver, decoded) = decode(&qr.render(3));
            prop_assert_eq!(ver, *qr.version());
            prop_assert_eq!(data, decoded);
        }

        #[test]
        fn proptest_width_matches_version(ver in 1usize..=40, ecl in ec_level_strategy()) {
            let qr = QRBuilder::new("")
                .version(Version::new(ver).unwrap())
                .ec_level(ecl)
                .build()
                .unwrap();

            prop_assert_eq!(qr.width(), 4 * ver + 17);
            prop_assert_eq!(*qr.version(), ver);
            prop_assert!(qr.get(0, 0));
            prop_assert!(qr.get(8, 4 * ver as i32 + 9));
        }
    }
}

#[cfg(test)]
mod qr_tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use test_case::test_case;

    use qrweave::*;

    use super::decode;

    #[test_case("Hello, world!🌎".to_string(), 1, ECLevel::L)]
    #[test_case("TEST".to_string(), 1, ECLevel::M)]
    #[test_case("12345".to_string(), 1, ECLevel::Q)]
    #[test_case("OK".to_string(), 1, ECLevel::H)]
    #[test_case("B3@j🎮#Z%8v🍣K!🔑3zC^8📖&r💾F9*🔐b6🌼".repeat(2), 7, ECLevel::L)]
    #[test_case("A11111111111111".repeat(11), 7, ECLevel::M)]
    #[test_case("aAAAAAA1111111111111AAAAAAa".repeat(3), 7, ECLevel::Q)]
    #[test_case("1234567890".repeat(15), 7, ECLevel::H)]
    #[test_case("B3@j🎮#Z%8v🍣K!🔑3zC^8📖&r💾F9*🔐b6🌼".repeat(4), 10, ECLevel::L)]
    #[test_case("A11111111111111".repeat(20), 10, ECLevel::M)]
    #[test_case("aAAAAAAAAA1111111111111111AAAAAAAAAAa".repeat(4), 10, ECLevel::Q)]
    #[test_case("1234567890".repeat(28), 10, ECLevel::H)]
    #[test_case("B3@j🎮#Z%8v🍣K!🔑3zC^8📖&r💾F9*🔐b6🌼".repeat(22), 27, ECLevel::L)]
    #[test_case("A111111111111111".repeat(100), 27, ECLevel::M)]
    #[test_case("aAAAAAAAAA111111111111111111AAAAAAAAAAa".repeat(20), 27, ECLevel::Q)]
    #[test_case("1234567890".repeat(145), 27, ECLevel::H)]
    #[test_case("B3@j🎮#Z%8v🍣K!🔑3zC^8📖&r💾F9*🔐b6🌼".repeat(57), 40, ECLevel::L)]
    #[test_case("A111111111111111".repeat(97), 40, ECLevel::M)]
    #[test_case("aAAAAAAAAA111111111111111111AAAAAAAAAAa".repeat(42), 40, ECLevel::Q)]
    #[test_case("1234567890".repeat(305), 40, ECLevel::H)]
    fn test_qr(data: String, ver: usize, ecl: ECLevel) {
        let qr = QRBuilder::new(&data)
            .version(Version::new(ver).unwrap())
            .ec_level(ecl)
            .boost_ecl(false)
            .build()
            .unwrap();
        assert_eq!(*qr.version(), ver);
        assert_eq!(qr.ec_level(), ecl);

        let (decoded_ver, decoded) = decode(&qr.render(3));
        assert_eq!(decoded_ver, ver);
        assert_eq!(decoded, data);
    }

    #[test_case(0)]
    #[test_case(3)]
    #[test_case(7)]
    fn test_forced_mask(mask: u8) {
        let data = "FORCED MASK 0123456789";
        let qr = QRBuilder::new(data).mask(MaskPattern::new(mask)).build().unwrap();
        assert_eq!(*qr.mask(), mask);

        let (_, decoded) = decode(&qr.render(4));
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_hello_world() {
        let qr = QR::encode_text("HELLO WORLD", ECLevel::L).unwrap();
        assert_eq!(*qr.version(), 1);
        assert_eq!(qr.width(), 21);
        assert_eq!(qr.ec_level(), ECLevel::Q);

        let (_, decoded) = decode(&qr.render(4));
        assert_eq!(decoded, "HELLO WORLD");
    }

    #[test]
    fn test_version_boundary() {
        let fits = "1".repeat(41);
        let qr = QRBuilder::new(&fits).ec_level(ECLevel::L).build().unwrap();
        assert_eq!(*qr.version(), 1);

        let spills = "1".repeat(42);
        let qr = QRBuilder::new(&spills).ec_level(ECLevel::L).build().unwrap();
        assert_eq!(*qr.version(), 2);

        let (_, decoded) = decode(&qr.render(3));
        assert_eq!(decoded, spills);
    }

    #[test]
    fn test_data_too_long() {
        let data = "1".repeat(42);
        let res = QRBuilder::new(&data).version(Version::MIN).ec_level(ECLevel::L).build();
        assert!(matches!(res, Err(QRError::DataTooLong { available: 152, .. })));

        let res = QR::encode_binary(&[0u8; 2954], ECLevel::L);
        assert!(matches!(res, Err(QRError::DataTooLong { .. })));
    }

    #[test]
    fn test_empty() {
        let qr = QR::encode_text("", ECLevel::L).unwrap();
        assert_eq!(*qr.version(), 1);
        assert_eq!(qr.ec_level(), ECLevel::H);
    }

    #[test]
    fn test_deterministic() {
        let data = "The quick brown fox jumps over the lazy dog";
        let a = QR::encode_text(data, ECLevel::M).unwrap();
        let b = QR::encode_text(data, ECLevel::M).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_svg(4).unwrap(), b.to_svg(4).unwrap());
    }

    #[test]
    fn test_binary() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let data: Vec<u8> = (0..200).map(|_| rng.random::<u8>()).collect();
        let qr = QR::encode_binary(&data, ECLevel::M).unwrap();

        let img = qr.render(3);
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            img.width() as usize,
            img.height() as usize,
            |x, y| img.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1);
        let mut decoded = Vec::new();
        let meta = grids[0].decode_to(&mut decoded).expect("Failed to read QR");
        assert_eq!(meta.version.0, *qr.version());
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_segments() {
        let segs = vec![
            Segment::make_alphanumeric("THE NUMBER IS ").unwrap(),
            Segment::make_numeric("314159265358979").unwrap(),
        ];
        let qr = QR::encode_segments(&segs, ECLevel::L).unwrap();

        let (_, decoded) = decode(&qr.render(4));
        assert_eq!(decoded, "THE NUMBER IS 314159265358979");
    }

    #[test]
    fn test_from_codewords() {
        let ver = Version::new(2).unwrap();
        let len = ver.data_codewords(ECLevel::M);
        let mut data = vec![0u8; len];
        // Byte mode, count 3, "abc", terminator, then pad bytes
        data[..5].copy_from_slice(&[0x40, 0x36, 0x16, 0x26, 0x30]);
        for (i, b) in data[5..].iter_mut().enumerate() {
            *b = if i % 2 == 0 { 0xEC } else { 0x11 };
        }

        let qr = QR::from_codewords(ver, ECLevel::M, &data, None).unwrap();
        let (decoded_ver, decoded) = decode(&qr.render(4));
        assert_eq!(decoded_ver, 2);
        assert_eq!(decoded, "abc");

        let res = QR::from_codewords(ver, ECLevel::M, &data[1..], None);
        assert_eq!(res, Err(QRError::InvalidCodewordCount));
    }

    #[test]
    fn test_svg() {
        let qr = QR::encode_text("HELLO WORLD", ECLevel::M).unwrap();
        let svg = qr.to_svg(4).unwrap();
        assert!(svg.contains("viewBox=\"0 0 29 29\""));
        assert_eq!(svg.matches("h1v1h-1z").count(), qr.count_dark_modules());
        assert_eq!(qr.to_svg(-1), Err(QRError::InvalidBorder));
    }
}
