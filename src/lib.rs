//! # qrweave
//!
//! A Rust library for generating QR Code Model 2 symbols with Reed-Solomon error correction.
//!
//! ## Features
//!
//! - **Segment Encoding**: Numeric, alphanumeric, byte, kanji and ECI segments
//! - **Version Selection**: Smallest version 1-40 in a configurable range that fits the data
//! - **Reed-Solomon Error Correction**: Levels L, M, Q, H, boosted when the version has room
//! - **Masking**: Scores all 8 mask patterns with the standard penalty rules and keeps the best one
//! - **Export**: SVG documents, grayscale images and terminal text art
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrweave::{ECLevel, QR};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QR::encode_text("Hello, World!", ECLevel::M)?;
//!
//! let svg = qr.to_svg(4)?;  // 4 module border
//! assert!(svg.contains("viewBox=\"0 0 29 29\""));
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrweave::{QRBuilder, ECLevel, Version, MaskPattern};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("Hello, World!")
//!     .min_version(Version::new(2)?)  // Smallest version to consider - defaults to 1
//!     .max_version(Version::new(10)?) // Largest version to consider - defaults to 40
//!     .ec_level(ECLevel::M)           // Minimum error correction level - defaults to ECLevel::M
//!     .boost_ecl(false)               // Keep the ec level as given - defaults to true
//!     .mask(MaskPattern::new(3))      // Mask pattern - defaults to the lowest penalty mask
//!     .build()?;
//!
//! let img = qr.render(4);  // 4 pixels per module
//! assert_eq!(img.width(), (25 + 8) * 4);
//! # Ok(())
//! # }
//! ```
//!
//! ### Segments
//!
//! ```rust
//! use qrweave::{ECLevel, Segment, QR};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let segs = vec![
//!     Segment::make_eci(26)?, // UTF-8
//!     Segment::make_alphanumeric("THE NUMBER IS ")?,
//!     Segment::make_numeric("314159265358979")?,
//! ];
//! let qr = QR::encode_segments(&segs, ECLevel::L)?;
//! println!("{}", qr.to_str(1));
//! # Ok(())
//! # }
//! ```
//!
//! ## QR Code Components
//!
//! ### Versions
//! - Versions 1-40, with sizes from 21x21 to 177x177 modules
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! ## Debugging
//!
//! Set the `QRWEAVE_DEBUG` environment variable to print build progress and a
//! report of the generated symbol to stderr.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;

pub use builder::{QRBuilder, QR};
pub use common::codec::{is_alphanumeric, is_kanji, is_numeric, Mode, Segment};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{ECLevel, Version};
pub use common::BitStream;
