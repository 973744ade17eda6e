//! Camera barcode detection boundary.
//!
//! The video decoding library is opaque; it sits behind [`ScanBackend`]. This
//! crate only turns its callback-driven detections into a single-shot event
//! source: one code per activation, then silence until reactivated.

pub mod config;
pub mod detector;

pub use config::{FacingMode, PatchSize, ScannerConfig, Symbology};
pub use detector::{
    BarcodeDetector, Detection, DetectionSender, DetectorState, ManualBackend, ManualTrigger,
    ScanBackend,
};
