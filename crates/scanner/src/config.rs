use serde::{Deserialize, Serialize};

/// Barcode symbologies the decoder is asked to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    Ean13,
    Ean8,
    Code128,
    UpcA,
    Code39,
    UpcE,
}

/// Which camera to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear camera.
    Environment,
    /// Front camera.
    User,
}

/// Locator patch size; larger patches find bigger, closer barcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchSize {
    XSmall,
    Small,
    Medium,
    Large,
    XLarge,
}

/// Settings handed to the scan backend on every activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub symbologies: Vec<Symbology>,
    pub facing_mode: FacingMode,
    pub min_width: u32,
    pub min_height: u32,
    /// Run the barcode locator before decoding.
    pub locate: bool,
    pub patch_size: PatchSize,
    pub half_sample: bool,
    /// Decoder worker threads (0 decodes on the calling thread).
    pub workers: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            symbologies: vec![
                Symbology::Ean13,
                Symbology::Ean8,
                Symbology::Code128,
                Symbology::UpcA,
                Symbology::Code39,
                Symbology::UpcE,
            ],
            facing_mode: FacingMode::Environment,
            min_width: 640,
            min_height: 480,
            locate: true,
            patch_size: PatchSize::Medium,
            half_sample: true,
            workers: 0,
        }
    }
}
