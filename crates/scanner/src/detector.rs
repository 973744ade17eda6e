//! Single-shot detection over a callback-driven decoder.
//!
//! The backend reports decoded codes through a [`DetectionSender`], possibly from
//! a camera thread. Every detection is tagged with the activation it belongs to;
//! the detector only accepts the first detection of its current activation and
//! stops the backend right after, so late or duplicate callbacks are dropped.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use barlo_core::{LookupError, LookupResult};

use crate::config::ScannerConfig;

/// A decoded code, tagged with the activation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub activation: u64,
    pub code: String,
}

/// Handle given to a backend on start; cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct DetectionSender {
    activation: u64,
    tx: Sender<Detection>,
}

impl DetectionSender {
    pub fn activation(&self) -> u64 {
        self.activation
    }

    /// Report a decoded code. Returns `false` once the detector is gone.
    pub fn send(&self, code: impl Into<String>) -> bool {
        self.tx
            .send(Detection {
                activation: self.activation,
                code: code.into(),
            })
            .is_ok()
    }
}

/// Wrapper around the video decoding library.
pub trait ScanBackend {
    /// Open the camera and start decoding; report codes through `sender`.
    fn start(&mut self, config: &ScannerConfig, sender: DetectionSender) -> LookupResult<()>;

    /// Stop decoding and unregister the detection callback.
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    Idle,
    Active { activation: u64 },
    TornDown,
}

/// Single-shot barcode event source with an explicit activate/deactivate lifecycle.
#[derive(Debug)]
pub struct BarcodeDetector<B: ScanBackend> {
    backend: B,
    config: ScannerConfig,
    state: DetectorState,
    next_activation: u64,
    tx: Sender<Detection>,
    rx: Receiver<Detection>,
}

impl<B: ScanBackend> BarcodeDetector<B> {
    pub fn new(backend: B, config: ScannerConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            config,
            state: DetectorState::Idle,
            next_activation: 1,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DetectorState::Active { .. })
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start a new activation. Restarts the backend if one is already running.
    pub fn activate(&mut self) -> LookupResult<u64> {
        match self.state {
            DetectorState::TornDown => {
                return Err(LookupError::scanner("detector has been torn down"));
            }
            DetectorState::Active { .. } => self.backend.stop(),
            DetectorState::Idle => {}
        }

        let activation = self.next_activation;
        self.next_activation += 1;
        self.state = DetectorState::Idle;

        let sender = DetectionSender {
            activation,
            tx: self.tx.clone(),
        };
        if let Err(err) = self.backend.start(&self.config, sender) {
            tracing::error!(activation, "failed to start barcode scanner: {err}");
            return Err(err);
        }

        self.state = DetectorState::Active { activation };
        tracing::debug!(activation, "barcode scanner activated");
        Ok(activation)
    }

    /// Take the detection of the current activation, if one arrived.
    ///
    /// Stale, blank, and post-deactivation detections are discarded. A returned
    /// code ends the activation.
    pub fn poll(&mut self) -> Option<String> {
        while let Ok(detection) = self.rx.try_recv() {
            let DetectorState::Active { activation } = self.state else {
                continue;
            };
            if detection.activation != activation {
                tracing::debug!(
                    stale = detection.activation,
                    current = activation,
                    "ignoring detection from previous activation"
                );
                continue;
            }
            let code = detection.code.trim();
            if code.is_empty() {
                continue;
            }

            let code = code.to_string();
            self.backend.stop();
            self.state = DetectorState::Idle;
            self.drain();
            tracing::info!(activation, code = %code, "barcode detected");
            return Some(code);
        }
        None
    }

    /// Stop the current activation without a detection.
    pub fn deactivate(&mut self) {
        if let DetectorState::Active { activation } = self.state {
            self.backend.stop();
            self.state = DetectorState::Idle;
            tracing::debug!(activation, "barcode scanner deactivated");
        }
        self.drain();
    }

    /// Stop for good; later activations are refused and pending events dropped.
    pub fn teardown(&mut self) {
        self.deactivate();
        self.state = DetectorState::TornDown;
    }

    fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}

impl<B: ScanBackend> Drop for BarcodeDetector<B> {
    fn drop(&mut self) {
        if self.is_active() {
            self.backend.stop();
        }
    }
}

/// Backend driven by hand (keyboard wedge scanners, tests/dev).
///
/// Codes are pushed through the paired [`ManualTrigger`]; they are delivered only
/// between `start` and `stop`.
#[derive(Debug, Default)]
pub struct ManualBackend {
    sender: Arc<Mutex<Option<DetectionSender>>>,
    starts: usize,
    stops: usize,
}

/// Pushes codes into a [`ManualBackend`].
#[derive(Debug, Clone)]
pub struct ManualTrigger {
    sender: Arc<Mutex<Option<DetectionSender>>>,
}

impl ManualBackend {
    pub fn new() -> (Self, ManualTrigger) {
        let backend = Self::default();
        let trigger = ManualTrigger {
            sender: Arc::clone(&backend.sender),
        };
        (backend, trigger)
    }

    pub fn starts(&self) -> usize {
        self.starts
    }

    pub fn stops(&self) -> usize {
        self.stops
    }
}

impl ScanBackend for ManualBackend {
    fn start(&mut self, _config: &ScannerConfig, sender: DetectionSender) -> LookupResult<()> {
        let mut slot = self
            .sender
            .lock()
            .map_err(|_| LookupError::scanner("manual backend lock poisoned"))?;
        *slot = Some(sender);
        self.starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        if let Ok(mut slot) = self.sender.lock() {
            *slot = None;
        }
        self.stops += 1;
    }
}

impl ManualTrigger {
    /// Deliver `code` if the backend is running. Returns whether it was sent.
    pub fn emit(&self, code: impl Into<String>) -> bool {
        match self.sender.lock() {
            Ok(slot) => slot.as_ref().is_some_and(|s| s.send(code)),
            Err(_) => false,
        }
    }
}
