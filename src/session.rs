use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::Value;

use crate::api::SubmissionOutcome;
use crate::types::{CanonicalBarcode, ScanEvent, assemble};
use crate::utils::format_local_time;

/// Symbologies the camera is asked to look for.
pub const CAPTURE_TYPES: [&str; 9] = [
    "pdf417", "ean13", "ean8", "upc_a", "upc_e", "code128", "code39", "code93", "itf14",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Pending,
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Armed,
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    pub locked: bool,
    pub camera_on: bool,
    pub torch_on: bool,
    pub submitting: bool,
}

/// What the scanning capability is told to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    pub active: bool,
    pub torch: bool,
    pub barcode_types: &'static [&'static str],
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("camera permission has not been granted yet")]
    PermissionPending,
    #[error("camera permission was denied")]
    PermissionDenied,
    #[error("camera is already open")]
    CameraAlreadyOpen,
    #[error("camera is already closed")]
    CameraAlreadyClosed,
    #[error("torch needs the camera to be open")]
    CameraOff,
    #[error("no scan is waiting to be cleared")]
    NotLocked,
    #[error("the last scan is still being submitted")]
    SubmissionInFlight,
}

/// Outcome of a submission, as shown to the operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Submitted {
        payload: Value,
        scanned_at: Option<DateTime<Utc>>,
    },
    Rejected,
    TransportFailure,
}

impl Notice {
    pub fn message(&self, tz: Tz) -> String {
        match self {
            Notice::Submitted {
                scanned_at: Some(at),
                ..
            } => format!(
                "Código de barras cadastrado com sucesso (lido em {})",
                format_local_time(at, tz)
            ),
            Notice::Submitted { .. } => "Código de barras cadastrado com sucesso".to_string(),
            Notice::Rejected => "O servidor recusou o cadastro do código de barras".to_string(),
            Notice::TransportFailure => {
                "Não foi possível cadastrar o código de barras: falha de comunicação".to_string()
            }
        }
    }
}

/// Owns the state of one scanning screen. Accepts a single scan, then stays
/// locked until the operator asks to scan again.
#[derive(Debug)]
pub struct ScanSession {
    permission: Permission,
    state: SessionState,
    pending: Option<CanonicalBarcode>,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            permission: Permission::Pending,
            state: SessionState::default(),
            pending: None,
        }
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        if self.state.locked {
            Phase::Locked
        } else if self.state.camera_on {
            Phase::Armed
        } else {
            Phase::Idle
        }
    }

    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            active: self.phase() == Phase::Armed,
            torch: self.state.camera_on && self.state.torch_on,
            barcode_types: &CAPTURE_TYPES,
        }
    }

    /// Records the platform's answer to the camera permission prompt. A denial
    /// is final.
    pub fn resolve_permission(&mut self, granted: bool) {
        if self.permission == Permission::Denied {
            return;
        }
        self.permission = if granted {
            Permission::Granted
        } else {
            Permission::Denied
        };
        tracing::info!(permission = ?self.permission, "camera permission resolved");
    }

    fn require_permission(&self) -> Result<(), SessionError> {
        match self.permission {
            Permission::Granted => Ok(()),
            Permission::Pending => Err(SessionError::PermissionPending),
            Permission::Denied => Err(SessionError::PermissionDenied),
        }
    }

    pub fn open_camera(&mut self) -> Result<(), SessionError> {
        self.require_permission()?;
        if self.state.camera_on {
            return Err(SessionError::CameraAlreadyOpen);
        }
        self.state.camera_on = true;
        tracing::debug!(phase = ?self.phase(), "camera opened");
        Ok(())
    }

    pub fn close_camera(&mut self) -> Result<(), SessionError> {
        self.require_permission()?;
        if !self.state.camera_on {
            return Err(SessionError::CameraAlreadyClosed);
        }
        self.state.camera_on = false;
        self.state.torch_on = false;
        tracing::debug!(phase = ?self.phase(), "camera closed");
        Ok(())
    }

    /// Flips the torch and returns its new state.
    pub fn toggle_torch(&mut self) -> Result<bool, SessionError> {
        self.require_permission()?;
        if !self.state.camera_on {
            return Err(SessionError::CameraOff);
        }
        self.state.torch_on = !self.state.torch_on;
        Ok(self.state.torch_on)
    }

    /// Takes a scan while armed, locking the session and marking the record as
    /// being submitted. Scans that arrive in any other phase are dropped.
    pub fn accept_scan(&mut self, event: &ScanEvent, now: DateTime<Utc>) -> Option<CanonicalBarcode> {
        if self.phase() != Phase::Armed {
            tracing::debug!(phase = ?self.phase(), data = %event.raw_data, "scan ignored");
            return None;
        }
        let record = assemble(&event.raw_type, &event.raw_data, now);
        if !record.symbology.is_known() {
            tracing::warn!(raw_type = %event.raw_type, "unrecognized symbology");
        }
        self.state.locked = true;
        self.state.submitting = true;
        self.pending = Some(record.clone());
        Some(record)
    }

    pub fn complete_submission(&mut self, outcome: SubmissionOutcome) -> Notice {
        self.state.submitting = false;
        let record = self.pending.take();
        match outcome {
            SubmissionOutcome::Accepted(payload) => Notice::Submitted {
                payload,
                scanned_at: record.map(|r| r.scanned_at),
            },
            SubmissionOutcome::Rejected => Notice::Rejected,
            SubmissionOutcome::TransportFailure => Notice::TransportFailure,
        }
    }

    pub fn scan_again(&mut self) -> Result<(), SessionError> {
        if !self.state.locked {
            return Err(SessionError::NotLocked);
        }
        if self.state.submitting {
            return Err(SessionError::SubmissionInFlight);
        }
        self.state.locked = false;
        tracing::debug!(phase = ?self.phase(), "session unlocked");
        Ok(())
    }
}
