//! Runtime permission checks.
//!
//! Reading the step counter needs the activity-recognition capability.
//! Platforms that predate runtime grants hold it implicitly; newer ones ask
//! the user. [`PermissionGate`] hides which of those applies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Capabilities the tracker may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Access to step counting and other activity sensors.
    ActivityRecognition,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ActivityRecognition => write!(f, "activity_recognition"),
        }
    }
}

/// Outcome of a permission check or request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// The capability is held.
    Granted,
    /// The user refused, or the capability is not held.
    Denied,
    /// The platform grants this capability without asking.
    NotRequired,
}

impl PermissionStatus {
    /// Whether the guarded feature may be used.
    pub fn allows_access(self) -> bool {
        !matches!(self, PermissionStatus::Denied)
    }
}

/// Platform capability check and request.
pub trait PermissionGate {
    /// Whether the capability is already held.
    fn has_permission(&self, capability: Capability) -> bool;

    /// Whether the platform asks the user for this capability at runtime.
    fn requires_runtime_grant(&self, _capability: Capability) -> bool {
        true
    }

    /// Asks for the capability and reports the user's answer.
    fn request(&self, capability: Capability) -> impl Future<Output = PermissionStatus> + Send;
}

/// Checks the gate without prompting.
pub fn check_permission<G: PermissionGate>(gate: &G, capability: Capability) -> PermissionStatus {
    if !gate.requires_runtime_grant(capability) {
        PermissionStatus::NotRequired
    } else if gate.has_permission(capability) {
        PermissionStatus::Granted
    } else {
        PermissionStatus::Denied
    }
}

/// Checks the gate and prompts if the capability is missing.
pub async fn ensure_permission<G: PermissionGate>(
    gate: &G,
    capability: Capability,
) -> PermissionStatus {
    match check_permission(gate, capability) {
        PermissionStatus::Denied => {}
        PermissionStatus::Granted => {
            tracing::debug!(%capability, "Permission already held");
            return PermissionStatus::Granted;
        }
        PermissionStatus::NotRequired => return PermissionStatus::NotRequired,
    }

    let status = gate.request(capability).await;
    match status {
        PermissionStatus::Denied => tracing::warn!(%capability, "Permission denied"),
        _ => tracing::info!(%capability, "Permission granted"),
    }
    status
}

/// A gate whose answers are fixed up front.
///
/// `request` cannot change its mind: it reports whatever was configured.
#[derive(Debug, Clone, Copy)]
pub struct StaticPermissionGate {
    granted: bool,
    runtime_required: bool,
}

impl StaticPermissionGate {
    /// A gate that holds the capability (or not) and requires runtime grants.
    pub fn new(granted: bool) -> Self {
        Self {
            granted,
            runtime_required: true,
        }
    }

    /// A gate for platforms that grant the capability without asking.
    pub fn not_required() -> Self {
        Self {
            granted: false,
            runtime_required: false,
        }
    }
}

impl PermissionGate for StaticPermissionGate {
    fn has_permission(&self, _capability: Capability) -> bool {
        self.granted
    }

    fn requires_runtime_grant(&self, _capability: Capability) -> bool {
        self.runtime_required
    }

    async fn request(&self, _capability: Capability) -> PermissionStatus {
        if self.granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}
