//! ArgoCD API data models
//!
//! Domain types live in `application`; `wire` holds the JSON shapes the
//! API server speaks and `patch` the update overrides applied to them.

mod application;
mod patch;
mod sync;
mod wire;

#[allow(unused_imports)]
pub use application::{
    Application, ApplicationDestination, ApplicationSource, ApplicationStatus,
    ApplicationSyncPolicy, DEFAULT_APP_NAMESPACE, DEFAULT_PROJECT, DEFAULT_TARGET_REVISION,
    UNKNOWN_STATUS,
};
pub use patch::ApplicationPatch;
pub use sync::{PropagationPolicy, RefreshMode, SyncRequest, SyncStrategy};
#[allow(unused_imports)]
pub use wire::{
    WireApplication, WireAutomated, WireDestination, WireMetadata, WireSource, WireSpec,
    WireStatus, WireStatusField, WireSyncPolicy,
};
