//! Sample storage: seven voices, 64 slots each.
//!
//! Slots 0-9 are the core range a voice plays from, 0-19 are reserved for
//! factory content and 20-63 are free for the user. Each stored sample
//! carries its validation report and a payload that moves from raw or
//! path-backed towards decoded (or failed) as it is used.

pub mod pack;
pub mod sample;
pub mod slots;

pub use pack::{plan_pack, scan_pack_dir, validate_pack, PackEntry, PackError, PackPlan, PackReport};
pub use sample::{FetchState, Readiness, SamplePayload, SampleRecord, SlotStatus};
pub use slots::{normalize_playback_slot, SampleBank, SlotCounts};
