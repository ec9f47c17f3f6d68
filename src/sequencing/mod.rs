pub mod automation;
pub mod pattern;
pub mod transport;

pub use automation::{AutomationTarget, StepAutomation};
pub use pattern::{generate_groove, Pattern, PatternBanks};
pub use transport::{SequenceRange, VoiceTransport, MAX_RATCHET};
