// Purpose - the engine's view of its host: a clock and a way to read sample bytes

pub mod clock;
pub mod fetch;

pub use clock::{AudioClock, FrameClock, ManualClock};
pub use fetch::{FetchCompletion, FetchError, FetchResponder, FetchTicket, FileFetcher, NoFetcher, SampleFetcher};
