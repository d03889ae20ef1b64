mod session;

pub use session::{ActiveSession, DestroyOutcome, SessionRecord};
