//!
//! Logger of the payment link initiator.
//!
//! Events are emitted through `tracing`; installing a subscriber is left to the embedding
//! application.
//!

#[doc(inline)]
pub use tracing::{debug, error, info, instrument, warn};
