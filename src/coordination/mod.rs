//! Order coordination - placement phases and the reveal loop
//!
//! The coordinator:
//! 1. Prices a swap intent and sizes the secret set from the chosen preset
//! 2. Generates secrets and builds the hashlock commitment
//! 3. Creates and submits the order to the relayer network
//! 4. Drives the reveal loop until the order reaches a terminal status

pub mod driver;

pub use driver::{CancelFlag, PlacedOrder, SwapCoordinator, SwapOutcome};
