//! Stateful services around the pure domain: the live session directory and
//! its collaborators.

pub mod propagation;
pub mod sessions;
pub mod sweeper;
pub mod wallet;

pub use propagation::{EventPublisher, NoopPublisher, RecordingPublisher};
pub use sessions::{GameEnd, SessionDirectory, SessionOutcome};
pub use sweeper::spawn_idle_sweeper;
pub use wallet::{apply_settlement, InMemoryWallet, Wallet, WalletFailure};
