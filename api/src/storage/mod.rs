pub mod counter;
pub mod guarded;

pub use counter::AtomicCounter;
pub use guarded::{GuardedList, GuardedMap, StorageError};
