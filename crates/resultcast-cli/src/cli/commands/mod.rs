pub mod dispatch;
pub mod listen;
pub mod ping;
pub mod report;

pub use dispatch::dispatch;
