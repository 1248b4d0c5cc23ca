pub mod parity;
pub mod quantity;
pub mod session;
