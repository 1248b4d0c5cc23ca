pub mod commodity;
pub mod engine;
pub mod sheet;
