pub mod frame;
pub mod rect;
