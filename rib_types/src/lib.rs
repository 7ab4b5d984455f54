pub mod pos;
pub mod token;
pub mod wire;
