mod bit;
mod reading;
mod simulator;
mod state;

pub use bit::*;
pub use reading::*;
pub use simulator::*;
pub use state::*;
