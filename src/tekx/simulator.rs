use rand::Rng;

use crate::tekx::{Bit, DeviceState, Inputs, Outputs};

pub const TX_MIN: f64 = 20.0;
pub const TX_MAX: f64 = 30.0;

/// Simulated TekX device. Outputs are random and do not depend on the inputs.
#[derive(Debug, Default)]
pub struct Simulator {
    state: DeviceState,
}

impl Simulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Applies new inputs and draws a fresh set of outputs.
    pub fn configure<R: Rng>(&mut self, rng: &mut R, inputs: Inputs) -> Outputs {
        let outputs = generate_outputs(rng);
        self.state = DeviceState { inputs, outputs };
        outputs
    }
}

pub fn generate_outputs<R: Rng>(rng: &mut R) -> Outputs {
    let do1 = Bit::from(rng.gen_bool(0.5));
    let do2 = Bit::from(rng.gen_bool(0.5));
    let tx = round_hundredths(rng.gen_range(TX_MIN..=TX_MAX));

    Outputs { do1, do2, tx }
}

fn round_hundredths(v: f64) -> f64 {
    (v * 100f64).round() / 100f64
}
