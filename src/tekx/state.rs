use crate::tekx::Bit;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inputs {
    pub a: Bit,

    pub b: Bit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Outputs {
    pub do1: Bit,

    pub do2: Bit,

    /// Temperature, `[20.0, 30.0]` rounded to 2 decimals.
    pub tx: f64,
}

/// Last known inputs and outputs of the simulated device, all zero until the
/// first configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeviceState {
    pub inputs: Inputs,

    pub outputs: Outputs,
}
