use crate::config::EngineConfig;

use super::handles::AxleId;
use super::wheel::DigitWheel;

/// A vertical grouping of digit wheels threaded by one axle, plus a sign
/// wheel at the end (`whposition` restricted to 0 = positive, 1 =
/// negative).
#[derive(Debug, Clone)]
pub struct DigitStack {
    pub axle: AxleId,
    /// `wheels[0..ndigits]` are decimal digits, least significant first;
    /// `wheels[ndigits]` is the sign wheel.
    pub wheels: Vec<DigitWheel>,
    pub count_by_1: bool,
    pub doing_carries: bool,
    pub changed: bool,
    pub locked: bool,
}

impl DigitStack {
    pub fn sign_index(&self) -> usize {
        self.wheels.len() - 1
    }

    pub fn ndigits(&self) -> usize {
        self.wheels.len() - 1
    }

    /// Read the stack as a signed decimal integer. Mirrors the source's
    /// `_printvalue`/meta read helper, including its `10^ndigits - 1`
    /// sentinel for "overflowed / unset".
    pub fn value(&self, config: &EngineConfig) -> i128 {
        let ndigits = self.ndigits();
        let mut magnitude: i128 = 0;
        for i in (0..ndigits).rev() {
            magnitude = magnitude * 10 + self.wheels[i].whposition as i128;
        }
        if magnitude + 1 == config.sentinel() + 1 {
            return config.sentinel();
        }
        if self.wheels[self.sign_index()].whposition == 1 {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Set the stack from a signed decimal integer. Mirrors the source's
    /// `_setvalue` meta helper.
    pub fn set_value(&mut self, mut value: i128, config: &EngineConfig) {
        let ndigits = self.ndigits();
        let negative = value < 0;
        if negative {
            value = -value;
        }
        for i in 0..ndigits {
            self.wheels[i].whposition = (value % 10) as u8;
            self.wheels[i].next_whposition = None;
            value /= 10;
        }
        self.wheels[self.sign_index()].whposition = if negative { 1 } else { 0 };
        self.wheels[self.sign_index()].next_whposition = None;
        let _ = config;
    }
}
