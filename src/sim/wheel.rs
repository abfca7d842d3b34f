use super::handles::{GearId, StackId};

/// Carry-warning state carried only by the lowest cage's wheels, i.e. the
/// ones an [`super::carriage::AxleCarriage`] watches. Kept as an `Option`
/// field on [`DigitWheel`] rather than a second type, since every other
/// field and every advance rule is identical between a plain wheel and a
/// carry-tracking one.
#[derive(Debug, Clone, Copy, Default)]
pub struct CarryState {
    pub carry_warned: bool,
}

/// A digit wheel: one decimal position (0..=9) in a [`super::stack::DigitStack`].
/// Digit wheels never carry their own mesh rules - meshes into a digit
/// stack's gears are always defined from the pinion side
/// (`Engine::define_mesh`), so unlike a `Pinion` a wheel has no
/// `possible_meshes` field.
#[derive(Debug, Clone)]
pub struct DigitWheel {
    pub stack: StackId,
    pub digit_index: usize,
    pub gear: GearId,
    pub whposition: u8,
    pub next_whposition: Option<u8>,
    pub driven: bool,
    pub carry: Option<CarryState>,
}

impl DigitWheel {
    pub fn new(stack: StackId, digit_index: usize, gear: GearId) -> Self {
        DigitWheel {
            stack,
            digit_index,
            gear,
            whposition: 0,
            next_whposition: None,
            driven: false,
            carry: None,
        }
    }

    pub fn with_carry_tracking(mut self) -> Self {
        self.carry = Some(CarryState::default());
        self
    }
}
