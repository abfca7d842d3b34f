use super::handles::{AxleId, CarriageId, ComponentId, Direction, WheelId};
use super::Engine;
use crate::error::EngineResult;

/// An anticipating-carriage module watching the lowest cage of an axle's
/// digit stack, propagating carry-warnings into carry-needed moves one
/// phase later.
#[derive(Debug, Clone)]
pub struct AxleCarriage {
    pub axle: AxleId,
    pub carry_needed: Vec<bool>,
    pub running_up: bool,
    pub direction: Direction,
}

impl AxleCarriage {
    pub fn new(axle: AxleId, ndigits: usize) -> Self {
        AxleCarriage {
            axle,
            carry_needed: vec![false; ndigits],
            running_up: false,
            direction: Direction::Cw,
        }
    }
}

impl Engine {
    /// Phase 16: walk the lowest cage's wheels from the units digit
    /// upward, marking `carry_needed` for every wheel past the first
    /// `carry_warned` one whose own position also rolled over, stopping
    /// at the first wheel that didn't.
    pub fn compute_carriage(&mut self, carriage: CarriageId, direction: Direction) {
        self.carriage_mut(carriage).running_up = false;
        self.carriage_mut(carriage).direction = direction;
        let axle = self.carriage(carriage).axle;
        let Some(&stack_id) = self.axle(axle).digitstacks.first() else {
            return;
        };
        let ndigits = self.stack(stack_id).ndigits();
        let rollover_value = match direction {
            Direction::Ccw => 0,
            Direction::Cw => 9,
        };
        let mut chain_broken = false;
        for wn in 0..ndigits {
            let wheel_id = WheelId {
                stack: stack_id,
                digit_index: wn,
            };
            let warned = self
                .wheel(wheel_id)
                .carry
                .map(|c| c.carry_warned)
                .unwrap_or(false);
            if wn == 0 {
                chain_broken = !warned;
                continue;
            }
            if chain_broken {
                self.carriage_mut(carriage).carry_needed[wn] = false;
                continue;
            }
            let rolled = self.wheel(wheel_id).whposition == rollover_value;
            self.carriage_mut(carriage).carry_needed[wn] = rolled;
            if !rolled {
                chain_broken = true;
            }
        }
    }

    /// Phase 17: for every digit needing a carry (or directly warned),
    /// queue a unit move on the next wheel up, or set `running_up` if the
    /// carry would fall off the top of the register.
    pub fn do_carriage(&mut self, carriage: CarriageId, direction: Direction) -> EngineResult<()> {
        let axle = self.carriage(carriage).axle;
        let Some(&stack_id) = self.axle(axle).digitstacks.first() else {
            return Ok(());
        };
        let ndigits = self.stack(stack_id).ndigits();
        for wn in 0..ndigits {
            let wheel_id = WheelId {
                stack: stack_id,
                digit_index: wn,
            };
            let warned = self
                .wheel(wheel_id)
                .carry
                .map(|c| c.carry_warned)
                .unwrap_or(false);
            let needed = self.carriage(carriage).carry_needed[wn];
            if warned || needed {
                if wn == ndigits - 1 {
                    self.carriage_mut(carriage).running_up = true;
                } else {
                    let next_wheel = WheelId {
                        stack: stack_id,
                        digit_index: wn + 1,
                    };
                    let cur = self.wheel(next_wheel).whposition;
                    let delta: i32 = if matches!(direction, Direction::Cw) { 1 } else { -1 };
                    let next = (cur as i32 + delta).rem_euclid(10) as u8;
                    self.wheel_mut(next_wheel).next_whposition = Some(next);
                    self.enqueue_component(ComponentId::Wheel(next_wheel), direction)?;
                }
                if let Some(state) = self.wheel_mut(wheel_id).carry.as_mut() {
                    state.carry_warned = false;
                }
                self.carriage_mut(carriage).carry_needed[wn] = false;
            }
        }
        self.stack_mut(stack_id).doing_carries = true;
        Ok(())
    }
}
