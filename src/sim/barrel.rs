//! The barrel runtime: interprets each vertical as a 15- or 20-phase
//! micro-sequence, firing stud actions, running the mesh graph, and
//! reducing the next-vertical jump distance.

use tracing::trace;

use crate::assembler::{LiftTarget, RunupSource, StudAction, MOVE1, MOVE2, MOVE4, MOVEBACK};
use crate::error::{EngineError, EngineResult};

use super::handles::{AxleId, BarrelId, ComponentId, Direction, ProgramId};
use super::Engine;

#[derive(Debug, Clone)]
pub struct Barrel {
    pub program: ProgramId,
    pub phase: u32,
    pub position: usize,
    pub move_distance: i64,
    pub doskip: bool,
    pub jump_backwards: bool,
    pub num_phases: u32,
    pub driven: bool,
    pub cycles: u64,
}

impl Barrel {
    pub fn new(program: ProgramId) -> Self {
        Barrel {
            program,
            phase: 1,
            position: 0,
            move_distance: 1,
            doskip: false,
            jump_backwards: false,
            num_phases: 15,
            driven: true,
            cycles: 0,
        }
    }
}

impl Engine {
    /// Load a program onto a barrel at the given starting vertical and
    /// enqueue it to begin running. Call once before the first
    /// `timeunit_tick`.
    pub fn reset_barrel(&mut self, id: BarrelId, position: usize) -> EngineResult<()> {
        let program_id = self.barrel_ref(id).program;
        let vert = self
            .program(program_id)
            .verticals
            .get(position)
            .ok_or_else(|| EngineError::NoProgram(format!("{:?}", id)))?
            .clone();
        let jump_backwards = vert.is_on(MOVEBACK);
        let mut distance: i64 = 0;
        if vert.is_on(MOVE1) {
            distance += 1;
        }
        if vert.is_on(MOVE2) {
            distance += 2;
        }
        if vert.is_on(MOVE4) {
            distance += 4;
        }
        if jump_backwards {
            distance = -distance;
        }

        let barrel = self.barrel_mut(id);
        barrel.position = position;
        barrel.phase = 1;
        barrel.move_distance = distance;
        barrel.doskip = false;
        barrel.jump_backwards = jump_backwards;
        barrel.num_phases = 15;
        barrel.cycles += 1;
        barrel.driven = true;
        trace!(target: "ae::barrels", ?id, position, distance, "barrel reset");
        self.enqueue_component(ComponentId::Barrel(id), Direction::Cw)
    }

    pub(crate) fn advance_barrel(&mut self, id: BarrelId, direction: Direction) -> EngineResult<()> {
        let phase = self.barrel_ref(id).phase;
        trace!(target: "ae::barrels", ?id, phase, "barrel phase");
        self.run_phase(id, phase)?;

        let num_phases = self.barrel_ref(id).num_phases;
        if phase >= num_phases {
            let vert = self.barrel_ref(id).position;
            let distance = self.barrel_ref(id).move_distance;
            let nverts = self.program(self.barrel_ref(id).program).verticals.len() as i64;
            let next = (vert as i64 + distance).rem_euclid(nverts) as usize;
            self.reset_barrel(id, next)?;
        } else {
            self.barrel_mut(id).phase += 1;
            self.enqueue_component(ComponentId::Barrel(id), direction)?;
        }
        Ok(())
    }

    fn run_phase(&mut self, id: BarrelId, phase: u32) -> EngineResult<()> {
        let program_id = self.barrel_ref(id).program;
        let vert = self.barrel_ref(id).position;
        let resolved = self
            .program(program_id)
            .verticals
            .get(vert)
            .ok_or_else(|| EngineError::NoProgram(format!("{:?}", id)))?
            .clone();

        match phase {
            3 => self.compute_meshes(),
            13 => self.remove_meshes(),
            _ => {}
        }

        let actions: Vec<StudAction> = self
            .stud_table
            .iter()
            .filter(|stud| resolved.is_on(stud.id))
            .filter_map(|stud| stud.action)
            .collect();
        for action in actions {
            self.apply_action(id, phase, action)?;
        }

        // Giving-off window: every axle that has ever been lifted or
        // counted stays `driven` for the rest of the run (it never gets
        // cleared outside this window), so each phase here just gives it
        // another chance to step its fingers.
        if (4..=12).contains(&phase) || phase == 14 {
            let driven_axles: Vec<(AxleId, Direction)> = self
                .axle_ids()
                .into_iter()
                .filter(|&axle_id| self.axle(axle_id).driven)
                .map(|axle_id| (axle_id, self.axle(axle_id).operation_direction))
                .collect();
            for (axle_id, direction) in driven_axles {
                self.enqueue_component(ComponentId::Axle(axle_id), direction)?;
            }
        }

        if phase == 18 {
            let doskip = self.barrel_ref(id).doskip;
            if doskip {
                let sign = if self.barrel_ref(id).jump_backwards {
                    -1
                } else {
                    1
                };
                self.barrel_mut(id).move_distance += sign;
                self.barrel_mut(id).doskip = false;
            }
        }
        Ok(())
    }

    fn apply_action(&mut self, id: BarrelId, phase: u32, action: StudAction) -> EngineResult<()> {
        match action {
            // The move/back studs' effect on move_distance is decoded
            // directly in `reset_barrel`; the phases at which the source
            // physically pushes each one (12, 10-11, 6-9) don't change
            // the logical outcome, so there is nothing left to do here.
            StudAction::Move1 | StudAction::Move2 | StudAction::Move4 | StudAction::MoveBack => {
                Ok(())
            }
            // A Lift stud engages its target at phase 2 (when the barrel
            // sets up meshing for this vertical) and disengages it again
            // at phase 13 (once the meshes have been undone).
            StudAction::Lift {
                target,
                height,
                direction,
            } => {
                match target {
                    LiftTarget::Axle(axle) => {
                        if phase == 2 {
                            self.axle_mut(axle).fingerheight = height;
                            self.axle_mut(axle).operation_direction = direction;
                            self.axle_mut(axle).driven = true;
                        } else if phase == 13 {
                            self.axle_mut(axle).fingerheight = 0;
                        }
                    }
                    LiftTarget::PinionStack(stack) => {
                        if phase == 2 {
                            self.set_pinion_stack_vposition(stack, height);
                        } else if phase == 13 {
                            self.set_pinion_stack_vposition(stack, 0);
                        }
                    }
                }
                Ok(())
            }
            StudAction::Carry {
                carriage,
                direction,
            } => {
                match phase {
                    16 => self.compute_carriage(carriage, direction),
                    17 => self.do_carriage(carriage, direction)?,
                    18 => {
                        // Stop suppressing carry-warn re-entry for the
                        // next cycle now that this cycle's carries ran.
                        let axle = self.carriage(carriage).axle;
                        if let Some(&stack_id) = self.axle(axle).digitstacks.first() {
                            self.stack_mut(stack_id).doing_carries = false;
                        }
                    }
                    _ => {}
                }
                Ok(())
            }
            StudAction::Count1 { axle, direction } => {
                if phase == 2 {
                    self.axle_mut(axle).count_by_1 = true;
                    self.axle_mut(axle).operation_direction = direction;
                    self.axle_mut(axle).driven = true;
                }
                Ok(())
            }
            StudAction::CounterChange { counter, up } => {
                if phase == 4 {
                    let direction = if up { Direction::Cw } else { Direction::Ccw };
                    self.enqueue_component(ComponentId::Counter(counter), direction)?;
                }
                Ok(())
            }
            StudAction::CounterClear { counter } => {
                if phase == 4 {
                    self.counter_mut(counter).clear();
                }
                Ok(())
            }
            StudAction::SetLongCycle => {
                if phase == 2 {
                    self.barrel_mut(id).num_phases = 20;
                }
                Ok(())
            }
            StudAction::ChkRunup { source, invert } => {
                if phase == 18 {
                    let running_up = match source {
                        RunupSource::Carriage(c) => self.carriage(c).running_up,
                        RunupSource::Counter(c) => self.counter_ref(c).running_up,
                    };
                    self.barrel_mut(id).doskip = running_up ^ invert;
                }
                Ok(())
            }
            StudAction::Stop => {
                if phase == 2 {
                    self.stopped = true;
                }
                Ok(())
            }
        }
    }
}
