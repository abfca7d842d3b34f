//! The mechanical component graph and its discrete-event scheduler: the
//! explicit simulation context that replaces the source's module-level
//! globals and owning back-references (see `DESIGN.md`).

pub mod axle;
pub mod barrel;
pub mod carriage;
pub mod counter;
pub mod gear;
pub mod handles;
pub mod mesh;
pub mod pinion;
pub mod scheduler;
pub mod stack;
pub mod wheel;

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::assembler::{Program, StudAction, StudTable};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

use axle::Axle;
use barrel::Barrel;
use carriage::AxleCarriage;
use counter::Counter;
use gear::Gear;
use handles::{
    AxleId, BarrelId, CarriageId, ComponentId, CounterId, Direction, GearId, PinionId,
    PinionStackId, ProgramId, StackId, WheelId,
};
use pinion::{Pinion, PinionStack};
use scheduler::{RandomSource, SeededRandom};
use stack::DigitStack;
use wheel::DigitWheel;

/// Owns every component registry, the stud table, and the scheduler
/// state. Everything is reached through this struct and a handle; there
/// are no owning references between components.
pub struct Engine {
    pub config: EngineConfig,
    pub stud_table: StudTable,

    gears: Vec<Gear>,
    pinions: Vec<Pinion>,
    pinion_stacks: Vec<PinionStack>,
    stacks: Vec<DigitStack>,
    axles: Vec<Axle>,
    carriages: Vec<AxleCarriage>,
    counters: Vec<Counter>,
    barrels: Vec<Barrel>,
    programs: Vec<Program>,

    pub(crate) gear_owner: HashMap<GearId, ComponentId>,
    names: HashMap<String, ComponentId>,

    awaiting_advance: Vec<(ComponentId, Direction)>,
    pub timeunit: u64,
    pub stopped: bool,
    rng: Box<dyn RandomSource>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let rng: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };
        Engine {
            config,
            stud_table: StudTable::new(),
            gears: Vec::new(),
            pinions: Vec::new(),
            pinion_stacks: Vec::new(),
            stacks: Vec::new(),
            axles: Vec::new(),
            carriages: Vec::new(),
            counters: Vec::new(),
            barrels: Vec::new(),
            programs: Vec::new(),
            gear_owner: HashMap::new(),
            names: HashMap::new(),
            awaiting_advance: Vec::new(),
            timeunit: 0,
            stopped: false,
            rng,
        }
    }

    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::new(config.with_seed(seed))
    }

    // ---- construction -------------------------------------------------

    fn new_gear(&mut self, direction: Direction, owner: ComponentId) -> GearId {
        let id = GearId(self.gears.len() as u32);
        self.gears.push(Gear::new(direction));
        self.gear_owner.insert(id, owner);
        id
    }

    /// Create a digit axle with `nstacks` digit stacks, each
    /// `config.ndigits` decimal digits wide plus a sign wheel.
    pub fn axle(&mut self, name: &str, nstacks: usize, with_carry: bool) -> AxleId {
        let axle_id = AxleId(self.axles.len() as u32);
        let mut stack_ids = Vec::with_capacity(nstacks);
        for _ in 0..nstacks {
            let stack_id = StackId(self.stacks.len() as u32);
            let ndigits = self.config.ndigits;
            let mut wheels = Vec::with_capacity(ndigits + 1);
            for d in 0..=ndigits {
                let wheel_id = WheelId {
                    stack: stack_id,
                    digit_index: d,
                };
                let gear = self.new_gear(Direction::Cw, ComponentId::Wheel(wheel_id));
                let mut wheel = DigitWheel::new(stack_id, d, gear);
                if with_carry && d < ndigits {
                    wheel = wheel.with_carry_tracking();
                }
                wheels.push(wheel);
            }
            self.stacks.push(DigitStack {
                axle: axle_id,
                wheels,
                count_by_1: false,
                doing_carries: false,
                changed: false,
                locked: false,
            });
            stack_ids.push(stack_id);
        }
        let carriage = if with_carry {
            let cid = CarriageId(self.carriages.len() as u32);
            self.carriages
                .push(AxleCarriage::new(axle_id, self.config.ndigits));
            Some(cid)
        } else {
            None
        };
        self.axles.push(Axle::new(stack_ids, carriage));
        self.names
            .insert(name.to_string(), ComponentId::Axle(axle_id));
        axle_id
    }

    pub fn counter(&mut self, name: &str, max: i32) -> CounterId {
        let id = CounterId(self.counters.len() as u32);
        self.counters.push(Counter::new(max));
        self.names
            .insert(name.to_string(), ComponentId::Counter(id));
        id
    }

    /// Register a possible mesh between every pinion of `stack` and the
    /// corresponding entry of `partners` (offset by `shift`), active
    /// whenever the stack's `vposition` equals `vposition` (or is
    /// [`handles::ALWAYS`]). Mirrors the source's `PinionStack.define_mesh`,
    /// including its "shift off either end is silently dropped" policy.
    pub fn define_mesh(
        &mut self,
        stack: PinionStackId,
        vposition: i32,
        partners: &[GearId],
        shift: i32,
    ) {
        let pinions = self.pinion_stacks[stack.index()].pinions.clone();
        for (ndx, pinion_id) in pinions.into_iter().enumerate() {
            let src = ndx as i32 + shift;
            if src >= 0 && (src as usize) < partners.len() {
                let partner = partners[src as usize];
                self.pinion_mut(pinion_id)
                    .possible_meshes
                    .push(pinion::MeshRule { vposition, partner });
            }
        }
    }

    /// The gears of a digit stack's digit wheels (excluding the sign
    /// wheel), in least-significant-first order - the shape Plan-27's
    /// pinion meshes are defined against.
    pub fn stack_digit_gears(&self, stack: StackId) -> Vec<GearId> {
        let ndigits = self.stack(stack).ndigits();
        (0..ndigits)
            .map(|i| {
                self.wheel(WheelId {
                    stack,
                    digit_index: i,
                })
                .gear
            })
            .collect()
    }

    /// The gears of every pinion in a pinion stack, in order.
    pub fn pinion_stack_gears(&self, stack: PinionStackId) -> Vec<GearId> {
        self.pinion_stacks[stack.index()]
            .pinions
            .iter()
            .map(|&p| self.pinion(p).gear)
            .collect()
    }

    /// Move every pinion of a stack to vertical position `vposition` at
    /// once - a stack is, per its doc comment, lifted as a single unit.
    /// Mesh activity is decided from each pinion's own `vposition` field
    /// (see `compute_meshes`), so this is what a `RAISE_P*`/`LOWER_P*`
    /// stud actually does.
    pub fn set_pinion_stack_vposition(&mut self, stack: PinionStackId, vposition: i32) {
        self.pinion_stacks[stack.index()].vposition = vposition;
        let pinions = self.pinion_stacks[stack.index()].pinions.clone();
        for pinion_id in pinions {
            self.pinion_mut(pinion_id).vposition = vposition;
        }
    }

    pub fn pinion_stack(&mut self, name: &str, count: usize) -> PinionStackId {
        let stack_id = PinionStackId(self.pinion_stacks.len() as u32);
        let mut pinion_ids = Vec::with_capacity(count);
        for i in 0..count {
            let pid = PinionId(self.pinions.len() as u32);
            let gear = self.new_gear(Direction::Cw, ComponentId::Pinion(pid));
            self.pinions.push(Pinion::new(stack_id, i, gear));
            pinion_ids.push(pid);
        }
        self.pinion_stacks.push(PinionStack::new(pinion_ids));
        self.names
            .insert(name.to_string(), ComponentId::Pinion(pinion_ids[0]));
        stack_id
    }

    pub fn barrel(&mut self, name: &str, program: Program) -> BarrelId {
        let pid = ProgramId(self.programs.len() as u32);
        self.programs.push(program);
        let id = BarrelId(self.barrels.len() as u32);
        self.barrels.push(Barrel::new(pid));
        self.names.insert(name.to_string(), ComponentId::Barrel(id));
        id
    }

    pub fn lookup(&self, name: &str) -> EngineResult<ComponentId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::UnknownName(name.to_string()))
    }

    // ---- accessors ------------------------------------------------------

    pub fn gear(&self, id: GearId) -> &Gear {
        &self.gears[id.index()]
    }
    pub fn gear_mut(&mut self, id: GearId) -> &mut Gear {
        &mut self.gears[id.index()]
    }
    pub fn gear_ids(&self) -> Vec<GearId> {
        (0..self.gears.len() as u32).map(GearId).collect()
    }

    pub fn pinion(&self, id: PinionId) -> &Pinion {
        &self.pinions[id.index()]
    }
    pub fn pinion_mut(&mut self, id: PinionId) -> &mut Pinion {
        &mut self.pinions[id.index()]
    }
    pub fn pinion_ids(&self) -> Vec<PinionId> {
        (0..self.pinions.len() as u32).map(PinionId).collect()
    }

    pub fn stack(&self, id: StackId) -> &DigitStack {
        &self.stacks[id.index()]
    }
    pub fn stack_mut(&mut self, id: StackId) -> &mut DigitStack {
        &mut self.stacks[id.index()]
    }

    pub fn wheel(&self, id: WheelId) -> &DigitWheel {
        &self.stacks[id.stack.index()].wheels[id.digit_index]
    }
    pub fn wheel_mut(&mut self, id: WheelId) -> &mut DigitWheel {
        &mut self.stacks[id.stack.index()].wheels[id.digit_index]
    }
    pub fn wheel_ids(&self) -> Vec<WheelId> {
        let mut ids = Vec::new();
        for (si, stack) in self.stacks.iter().enumerate() {
            for wi in 0..stack.wheels.len() {
                ids.push(WheelId {
                    stack: StackId(si as u32),
                    digit_index: wi,
                });
            }
        }
        ids
    }

    pub fn axle(&self, id: AxleId) -> &Axle {
        &self.axles[id.index()]
    }
    pub fn axle_mut(&mut self, id: AxleId) -> &mut Axle {
        &mut self.axles[id.index()]
    }
    pub fn axle_ids(&self) -> Vec<AxleId> {
        (0..self.axles.len() as u32).map(AxleId).collect()
    }

    /// The `index`'th digit stack threaded by `axle` (0 = upper cage, 1 =
    /// lower cage for a two-stack axle).
    pub fn axle_digit_stack(&self, axle: AxleId, index: usize) -> StackId {
        self.axle(axle).digitstacks[index]
    }

    /// The carriage attached to `axle`. Panics if it was created without
    /// one; callers only use this on axles they built `with_carry`.
    pub fn axle_carriage(&self, axle: AxleId) -> CarriageId {
        self.axle(axle)
            .carriage
            .expect("axle has no attached carriage")
    }

    pub fn carriage(&self, id: CarriageId) -> &AxleCarriage {
        &self.carriages[id.index()]
    }
    pub fn carriage_mut(&mut self, id: CarriageId) -> &mut AxleCarriage {
        &mut self.carriages[id.index()]
    }

    pub fn counter_ref(&self, id: CounterId) -> &Counter {
        &self.counters[id.index()]
    }
    pub fn counter_mut(&mut self, id: CounterId) -> &mut Counter {
        &mut self.counters[id.index()]
    }

    pub fn barrel_ref(&self, id: BarrelId) -> &Barrel {
        &self.barrels[id.index()]
    }
    pub fn barrel_mut(&mut self, id: BarrelId) -> &mut Barrel {
        &mut self.barrels[id.index()]
    }

    pub fn program(&self, id: ProgramId) -> &Program {
        &self.programs[id.index()]
    }

    // ---- scheduler ------------------------------------------------------

    /// Add `component` to this time unit's advance list, turning it in
    /// `direction`. Fails if it is already driven (axles are exempt: the
    /// barrel runtime legitimately re-enqueues them across several
    /// phases).
    pub fn enqueue_component(
        &mut self,
        component: ComponentId,
        direction: Direction,
    ) -> EngineResult<()> {
        let already_driven = self.is_driven(component);
        if already_driven && !matches!(component, ComponentId::Axle(_)) {
            return Err(EngineError::DoubleDriven(component.debug_name()));
        }
        self.set_driven(component, true);
        self.awaiting_advance.push((component, direction));
        trace!(target: "ae::queues", ?component, ?direction, "enqueued");
        Ok(())
    }

    fn is_driven(&self, component: ComponentId) -> bool {
        match component {
            ComponentId::Gear(id) => self.gear(id).driven,
            ComponentId::Pinion(id) => self.pinion(id).driven,
            ComponentId::Wheel(id) => self.wheel(id).driven,
            ComponentId::Axle(id) => self.axle(id).driven,
            ComponentId::Counter(id) => self.counter_ref(id).driven,
            ComponentId::Barrel(id) => self.barrel_ref(id).driven,
        }
    }

    fn set_driven(&mut self, component: ComponentId, driven: bool) {
        match component {
            ComponentId::Gear(id) => self.gear_mut(id).driven = driven,
            ComponentId::Pinion(id) => self.pinion_mut(id).driven = driven,
            ComponentId::Wheel(id) => self.wheel_mut(id).driven = driven,
            ComponentId::Axle(id) => self.axle_mut(id).driven = driven,
            ComponentId::Counter(id) => self.counter_mut(id).driven = driven,
            ComponentId::Barrel(id) => self.barrel_mut(id).driven = driven,
        }
    }

    /// Drain the advance list in uniformly random order until empty, then
    /// clear non-axle driven flags and move on to the next time unit.
    pub fn timeunit_tick(&mut self) -> EngineResult<()> {
        let span = tracing::debug_span!("timeunit", timeunit = self.timeunit);
        let _enter = span.enter();
        while !self.awaiting_advance.is_empty() {
            let idx = self.rng.gen_range(self.awaiting_advance.len());
            let (component, direction) = self.awaiting_advance.swap_remove(idx);
            if !self.is_driven(component) {
                return Err(EngineError::NotDriven(component.debug_name()));
            }
            self.advance(component, direction)?;
        }
        for id in self.gear_ids() {
            self.gear_mut(id).driven = false;
        }
        for id in self.pinion_ids() {
            self.pinion_mut(id).driven = false;
        }
        for id in self.wheel_ids() {
            self.wheel_mut(id).driven = false;
        }
        self.timeunit += 1;
        Ok(())
    }

    /// Run time units until the `Stop` stud action sets `stopped`, or the
    /// configured time limit is reached.
    pub fn run_until_stopped(&mut self) -> EngineResult<u64> {
        loop {
            self.timeunit_tick()?;
            if self.stopped {
                return Ok(self.timeunit);
            }
            if let Some(limit) = self.config.time_limit {
                if self.timeunit >= limit {
                    return Ok(self.timeunit);
                }
            }
        }
    }

    fn advance(&mut self, component: ComponentId, direction: Direction) -> EngineResult<()> {
        debug!(target: "ae::advance", ?component, ?direction, "advance");
        match component {
            ComponentId::Gear(id) => self.advance_gear(id, direction),
            ComponentId::Pinion(id) => self.advance_pinion(id, direction),
            ComponentId::Wheel(id) => self.advance_wheel(id, direction),
            ComponentId::Axle(id) => self.advance_axle(id, direction),
            ComponentId::Counter(id) => {
                let up = matches!(direction, Direction::Cw);
                self.counter_mut(id).advance(up);
                Ok(())
            }
            ComponentId::Barrel(id) => self.advance_barrel(id, direction),
        }
    }

    fn advance_gear(&mut self, id: GearId, direction: Direction) -> EngineResult<()> {
        self.gear_mut(id).direction = direction;
        self.drive_meshed_gears(id, direction)
    }

    fn advance_pinion(&mut self, id: PinionId, direction: Direction) -> EngineResult<()> {
        let gear = self.pinion(id).gear;
        self.advance_gear(gear, direction)
    }

    fn advance_wheel(&mut self, id: WheelId, direction: Direction) -> EngineResult<()> {
        let old = self.wheel(id).whposition;
        // A wheel driven directly by the axle's finger dispatch carries an
        // explicit target (so every engaged wheel lands on the same
        // fingerpos in lockstep); a wheel driven only by mesh propagation
        // from a neighbor simply turns one tooth in the incoming direction.
        let next = self.wheel(id).next_whposition.unwrap_or_else(|| {
            let delta: i32 = if matches!(direction, Direction::Cw) { 1 } else { -1 };
            (old as i32 + delta).rem_euclid(10) as u8
        });
        let delta = (next as i32 - old as i32).rem_euclid(10);
        if delta != 1 && delta != 9 {
            return Err(EngineError::IllegalWheelMove(format!(
                "{:?} moved by {} positions",
                id, delta
            )));
        }
        self.wheel_mut(id).whposition = next;
        self.wheel_mut(id).next_whposition = None;
        self.stack_mut(id.stack).changed = true;
        trace!(target: "ae::wheels", ?id, old, next, "wheel advanced");

        let doing_carries = self.stack(id.stack).doing_carries;
        if let Some(state) = self.wheel(id).carry.as_ref() {
            let mut warned = state.carry_warned;
            if !doing_carries {
                warned = match direction {
                    Direction::Ccw => next == 9,
                    Direction::Cw => next == 0,
                };
            }
            self.wheel_mut(id).carry.as_mut().unwrap().carry_warned = warned;
        }

        let gear = self.wheel(id).gear;
        self.drive_meshed_gears(gear, direction)
    }

    fn advance_axle(&mut self, id: AxleId, direction: Direction) -> EngineResult<()> {
        if !self.axle(id).driven {
            return Ok(());
        }
        let fingerpos = self.axle(id).fingerpos;
        self.axle_mut(id).fingerpos = if fingerpos == 0 { 9 } else { fingerpos - 1 };
        let new_fingerpos = self.axle(id).fingerpos;

        if self.axle(id).count_by_1 {
            self.axle_mut(id).count_by_1 = false;
            if let Some(&first) = self.axle(id).digitstacks.first() {
                let units = WheelId {
                    stack: first,
                    digit_index: 0,
                };
                let cur = self.wheel(units).whposition;
                let delta: i32 = if matches!(direction, Direction::Cw) { 1 } else { -1 };
                let next = (cur as i32 + delta).rem_euclid(10) as u8;
                self.wheel_mut(units).next_whposition = Some(next);
                self.enqueue_component(ComponentId::Wheel(units), direction)?;
            }
            return Ok(());
        }

        if let Some(stack_id) = self.axle(id).engaged_stack() {
            let ndigits = self.stack(stack_id).ndigits() + 1;
            for wi in 0..ndigits {
                let wheel_id = WheelId {
                    stack: stack_id,
                    digit_index: wi,
                };
                let pos = self.wheel(wheel_id).whposition;
                if (pos as u32 + 1) % 10 == new_fingerpos as u32 {
                    self.wheel_mut(wheel_id).next_whposition = Some(new_fingerpos);
                    self.enqueue_component(ComponentId::Wheel(wheel_id), direction)?;
                }
            }
        }
        Ok(())
    }
}
