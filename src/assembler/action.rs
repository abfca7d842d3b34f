//! Tagged stud actions, replacing the source's per-stud Python closures.
//!
//! Every stud can carry at most one of these; the barrel runtime matches
//! on the tag rather than invoking an opaque callback, which keeps a
//! whole program trivially `Debug` and comparable.

use crate::sim::handles::{AxleId, CarriageId, CounterId, Direction};

/// Which kind of register a `Lift` stud engages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiftTarget {
    Axle(AxleId),
    PinionStack(crate::sim::handles::PinionStackId),
}

/// Where a "running up" condition is read from; the source tests this
/// identically for a carriage and a counter, but keeps the predicates
/// conceptually distinct, so this enum does too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunupSource {
    Carriage(CarriageId),
    Counter(CounterId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudAction {
    Move1,
    Move2,
    Move4,
    MoveBack,
    /// Engage an axle or pinion stack's finger to the given signed height
    /// (`+-DIGITFINGER_DISTANCE` for an axle), turning it in `direction`
    /// for as long as it stays lifted.
    Lift {
        target: LiftTarget,
        height: i32,
        direction: Direction,
    },
    /// Trigger the carriage compute/do-carriage pair at phases 16/17.
    Carry {
        carriage: CarriageId,
        direction: Direction,
    },
    /// Advance the units wheel of an axle's first stack by one, outside
    /// the normal finger-height dispatch.
    Count1 { axle: AxleId, direction: Direction },
    CounterChange { counter: CounterId, up: bool },
    CounterClear { counter: CounterId },
    /// Switch this barrel to the 20-phase long cycle for this vertical.
    SetLongCycle,
    /// At phase 18, set `doskip` from the named running-up flag, XORed
    /// with `invert`.
    ChkRunup { source: RunupSource, invert: bool },
    /// Halt the engine after this time unit.
    Stop,
}
