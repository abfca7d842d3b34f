//! Newtype handles standing in for the source's owning back-references.
//!
//! Every cross-component reference (digit stack -> axle, gear -> meshed
//! gear, barrel -> program) is one of these, resolved against the
//! registries owned by [`crate::sim::Engine`]. None of them borrow or own
//! anything; they are `Copy` indices.

macro_rules! handle {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

handle!(GearId);
handle!(PinionId);
handle!(PinionStackId);
handle!(StackId);
handle!(AxleId);
handle!(CarriageId);
handle!(CounterId);
handle!(BarrelId);
handle!(ProgramId);

/// A digit wheel is owned inline by its [`StackId`], not stored in a flat
/// registry, so its handle is the owning stack plus an index rather than
/// a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WheelId {
    pub stack: StackId,
    pub digit_index: usize,
}

/// Sentinel meaning "this mesh is active at every vertical position",
/// matching the source's `ALWAYS` constant.
pub const ALWAYS: i32 = 99;

/// Rotation direction shared by every rotating component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Cw,
    Ccw,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Cw => Direction::Ccw,
            Direction::Ccw => Direction::Cw,
        }
    }
}

/// A mesh partner: the other end of a gear-to-gear contact. Stored as a
/// handle, never an owning reference, so two objects can mesh and unmesh
/// freely without fighting the borrow checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshPartner {
    Gear(GearId),
    Pinion(PinionId),
    Wheel(WheelId),
}

/// A component as it sits on the scheduler's advance list. This is the
/// tagged-variant stand-in for the source's ad hoc polymorphism over
/// "anything with an advance(direction) method".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentId {
    Gear(GearId),
    Pinion(PinionId),
    Wheel(WheelId),
    Axle(AxleId),
    Counter(CounterId),
    Barrel(BarrelId),
}

impl ComponentId {
    pub fn debug_name(&self) -> String {
        format!("{:?}", self)
    }
}
