use super::handles::{Direction, GearId, MeshPartner};

/// A rotatable gear. Gears drive whatever they are currently meshed with;
/// `meshes` is rebuilt every vertical by [`super::mesh`] rather than held
/// as a standing set of owned references.
#[derive(Debug, Clone)]
pub struct Gear {
    pub direction: Direction,
    /// Which gear is driving this one this time unit, if any. `None` means
    /// this gear is the original source of motion (e.g. an axle's own
    /// gear), not a follower.
    pub driving_gear: Option<GearId>,
    pub meshes: Vec<MeshPartner>,
    pub driven: bool,
}

impl Gear {
    pub fn new(direction: Direction) -> Self {
        Gear {
            direction,
            driving_gear: None,
            meshes: Vec::new(),
            driven: false,
        }
    }
}
