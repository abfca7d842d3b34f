use super::handles::{GearId, PinionId, PinionStackId};

/// One possible mesh: at this vertical position (or [`ALWAYS`](super::handles::ALWAYS)),
/// this pinion/wheel contacts the named partner.
#[derive(Debug, Clone, Copy)]
pub struct MeshRule {
    pub vposition: i32,
    pub partner: GearId,
}

/// A single pinion on a pinion stack.
#[derive(Debug, Clone)]
pub struct Pinion {
    pub stack: PinionStackId,
    pub index_in_stack: usize,
    pub gear: GearId,
    pub driven: bool,
    pub vposition: i32,
    pub possible_meshes: Vec<MeshRule>,
}

impl Pinion {
    pub fn new(stack: PinionStackId, index_in_stack: usize, gear: GearId) -> Self {
        Pinion {
            stack,
            index_in_stack,
            gear,
            driven: false,
            vposition: 0,
            possible_meshes: Vec::new(),
        }
    }
}

/// A vertical grouping of pinions, threaded and lifted as a unit. This is
/// the control-side analogue of a [`super::stack::DigitStack`]: instead of
/// digit wheels, it carries idle pinions used purely to propagate motion
/// into (or out of) the mesh graph.
#[derive(Debug, Clone)]
pub struct PinionStack {
    pub pinions: Vec<PinionId>,
    /// Current vertical offset of this stack, compared against each
    /// pinion's `possible_meshes` entries to decide which meshes are
    /// active this cycle.
    pub vposition: i32,
    /// Optional shift applied relative to another stack (the source's
    /// "long pinion" shift).
    pub shift: i32,
}

impl PinionStack {
    pub fn new(pinions: Vec<PinionId>) -> Self {
        PinionStack {
            pinions,
            vposition: 0,
            shift: 0,
        }
    }
}
