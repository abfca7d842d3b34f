use super::handles::{CarriageId, Direction, StackId};

/// Magnitude of the two finger-engagement heights an axle can be lifted
/// to; the sign distinguishes the upper cage from the lower one.
pub const DIGITFINGER_DISTANCE: i32 = 1;

/// The central shaft threading a group of digit stacks. An axle starts
/// each operation at `fingerpos == 9`, matching the source.
#[derive(Debug, Clone)]
pub struct Axle {
    pub driven: bool,
    /// 0 when idle, `+-DIGITFINGER_DISTANCE` when lifted to engage the
    /// upper or lower cage.
    pub fingerheight: i32,
    pub fingerpos: u8,
    pub digitstacks: Vec<StackId>,
    pub carriage: Option<CarriageId>,
    /// Set by a `Count1` stud action just before this axle is enqueued;
    /// consumed (and cleared) on the next advance.
    pub count_by_1: bool,
    /// Which way this axle turns while lifted this cycle (addition vs.
    /// subtraction), set alongside `fingerheight` by a `Lift` stud action.
    pub operation_direction: Direction,
}

impl Axle {
    pub fn new(digitstacks: Vec<StackId>, carriage: Option<CarriageId>) -> Self {
        Axle {
            driven: false,
            fingerheight: 0,
            fingerpos: 9,
            digitstacks,
            carriage,
            count_by_1: false,
            operation_direction: Direction::Cw,
        }
    }

    /// Which digit stack, if any, is currently engaged by this axle's
    /// finger height. The source assigns the upper cage to the first half
    /// of `digitstacks` and the lower cage to the second half.
    pub fn engaged_stack(&self) -> Option<StackId> {
        if self.digitstacks.is_empty() {
            return None;
        }
        if self.fingerheight == DIGITFINGER_DISTANCE {
            self.digitstacks.first().copied()
        } else if self.fingerheight == -DIGITFINGER_DISTANCE {
            self.digitstacks.last().copied()
        } else {
            None
        }
    }
}
