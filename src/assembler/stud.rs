use std::collections::HashMap;

use crate::error::{AssembleError, AssembleResult};

use super::action::StudAction;

/// Index of a stud *pair* (the ON stud is at `2*StudId`, the OFF stud at
/// `2*StudId + 1`). This is the handle user code holds onto; the raw
/// stud numbers are an assembler implementation detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StudId(pub u32);

impl StudId {
    pub fn on(self) -> u32 {
        self.0 * 2
    }
    pub fn off(self) -> u32 {
        self.0 * 2 + 1
    }
}

#[derive(Debug, Clone)]
pub struct Stud {
    pub name: String,
    pub id: StudId,
    pub action: Option<StudAction>,
    pub can_skip: bool,
}

/// The full vocabulary of studs available to barrel programs on one
/// barrel. The first four entries are always MOVE1, MOVE2, MOVE4,
/// MOVEBACK, created by [`StudTable::new`].
#[derive(Debug, Clone)]
pub struct StudTable {
    studs: Vec<Stud>,
    by_name: HashMap<String, StudId>,
}

pub const MOVE1: StudId = StudId(0);
pub const MOVE2: StudId = StudId(1);
pub const MOVE4: StudId = StudId(2);
pub const MOVEBACK: StudId = StudId(3);

impl StudTable {
    pub fn new() -> Self {
        let mut table = StudTable {
            studs: Vec::new(),
            by_name: HashMap::new(),
        };
        table.create_stud("MOVE1", Some(StudAction::Move1), false);
        table.create_stud("MOVE2", Some(StudAction::Move2), false);
        table.create_stud("MOVE4", Some(StudAction::Move4), false);
        table.create_stud("MOVEBACK", Some(StudAction::MoveBack), false);
        table
    }

    /// First pair index that is not one of the four built-in move studs.
    pub fn first_user_stud(&self) -> StudId {
        StudId(4)
    }

    pub fn create_stud(
        &mut self,
        name: impl Into<String>,
        action: Option<StudAction>,
        can_skip: bool,
    ) -> StudId {
        let id = StudId(self.studs.len() as u32);
        let name = name.into();
        self.studs.push(Stud {
            name: name.clone(),
            id,
            action,
            can_skip,
        });
        self.by_name.insert(name, id);
        id
    }

    pub fn lookup(&self, name: &str) -> AssembleResult<StudId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| AssembleError::UnknownStud(name.to_string()))
    }

    pub fn get(&self, id: StudId) -> &Stud {
        &self.studs[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.studs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.studs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stud> {
        self.studs.iter()
    }
}

impl Default for StudTable {
    fn default() -> Self {
        Self::new()
    }
}
