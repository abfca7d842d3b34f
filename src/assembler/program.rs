use std::collections::{HashMap, HashSet};

use crate::error::{AssembleError, AssembleResult};

use super::stud::{StudId, StudTable, MOVE1, MOVE2, MOVE4, MOVEBACK};

#[derive(Debug, Clone, Default)]
struct LabelRec {
    vertex: usize,
    defined: bool,
    pending_refs: HashSet<usize>,
}

/// One vertical: the set of ON studs as built so far. `resolved` is filled
/// in by [`Program::end_program`] and is the dense, sorted stud-number
/// list the runtime actually reads.
#[derive(Debug, Clone, Default)]
pub struct Vertical {
    on_studs: Vec<StudId>,
    pub resolved: Option<Vec<u32>>,
}

impl Vertical {
    /// The raw stud number engaged for stud pair `id` (either the ON or
    /// OFF number), once the program has been through `end_program`.
    pub fn stud_number(&self, id: StudId) -> u32 {
        self.resolved.as_ref().expect("program not finalized")[id.0 as usize]
    }

    pub fn is_on(&self, id: StudId) -> bool {
        self.stud_number(id) == id.on()
    }
}

/// One barrel's microprogram: an ordered list of verticals plus the label
/// table used to resolve jumps between them.
#[derive(Debug, Clone)]
pub struct Program {
    pub name: String,
    pub verticals: Vec<Vertical>,
    labels: HashMap<String, LabelRec>,
    pub skip_verticals: HashSet<usize>,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Program {
            name: name.into(),
            verticals: Vec::new(),
            labels: HashMap::new(),
            skip_verticals: HashSet::new(),
        }
    }

    pub fn label_at(&self, vertex: usize) -> Option<&str> {
        self.labels
            .iter()
            .find(|(_, lab)| lab.defined && lab.vertex == vertex)
            .map(|(name, _)| name.as_str())
    }

    pub fn label_vertex(&self, name: &str) -> Option<usize> {
        self.labels.get(name).filter(|l| l.defined).map(|l| l.vertex)
    }

    fn define_label(&mut self, name: &str, here: usize) -> AssembleResult<()> {
        if let Some(lab) = self.labels.get(name).cloned() {
            if lab.defined {
                return Err(AssembleError::DuplicateLabel(name.to_string()));
            }
            let pending = lab.pending_refs.clone();
            let entry = self.labels.get_mut(name).unwrap();
            entry.vertex = here;
            entry.defined = true;
            entry.pending_refs.clear();
            for vref in pending {
                let studs = jmpgen(here as i64 - vref as i64, vref)?;
                self.verticals[vref].on_studs.extend(studs);
            }
        } else {
            if self.labels.values().any(|l| l.defined && l.vertex == here) {
                return Err(AssembleError::RedundantLabel {
                    vertical: here,
                    existing: self
                        .label_at(here)
                        .unwrap_or("?")
                        .to_string(),
                    new: name.to_string(),
                });
            }
            self.labels.insert(
                name.to_string(),
                LabelRec {
                    vertex: here,
                    defined: true,
                    pending_refs: HashSet::new(),
                },
            );
        }
        Ok(())
    }

    fn resolve_jump(&mut self, label: &str, here: usize) -> AssembleResult<Vec<StudId>> {
        if let Some(lab) = self.labels.get(label) {
            if lab.defined {
                return jmpgen(lab.vertex as i64 - here as i64, here);
            }
            self.labels.get_mut(label).unwrap().pending_refs.insert(here);
        } else {
            let mut pending_refs = HashSet::new();
            pending_refs.insert(here);
            self.labels.insert(
                label.to_string(),
                LabelRec {
                    vertex: 0,
                    defined: false,
                    pending_refs,
                },
            );
        }
        Ok(Vec::new())
    }

    /// Define one vertical: an optional label at this position, the set
    /// of studs to turn ON, and an optional jump target. Mirrors the
    /// source's three-section `vertical(*argv)` call, split into explicit
    /// parameters since Rust has no positional-type-sniffing varargs.
    pub fn vertical(
        &mut self,
        table: &StudTable,
        label: Option<&str>,
        studs: &[StudId],
        jump: Option<&str>,
    ) -> AssembleResult<usize> {
        let here = self.verticals.len();
        if let Some(name) = label {
            self.define_label(name, here)?;
        }
        let mut on_studs = Vec::new();
        for &stud in studs {
            if on_studs.contains(&stud) {
                continue;
            }
            on_studs.push(stud);
            if table.get(stud).can_skip {
                self.skip_verticals.insert(here);
            }
        }
        if let Some(target) = jump {
            let jump_studs = self.resolve_jump(target, here)?;
            on_studs.extend(jump_studs);
        }
        self.verticals.push(Vertical {
            on_studs,
            resolved: None,
        });
        Ok(here)
    }

    /// Finalize the program: verify every label was defined, add the
    /// implicit +1 jump to any vertical with no move stud, fill in OFF
    /// studs for every pair left unset, and sort each vertical by stud
    /// number.
    pub fn end_program(&mut self, table: &StudTable) -> AssembleResult<()> {
        for (name, lab) in &self.labels {
            if !lab.pending_refs.is_empty() {
                return Err(AssembleError::UndefinedLabel(name.clone()));
            }
        }
        let first_user = table.first_user_stud().0;
        for vert in self.verticals.iter_mut() {
            let has_move = vert.on_studs.iter().any(|s| s.0 < first_user);
            if !has_move {
                vert.on_studs.push(MOVE1);
            }
            let on_set: HashSet<u32> = vert.on_studs.iter().map(|s| s.0).collect();
            let mut resolved = vec![0u32; table.len()];
            for pair in 0..table.len() as u32 {
                resolved[pair as usize] = if on_set.contains(&pair) {
                    pair * 2
                } else {
                    pair * 2 + 1
                };
            }
            vert.resolved = Some(resolved);
        }
        Ok(())
    }
}

/// Generate the ON-stud list for a jump of `n` positions (signed),
/// decomposing the magnitude greedily over {4, 2, 1} and adding MOVEBACK
/// when negative. Fails if `|n| > 7` or `n == 0`.
pub fn jmpgen(n: i64, here: usize) -> AssembleResult<Vec<StudId>> {
    if n == 0 {
        return Err(AssembleError::ZeroJump);
    }
    let mut studs = Vec::new();
    let mut mag = n;
    if mag < 0 {
        studs.push(MOVEBACK);
        mag = -mag;
    }
    if mag > 7 {
        let _ = here;
        return Err(AssembleError::JumpTooFar(n));
    }
    if mag > 3 {
        studs.push(MOVE4);
        mag -= 4;
    }
    if mag > 1 {
        studs.push(MOVE2);
        mag -= 2;
    }
    if mag > 0 {
        studs.push(MOVE1);
    }
    Ok(studs)
}
