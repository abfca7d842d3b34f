//! The barrel microprogram assembler: build a stud vocabulary, write
//! verticals against it, and resolve jumps and defaults into a packed
//! program ready to load onto a [`crate::sim::barrel::Barrel`].

mod action;
mod disasm;
mod program;
mod stud;

pub use action::{LiftTarget, RunupSource, StudAction};
pub use program::{jmpgen, Program, Vertical};
pub use stud::{Stud, StudId, StudTable, MOVE1, MOVE2, MOVE4, MOVEBACK};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssembleError;

    fn build_counting_program() -> (StudTable, Program) {
        let mut table = StudTable::new();
        let a = table.create_stud("A", None, false);
        let b = table.create_stud("B", None, true);
        let mut prog = Program::new("test program");
        prog.vertical(&table, Some("start"), &[a], None).unwrap();
        prog.vertical(&table, None, &[b], Some("start")).unwrap();
        (table, prog)
    }

    #[test]
    fn backward_jump_resolves_to_moveback() {
        let (table, mut prog) = build_counting_program();
        prog.end_program(&table).unwrap();
        // vertical 1 jumps back to vertical 0: distance -1
        assert!(prog.verticals[1].is_on(MOVEBACK));
        assert!(prog.verticals[1].is_on(MOVE1));
        assert!(!prog.verticals[1].is_on(MOVE2));
        assert!(!prog.verticals[1].is_on(MOVE4));
    }

    #[test]
    fn forward_jump_patches_after_label_defined() {
        let mut table = StudTable::new();
        let a = table.create_stud("A", None, false);
        let mut prog = Program::new("fwd");
        prog.vertical(&table, None, &[a], Some("later")).unwrap();
        prog.vertical(&table, None, &[a], None).unwrap();
        prog.vertical(&table, None, &[a], None).unwrap();
        prog.vertical(&table, Some("later"), &[a], None).unwrap();
        prog.end_program(&table).unwrap();
        // vertical 0 -> vertical 3: distance +3 = MOVE2 + MOVE1
        assert!(prog.verticals[0].is_on(MOVE2));
        assert!(prog.verticals[0].is_on(MOVE1));
        assert!(!prog.verticals[0].is_on(MOVE4));
        assert!(!prog.verticals[0].is_on(MOVEBACK));
    }

    #[test]
    fn undefined_label_is_an_error() {
        let mut table = StudTable::new();
        let a = table.create_stud("A", None, false);
        let mut prog = Program::new("bad");
        prog.vertical(&table, None, &[a], Some("nowhere")).unwrap();
        let err = prog.end_program(&table).unwrap_err();
        assert_eq!(err, AssembleError::UndefinedLabel("nowhere".to_string()));
    }

    #[test]
    fn jump_distance_over_seven_is_rejected() {
        let mut table = StudTable::new();
        let a = table.create_stud("A", None, false);
        let mut prog = Program::new("far");
        prog.vertical(&table, Some("origin"), &[a], None).unwrap();
        for _ in 0..8 {
            prog.vertical(&table, None, &[a], None).unwrap();
        }
        let err = prog
            .vertical(&table, None, &[a], Some("origin"))
            .unwrap_err();
        assert_eq!(err, AssembleError::JumpTooFar(-8));
    }

    #[test]
    fn default_vertical_gets_implicit_plus_one() {
        let mut table = StudTable::new();
        let a = table.create_stud("A", None, false);
        let mut prog = Program::new("implicit");
        prog.vertical(&table, None, &[a], None).unwrap();
        prog.end_program(&table).unwrap();
        assert!(prog.verticals[0].is_on(MOVE1));
        assert!(!prog.verticals[0].is_on(MOVE2));
        assert!(!prog.verticals[0].is_on(MOVE4));
        assert!(!prog.verticals[0].is_on(MOVEBACK));
    }
}
