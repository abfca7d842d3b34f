//! The multiply and divide barrel microprograms wired onto Plan-27: every
//! named stud from the original configuration, its barrel-assembler
//! "macro" sets, and the literal vertical sequences of `mulpgm`/`divpgm`.

use crate::assembler::{LiftTarget, Program, RunupSource, StudAction, StudId, StudTable};
use crate::error::AssembleResult;
use crate::plan27::Plan27;
use crate::sim::axle::DIGITFINGER_DISTANCE;
use crate::sim::handles::Direction;

const LONGPINION_DISTANCE: i32 = 1;
const REVERSE_PINION_DISTANCE: i32 = 1;
const FC_DISTANCE: i32 = 1;
const DIGITMESH_DISTANCE: i32 = 1;

/// Every named stud of the multiply/divide vocabulary, resolved against a
/// particular [`Plan27`] topology.
pub struct Studs {
    pub raise_mp1: StudId,
    pub raise_mp2: StudId,
    pub raise_mp3: StudId,
    pub reverse_r1: StudId,
    pub reverse_fc1: StudId,
    pub mesh_fc1: StudId,
    pub reverse_r2: StudId,
    pub reverse_fc2: StudId,
    pub mesh_fc2: StudId,
    pub raise_p11: StudId,
    pub lower_p11: StudId,
    pub lower_p12: StudId,
    pub raise_p12: StudId,
    pub raise_p13: StudId,
    pub raise_p14: StudId,
    pub raise_p21: StudId,
    pub lower_p21: StudId,
    pub raise_p22: StudId,
    pub lower_p22: StudId,
    pub lower_p23: StudId,
    pub raise_p24: StudId,
    pub raise_p31: StudId,
    pub lower_p31: StudId,
    pub raise_p32: StudId,
    pub lower_p32: StudId,
    pub raise_a: StudId,
    pub lower_a: StudId,
    pub raise_b: StudId,
    pub lower_b: StudId,
    pub raise_c: StudId,
    pub lower_c: StudId,
    pub raise_f1: StudId,
    pub raise_f2: StudId,
    pub add_f1c: StudId,
    pub sub_f1c: StudId,
    pub add_f2c: StudId,
    pub sub_f2c: StudId,
    pub minus1f1: StudId,
    pub minus1f2: StudId,
    pub plus1f1: StudId,
    pub plus1ctr: StudId,
    pub minus1ctr: StudId,
    pub clearctr: StudId,
    pub if_runup_f1: StudId,
    pub if_runup_f2: StudId,
    pub if_norunup_f1: StudId,
    pub if_norunup_f2: StudId,
    pub if_runup_ctr: StudId,
    pub if_norunup_ctr: StudId,
    pub cycle20: StudId,
    pub stop: StudId,
}

/// Create every stud of the multiply/divide vocabulary on `table`, wired to
/// `plan`'s handles. Call once per [`crate::sim::Engine`].
pub fn register_studs(table: &mut StudTable, plan: &Plan27) -> Studs {
    let lift_pinions = |stack, height| {
        Some(StudAction::Lift {
            target: LiftTarget::PinionStack(stack),
            height,
            // Pinion-stack lifts never read direction; see the match arm
            // in barrel::apply_action.
            direction: Direction::Cw,
        })
    };
    // Giving-off for a digit axle always turns it the same way (the
    // source hardcodes CCW for the barrel's per-phase axle enqueue); only
    // Count1 and Carry studs carry a real add/subtract direction.
    let lift_axle = |axle, height| {
        Some(StudAction::Lift {
            target: LiftTarget::Axle(axle),
            height,
            direction: Direction::Ccw,
        })
    };

    let raise_mp1 = table.create_stud("RAISE_MP1", lift_pinions(plan.mp1, LONGPINION_DISTANCE), false);
    let raise_mp2 = table.create_stud("RAISE_MP2", lift_pinions(plan.mp2, LONGPINION_DISTANCE), false);
    let raise_mp3 = table.create_stud("RAISE_MP3", lift_pinions(plan.mp3, LONGPINION_DISTANCE), false);
    let reverse_r1 = table.create_stud("REVERSE_R1", lift_pinions(plan.r1, REVERSE_PINION_DISTANCE), false);
    let reverse_fc1 = table.create_stud("REVERSE_FC1", lift_pinions(plan.fc1, FC_DISTANCE), false);
    let mesh_fc1 = table.create_stud("MESH_FC1", lift_pinions(plan.fc1, 2 * FC_DISTANCE), false);
    let reverse_r2 = table.create_stud("REVERSE_R2", lift_pinions(plan.r2, REVERSE_PINION_DISTANCE), false);
    let reverse_fc2 = table.create_stud("REVERSE_FC2", lift_pinions(plan.fc2, FC_DISTANCE), false);
    let mesh_fc2 = table.create_stud("MESH_FC2", lift_pinions(plan.fc2, 2 * FC_DISTANCE), false);
    let raise_p11 = table.create_stud("RAISE_P11", lift_pinions(plan.p11, DIGITMESH_DISTANCE), false);
    let lower_p11 = table.create_stud("LOWER_P11", lift_pinions(plan.p11, -DIGITMESH_DISTANCE), false);
    let lower_p12 = table.create_stud("LOWER_P12", lift_pinions(plan.p12, -DIGITMESH_DISTANCE), false);
    let raise_p12 = table.create_stud("RAISE_P12", lift_pinions(plan.p12, DIGITMESH_DISTANCE), false);
    let raise_p13 = table.create_stud("RAISE_P13", lift_pinions(plan.p13, DIGITMESH_DISTANCE), false);
    let raise_p14 = table.create_stud("RAISE_P14", lift_pinions(plan.p14, DIGITMESH_DISTANCE), false);
    let raise_p21 = table.create_stud("RAISE_P21", lift_pinions(plan.p21, DIGITMESH_DISTANCE), false);
    let lower_p21 = table.create_stud("LOWER_P21", lift_pinions(plan.p21, -DIGITMESH_DISTANCE), false);
    let raise_p22 = table.create_stud("RAISE_P22", lift_pinions(plan.p22, DIGITMESH_DISTANCE), false);
    let lower_p22 = table.create_stud("LOWER_P22", lift_pinions(plan.p22, -DIGITMESH_DISTANCE), false);
    let lower_p23 = table.create_stud("LOWER_P23", lift_pinions(plan.p23, -DIGITMESH_DISTANCE), false);
    let raise_p24 = table.create_stud("RAISE_P24", lift_pinions(plan.p24, DIGITMESH_DISTANCE), false);
    let raise_p31 = table.create_stud("RAISE_P31", lift_pinions(plan.p31, DIGITMESH_DISTANCE), false);
    let lower_p31 = table.create_stud("LOWER_P31", lift_pinions(plan.p31, -DIGITMESH_DISTANCE), false);
    let raise_p32 = table.create_stud("RAISE_P32", lift_pinions(plan.p32, DIGITMESH_DISTANCE), false);
    let lower_p32 = table.create_stud("LOWER_P32", lift_pinions(plan.p32, -DIGITMESH_DISTANCE), false);
    let raise_a = table.create_stud("RAISE_A", lift_axle(plan.a, DIGITFINGER_DISTANCE), false);
    let lower_a = table.create_stud("LOWER_A", lift_axle(plan.a, -DIGITFINGER_DISTANCE), false);
    let raise_b = table.create_stud("RAISE_B", lift_axle(plan.b, DIGITFINGER_DISTANCE), false);
    let lower_b = table.create_stud("LOWER_B", lift_axle(plan.b, -DIGITFINGER_DISTANCE), false);
    let raise_c = table.create_stud("RAISE_C", lift_axle(plan.c, DIGITFINGER_DISTANCE), false);
    let lower_c = table.create_stud("LOWER_C", lift_axle(plan.c, -DIGITFINGER_DISTANCE), false);
    let raise_f1 = table.create_stud("RAISE_F1", lift_axle(plan.f1, DIGITFINGER_DISTANCE), false);
    let raise_f2 = table.create_stud("RAISE_F2", lift_axle(plan.f2, DIGITFINGER_DISTANCE), false);
    let add_f1c = table.create_stud(
        "ADD_F1C",
        Some(StudAction::Carry {
            carriage: plan.f1c,
            direction: Direction::Cw,
        }),
        false,
    );
    let sub_f1c = table.create_stud(
        "SUB_F1C",
        Some(StudAction::Carry {
            carriage: plan.f1c,
            direction: Direction::Ccw,
        }),
        false,
    );
    let add_f2c = table.create_stud(
        "ADD_F2C",
        Some(StudAction::Carry {
            carriage: plan.f2c,
            direction: Direction::Cw,
        }),
        false,
    );
    let sub_f2c = table.create_stud(
        "SUB_F2C",
        Some(StudAction::Carry {
            carriage: plan.f2c,
            direction: Direction::Ccw,
        }),
        false,
    );
    let minus1f1 = table.create_stud(
        "MINUS1F1",
        Some(StudAction::Count1 {
            axle: plan.f1,
            direction: Direction::Ccw,
        }),
        false,
    );
    let minus1f2 = table.create_stud(
        "MINUS1F2",
        Some(StudAction::Count1 {
            axle: plan.f2,
            direction: Direction::Ccw,
        }),
        false,
    );
    let plus1f1 = table.create_stud(
        "PLUS1F1",
        Some(StudAction::Count1 {
            axle: plan.f1,
            direction: Direction::Cw,
        }),
        false,
    );
    let plus1ctr = table.create_stud(
        "PLUS1CTR",
        Some(StudAction::CounterChange {
            counter: plan.ctr,
            up: true,
        }),
        false,
    );
    let minus1ctr = table.create_stud(
        "MINUS1CTR",
        Some(StudAction::CounterChange {
            counter: plan.ctr,
            up: false,
        }),
        false,
    );
    let clearctr = table.create_stud(
        "CLEARCTR",
        Some(StudAction::CounterClear { counter: plan.ctr }),
        false,
    );
    let if_runup_f1 = table.create_stud(
        "IF_RUNUP_F1",
        Some(StudAction::ChkRunup {
            source: RunupSource::Carriage(plan.f1c),
            invert: true,
        }),
        true,
    );
    let if_runup_f2 = table.create_stud(
        "IF_RUNUP_F2",
        Some(StudAction::ChkRunup {
            source: RunupSource::Carriage(plan.f2c),
            invert: true,
        }),
        true,
    );
    let if_norunup_f1 = table.create_stud(
        "IF_NORUNUP_F1",
        Some(StudAction::ChkRunup {
            source: RunupSource::Carriage(plan.f1c),
            invert: false,
        }),
        true,
    );
    let if_norunup_f2 = table.create_stud(
        "IF_NORUNUP_F2",
        Some(StudAction::ChkRunup {
            source: RunupSource::Carriage(plan.f2c),
            invert: false,
        }),
        true,
    );
    let if_runup_ctr = table.create_stud(
        "IF_RUNUP_CTR",
        Some(StudAction::ChkRunup {
            source: RunupSource::Counter(plan.ctr),
            invert: true,
        }),
        true,
    );
    let if_norunup_ctr = table.create_stud(
        "IF_NORUNUP_CTR",
        Some(StudAction::ChkRunup {
            source: RunupSource::Counter(plan.ctr),
            invert: false,
        }),
        true,
    );
    let cycle20 = table.create_stud("CYCLE20", Some(StudAction::SetLongCycle), false);
    let stop = table.create_stud("STOP", Some(StudAction::Stop), false);

    Studs {
        raise_mp1,
        raise_mp2,
        raise_mp3,
        reverse_r1,
        reverse_fc1,
        mesh_fc1,
        reverse_r2,
        reverse_fc2,
        mesh_fc2,
        raise_p11,
        lower_p11,
        lower_p12,
        raise_p12,
        raise_p13,
        raise_p14,
        raise_p21,
        lower_p21,
        raise_p22,
        lower_p22,
        lower_p23,
        raise_p24,
        raise_p31,
        lower_p31,
        raise_p32,
        lower_p32,
        raise_a,
        lower_a,
        raise_b,
        lower_b,
        raise_c,
        lower_c,
        raise_f1,
        raise_f2,
        add_f1c,
        sub_f1c,
        add_f2c,
        sub_f2c,
        minus1f1,
        minus1f2,
        plus1f1,
        plus1ctr,
        minus1ctr,
        clearctr,
        if_runup_f1,
        if_runup_f2,
        if_norunup_f1,
        if_norunup_f2,
        if_runup_ctr,
        if_norunup_ctr,
        cycle20,
        stop,
    }
}

/// Macro sets: named groups of studs that turn on together for one
/// "give-off" step, matching the barrel-assembler macros of the original
/// configuration. A few (e.g. `b1_add_b2`) mirror the source vocabulary
/// but aren't used by either program below.
#[allow(dead_code)]
impl Studs {
    fn a1_add_a2(&self) -> Vec<StudId> {
        vec![self.raise_a, self.raise_p11, self.lower_p12]
    }
    fn a2_add_b1(&self) -> Vec<StudId> {
        vec![self.lower_a, self.lower_p11, self.raise_p14]
    }
    fn a2_shl_add_a1(&self) -> Vec<StudId> {
        vec![self.lower_a, self.lower_p11, self.raise_mp1, self.raise_p12]
    }
    fn b1_add_b2(&self) -> Vec<StudId> {
        vec![self.raise_b, self.raise_p22, self.lower_p21]
    }
    fn b1_add_a1(&self) -> Vec<StudId> {
        vec![self.raise_b, self.raise_p13, self.raise_p12]
    }
    fn b1_shr_add_c2(&self) -> Vec<StudId> {
        vec![self.raise_b, self.raise_p22, self.raise_mp2, self.lower_p23]
    }
    fn b1_shr_add_b2(&self) -> Vec<StudId> {
        vec![self.raise_b, self.raise_p22, self.raise_mp2, self.lower_p21]
    }
    fn b1_add_f1(&self) -> Vec<StudId> {
        vec![
            self.raise_b,
            self.raise_p22,
            self.reverse_r1,
            self.reverse_fc1,
            self.add_f1c,
            self.cycle20,
        ]
    }
    fn b1_sub_f1(&self) -> Vec<StudId> {
        vec![self.raise_b, self.raise_p22, self.mesh_fc1, self.sub_f1c, self.cycle20]
    }
    fn b2_add_f1(&self) -> Vec<StudId> {
        vec![
            self.lower_b,
            self.lower_p22,
            self.reverse_r1,
            self.reverse_fc1,
            self.add_f1c,
            self.cycle20,
        ]
    }
    fn b2_sub_f1(&self) -> Vec<StudId> {
        vec![self.lower_b, self.lower_p22, self.mesh_fc1, self.sub_f1c, self.cycle20]
    }
    fn b2_add_b1(&self) -> Vec<StudId> {
        vec![self.lower_b, self.lower_p22, self.raise_p21]
    }
    fn b2_shr_add_b1(&self) -> Vec<StudId> {
        vec![self.lower_b, self.lower_p22, self.raise_mp2, self.raise_p21]
    }
    fn c1_add_f2(&self) -> Vec<StudId> {
        vec![
            self.raise_c,
            self.raise_p32,
            self.reverse_r2,
            self.reverse_fc2,
            self.add_f2c,
            self.cycle20,
        ]
    }
    fn c1_sub_f2(&self) -> Vec<StudId> {
        vec![self.raise_c, self.raise_p32, self.mesh_fc2, self.sub_f2c, self.cycle20]
    }
    fn c1_add_c2(&self) -> Vec<StudId> {
        vec![self.raise_c, self.raise_p32, self.lower_p31]
    }
    fn c1_shl_add_c2(&self) -> Vec<StudId> {
        vec![self.raise_c, self.raise_p31, self.raise_mp3, self.lower_p32]
    }
    fn c1_shr_add_c2(&self) -> Vec<StudId> {
        vec![self.raise_c, self.raise_p32, self.raise_mp3, self.lower_p31]
    }
    fn c2_shl_add_c1(&self) -> Vec<StudId> {
        vec![self.lower_c, self.lower_p31, self.raise_mp3, self.raise_p32]
    }
    fn c2_shl_add_c1_left(&self) -> Vec<StudId> {
        vec![self.lower_c, self.lower_p23, self.raise_mp2, self.raise_p24]
    }
    fn c2_shr_add_c1(&self) -> Vec<StudId> {
        vec![self.lower_c, self.lower_p32, self.raise_mp3, self.raise_p31]
    }
    fn c2_shl_sub_f1(&self) -> Vec<StudId> {
        vec![
            self.lower_c,
            self.lower_p23,
            self.raise_mp2,
            self.reverse_r1,
            self.reverse_fc1,
            self.sub_f1c,
            self.cycle20,
        ]
    }
    fn c2_sub_f2(&self) -> Vec<StudId> {
        vec![self.lower_c, self.lower_p32, self.mesh_fc2, self.sub_f2c, self.cycle20]
    }
    fn c2_add_c1(&self) -> Vec<StudId> {
        vec![self.lower_c, self.lower_p23, self.raise_p24]
    }
    fn c2_add_c1_right(&self) -> Vec<StudId> {
        vec![self.lower_c, self.lower_p32, self.raise_p31]
    }
    fn c2_add_f2(&self) -> Vec<StudId> {
        vec![
            self.lower_c,
            self.lower_p32,
            self.reverse_r2,
            self.reverse_fc2,
            self.add_f2c,
            self.cycle20,
        ]
    }
    fn f1_add_b1(&self) -> Vec<StudId> {
        vec![self.raise_f1, self.reverse_r1, self.reverse_fc1, self.raise_p22]
    }
    fn zero_f1(&self) -> Vec<StudId> {
        vec![self.raise_f1]
    }
    fn zero_f2(&self) -> Vec<StudId> {
        vec![self.raise_f2]
    }
    fn zero_a1(&self) -> Vec<StudId> {
        vec![self.raise_a]
    }
    fn zero_a2(&self) -> Vec<StudId> {
        vec![self.lower_a]
    }
    fn zero_b1(&self) -> Vec<StudId> {
        vec![self.raise_b]
    }
    fn zero_b2(&self) -> Vec<StudId> {
        vec![self.lower_b]
    }
    fn zero_c2(&self) -> Vec<StudId> {
        vec![self.lower_c]
    }
    fn zero_ctr(&self) -> Vec<StudId> {
        vec![self.clearctr]
    }
    fn decr_f1(&self) -> Vec<StudId> {
        vec![self.minus1f1, self.sub_f1c, self.cycle20]
    }
    fn incr_f1(&self) -> Vec<StudId> {
        vec![self.plus1f1, self.add_f1c, self.cycle20]
    }
}

/// Concatenate several macro sets (and possibly a lone stud) into one
/// vertical's worth of ON studs, matching `vertical()`'s variadic-set
/// union in the source assembler.
fn union(parts: &[&[StudId]]) -> Vec<StudId> {
    parts.iter().flat_map(|p| p.iter().copied()).collect()
}

/// `C1 * B1 -> F2`: unsigned multiply, one cycle per multiplier digit-unit
/// of addition, optimized so every digit transition costs a fixed five
/// cycles.
pub fn build_multiply_program(table: &StudTable, studs: &Studs) -> AssembleResult<Program> {
    let mut prog = Program::new("multiply program");

    prog.vertical(
        table,
        None,
        &union(&[&studs.zero_f1(), &studs.zero_f2(), &studs.zero_b2(), &studs.zero_c2()]),
        None,
    )?;
    prog.vertical(
        table,
        Some("outerloop"),
        &union(&[&studs.b1_shr_add_c2(), &studs.b1_shr_add_b2(), &studs.b1_add_f1()]),
        None,
    )?;
    prog.vertical(table, None, &studs.c2_shl_sub_f1(), None)?;
    prog.vertical(
        table,
        None,
        &union(&[&studs.decr_f1(), &[studs.if_runup_f1]]),
        Some("next1"),
    )?;
    prog.vertical(
        table,
        Some("next1"),
        &union(&[&studs.c1_shl_add_c2(), &studs.b2_add_f1(), &studs.b2_add_b1(), &[studs.if_norunup_f1]]),
        Some("stop"),
    )?;
    prog.vertical(
        table,
        Some("innerloop1"),
        &union(&[&studs.c1_add_f2(), &studs.c1_add_c2(), &studs.decr_f1(), &[studs.if_norunup_f1]]),
        Some("innerloop2"),
    )?;
    prog.vertical(table, Some("next2a"), &studs.zero_f1(), Some("outerloop"))?;
    prog.vertical(table, Some("stop"), &[studs.stop], None)?;
    prog.vertical(
        table,
        Some("next1a"),
        &union(&[&studs.zero_f1(), &studs.c2_add_c1()]),
        Some("outerloop"),
    )?;
    prog.vertical(
        table,
        Some("innerloop2"),
        &union(&[&studs.c2_add_f2(), &studs.c2_add_c1(), &studs.decr_f1(), &[studs.if_norunup_f1]]),
        Some("innerloop1"),
    )?;
    prog.vertical(
        table,
        Some("next2"),
        &union(&[&studs.c2_shl_add_c1(), &studs.b2_add_f1(), &studs.b2_add_b1(), &[studs.if_norunup_f1]]),
        Some("stop"),
    )?;

    prog.end_program(table)?;
    Ok(prog)
}

/// `C2 / C1 -> F1 rem F2`: unsigned long division via repeated
/// shift-and-subtract, with a digit counter tracking how far the divisor
/// has been shifted.
pub fn build_divide_program(table: &StudTable, studs: &Studs) -> AssembleResult<Program> {
    let mut prog = Program::new("divide program");

    prog.vertical(
        table,
        None,
        &union(&[
            &studs.zero_f1(),
            &studs.zero_f2(),
            &studs.zero_a1(),
            &studs.zero_a2(),
            &studs.zero_b1(),
            &studs.zero_b2(),
            &studs.zero_ctr(),
        ]),
        None,
    )?;
    prog.vertical(table, None, &studs.incr_f1(), None)?;
    prog.vertical(table, None, &studs.f1_add_b1(), None)?;
    prog.vertical(table, None, &union(&[&studs.b1_add_a1(), &studs.c2_add_f2()]), None)?;
    prog.vertical(
        table,
        Some("phase1"),
        &union(&[&studs.c1_sub_f2(), &studs.c1_add_c2(), &studs.a1_add_a2(), &[studs.if_norunup_f2]]),
        Some("phase1a"),
    )?;
    prog.vertical(
        table,
        Some("phase1a"),
        &union(&[
            &studs.c2_add_f2(),
            &studs.c2_shl_add_c1_left(),
            &studs.a2_shl_add_a1(),
            &[studs.plus1ctr],
        ]),
        Some("phase1"),
    )?;
    prog.vertical(
        table,
        Some("phase2"),
        &union(&[&studs.c2_add_f2(), &studs.c2_add_c1_right(), &studs.a2_add_b1()]),
        None,
    )?;
    prog.vertical(
        table,
        Some("loop1"),
        &union(&[&studs.c1_sub_f2(), &studs.c1_add_c2(), &studs.b1_add_f1(), &studs.b1_add_b2(), &[studs.if_runup_f2]]),
        Some("shift2"),
    )?;
    prog.vertical(table, Some("stop"), &[studs.stop], None)?;
    prog.vertical(
        table,
        Some("shift1"),
        &union(&[
            &studs.c1_add_f2(),
            &studs.c1_shr_add_c2(),
            &studs.b1_sub_f1(),
            &studs.b1_shr_add_b2(),
            &[studs.minus1ctr, studs.if_norunup_ctr],
        ]),
        Some("loop2"),
    )?;
    prog.vertical(
        table,
        Some("loop1b"),
        &union(&[&studs.c1_sub_f2(), &studs.c1_add_c2(), &studs.b1_add_f1(), &studs.b1_add_b2(), &[studs.if_runup_f2]]),
        Some("shift2"),
    )?;
    prog.vertical(
        table,
        Some("shift2"),
        &union(&[
            &studs.c2_add_f2(),
            &studs.c2_shr_add_c1(),
            &studs.b2_sub_f1(),
            &studs.b2_shr_add_b1(),
            &[studs.minus1ctr, studs.if_runup_ctr],
        ]),
        Some("stop"),
    )?;
    prog.vertical(
        table,
        Some("loop2"),
        &union(&[&studs.c2_sub_f2(), &studs.c2_add_c1_right(), &studs.b2_add_f1(), &studs.b2_add_b1(), &[studs.if_norunup_f2]]),
        Some("loop1b"),
    )?;
    prog.vertical(table, Some("done"), &[studs.stop], None)?;

    prog.end_program(table)?;
    Ok(prog)
}
