//! Plan-27: the concrete mechanical topology the multiply and divide
//! microprograms run against - three digit axles (A, B, C), two
//! carriage-equipped accumulator axles (F1, F2), a counter (CTR), and the
//! pinion stacks that connect them, wired exactly as in the distilled-from
//! configuration (see Babbage's drawing BAB/A/093).

use crate::sim::handles::{AxleId, CarriageId, CounterId, PinionStackId, ALWAYS};
use crate::sim::Engine;

/// How far a connecting pinion or reversing pinion moves to engage,
/// expressed as a small integer rather than the source's physical
/// distances in inches - the magnitude is irrelevant, only that distinct
/// engagement states compare unequal.
const DIGITMESH_DISTANCE: i32 = 1;
const LONGPINION_DISTANCE: i32 = 1;
const REVERSE_PINION_DISTANCE: i32 = 1;
const FC_DISTANCE: i32 = 1;

/// Every named handle in the Plan-27 topology, for wiring the stud
/// vocabulary in [`crate::programs`].
pub struct Plan27 {
    pub a: AxleId,
    pub b: AxleId,
    pub c: AxleId,
    pub f1: AxleId,
    pub f2: AxleId,
    pub f1c: CarriageId,
    pub f2c: CarriageId,
    pub ctr: CounterId,

    pub p11: PinionStackId,
    pub p12: PinionStackId,
    pub mp1: PinionStackId,
    pub fp1: PinionStackId,
    pub p13: PinionStackId,
    pub p14: PinionStackId,

    pub p21: PinionStackId,
    pub p22: PinionStackId,
    pub mp2: PinionStackId,
    pub fp2: PinionStackId,
    pub p23: PinionStackId,
    pub p24: PinionStackId,

    pub r1: PinionStackId,
    pub fc1: PinionStackId,

    pub p31: PinionStackId,
    pub p32: PinionStackId,
    pub mp3: PinionStackId,
    pub fp3: PinionStackId,

    pub r2: PinionStackId,
    pub fc2: PinionStackId,
}

/// Build the Plan-27 component graph on `engine` and wire every possible
/// mesh. Call once per `Engine`.
pub fn build(engine: &mut Engine) -> Plan27 {
    let ndigits = engine.config.ndigits;

    let a = engine.axle("A", 2, false);
    let p11 = engine.pinion_stack("P11", ndigits);
    let p12 = engine.pinion_stack("P12", ndigits);
    let mp1 = engine.pinion_stack("MP1", ndigits);
    let fp1 = engine.pinion_stack("FP1", ndigits);
    let p13 = engine.pinion_stack("P13", ndigits);
    let p14 = engine.pinion_stack("P14", ndigits);
    let b = engine.axle("B", 2, false);

    let a1 = engine.axle_digit_stack(a, 0);
    let a2 = engine.axle_digit_stack(a, 1);
    let b1 = engine.axle_digit_stack(b, 0);
    let b2 = engine.axle_digit_stack(b, 1);
    let a1_gears = engine.stack_digit_gears(a1);
    let a2_gears = engine.stack_digit_gears(a2);
    let b1_gears = engine.stack_digit_gears(b1);
    let b2_gears = engine.stack_digit_gears(b2);

    engine.define_mesh(p11, DIGITMESH_DISTANCE, &a1_gears, 0);
    engine.define_mesh(p11, -DIGITMESH_DISTANCE, &a2_gears, 0);
    let mp1_gears = engine.pinion_stack_gears(mp1);
    engine.define_mesh(p11, ALWAYS, &mp1_gears, 0);
    let fp1_gears = engine.pinion_stack_gears(fp1);
    engine.define_mesh(mp1, 0, &fp1_gears, 0);
    engine.define_mesh(mp1, LONGPINION_DISTANCE, &fp1_gears, 1);
    engine.define_mesh(p12, DIGITMESH_DISTANCE, &a1_gears, 0);
    engine.define_mesh(p12, -DIGITMESH_DISTANCE, &a2_gears, 0);
    engine.define_mesh(p12, ALWAYS, &fp1_gears, 0);
    engine.define_mesh(p13, DIGITMESH_DISTANCE, &b1_gears, 0);
    engine.define_mesh(p13, -DIGITMESH_DISTANCE, &b2_gears, 0);
    engine.define_mesh(p13, ALWAYS, &mp1_gears, 0);
    engine.define_mesh(p14, DIGITMESH_DISTANCE, &b1_gears, 0);
    engine.define_mesh(p14, -DIGITMESH_DISTANCE, &b2_gears, 0);
    engine.define_mesh(p14, ALWAYS, &fp1_gears, 0);

    let p21 = engine.pinion_stack("P21", ndigits);
    let p22 = engine.pinion_stack("P22", ndigits);
    let mp2 = engine.pinion_stack("MP2", ndigits);
    let fp2 = engine.pinion_stack("FP2", ndigits);
    let p23 = engine.pinion_stack("P23", ndigits);
    let p24 = engine.pinion_stack("P24", ndigits);
    let c = engine.axle("C", 2, false);

    let c1 = engine.axle_digit_stack(c, 0);
    let c2 = engine.axle_digit_stack(c, 1);
    let c1_gears = engine.stack_digit_gears(c1);
    let c2_gears = engine.stack_digit_gears(c2);

    engine.define_mesh(p21, DIGITMESH_DISTANCE, &b1_gears, 0);
    engine.define_mesh(p21, -DIGITMESH_DISTANCE, &b2_gears, 0);
    let mp2_gears = engine.pinion_stack_gears(mp2);
    engine.define_mesh(p21, ALWAYS, &mp2_gears, 0);
    let fp2_gears = engine.pinion_stack_gears(fp2);
    engine.define_mesh(mp2, 0, &fp2_gears, 0);
    engine.define_mesh(mp2, LONGPINION_DISTANCE, &fp2_gears, 1);
    engine.define_mesh(p22, DIGITMESH_DISTANCE, &b1_gears, 0);
    engine.define_mesh(p22, -DIGITMESH_DISTANCE, &b2_gears, 0);
    engine.define_mesh(p22, ALWAYS, &fp2_gears, 0);
    engine.define_mesh(p23, DIGITMESH_DISTANCE, &c1_gears, 0);
    engine.define_mesh(p23, -DIGITMESH_DISTANCE, &c2_gears, 0);
    engine.define_mesh(p23, ALWAYS, &mp2_gears, 0);
    engine.define_mesh(p24, DIGITMESH_DISTANCE, &c1_gears, 0);
    engine.define_mesh(p24, -DIGITMESH_DISTANCE, &c2_gears, 0);
    engine.define_mesh(p24, ALWAYS, &fp2_gears, 0);

    let r1 = engine.pinion_stack("R1", ndigits);
    let fc1 = engine.pinion_stack("FC1", ndigits);
    let f1 = engine.axle("F1", 1, true);
    let f1c = engine.axle_carriage(f1);
    let f1_stack0 = engine.axle_digit_stack(f1, 0);
    engine.define_mesh(r1, REVERSE_PINION_DISTANCE, &fp2_gears, 0);
    let f1_gears = engine.stack_digit_gears(f1_stack0);
    engine.define_mesh(fc1, FC_DISTANCE, &f1_gears, 0);
    engine.define_mesh(fc1, 2 * FC_DISTANCE, &f1_gears, 0);
    engine.define_mesh(fc1, 2 * FC_DISTANCE, &fp2_gears, 0);
    let r1_gears = engine.pinion_stack_gears(r1);
    engine.define_mesh(fc1, FC_DISTANCE, &r1_gears, 0);

    let p31 = engine.pinion_stack("P31", ndigits);
    let p32 = engine.pinion_stack("P32", ndigits);
    let mp3 = engine.pinion_stack("MP3", ndigits);
    let fp3 = engine.pinion_stack("FP3", ndigits);

    engine.define_mesh(p31, DIGITMESH_DISTANCE, &engine.stack_digit_gears(c1), 0);
    engine.define_mesh(p31, -DIGITMESH_DISTANCE, &engine.stack_digit_gears(c2), 0);
    let mp3_gears = engine.pinion_stack_gears(mp3);
    engine.define_mesh(p31, ALWAYS, &mp3_gears, 0);
    let fp3_gears = engine.pinion_stack_gears(fp3);
    engine.define_mesh(mp3, 0, &fp3_gears, 0);
    engine.define_mesh(mp3, LONGPINION_DISTANCE, &fp3_gears, 1);
    engine.define_mesh(p32, DIGITMESH_DISTANCE, &engine.stack_digit_gears(c1), 0);
    engine.define_mesh(p32, -DIGITMESH_DISTANCE, &engine.stack_digit_gears(c2), 0);
    engine.define_mesh(p32, ALWAYS, &fp3_gears, 0);

    let r2 = engine.pinion_stack("R2", ndigits);
    let fc2 = engine.pinion_stack("FC2", ndigits);
    let f2 = engine.axle("F2", 1, true);
    let f2c = engine.axle_carriage(f2);
    let f2_stack0 = engine.axle_digit_stack(f2, 0);
    engine.define_mesh(r2, REVERSE_PINION_DISTANCE, &fp3_gears, 0);
    let f2_gears = engine.stack_digit_gears(f2_stack0);
    engine.define_mesh(fc2, FC_DISTANCE, &f2_gears, 0);
    engine.define_mesh(fc2, 2 * FC_DISTANCE, &f2_gears, 0);
    engine.define_mesh(fc2, 2 * FC_DISTANCE, &fp3_gears, 0);
    let r2_gears = engine.pinion_stack_gears(r2);
    engine.define_mesh(fc2, FC_DISTANCE, &r2_gears, 0);

    let ctr = engine.counter("CTR", ndigits as i32);

    Plan27 {
        a,
        b,
        c,
        f1,
        f2,
        f1c,
        f2c,
        ctr,
        p11,
        p12,
        mp1,
        fp1,
        p13,
        p14,
        p21,
        p22,
        mp2,
        fp2,
        p23,
        p24,
        r1,
        fc1,
        p31,
        p32,
        mp3,
        fp3,
        r2,
        fc2,
    }
}
