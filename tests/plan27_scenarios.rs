//! End-to-end scenarios running the multiply/divide microprograms over a
//! fully wired Plan-27 engine.

use analytical_engine_sim::config::EngineConfig;
use analytical_engine_sim::plan27;
use analytical_engine_sim::programs::{build_divide_program, build_multiply_program, register_studs};
use analytical_engine_sim::sim::handles::AxleId;
use analytical_engine_sim::sim::Engine;

fn set_value(engine: &mut Engine, axle: AxleId, index: usize, value: i128) {
    let stack = engine.axle_digit_stack(axle, index);
    let config = engine.config;
    engine.stack_mut(stack).set_value(value, &config);
}

fn read_value(engine: &Engine, axle: AxleId, index: usize) -> i128 {
    let stack = engine.axle_digit_stack(axle, index);
    engine.stack(stack).value(&engine.config)
}

fn multiply(seed: u64, x: i128, y: i128) -> (i128, u64) {
    let config = EngineConfig::default().with_seed(seed);
    let mut engine = Engine::new(config);
    let plan = plan27::build(&mut engine);
    let studs = register_studs(&mut engine.stud_table, &plan);
    let program = build_multiply_program(&engine.stud_table, &studs).unwrap();
    let barrel = engine.barrel("BARMUL", program);

    set_value(&mut engine, plan.c, 0, x);
    set_value(&mut engine, plan.b, 0, y);
    engine.reset_barrel(barrel, 0).unwrap();
    let timeunits = engine.run_until_stopped().unwrap();

    (read_value(&engine, plan.f2, 0), timeunits)
}

fn divide(seed: u64, x: i128, y: i128) -> (i128, i128) {
    let config = EngineConfig::default().with_seed(seed);
    let mut engine = Engine::new(config);
    let plan = plan27::build(&mut engine);
    let studs = register_studs(&mut engine.stud_table, &plan);
    let program = build_divide_program(&engine.stud_table, &studs).unwrap();
    let barrel = engine.barrel("BARDIV", program);

    set_value(&mut engine, plan.c, 1, x);
    set_value(&mut engine, plan.c, 0, y);
    engine.reset_barrel(barrel, 0).unwrap();
    engine.run_until_stopped().unwrap();

    (read_value(&engine, plan.f1, 0), read_value(&engine, plan.f2, 0))
}

#[test]
fn plan27_multiply_literal_values() {
    let (product, _) = multiply(1, 12345, 67);
    assert_eq!(product, 827_115);
}

#[test]
fn plan27_divide_literal_values() {
    let (quotient, remainder) = divide(1, 12345, 67);
    assert_eq!(quotient, 184);
    assert_eq!(remainder, 17);
}

#[test]
fn multiply_by_zero_is_zero() {
    let (product, _) = multiply(1, 0, 9876);
    assert_eq!(product, 0);
    let (product, _) = multiply(1, 9876, 0);
    assert_eq!(product, 0);
}

#[test]
fn multiply_matches_reference_for_large_operands() {
    let x: i128 = 123_456;
    let y: i128 = 654_321;
    let (product, _) = multiply(7, x, y);
    assert_eq!(product, x * y);
}

#[test]
fn multiply_is_deterministic_under_a_fixed_seed() {
    let (product_a, timeunits_a) = multiply(42, 12345, 67);
    let (product_b, timeunits_b) = multiply(42, 12345, 67);
    assert_eq!(product_a, product_b);
    assert_eq!(timeunits_a, timeunits_b);
}
