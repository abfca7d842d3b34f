use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use analytical_engine_sim::config::EngineConfig;
use analytical_engine_sim::logging;
use analytical_engine_sim::plan27;
use analytical_engine_sim::programs::{self, build_divide_program, build_multiply_program};
use analytical_engine_sim::sim::handles::AxleId;
use analytical_engine_sim::sim::Engine;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Op {
    Mul,
    Div,
}

/// Drive the Plan-27 multiply/divide microprograms over the Analytical
/// Engine component simulator.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// which microprogram to run
    #[arg(long, value_enum)]
    op: Op,
    /// left operand (multiplicand for `mul`, dividend for `div`)
    x: i128,
    /// right operand (multiplier for `mul`, divisor for `div`)
    y: i128,
    /// fixed scheduler seed, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// number of decimal digits per register
    #[arg(long, default_value_t = 25)]
    ndigits: usize,
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let mut config = EngineConfig::default().with_ndigits(args.ndigits);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut engine = Engine::new(config);
    let plan = plan27::build(&mut engine);
    let studs = programs::register_studs(&mut engine.stud_table, &plan);

    let (barrel_id, result) = match args.op {
        Op::Mul => {
            let program = build_multiply_program(&engine.stud_table, &studs)
                .context("failed to assemble the multiply program")?;
            let barrel_id = engine.barrel("BARMUL", program);
            set_operand(&mut engine, plan.c, 0, args.x);
            set_operand(&mut engine, plan.b, 0, args.y);
            (barrel_id, plan.f2)
        }
        Op::Div => {
            let program = build_divide_program(&engine.stud_table, &studs)
                .context("failed to assemble the divide program")?;
            let barrel_id = engine.barrel("BARDIV", program);
            set_operand(&mut engine, plan.c, 1, args.x);
            set_operand(&mut engine, plan.c, 0, args.y);
            (barrel_id, plan.f1)
        }
    };

    if args.verbose {
        match args.op {
            Op::Mul => println!("multiplying {} by {}", args.x, args.y),
            Op::Div => println!("dividing {} by {}", args.x, args.y),
        }
    }

    engine
        .reset_barrel(barrel_id, 0)
        .context("failed to start the barrel")?;
    let timeunits = engine
        .run_until_stopped()
        .context("simulation aborted before the barrel stopped")?;
    let cycles = engine.barrel_ref(barrel_id).cycles;

    let result_stack = engine.axle_digit_stack(result, 0);
    let result_value = engine.stack(result_stack).value(&engine.config);

    match args.op {
        Op::Mul => println!("{} * {} = {}", args.x, args.y, result_value),
        Op::Div => {
            let rem_stack = engine.axle_digit_stack(plan.f2, 0);
            let rem_value = engine.stack(rem_stack).value(&engine.config);
            println!("{} / {} = {} remainder {}", args.x, args.y, result_value, rem_value);
        }
    }
    println!("{} cycles done in {} time units", cycles, timeunits);

    Ok(())
}

fn set_operand(engine: &mut Engine, axle: AxleId, index: usize, value: i128) {
    let stack_id = engine.axle_digit_stack(axle, index);
    let config = engine.config;
    engine.stack_mut(stack_id).set_value(value, &config);
}
