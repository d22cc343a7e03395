//! Headless GOAP agent demo.
//!
//! Wires up a guard character with stat upkeep, patrol-style wandering, and
//! a chase/attack reaction to an approaching intruder, then runs it for a
//! fixed number of ticks while printing a plan trace.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use agent_anim::{Animation, AnimationMachine, AnimatorBuilder, Connection};
use agent_goap::strategy::{
    AttackStrategy, ChaseStrategy, IdleStrategy, MoveStrategy, WanderStrategy,
};
use agent_goap::{
    AgentAction, AgentGoal, GoapAgent, Navigator, PlanLog, ProximitySensor, RadiusSensor,
    StubNavigator, Vec3,
};

/// Command line arguments for the demo.
#[derive(Parser, Debug)]
#[command(name = "goap_demo")]
#[command(about = "A goal-oriented action planning agent demo")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Simulated seconds per tick
    #[arg(long, default_value_t = 0.1)]
    tick_seconds: f32,

    /// Optional TOML tuning file
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Optional JSONL plan event log
    #[arg(long)]
    log: Option<PathBuf>,
}

/// Tunable behavior numbers, overridable from a TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct Tuning {
    wander_radius: f32,
    location_range: f32,
    chase_range: f32,
    attack_range: f32,
    sensor_interval: f32,
    stat_interval: f32,
    stamina_rest_gain: f32,
    stamina_drain: f32,
    health_food_gain: f32,
    health_drain: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            wander_radius: 10.0,
            location_range: 3.0,
            chase_range: 10.0,
            attack_range: 2.0,
            sensor_interval: 1.0,
            stat_interval: 2.0,
            stamina_rest_gain: 20.0,
            stamina_drain: 10.0,
            health_food_gain: 20.0,
            health_drain: 5.0,
        }
    }
}

impl Tuning {
    fn load(path: Option<&PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match fs::read_to_string(path).map_err(|e| e.to_string()).and_then(
            |text| toml::from_str(&text).map_err(|e| e.to_string()),
        ) {
            Ok(tuning) => tuning,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to load tuning, using defaults");
                Self::default()
            }
        }
    }
}

/// Fixed points of interest in the demo world.
const REST_AREA: Vec3 = Vec3::new(-12.0, 0.0, 8.0);
const FOOD_SHACK: Vec3 = Vec3::new(14.0, 0.0, -6.0);
const DOOR_ONE: Vec3 = Vec3::new(-6.0, 0.0, 2.0);
const DOOR_TWO: Vec3 = Vec3::new(-4.0, 0.0, 14.0);

fn build_animator() -> Rc<RefCell<AnimationMachine>> {
    let mut machine = AnimationMachine::new(1);
    AnimatorBuilder::new()
        .add_parameter("IsMoving")
        .add_float_parameter("Speed")
        .add_connected("Idle", [Connection::to("Walking").when("IsMoving", true)])
        .add_connected("Walking", [Connection::to("Idle").when("IsMoving", false)])
        .add_animation(Animation::new("Attack").length(1.2).lock_layer().once())
        .set_default_animation(|params| {
            Some(if params.get_bool("IsMoving") {
                "Walking".to_string()
            } else {
                "Idle".to_string()
            })
        })
        .build(&mut machine);
    machine.initialize(&["Idle"]);
    Rc::new(RefCell::new(machine))
}

fn build_agent(
    tuning: &Tuning,
    seed: u64,
    nav: Rc<RefCell<StubNavigator>>,
    animator: Rc<RefCell<AnimationMachine>>,
    health: Rc<Cell<f32>>,
    stamina: Rc<Cell<f32>>,
    chase_sensor: Rc<RefCell<RadiusSensor>>,
    attack_sensor: Rc<RefCell<RadiusSensor>>,
) -> GoapAgent {
    let mut agent = GoapAgent::new();
    agent.attach_animator(Rc::clone(&animator));

    let agent_position = {
        let nav = Rc::clone(&nav);
        move || agent_goap::Navigator::position(&*nav.borrow())
    };

    // Beliefs: plain flags, stat thresholds, locations, sensor targets.
    {
        let beliefs = agent.beliefs_mut();
        beliefs.add("Nothing", || false).unwrap();
        {
            let nav = Rc::clone(&nav);
            beliefs
                .add("AgentIdle", move || !nav.borrow().has_path())
                .unwrap();
        }
        {
            let nav = Rc::clone(&nav);
            beliefs
                .add("AgentMoving", move || nav.borrow().has_path())
                .unwrap();
        }
        {
            let health = Rc::clone(&health);
            beliefs
                .add("AgentHealthLow", move || health.get() < 30.0)
                .unwrap();
        }
        {
            let health = Rc::clone(&health);
            beliefs
                .add("AgentIsHealthy", move || health.get() >= 50.0)
                .unwrap();
        }
        {
            let stamina = Rc::clone(&stamina);
            beliefs
                .add("AgentStaminaLow", move || stamina.get() < 10.0)
                .unwrap();
        }
        {
            let stamina = Rc::clone(&stamina);
            beliefs
                .add("AgentIsRested", move || stamina.get() >= 50.0)
                .unwrap();
        }

        for (name, point) in [
            ("AgentAtRestingPosition", REST_AREA),
            ("AgentAtFoodShack", FOOD_SHACK),
            ("AgentAtDoorOne", DOOR_ONE),
            ("AgentAtDoorTwo", DOOR_TWO),
        ] {
            beliefs
                .add_location(name, tuning.location_range, agent_position.clone(), move || {
                    point
                })
                .unwrap();
        }

        let chase: Rc<RefCell<dyn ProximitySensor>> = chase_sensor.clone();
        let attack: Rc<RefCell<dyn ProximitySensor>> = attack_sensor.clone();
        beliefs.add_sensor("PlayerInChaseRange", chase).unwrap();
        beliefs
            .add_sensor("PlayerInAttackRange", Rc::clone(&attack))
            .unwrap();
        beliefs.add_sensor("AttackingPlayer", attack).unwrap();
    }

    let actions = build_actions(tuning, seed, &nav, &animator, &chase_sensor, &attack_sensor);
    for action in actions {
        agent.add_action(action).unwrap();
    }

    for goal in [
        AgentGoal::builder("ChillOut")
            .with_priority(1)
            .with_desired_effect("Nothing")
            .build(),
        AgentGoal::builder("Wander")
            .with_priority(1)
            .with_desired_effect("AgentMoving")
            .build(),
        AgentGoal::builder("KeepHealthUp")
            .with_priority(2)
            .with_desired_effect("AgentIsHealthy")
            .build(),
        AgentGoal::builder("KeepStaminaUp")
            .with_priority(2)
            .with_desired_effect("AgentIsRested")
            .build(),
        AgentGoal::builder("SeekAndDestroy")
            .with_priority(3)
            .with_desired_effect("AttackingPlayer")
            .build(),
    ] {
        agent.add_goal(goal).unwrap();
    }

    // New plans must not inherit a half-finished walk.
    {
        let nav = Rc::clone(&nav);
        agent.set_pre_action_reset(move || nav.borrow_mut().reset_path());
    }

    // Stat drift: resting restores stamina, eating restores health, anything
    // else drains both.
    {
        let nav = Rc::clone(&nav);
        let tuning = tuning.clone();
        agent.set_interval_hook(tuning.stat_interval, move || {
            let at = agent_goap::Navigator::position(&*nav.borrow());
            let resting = at.distance(REST_AREA) <= tuning.location_range;
            let eating = at.distance(FOOD_SHACK) <= tuning.location_range;

            let delta = if resting {
                tuning.stamina_rest_gain
            } else {
                -tuning.stamina_drain
            };
            stamina.set((stamina.get() + delta).clamp(0.0, 100.0));

            let delta = if eating {
                tuning.health_food_gain
            } else {
                -tuning.health_drain
            };
            health.set((health.get() + delta).clamp(0.0, 100.0));
        });
    }

    agent
}

fn build_actions(
    tuning: &Tuning,
    seed: u64,
    nav: &Rc<RefCell<StubNavigator>>,
    animator: &Rc<RefCell<AnimationMachine>>,
    chase_sensor: &Rc<RefCell<RadiusSensor>>,
    attack_sensor: &Rc<RefCell<RadiusSensor>>,
) -> Vec<AgentAction> {
    let move_to = |point: Vec3| {
        MoveStrategy::new(
            Rc::clone(nav) as Rc<RefCell<dyn agent_goap::Navigator>>,
            move || point,
            Some(Rc::clone(animator)),
        )
    };

    let chase_target = {
        let sensor = Rc::clone(chase_sensor);
        move || sensor.borrow().target_position().unwrap_or(Vec3::ZERO)
    };

    vec![
        AgentAction::builder("Relax")
            .with_strategy(IdleStrategy::new(5.0))
            .add_effect("Nothing")
            .build()
            .unwrap(),
        AgentAction::builder("Wander Around")
            .with_strategy(WanderStrategy::new(
                Rc::clone(nav) as Rc<RefCell<dyn agent_goap::Navigator>>,
                tuning.wander_radius,
                SmallRng::seed_from_u64(seed),
            ))
            .add_effect("AgentMoving")
            .build()
            .unwrap(),
        AgentAction::builder("MoveToEatingPosition")
            .with_strategy(move_to(FOOD_SHACK))
            .add_effect("AgentAtFoodShack")
            .build()
            .unwrap(),
        AgentAction::builder("Eat")
            .with_strategy(IdleStrategy::new(20.0))
            .add_precondition("AgentAtFoodShack")
            .add_effect("AgentIsHealthy")
            .build()
            .unwrap(),
        AgentAction::builder("MoveToDoorOne")
            .with_strategy(move_to(DOOR_ONE))
            .add_effect("AgentAtDoorOne")
            .build()
            .unwrap(),
        AgentAction::builder("MoveToDoorTwo")
            .with_strategy(move_to(DOOR_TWO))
            .add_effect("AgentAtDoorTwo")
            .build()
            .unwrap(),
        AgentAction::builder("MoveFromDoorOneToRestArea")
            .with_strategy(move_to(REST_AREA))
            .add_precondition("AgentAtDoorOne")
            .add_effect("AgentAtRestingPosition")
            .build()
            .unwrap(),
        // The far door is a detour, so the planner should prefer door one.
        AgentAction::builder("MoveFromDoorTwoToRestArea")
            .with_cost(2.0)
            .with_strategy(move_to(REST_AREA))
            .add_precondition("AgentAtDoorTwo")
            .add_effect("AgentAtRestingPosition")
            .build()
            .unwrap(),
        AgentAction::builder("Rest")
            .with_strategy(IdleStrategy::new(10.0))
            .add_precondition("AgentAtRestingPosition")
            .add_effect("AgentIsRested")
            .build()
            .unwrap(),
        AgentAction::builder("ChasePlayer")
            .with_strategy(ChaseStrategy::new(Rc::clone(nav) as Rc<RefCell<dyn agent_goap::Navigator>>, chase_target))
            .add_precondition("PlayerInChaseRange")
            .add_effect("PlayerInAttackRange")
            .build()
            .unwrap(),
        AgentAction::builder("AttackPlayer")
            .with_strategy(AttackStrategy::new(Rc::clone(animator), "Attack"))
            .add_precondition("PlayerInAttackRange")
            .add_effect("AttackingPlayer")
            .build()
            .unwrap(),
    ]
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let tuning = Tuning::load(args.tuning.as_ref());

    println!("GOAP Agent Demo");
    println!("===============");
    println!("Seed: {}", args.seed);
    println!("Ticks: {} x {}s", args.ticks, args.tick_seconds);
    println!();

    let nav = Rc::new(RefCell::new(StubNavigator::new(Vec3::ZERO, 3.5)));
    let animator = build_animator();
    let health = Rc::new(Cell::new(100.0_f32));
    let stamina = Rc::new(Cell::new(100.0_f32));

    // The intruder starts far out and slowly closes in on the agent.
    let player = Rc::new(Cell::new(Vec3::new(40.0, 0.0, 30.0)));

    let agent_position = {
        let nav = Rc::clone(&nav);
        move || agent_goap::Navigator::position(&*nav.borrow())
    };
    let player_position = {
        let player = Rc::clone(&player);
        move || player.get()
    };
    let chase_sensor = Rc::new(RefCell::new(RadiusSensor::new(
        tuning.chase_range,
        tuning.sensor_interval,
        agent_position.clone(),
        player_position.clone(),
    )));
    let attack_sensor = Rc::new(RefCell::new(RadiusSensor::new(
        tuning.attack_range,
        tuning.sensor_interval,
        agent_position,
        player_position,
    )));

    let mut agent = build_agent(
        &tuning,
        args.seed,
        Rc::clone(&nav),
        Rc::clone(&animator),
        health.clone(),
        stamina.clone(),
        Rc::clone(&chase_sensor),
        Rc::clone(&attack_sensor),
    );

    if let Some(path) = &args.log {
        match PlanLog::new(path) {
            Ok(log) => agent.set_plan_log(log),
            Err(err) => eprintln!("Warning: could not open plan log: {}", err),
        }
    }

    let dt = args.tick_seconds;
    for tick in 0..args.ticks {
        // Intruder creeps toward the agent, far slower than the agent walks.
        let to_agent = agent_goap::Navigator::position(&*nav.borrow())
            .sub(player.get())
            .flat();
        if to_agent.length() > 1.0 {
            player.set(player.get().add(to_agent.normalized().scale(0.9 * dt)));
        }

        // A freshly spotted (or moved) target invalidates the current plan.
        let spotted = chase_sensor.borrow_mut().tick(dt);
        let in_reach = attack_sensor.borrow_mut().tick(dt);
        if spotted || in_reach {
            agent.reset_action_and_goal();
        }

        agent.update(dt);
        nav.borrow_mut().advance(dt);

        if tick % 50 == 0 {
            let at = agent_goap::Navigator::position(&*nav.borrow());
            println!(
                "[Tick {:>4}] goal={:<16} action={:<24} hp={:>5.1} sp={:>5.1} at=({:>6.1},{:>6.1}) anim={}",
                tick,
                agent.current_goal().unwrap_or("-"),
                agent.current_action().unwrap_or("-"),
                health.get(),
                stamina.get(),
                at.x,
                at.z,
                animator.borrow().current_animation(0).unwrap_or("-"),
            );
        }
    }

    if let Err(err) = agent.plan_log_mut().flush() {
        eprintln!("Warning: could not flush plan log: {}", err);
    }

    println!();
    println!(
        "Demo complete. Ran {} ticks, logged {} plan events.",
        args.ticks,
        agent.plan_log().event_count()
    );
}
