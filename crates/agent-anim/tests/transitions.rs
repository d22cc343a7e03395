//! End-to-end transition behavior for the animation machine.
//!
//! Mirrors the third-person locomotion setup: Idle/Walking/Running driven by
//! boolean parameters, a locking Jump that auto-chains into Fall.

use std::cell::RefCell;
use std::rc::Rc;

use agent_anim::{Animation, AnimationMachine, AnimatorBuilder, Connection};

fn locomotion_machine() -> AnimationMachine {
    let mut machine = AnimationMachine::new(1);

    AnimatorBuilder::new()
        .add_animation(Animation::new("Idle").connections([
            Connection::to("Walking").crossfade(0.06).when("Walking", true),
        ]))
        .add_animation(Animation::new("Walking").connections([
            Connection::to("Idle").crossfade(0.2).when("Walking", false),
            Connection::to("Running").crossfade(0.16).when("Running", true),
        ]))
        .add_animation(Animation::new("Running").connections([
            Connection::to("Walking").crossfade(0.2).when("Running", false),
            Connection::to("Idle").crossfade(0.2).when("Walking", false),
        ]))
        .add_animation(
            Animation::new("Jump")
                .length(0.8)
                .lock_layer()
                .once()
                .auto_next("Fall"),
        )
        .add_animation(
            Animation::new("Fall")
                .entry_crossfade(0.1)
                .connections([Connection::to("Idle").crossfade(0.03).when("Falling", false)]),
        )
        .add_parameter("Walking")
        .add_parameter("Running")
        .add_parameter("Falling")
        .set_default_animation(|params| {
            if params.get_bool("Falling") {
                Some("Fall".to_string())
            } else {
                Some("Idle".to_string())
            }
        })
        .build(&mut machine);

    machine.initialize(&["Idle"]);
    machine
}

#[test]
fn set_bool_drives_declared_transition() {
    let mut machine = locomotion_machine();
    assert_eq!(machine.current_animation(0), Some("Idle"));

    machine.set_bool("Walking", true);

    assert_eq!(machine.current_animation(0), Some("Walking"));
    let transition = machine.last_transition().expect("crossfade issued");
    assert_eq!(transition.clip, "Walking");
    assert_eq!(transition.duration, 0.06);
}

#[test]
fn first_declared_connection_wins() {
    let mut machine = locomotion_machine();
    machine.set_bool("Walking", true);
    machine.set_bool("Running", true);
    assert_eq!(machine.current_animation(0), Some("Running"));

    // Both "Running == false" and "Walking == false" will match from
    // Running once the parameters drop; order decides the winner.
    machine.set_bool("Walking", false);
    machine.set_bool("Running", false);

    // Walking=false fires Running->Idle (second connection), then
    // Running=false matches nothing from Idle.
    assert_eq!(machine.current_animation(0), Some("Idle"));
}

#[test]
fn duplicate_set_bool_reevaluates_once() {
    let mut machine = locomotion_machine();
    let fades = Rc::new(RefCell::new(0u32));
    let counter = Rc::clone(&fades);
    machine.set_crossfade_sink(move |_| *counter.borrow_mut() += 1);

    machine.set_bool("Walking", true);
    machine.set_bool("Walking", true);

    assert_eq!(*fades.borrow(), 1);
    assert_eq!(machine.current_animation(0), Some("Walking"));
}

#[test]
fn unknown_parameter_is_a_noop() {
    let mut machine = locomotion_machine();
    machine.set_bool("Swimming", true);

    assert_eq!(machine.current_animation(0), Some("Idle"));
    assert!(machine.last_transition().is_none());
}

#[test]
fn locked_layer_rejects_play_entirely() {
    let mut machine = locomotion_machine();
    machine.play("Jump", 0);
    assert!(machine.is_locked(0));
    let before = machine.last_transition().cloned();

    machine.play("Walking", 0);

    assert_eq!(machine.current_animation(0), Some("Jump"));
    assert!(machine.is_locked(0));
    assert_eq!(machine.last_transition().cloned(), before);
}

#[test]
fn locked_layer_ignores_parameter_transitions() {
    let mut machine = locomotion_machine();
    machine.play("Jump", 0);

    machine.set_bool("Walking", true);

    assert_eq!(machine.current_animation(0), Some("Jump"));
}

#[test]
fn auto_next_chains_and_unlocks() {
    let mut machine = locomotion_machine();
    machine.set_bool("Falling", true);
    machine.play("Jump", 0);
    assert!(machine.is_locked(0));

    // Wait = Jump length (0.8) minus Fall's entry crossfade (0.1).
    machine.update(0.5);
    assert_eq!(machine.current_animation(0), Some("Jump"));

    machine.update(0.25);
    assert_eq!(machine.current_animation(0), Some("Fall"));
    assert!(!machine.is_locked(0));
}

#[test]
fn chained_continuation_is_cancelled_by_new_play() {
    let mut machine = locomotion_machine();
    machine.play("Jump", 0);
    machine.update(0.2);

    // An external unlock plus a fresh play must drop the Jump->Fall chain.
    machine.set_locked(false, 0);
    machine.set_bool("Walking", true);
    machine.play("Walking", 0);
    machine.update(10.0);

    assert_eq!(machine.current_animation(0), Some("Walking"));
}

#[test]
fn non_looping_clip_falls_back_to_default_animation() {
    let mut machine = AnimationMachine::new(1);
    AnimatorBuilder::new()
        .add_animation(Animation::new("Idle"))
        .add_animation(Animation::new("Wave").once().length(1.5))
        .add_parameter("Falling")
        .set_default_animation(|_| Some("Idle".to_string()))
        .build(&mut machine);
    machine.initialize(&[]);

    machine.play("Wave", 0);
    assert_eq!(machine.current_animation(0), Some("Wave"));

    machine.update(1.6);
    assert_eq!(machine.current_animation(0), Some("Idle"));
}

#[test]
fn initialize_falls_back_to_locomotion() {
    let mut machine = AnimationMachine::new(2);
    AnimatorBuilder::new()
        .add_animation(Animation::new("Locomotion"))
        .add_animation(Animation::new("UpperBodyIdle"))
        .build(&mut machine);

    machine.initialize(&["NotRegistered", "UpperBodyIdle"]);

    assert_eq!(machine.current_animation(0), Some("Locomotion"));
    assert_eq!(machine.current_animation(1), Some("UpperBodyIdle"));
}

#[test]
fn play_evaluates_new_clip_connections_before_crossfade() {
    let mut machine = AnimationMachine::new(1);
    AnimatorBuilder::new()
        .add_animation(Animation::new("Land").connections([
            Connection::to("Sprint").when("Running", true),
        ]))
        .add_animation(Animation::new("Sprint").entry_crossfade(0.3))
        .add_animation(Animation::new("Fall"))
        .add_parameter("Running")
        .build(&mut machine);
    machine.initialize(&["Fall"]);
    machine.set_bool("Running", true);

    machine.play("Land", 0);

    // Land's own immediate transition wins; the only crossfade issued is
    // the one into Sprint.
    assert_eq!(machine.current_animation(0), Some("Sprint"));
    assert_eq!(machine.last_transition().unwrap().clip, "Sprint");
}
