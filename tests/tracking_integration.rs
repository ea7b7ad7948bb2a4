//! Frame-loop integration tests for movement events, animation playback,
//! cleanup of destroyed sprites, and scene stacking.

use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::*;

use spritedirector::components::destroyed::Destroyed;
use spritedirector::components::mapposition::MapPosition;
use spritedirector::components::rigidbody::RigidBody;
use spritedirector::components::sprite::Sprite;
use spritedirector::components::spritekind::SpriteKind;
use spritedirector::events::movement::EventKind;
use spritedirector::game::{
    enable_auto_tracking, latest_event, play_loop, play_single, pop_scene, push_scene,
    register_event_handler, run_frame, setup_world, stop_animation, trigger_event,
};
use spritedirector::resources::dispatch::{Dispatch, TrackingError};
use spritedirector::resources::scenestack::SceneStack;
use spritedirector::resources::trackingconfig::TrackingConfig;
use spritedirector::resources::worldtime::WorldTime;
use spritedirector::systems::time::update_world_time;
use spritedirector::systems::tracking::{update_animations, update_movement_events};
use spritedirector::tracking::player::StopScope;

const HERO: u32 = 1;
const SLIME: u32 = 2;

type Log = Arc<Mutex<Vec<(Entity, EventKind)>>>;

fn make_world() -> World {
    let mut world = World::new();
    setup_world(&mut world, TrackingConfig::new());
    world
}

fn spawn_mover(world: &mut World, kind: u32, vx: f32, vy: f32) -> Entity {
    world
        .spawn((
            SpriteKind(kind),
            MapPosition::new(0.0, 0.0),
            RigidBody::with_velocity(vx, vy),
            Sprite::new("idle"),
        ))
        .id()
}

fn set_velocity(world: &mut World, sprite: Entity, vx: f32, vy: f32) {
    world
        .get_mut::<RigidBody>(sprite)
        .unwrap()
        .set_velocity(vx, vy);
}

fn image(world: &World, sprite: Entity) -> String {
    world.get::<Sprite>(sprite).unwrap().tex_key.to_string()
}

fn record_all(world: &mut World, kind: u32) -> Log {
    let log: Log = Arc::default();
    for event in EventKind::ALL {
        let log = log.clone();
        register_event_handler(world, kind, event, move |ctx| {
            log.lock().unwrap().push((ctx.sprite, ctx.event));
            Ok(())
        });
    }
    log
}

#[test]
fn standing_event_fires_once_across_ticks() {
    let mut world = make_world();
    let log = record_all(&mut world, HERO);
    let hero = spawn_mover(&mut world, HERO, 0.0, 5.0);
    enable_auto_tracking(&mut world, hero);

    run_frame(&mut world, 16.0).unwrap();
    set_velocity(&mut world, hero, 0.0, 0.0);
    for _ in 0..5 {
        run_frame(&mut world, 16.0).unwrap();
    }

    let events: Vec<EventKind> = log.lock().unwrap().iter().map(|(_, e)| *e).collect();
    assert_eq!(events, vec![EventKind::MovingSouth, EventKind::StandingSouth]);
    assert_eq!(latest_event(&world, hero), Some(EventKind::StandingSouth));
}

#[test]
fn never_moving_sprite_raises_nothing() {
    let mut world = make_world();
    let log = record_all(&mut world, HERO);
    let statue = spawn_mover(&mut world, HERO, 0.0, 0.0);
    enable_auto_tracking(&mut world, statue);
    for _ in 0..3 {
        run_frame(&mut world, 16.0).unwrap();
    }
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(latest_event(&world, statue), None);
}

#[test]
fn diagonal_noise_keeps_heading() {
    let mut world = make_world();
    let log = record_all(&mut world, HERO);
    let hero = spawn_mover(&mut world, HERO, 6.0, 0.0);
    enable_auto_tracking(&mut world, hero);
    run_frame(&mut world, 16.0).unwrap();

    for i in 0..10 {
        let vy = if i % 2 == 0 { 3.0 } else { 2.0 };
        set_velocity(&mut world, hero, 3.0, vy);
        run_frame(&mut world, 16.0).unwrap();
    }

    let events: Vec<EventKind> = log.lock().unwrap().iter().map(|(_, e)| *e).collect();
    assert_eq!(events, vec![EventKind::MovingEast]);
}

#[test]
fn sprites_are_classified_in_tracking_order() {
    let mut world = make_world();
    let log = record_all(&mut world, HERO);
    let a = spawn_mover(&mut world, HERO, 0.0, -4.0);
    let b = spawn_mover(&mut world, HERO, -4.0, 0.0);
    let c = spawn_mover(&mut world, HERO, 4.0, 0.0);
    enable_auto_tracking(&mut world, c);
    enable_auto_tracking(&mut world, a);
    enable_auto_tracking(&mut world, b);
    run_frame(&mut world, 16.0).unwrap();

    let order: Vec<Entity> = log.lock().unwrap().iter().map(|(s, _)| *s).collect();
    assert_eq!(order, vec![c, a, b]);
}

#[test]
fn handler_sees_state_before_later_sprites_run() {
    let mut world = make_world();
    let first = spawn_mover(&mut world, HERO, 5.0, 0.0);
    let second = spawn_mover(&mut world, SLIME, 5.0, 0.0);
    // stopping the second sprite from the first one's handler takes effect this tick
    register_event_handler(&mut world, HERO, EventKind::MovingEast, move |ctx| {
        ctx.world
            .get_mut::<RigidBody>(second)
            .ok_or("second sprite missing")?
            .stop();
        Ok(())
    });
    enable_auto_tracking(&mut world, first);
    enable_auto_tracking(&mut world, second);
    run_frame(&mut world, 16.0).unwrap();

    assert_eq!(latest_event(&world, first), Some(EventKind::MovingEast));
    assert_eq!(latest_event(&world, second), None);
}

#[test]
fn handlers_drive_animation() {
    let mut world = make_world();
    register_event_handler(&mut world, HERO, EventKind::MovingEast, |ctx| {
        ctx.play_loop(["walk0", "walk1", "walk2"], 100);
        Ok(())
    });
    register_event_handler(&mut world, HERO, EventKind::StandingEast, |ctx| {
        ctx.stop_animation(StopScope::All);
        ctx.play_single(["halt"], 100);
        Ok(())
    });
    let hero = spawn_mover(&mut world, HERO, 4.0, 0.0);
    enable_auto_tracking(&mut world, hero);

    run_frame(&mut world, 0.0).unwrap();
    assert_eq!(image(&world, hero), "walk0");
    run_frame(&mut world, 100.0).unwrap();
    assert_eq!(image(&world, hero), "walk1");

    set_velocity(&mut world, hero, 0.0, 0.0);
    run_frame(&mut world, 10.0).unwrap();
    assert_eq!(image(&world, hero), "halt");
}

#[test]
fn single_then_loop_resumes_from_first_frame() {
    let mut world = make_world();
    let hero = spawn_mover(&mut world, HERO, 0.0, 0.0);
    play_loop(&mut world, hero, ["a", "b", "c"], 100);
    run_frame(&mut world, 150.0).unwrap();
    assert_eq!(image(&world, hero), "b");

    play_single(&mut world, hero, ["f0", "f1", "f2"], 100);
    run_frame(&mut world, 250.0).unwrap();
    assert_eq!(image(&world, hero), "f2");
    run_frame(&mut world, 60.0).unwrap();
    assert_eq!(image(&world, hero), "f2");
    run_frame(&mut world, 10.0).unwrap();
    assert_eq!(image(&world, hero), "a");
}

#[test]
fn stop_loop_leaves_single_running() {
    let mut world = make_world();
    let hero = spawn_mover(&mut world, HERO, 0.0, 0.0);
    play_loop(&mut world, hero, ["a", "b"], 100);
    play_single(&mut world, hero, ["s0", "s1"], 100);
    run_frame(&mut world, 10.0).unwrap();
    stop_animation(&mut world, hero, StopScope::LoopOnly);
    run_frame(&mut world, 100.0).unwrap();
    assert_eq!(image(&world, hero), "s1");
    for _ in 0..5 {
        run_frame(&mut world, 100.0).unwrap();
    }
    assert_eq!(image(&world, hero), "s1");
}

#[test]
fn destroyed_sprite_leaves_both_registries_after_one_tick() {
    let mut world = make_world();
    let log = record_all(&mut world, HERO);
    let doomed = spawn_mover(&mut world, HERO, 4.0, 0.0);
    let despawned = spawn_mover(&mut world, HERO, 0.0, 4.0);
    enable_auto_tracking(&mut world, doomed);
    enable_auto_tracking(&mut world, despawned);
    play_loop(&mut world, doomed, ["x", "y"], 50);
    play_loop(&mut world, despawned, ["x", "y"], 50);
    run_frame(&mut world, 16.0).unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);

    world.entity_mut(doomed).insert(Destroyed);
    world.despawn(despawned);
    set_velocity(&mut world, doomed, 0.0, 0.0);
    run_frame(&mut world, 16.0).unwrap();

    {
        let scenes = world.resource::<SceneStack>();
        assert!(scenes.current().classifiers().is_empty());
        assert!(scenes.current().animations().is_empty());
    }
    // destroyed sprites were skipped, so no standing event
    assert_eq!(log.lock().unwrap().len(), 2);
    assert_eq!(latest_event(&world, doomed), None);

    world.entity_mut(doomed).remove::<Destroyed>();
    enable_auto_tracking(&mut world, doomed);
    assert_eq!(latest_event(&world, doomed), None);
    run_frame(&mut world, 16.0).unwrap();
    assert_eq!(latest_event(&world, doomed), None);
    set_velocity(&mut world, doomed, -3.0, 0.0);
    run_frame(&mut world, 16.0).unwrap();
    assert_eq!(latest_event(&world, doomed), Some(EventKind::MovingWest));
}

#[test]
fn manual_trigger_reports_missing_handlers() {
    let mut world = make_world();
    let hero = spawn_mover(&mut world, HERO, 0.0, 0.0);
    let slime = spawn_mover(&mut world, SLIME, 0.0, 0.0);

    let r = trigger_event(&mut world, hero, EventKind::StandingWest).unwrap();
    assert_eq!(r, Dispatch::NoHandlerForEvent);

    register_event_handler(&mut world, HERO, EventKind::StandingWest, |ctx| {
        ctx.play_single(["poke"], 100);
        Ok(())
    });
    let r = trigger_event(&mut world, slime, EventKind::StandingWest).unwrap();
    assert_eq!(r, Dispatch::NoHandlerForKind);
    let r = trigger_event(&mut world, hero, EventKind::StandingWest).unwrap();
    assert_eq!(r, Dispatch::Handled);

    update_world_time(&mut world, 1.0);
    update_animations(&mut world);
    assert_eq!(image(&world, hero), "poke");
    // manual triggers do not touch the classifier
    assert_eq!(latest_event(&world, hero), None);
}

#[test]
fn handler_error_surfaces_in_frame_loop() {
    let mut world = make_world();
    let log = record_all(&mut world, SLIME);
    register_event_handler(&mut world, HERO, EventKind::MovingNorth, |_| {
        Err("hero handler failed".into())
    });
    let hero = spawn_mover(&mut world, HERO, 0.0, -5.0);
    let slime = spawn_mover(&mut world, SLIME, 0.0, -5.0);
    enable_auto_tracking(&mut world, hero);
    enable_auto_tracking(&mut world, slime);

    update_world_time(&mut world, 16.0);
    let err = update_movement_events(&mut world).unwrap_err();
    let TrackingError::Handler { sprite, event, .. } = err else {
        panic!("expected a handler error, got {err}");
    };
    assert_eq!(sprite, hero);
    assert_eq!(event, EventKind::MovingNorth);
    // the failing tick stopped before the slime ran
    assert!(log.lock().unwrap().is_empty());

    // the event was recorded, so the next tick moves on to the slime
    update_movement_events(&mut world).unwrap();
    assert_eq!(log.lock().unwrap().as_slice(), &[(slime, EventKind::MovingNorth)]);
}

#[test]
fn scenes_get_isolated_sessions() {
    let mut world = make_world();
    let log = record_all(&mut world, HERO);
    let hero = spawn_mover(&mut world, HERO, 4.0, 0.0);
    enable_auto_tracking(&mut world, hero);
    run_frame(&mut world, 16.0).unwrap();
    assert_eq!(log.lock().unwrap().len(), 1);

    push_scene(&mut world);
    assert_eq!(world.resource::<SceneStack>().depth(), 1);
    set_velocity(&mut world, hero, 0.0, 0.0);
    run_frame(&mut world, 16.0).unwrap();
    // nothing is tracked in the new scene
    assert_eq!(latest_event(&world, hero), None);
    assert_eq!(log.lock().unwrap().len(), 1);

    pop_scene(&mut world);
    assert_eq!(world.resource::<SceneStack>().depth(), 0);
    assert_eq!(latest_event(&world, hero), Some(EventKind::MovingEast));
    run_frame(&mut world, 16.0).unwrap();
    assert_eq!(latest_event(&world, hero), Some(EventKind::StandingEast));
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
#[should_panic(expected = "no suspended session")]
fn popping_the_root_scene_panics() {
    let mut world = make_world();
    pop_scene(&mut world);
}

#[test]
fn handler_can_use_world_level_animation_calls() {
    let mut world = make_world();
    register_event_handler(&mut world, HERO, EventKind::MovingEast, |ctx| {
        play_loop(ctx.world, ctx.sprite, ["run0", "run1"], 100);
        Ok(())
    });
    register_event_handler(&mut world, HERO, EventKind::StandingEast, |ctx| {
        stop_animation(ctx.world, ctx.sprite, StopScope::All);
        play_single(ctx.world, ctx.sprite, ["brake"], 100);
        Ok(())
    });
    let hero = spawn_mover(&mut world, HERO, 4.0, 0.0);
    enable_auto_tracking(&mut world, hero);

    // queued during the movement tick, applied before animation runs
    run_frame(&mut world, 0.0).unwrap();
    assert_eq!(image(&world, hero), "run0");
    run_frame(&mut world, 100.0).unwrap();
    assert_eq!(image(&world, hero), "run1");

    set_velocity(&mut world, hero, 0.0, 0.0);
    run_frame(&mut world, 10.0).unwrap();
    assert_eq!(image(&world, hero), "brake");
}

#[test]
fn handler_can_register_and_track_through_world() {
    let mut world = make_world();
    let log = record_all(&mut world, SLIME);
    let hero = spawn_mover(&mut world, HERO, 0.0, 4.0);
    let slime = spawn_mover(&mut world, SLIME, 0.0, 4.0);
    register_event_handler(&mut world, HERO, EventKind::MovingSouth, move |ctx| {
        enable_auto_tracking(ctx.world, slime);
        register_event_handler(ctx.world, HERO, EventKind::StandingSouth, |ctx| {
            ctx.play_single(["sit"], 100);
            Ok(())
        });
        Ok(())
    });
    enable_auto_tracking(&mut world, hero);

    run_frame(&mut world, 16.0).unwrap();
    assert!(log.lock().unwrap().is_empty());
    run_frame(&mut world, 16.0).unwrap();
    assert_eq!(log.lock().unwrap().as_slice(), &[(slime, EventKind::MovingSouth)]);

    set_velocity(&mut world, hero, 0.0, 0.0);
    run_frame(&mut world, 16.0).unwrap();
    assert_eq!(image(&world, hero), "sit");
}

#[test]
fn world_trigger_inside_handler_reports_busy() {
    let mut world = make_world();
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let seen_clone = seen.clone();
    register_event_handler(&mut world, HERO, EventKind::MovingWest, move |ctx| {
        let sprite = ctx.sprite;
        let outcome = match trigger_event(ctx.world, sprite, EventKind::StandingWest) {
            Err(TrackingError::SceneBusy { .. }) => "busy".to_string(),
            other => format!("{other:?}"),
        };
        seen_clone.lock().unwrap().push(outcome);
        // the stack is held by the tick, so nothing is visible from here
        assert_eq!(latest_event(ctx.world, sprite), None);
        Ok(())
    });
    let hero = spawn_mover(&mut world, HERO, -4.0, 0.0);
    enable_auto_tracking(&mut world, hero);
    run_frame(&mut world, 16.0).unwrap();

    assert_eq!(seen.lock().unwrap().as_slice(), &["busy".to_string()]);
    assert_eq!(latest_event(&world, hero), Some(EventKind::MovingWest));
}

#[test]
fn scene_push_from_handler_applies_after_tick() {
    let mut world = make_world();
    let hero = spawn_mover(&mut world, HERO, 0.0, -4.0);
    let slime = spawn_mover(&mut world, SLIME, 0.0, -4.0);
    let log = record_all(&mut world, SLIME);
    register_event_handler(&mut world, HERO, EventKind::MovingNorth, |ctx| {
        push_scene(ctx.world);
        Ok(())
    });
    enable_auto_tracking(&mut world, hero);
    enable_auto_tracking(&mut world, slime);
    run_frame(&mut world, 16.0).unwrap();

    // the rest of the tick still ran in the old scene
    assert_eq!(log.lock().unwrap().as_slice(), &[(slime, EventKind::MovingNorth)]);
    assert_eq!(world.resource::<SceneStack>().depth(), 1);
    assert_eq!(latest_event(&world, hero), None);

    pop_scene(&mut world);
    assert_eq!(world.resource::<SceneStack>().depth(), 0);
    assert_eq!(latest_event(&world, hero), Some(EventKind::MovingNorth));
}

#[test]
#[should_panic(expected = "no suspended session")]
fn scene_pop_from_handler_on_root_panics() {
    let mut world = make_world();
    register_event_handler(&mut world, HERO, EventKind::MovingEast, |ctx| {
        pop_scene(ctx.world);
        Ok(())
    });
    let hero = spawn_mover(&mut world, HERO, 4.0, 0.0);
    enable_auto_tracking(&mut world, hero);
    let _ = run_frame(&mut world, 16.0);
}

#[test]
fn pushed_scene_reads_current_config() {
    let mut world = make_world();
    world.resource_mut::<TrackingConfig>().hysteresis_band = 5.0;
    push_scene(&mut world);
    {
        let scenes = world.resource::<SceneStack>();
        assert_eq!(scenes.current().config().hysteresis_band, 5.0);
    }

    // (2, 6) is inside a 5.0 band, so the fallback order picks East
    let sprite = spawn_mover(&mut world, HERO, 2.0, 6.0);
    enable_auto_tracking(&mut world, sprite);
    run_frame(&mut world, 16.0).unwrap();
    assert_eq!(latest_event(&world, sprite), Some(EventKind::MovingEast));

    pop_scene(&mut world);
    assert_eq!(
        world.resource::<SceneStack>().current().config().hysteresis_band,
        1.0
    );
}

#[test]
fn world_time_is_scaled_and_accumulated() {
    let mut world = make_world();
    world.resource_mut::<WorldTime>().time_scale = 0.5;
    update_world_time(&mut world, 100.0);
    update_world_time(&mut world, -5.0);
    let time = world.resource::<WorldTime>();
    assert_eq!(time.delta, 0.0);
    assert_eq!(time.elapsed, 50.0);
    assert_eq!(time.frame_count, 2);
}
