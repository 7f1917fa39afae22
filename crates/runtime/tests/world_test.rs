//! End-to-end play through the actor runtime.

mod common;

use std::sync::Arc;
use std::time::Duration;

use adventure_core::{ActorKey, PlayerInfo, PlayerKey, narrative};
use common::*;
use runtime::{ChannelObserver, Departure, RuntimeError, Topic, WorldEvent, join_as};

#[tokio::test]
async fn walk_north_and_pick_up_torch() {
    let system = world(&small_map()).await;
    let amy = connect(&system, "Amy").await;

    let look = amy.play("look").await;
    assert!(look.starts_with(CLEARING_TEXT));
    assert!(look.contains("sword"));

    let cave = amy.play("n").await;
    assert!(cave.starts_with(CAVE_TEXT));
    assert!(cave.contains("torch"));
    assert!(cave.contains("Goblin"));

    assert_eq!(amy.play("take the torch").await, narrative::OKAY);
    assert_eq!(amy.play("i").await, "You are carrying: torch");

    let back = amy.play("go south").await;
    assert!(back.starts_with(CLEARING_TEXT));
    assert!(back.ends_with("You are holding the following items:\ntorch\n"));

    let cave = system.room(CAVE).unwrap().snapshot().await.unwrap();
    assert!(!cave.has_thing("torch"));
}

#[tokio::test]
async fn go_moves_membership_between_rooms() {
    let system = world(&small_map()).await;
    let amy = connect(&system, "Amy").await;
    let key = amy.joined.player.key();

    assert_eq!(amy.play("w").await, narrative::CANNOT_GO);
    assert_eq!(amy.play("go").await, narrative::GO_WHERE);

    amy.play("north").await;

    let clearing = system.room(CLEARING).unwrap().snapshot().await.unwrap();
    let cave = system.room(CAVE).unwrap().snapshot().await.unwrap();
    assert!(!clearing.has_player(key));
    assert!(cave.has_player(key));
    assert_eq!(amy.joined.player.room().await.unwrap(), Some(CAVE));
}

#[tokio::test]
async fn entering_twice_keeps_one_entry() {
    let system = world(&small_map()).await;
    let room = system.room(CAVE).unwrap();
    let visitor = PlayerInfo::new(PlayerKey::new(), "Visitor");

    room.enter(visitor.clone()).await.unwrap();
    room.enter(visitor.clone()).await.unwrap();

    let state = room.snapshot().await.unwrap();
    let entries = state.players.iter().filter(|p| p.key == visitor.key).count();
    assert_eq!(entries, 1);
}

#[tokio::test]
async fn take_then_drop_returns_thing_to_floor() {
    let system = world(&small_map()).await;
    let amy = connect(&system, "Amy").await;
    let clearing = system.room(CLEARING).unwrap();

    assert_eq!(amy.play("take sword").await, narrative::OKAY);
    assert!(!clearing.snapshot().await.unwrap().has_thing("sword"));
    assert_eq!(amy.play("take sword").await, narrative::DONT_UNDERSTAND);

    assert_eq!(amy.play("drop sword").await, narrative::OKAY);
    assert!(clearing.snapshot().await.unwrap().has_thing("sword"));
    assert_eq!(amy.play("drop sword").await, narrative::DONT_UNDERSTAND);
    assert_eq!(amy.play("i").await, "You are carrying: ");
}

#[tokio::test]
async fn unarmed_player_cannot_kill() {
    let system = world(&small_map()).await;
    let _amy = connect(&system, "Amy").await;
    let bob = connect(&system, "Bob").await;

    assert_eq!(bob.play("kill Amy").await, narrative::BARE_HANDS);
    assert_eq!(bob.play("kill").await, narrative::KILL_WHAT);
}

#[tokio::test]
async fn player_kill_is_announced_and_victim_sees_no_return() {
    let system = world(&small_map()).await;
    let mut amy = connect(&system, "Amy").await;
    let bob = connect(&system, "Bob").await;
    let mut combat = system.events().subscribe(Topic::Combat);

    amy.expect_message("Bob entered the room.").await;
    assert_eq!(bob.play("take sword").await, narrative::OKAY);
    assert_eq!(bob.play("kill bob").await, narrative::KILL_YOURSELF);
    assert_eq!(bob.play("kill amy").await, "amy is now dead.");

    amy.expect_message("You were killed by Bob!").await;

    let event = tokio::time::timeout(Duration::from_secs(2), combat.recv())
        .await
        .expect("death should be published")
        .unwrap();
    assert_eq!(
        event,
        WorldEvent::Died {
            room: CLEARING,
            victim: "Amy".to_string(),
            killer: Some("Bob".to_string()),
            weapon: Some("sword".to_string()),
        }
    );

    let state = amy.joined.player.snapshot().await.unwrap();
    assert!(state.killed);
    assert_eq!(state.room, None);

    let clearing = system.room(CLEARING).unwrap().snapshot().await.unwrap();
    assert!(!clearing.has_player(amy.joined.player.key()));

    assert!(amy.play("look").await.starts_with(NO_RETURN_TEXT));
    assert!(amy.play("n").await.starts_with(NO_RETURN_TEXT));
}

#[tokio::test]
async fn killed_player_can_still_end() {
    let system = world(&small_map()).await;
    let mut amy = connect(&system, "Amy").await;
    let bob = connect(&system, "Bob").await;

    amy.expect_message("Bob entered the room.").await;
    bob.play("take sword").await;
    bob.play("kill amy").await;
    amy.expect_message("You were killed by Bob!").await;

    assert_eq!(amy.play("end").await, "");

    let amy_key = amy.joined.player.key();
    for room in [CLEARING, CAVE, NO_RETURN] {
        let state = system.room(room).unwrap().snapshot().await.unwrap();
        assert!(!state.has_player(amy_key), "{room:?} still lists Amy");
    }
    assert_eq!(amy.joined.player.snapshot().await.unwrap().room, None);
}

#[tokio::test]
async fn queued_death_lands_before_the_victims_next_call() {
    let system = world(&small_map()).await;
    let amy = connect(&system, "Amy").await;
    let bob = connect(&system, "Bob").await;

    bob.play("take sword").await;
    assert_eq!(bob.play("kill amy").await, "amy is now dead.");

    let state = amy.joined.player.snapshot().await.unwrap();
    assert!(state.killed);
}

#[tokio::test]
async fn death_without_killer_is_plain() {
    let system = world(&small_map()).await;
    let mut amy = connect(&system, "Amy").await;
    let mut bob = connect(&system, "Bob").await;
    amy.expect_message("Bob entered the room.").await;

    amy.joined.player.die(None, None).await.unwrap();

    assert_eq!(bob.expect_message("died").await, "Amy died.");
    assert_eq!(amy.expect_message("died").await, narrative::YOU_DIED);
    assert!(amy.joined.player.snapshot().await.unwrap().killed);
}

#[tokio::test]
async fn rejoining_with_the_same_key_keeps_one_player() {
    let system = world(&small_map()).await;
    let key = PlayerKey::new();

    for _ in 0..2 {
        let (observer, _inbox) = ChannelObserver::new();
        join_as(&system, key, "Amy", Arc::new(observer)).await.unwrap();
    }

    let clearing = system.room(CLEARING).unwrap().snapshot().await.unwrap();
    assert_eq!(clearing.players.len(), 1);
    assert!(clearing.has_player(key));
}

#[tokio::test]
async fn goblin_dies_once() {
    let system = world(&small_map()).await;
    let amy = connect(&system, "Amy").await;

    amy.play("take sword").await;
    amy.play("n").await;
    assert_eq!(amy.play("kill gob").await, "Goblin is dead.");

    let goblin = system.monster(GOBLIN).unwrap();
    assert_eq!(goblin.room().await.unwrap(), None);
    assert_eq!(
        goblin.kill(CAVE, None, None).await.unwrap(),
        narrative::already_dead("Goblin")
    );

    let cave = amy.play("look").await;
    assert!(!cave.contains("Goblin"));
    assert_eq!(amy.play("kill goblin").await, narrative::cannot_see("goblin"));
}

#[tokio::test]
async fn goblin_in_another_room_sneaks_away() {
    let system = world(&small_map()).await;
    let goblin = system.monster(GOBLIN).unwrap();

    assert_eq!(
        goblin.kill(CLEARING, None, None).await.unwrap(),
        narrative::snuck_away("Goblin")
    );
    assert_eq!(goblin.room().await.unwrap(), Some(CAVE));
}

#[tokio::test]
async fn monster_needs_a_matching_thing() {
    let system = world(&small_map()).await;
    let amy = connect(&system, "Amy").await;

    amy.play("n").await;
    assert_eq!(amy.play("kill goblin").await, narrative::BARE_HANDS);
    amy.play("take torch").await;
    assert_eq!(amy.play("kill goblin").await, narrative::BARE_HANDS);
    assert_eq!(
        system.monster(GOBLIN).unwrap().room().await.unwrap(),
        Some(CAVE)
    );
}

#[tokio::test]
async fn shout_and_whisper_reach_other_players_only() {
    let system = world(&small_map()).await;
    let mut amy = connect(&system, "Amy").await;
    let mut bob = connect(&system, "Bob").await;

    amy.expect_message("Bob entered the room.").await;

    assert_eq!(amy.play("shout hello there").await, "You shouted 'hello there'");
    bob.expect_message("Amy SHOUTS 'HELLO THERE'").await;

    assert_eq!(bob.play("whisper psst").await, "You whispered 'psst'");
    amy.expect_message("Bob whispers 'psst'").await;

    assert!(amy.inbox.try_recv().is_err());
}

#[tokio::test]
async fn ending_the_session_drops_things_and_notifies_room() {
    let system = world(&small_map()).await;
    let amy = connect(&system, "Amy").await;
    let mut bob = connect(&system, "Bob").await;
    let mut movement = system.events().subscribe(Topic::Movement);

    amy.play("take sword").await;
    runtime::depart(&system, &amy.joined).await.unwrap();

    bob.expect_message("Amy left the game.").await;

    let clearing = system.room(CLEARING).unwrap().snapshot().await.unwrap();
    assert!(clearing.has_thing("sword"));
    assert!(!clearing.has_player(amy.joined.player.key()));

    let left = loop {
        let event = movement.recv().await.unwrap();
        if let WorldEvent::Left { how, who, .. } = event {
            break (how, who);
        }
    };
    assert_eq!(
        left,
        (Departure::Leave, ActorKey::Player(amy.joined.player.key()))
    );
}

#[tokio::test]
async fn unknown_and_help_commands() {
    let system = world(&small_map()).await;
    let amy = connect(&system, "Amy").await;

    assert_eq!(amy.play("dance").await, narrative::DONT_UNDERSTAND);
    assert_eq!(amy.play("help").await, narrative::HELP);
    assert_eq!(amy.joined.player.name().await.unwrap(), "Amy");
}

#[tokio::test]
async fn monster_timer_moves_between_rooms() {
    let config = runtime::RuntimeConfig {
        monster_move_interval: Duration::from_millis(20),
        ..quiet_config()
    };
    let system = runtime::RuntimeBuilder::new()
        .config(config)
        .build()
        .unwrap();
    let mut movement = system.events().subscribe(Topic::Movement);
    runtime::configure_world(&system, &ring_map()).await.unwrap();

    let wandered = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match movement.recv().await {
                Ok(WorldEvent::Left {
                    who: ActorKey::Monster(id),
                    how: Departure::Exit,
                    ..
                }) if id == GOBLIN => return true,
                Ok(_) => continue,
                Err(_) => return false,
            }
        }
    })
    .await
    .expect("goblin should wander");
    assert!(wandered);

    system.shutdown().await;
}

#[tokio::test]
async fn shutdown_rejects_new_resolutions() {
    let system = world(&small_map()).await;
    assert!(system.active_actors() > 0);

    system.shutdown().await;

    assert!(matches!(
        system.room(CLEARING),
        Err(RuntimeError::ShuttingDown)
    ));
    assert_eq!(system.active_actors(), 0);
}
