use scene::UserOptions;

use crate::coordinator::PersistenceRequest;
use crate::test_harness::{TestWorld, OFFICE, YARD};

fn adjust(world: &mut TestWorld) {
    let mut options = world.world_mut().resource_mut::<UserOptions>();
    options.master_volume = 0.3;
    options.invert_y = true;
    options.field_of_view = 90.0;
}

#[test]
fn test_options_survive_restart() {
    let mut world = TestWorld::new("options_restart");
    adjust(&mut world);
    assert!(world.perform(PersistenceRequest::SaveOptions).succeeded());

    let world = world.restart();
    let options = world.world().resource::<UserOptions>();
    assert_eq!(options.master_volume, 0.3);
    assert!(options.invert_y);
    assert_eq!(options.field_of_view, 90.0);
}

#[test]
fn test_options_save_while_busy() {
    let mut world = TestWorld::in_context("options_busy", OFFICE);
    world.request(PersistenceRequest::ChangeContextNoSave(YARD));
    world.step();
    assert!(world.coordinator().is_busy());

    adjust(&mut world);
    world.request(PersistenceRequest::SaveOptions);
    world.step();

    let saved = world
        .finished()
        .iter()
        .find(|f| f.request == PersistenceRequest::SaveOptions)
        .cloned()
        .expect("options outcome reported");
    assert!(saved.succeeded(), "{:?}", saved.errors);
    assert!(world.layout().options_path().exists());

    world.run_until_idle();
    assert_eq!(world.active_context(), Some(YARD));
}

#[test]
fn test_new_game_and_load_leave_options_alone() {
    let mut world = TestWorld::in_context("options_new_game", OFFICE);
    adjust(&mut world);
    assert!(world.perform(PersistenceRequest::SaveOptions).succeeded());
    let expected = world.world().resource::<UserOptions>().clone();

    assert!(world.perform(PersistenceRequest::Save).succeeded());
    assert!(world.perform(PersistenceRequest::StartNewGame).succeeded());
    assert!(world.layout().options_path().exists());
    assert_eq!(*world.world().resource::<UserOptions>(), expected);

    // Options changed in memory are reverted by an explicit load of options.
    world.world_mut().resource_mut::<UserOptions>().subtitles = false;
    assert!(world.perform(PersistenceRequest::LoadOptions).succeeded());
    assert_eq!(*world.world().resource::<UserOptions>(), expected);
}
