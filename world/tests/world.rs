use turtle_world::{TitleAllocator, Turtle, World};
use turtle_world_core::{FixedColor, Rgb, WorldError, BACKGROUND};
use turtle_world_rendering::HeadlessSurface;

const INK: Rgb = Rgb::new(20, 40, 60);

fn world_with(surface: &HeadlessSurface, width: i32, height: i32) -> World {
    World::builder(width, height, surface.clone())
        .title("World")
        .colors(FixedColor(INK))
        .build()
        .expect("valid world")
}

#[test]
fn rejects_empty_axes() {
    for (width, height) in [(0, 10), (10, 0), (-5, 10), (0, 0)] {
        let error = World::new(width, height, HeadlessSurface::new()).expect_err("invalid extent");
        assert_eq!(error, WorldError::InvalidDimension { width, height });
    }
}

#[test]
fn smallest_world_is_a_single_pixel() {
    let surface = HeadlessSurface::new();
    let world = world_with(&surface, 1, 1);

    let turtle = Turtle::new(&world);
    turtle.forward(100);

    assert_eq!((world.width(), world.height()), (1, 1));
    assert_eq!((turtle.x(), turtle.y()), (0, 0));
}

#[test]
fn opening_shows_an_empty_frame() {
    let surface = HeadlessSurface::new();
    let world = world_with(&surface, 40, 30);

    assert_eq!(surface.title().as_deref(), Some("World"));
    assert_eq!(surface.dimensions(), Some(world.dimensions()));
    assert_eq!(surface.presented(), 1);
    assert_eq!(world.repaint_count(), 1);
    assert!(world.is_empty());
    assert!(world.trails().pixels().iter().all(|pixel| *pixel == BACKGROUND));
}

#[test]
fn background_colour_fills_the_trail_image() {
    let surface = HeadlessSurface::new();
    let world = World::builder(8, 8, surface.clone())
        .title("Dark")
        .background(Rgb::BLACK)
        .build()
        .expect("valid world");

    assert_eq!(world.trails().pixel(3, 3), Some(Rgb::BLACK));
    let trails = surface.trails().expect("opened");
    assert_eq!(trails.pixel(3, 3), Some(Rgb::BLACK));
}

#[test]
fn describes_an_empty_world() {
    let world = world_with(&HeadlessSurface::new(), 400, 300);

    assert_eq!(world.describe(), "{World(400, 300)}");
}

#[test]
fn describes_each_turtle_once() {
    let world = world_with(&HeadlessSurface::new(), 400, 400);
    let first = Turtle::new(&world);
    let second = Turtle::at(&world, 10, 20);
    second.turn(90);

    assert_eq!(
        world.describe(),
        format!("{{World(400, 400), {first}, {second}}}")
    );
    assert_eq!(
        second.describe(),
        "Turtle(x: 10, y: 20, direction: 90, red: 20, green: 40, blue: 60)"
    );
}

#[test]
fn adding_twice_keeps_one_entry() {
    let world = world_with(&HeadlessSurface::new(), 100, 100);
    let turtle = Turtle::new(&world);

    world.add(&turtle).expect("same world");
    world.add(&turtle).expect("same world");

    assert_eq!(world.len(), 1);
    assert!(world.contains(&turtle));
}

#[test]
fn removing_twice_is_harmless() {
    let surface = HeadlessSurface::new();
    let world = world_with(&surface, 100, 100);
    let turtle = Turtle::new(&world);
    let before = world.repaint_count();

    world.remove(&turtle);
    world.remove(&turtle);

    assert!(world.is_empty());
    assert!(!world.contains(&turtle));
    assert_eq!(world.repaint_count(), before + 1);
    assert!(surface.poses().is_empty());
}

#[test]
fn removed_turtles_can_rejoin() {
    let world = world_with(&HeadlessSurface::new(), 100, 100);
    let turtle = Turtle::new(&world);

    world.remove(&turtle);
    world.add(&turtle).expect("same world");

    assert_eq!(world.turtles(), vec![turtle]);
}

#[test]
fn turtles_of_another_world_are_rejected() {
    let home = world_with(&HeadlessSurface::new(), 100, 100);
    let elsewhere = world_with(&HeadlessSurface::new(), 100, 100);
    let turtle = Turtle::new(&home);

    let error = elsewhere.add(&turtle).expect_err("foreign turtle");

    assert!(matches!(error, WorldError::InvalidReference(_)));
    assert!(elsewhere.is_empty());
}

#[test]
fn every_repaint_reaches_the_surface() {
    let surface = HeadlessSurface::new();
    let world = world_with(&surface, 200, 200);
    let turtle = Turtle::new(&world);

    turtle.forward(10);
    turtle.turn(30);
    turtle.move_to(5, 5);
    world.repaint();

    assert_eq!(world.repaint_count(), 6);
    assert_eq!(surface.presented(), 6);
    assert_eq!(surface.poses(), world.poses());
}

#[test]
fn poses_follow_registration_order() {
    let world = world_with(&HeadlessSurface::new(), 100, 100);
    let first = Turtle::at(&world, 1, 1);
    let second = Turtle::at(&world, 2, 2);

    let positions: Vec<_> = world.poses().iter().map(|pose| pose.position).collect();

    assert_eq!(positions, vec![first.position(), second.position()]);
}

#[test]
fn handles_compare_by_identity() {
    let world = world_with(&HeadlessSurface::new(), 10, 10);
    let same = world.clone();
    let other = world_with(&HeadlessSurface::new(), 10, 10);

    assert_eq!(world, same);
    assert_ne!(world, other);
}

#[test]
fn titles_come_from_the_given_allocator() {
    let titles = TitleAllocator::new();
    let first = World::builder(10, 10, HeadlessSurface::new())
        .titles(&titles)
        .build()
        .expect("valid world");
    let surface = HeadlessSurface::new();
    let second = World::builder(10, 10, surface.clone())
        .titles(&titles)
        .build()
        .expect("valid world");

    assert_eq!(first.title(), "World");
    assert_eq!(second.title(), "World 2");
    assert_eq!(surface.title().as_deref(), Some("World 2"));
    assert_eq!(titles.allocated(), 2);
}

#[test]
fn failed_construction_does_not_consume_a_title() {
    let titles = TitleAllocator::new();

    let _ = World::builder(0, 10, HeadlessSurface::new())
        .titles(&titles)
        .build()
        .expect_err("invalid extent");

    assert_eq!(titles.allocated(), 0);
}
