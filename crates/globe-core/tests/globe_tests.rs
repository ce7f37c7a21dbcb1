// Host-side tests for a mounted globe: clicks, drags, resize and teardown.

mod common;

use common::*;
use globe_core::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn recording_sink(globe: &mut Globe) -> Rc<RefCell<Vec<String>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    globe.set_selection_sink(Box::new(move |label: &str| {
        sink.borrow_mut().push(label.to_string())
    }));
    seen
}

#[test]
fn mount_prepares_surface_with_transparent_clear() {
    let (_globe, surface) = still_globe(Capabilities::PICK_AND_DRAG);
    let log = surface.log.borrow();
    assert_eq!(log.prepared, 1);
    assert!(!log.textured);
    assert_eq!(log.clear_color.map(|c| c[3]), Some(0.0));
    assert_eq!(log.resizes, vec![(800, 600)]);
}

#[test]
fn click_on_facing_marker_selects_it() {
    let (mut globe, _surface) = still_globe(Capabilities::PICK_AND_DRAG);
    let seen = recording_sink(&mut globe);
    let p = face_marker(&mut globe, "Skills", instant::Instant::now());

    assert_eq!(globe.pointer_down(p.x, p.y).as_deref(), Some("Skills"));
    assert_eq!(globe.selected(), Some("Skills"));
    assert_eq!(*seen.borrow(), vec!["Skills".to_string()]);
    // The same press also starts a drag.
    assert!(globe.rotation().is_dragging());
}

#[test]
fn every_default_marker_is_pickable_when_facing() {
    let (mut globe, _surface) = still_globe(Capabilities::PICK_AND_DRAG);
    let t0 = instant::Instant::now();
    for label in ["Contacts", "Experience", "Skills", "About"] {
        let p = face_marker(&mut globe, label, t0);
        assert_eq!(globe.pointer_down(p.x, p.y).as_deref(), Some(label));
        globe.pointer_up();
    }
}

#[test]
fn miss_keeps_previous_selection() {
    let (mut globe, _surface) = still_globe(Capabilities::PICK_AND_DRAG);
    let seen = recording_sink(&mut globe);
    let p = face_marker(&mut globe, "Skills", instant::Instant::now());
    globe.pointer_down(p.x, p.y);
    globe.pointer_up();

    // Empty corner of the viewport.
    assert_eq!(globe.pointer_down(2.0, 2.0), None);
    globe.pointer_up();
    // Centre of the globe, away from every marker.
    let c = globe.pointer_down(400.0, 300.0);
    assert_eq!(c, None);

    assert_eq!(globe.selected(), Some("Skills"));
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn clicking_the_same_marker_twice_notifies_twice() {
    let (mut globe, _surface) = still_globe(Capabilities::PICK_AND_DRAG);
    let seen = recording_sink(&mut globe);
    let p = face_marker(&mut globe, "About", instant::Instant::now());
    globe.pointer_down(p.x, p.y);
    globe.pointer_up();
    globe.pointer_down(p.x, p.y);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn selected_marker_is_highlighted_in_the_next_frame() {
    let (mut globe, surface) = still_globe(Capabilities::PICK_AND_DRAG);
    let t0 = instant::Instant::now();
    let p = face_marker(&mut globe, "Skills", t0);
    globe.pointer_down(p.x, p.y);
    globe.pointer_up();
    globe.step(t0 + Duration::from_millis(16)).unwrap();
    assert_eq!(
        surface.log.borrow().last_highlighted,
        vec![false, false, true, false]
    );
}

#[test]
fn drag_rotates_the_globe() {
    let (mut globe, _surface) = still_globe(Capabilities::PICK_AND_DRAG);
    globe.handle_pointer(PointerEvent::down(100.0, 100.0));
    globe.handle_pointer(PointerEvent::moved(150.0, 130.0));
    globe.handle_pointer(PointerEvent::up(150.0, 130.0));
    globe.step(instant::Instant::now()).unwrap();

    let r = globe.rotation().displayed();
    assert!(approx(r.x, 0.15) && approx(r.y, 0.25));
    let want = glam::Quat::from_rotation_x(0.15) * glam::Quat::from_rotation_y(0.25);
    assert!(globe.scene().globe_rotation().abs_diff_eq(want, 1e-5));
}

#[test]
fn plain_rotation_ignores_pointer() {
    let (mut globe, _surface) = still_globe(Capabilities::PLAIN_ROTATION);
    let p = face_marker(&mut globe, "Skills", instant::Instant::now());
    assert_eq!(globe.pointer_down(p.x, p.y), None);
    assert!(!globe.rotation().is_dragging());
    assert!(!globe.pointer_move(p.x + 50.0, p.y));
    assert_eq!(globe.selected(), None);
}

#[test]
fn drag_rotation_does_not_pick() {
    let (mut globe, _surface) = still_globe(Capabilities::DRAG_ROTATION);
    let p = face_marker(&mut globe, "Skills", instant::Instant::now());
    assert_eq!(globe.pointer_down(p.x, p.y), None);
    assert!(globe.rotation().is_dragging());
    assert!(globe.pointer_move(p.x + 50.0, p.y));
    assert_eq!(globe.selected(), None);
}

#[test]
fn capability_presets() {
    assert!(!Capabilities::PLAIN_ROTATION.drag_rotate && !Capabilities::PLAIN_ROTATION.pick);
    assert!(Capabilities::DRAG_ROTATION.drag_rotate && !Capabilities::DRAG_ROTATION.pick);
    assert_eq!(Capabilities::default(), Capabilities::PICK_AND_DRAG);
    for caps in [
        Capabilities::PLAIN_ROTATION,
        Capabilities::DRAG_ROTATION,
        Capabilities::PICK_AND_DRAG,
    ] {
        assert!(caps.auto_rotate);
    }
}

#[test]
fn auto_rotation_spins_by_elapsed_time() {
    let mut config = GlobeConfig::default();
    config.damping_tau_sec = 0.0;
    let scene = build_scene(&config);
    let mut globe = Globe::mount(config, scene, Box::new(FakeSurface::default()), viewport()).unwrap();
    let t0 = instant::Instant::now();
    globe.step(t0).unwrap();
    globe.step(t0 + Duration::from_millis(200)).unwrap();
    assert!(approx(globe.rotation().displayed().y, 0.1));
}

#[test]
fn resize_updates_camera_and_backing_store() {
    let (mut globe, surface) = still_globe(Capabilities::PICK_AND_DRAG);
    globe.resize(Viewport::from_window(800.0, 600.0, 3.0));
    assert_eq!(surface.log.borrow().resizes.last(), Some(&(1600, 1200)));
    assert!(approx(globe.camera().aspect, 800.0 / 600.0));

    globe.resize(Viewport::from_window(1024.0, 512.0, 1.0));
    assert!(approx(globe.camera().aspect, 2.0));
}

#[test]
fn zero_sized_window_is_tolerated() {
    let (mut globe, surface) = still_globe(Capabilities::PICK_AND_DRAG);
    let renders_before = surface.log.borrow().renders;
    globe.resize(Viewport::from_window(0.0, 0.0, 1.0));
    assert_eq!(globe.camera().aspect, 0.0);
    assert_eq!(surface.log.borrow().resizes.last(), Some(&(0, 0)));

    globe.step(instant::Instant::now()).unwrap();
    assert_eq!(surface.log.borrow().renders, renders_before);
    assert_eq!(globe.pointer_down(0.0, 0.0), None);

    globe.resize(Viewport::from_window(640.0, 0.5, 1.0));
    assert!(approx(globe.camera().aspect, 640.0));
}

#[test]
fn teardown_releases_everything_once() {
    let (mut globe, surface) = still_globe(Capabilities::PICK_AND_DRAG);
    let detached = Rc::new(RefCell::new(0));
    for _ in 0..3 {
        let d = detached.clone();
        globe.subscriptions_mut().push_fn(move || *d.borrow_mut() += 1);
    }
    let sched = FakeScheduler::default();
    globe.start_loop(Box::new(sched.clone())).unwrap();
    let p = face_marker(&mut globe, "Skills", instant::Instant::now());
    globe.pointer_down(p.x, p.y);

    globe.teardown();
    globe.teardown();

    assert!(globe.is_torn_down());
    assert_eq!(*detached.borrow(), 3);
    assert_eq!(surface.log.borrow().disposed, 1);
    assert_eq!(sched.log.borrow().cancelled, vec![1]);
    assert_eq!(globe.selected(), None);

    // A refresh callback that was already in flight does nothing.
    assert!(!globe.on_frame(instant::Instant::now()).unwrap());
    assert_eq!(sched.log.borrow().requested, vec![1]);

    drop(globe);
    assert_eq!(surface.log.borrow().disposed, 1);
    assert_eq!(*detached.borrow(), 3);
}

#[test]
fn input_after_teardown_is_ignored() {
    let (mut globe, surface) = still_globe(Capabilities::PICK_AND_DRAG);
    let p = face_marker(&mut globe, "Skills", instant::Instant::now());
    let renders = surface.log.borrow().renders;
    globe.teardown();

    assert_eq!(globe.pointer_down(p.x, p.y), None);
    assert!(!globe.pointer_move(p.x + 10.0, p.y));
    globe.resize(Viewport::from_window(10.0, 10.0, 1.0));
    globe.step(instant::Instant::now()).unwrap();
    assert_eq!(surface.log.borrow().renders, renders);
    assert_eq!(surface.log.borrow().resizes.len(), 1);
}

#[test]
fn resize_reports_whether_the_surface_was_resized() {
    let (mut globe, surface) = still_globe(Capabilities::PICK_AND_DRAG);
    assert!(globe.resize(Viewport::from_window(300.0, 200.0, 1.0)));
    assert_eq!(surface.log.borrow().resizes.last(), Some(&(300, 200)));

    globe.teardown();
    assert!(!globe.resize(Viewport::from_window(500.0, 400.0, 1.0)));
    assert_eq!(surface.log.borrow().resizes.last(), Some(&(300, 200)));
    assert_eq!(globe.viewport().width, 300.0);
}

#[test]
fn teardown_after_partial_setup_releases_staged_registrations() {
    let (mut globe, surface) = still_globe(Capabilities::PICK_AND_DRAG);
    let released = Rc::new(RefCell::new(0));
    let mut staged = Subscriptions::new();
    for _ in 0..2 {
        let r = released.clone();
        staged.push_fn(move || *r.borrow_mut() += 1);
    }
    globe.subscriptions_mut().append(&mut staged);
    // A later setup step fails; the host tears the globe down instead of returning it.
    globe.teardown();
    assert_eq!(*released.borrow(), 2);
    assert_eq!(surface.log.borrow().disposed, 1);
}

#[test]
fn drop_without_teardown_still_disposes() {
    let (globe, surface) = still_globe(Capabilities::PICK_AND_DRAG);
    drop(globe);
    assert_eq!(surface.log.borrow().disposed, 1);
}

#[test]
fn resize_event_clamps_pixel_ratio() {
    let ev = ResizeEvent {
        inner_width: 500.0,
        inner_height: 400.0,
        device_pixel_ratio: 2.5,
    };
    let vp = ev.viewport();
    assert_eq!(vp.pixel_ratio, 2.0);
    assert_eq!(vp.physical_size(), (1000, 800));
}
