use linegutter_core::config::{ATTR_COLOR, ATTR_PADDING, ATTR_WIDTH};
use linegutter_core::scheduler::{DEFAULT_QUIET_MS, ManualTimers};
use linegutter_core::testing::{DrawOp, FakeHost, RecordingRaster};
use linegutter_core::{ConfigOverride, Coordinator, InstanceId, NodeKey};
use std::time::Duration;

type TestCoordinator = Coordinator<FakeHost, RecordingRaster, ManualTimers>;

struct Fixture {
    coordinator: TestCoordinator,
    id: InstanceId,
    host: FakeHost,
    raster: RecordingRaster,
}

const NODE: NodeKey = NodeKey(1);

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Attach one host and let the initial render land.
fn fixture() -> Fixture {
    let host = FakeHost::new();
    host.set_attribute(ATTR_WIDTH, "64px");
    host.set_attribute(ATTR_PADDING, "8px");
    host.set_scroll_height(100.0);
    let raster = RecordingRaster::new();

    let mut coordinator = TestCoordinator::new(ManualTimers::new());
    let id = coordinator
        .attach(NODE, host.clone(), raster.clone(), ConfigOverride::default())
        .unwrap();
    let fired = coordinator.advance(ms(DEFAULT_QUIET_MS));
    assert_eq!(fired.len(), 1);

    Fixture {
        coordinator,
        id,
        host,
        raster,
    }
}

fn render_count(fixture: &Fixture) -> u64 {
    fixture
        .coordinator
        .instance(fixture.id)
        .map(|instance| instance.engine.render_count())
        .unwrap_or_default()
}

#[test]
fn test_initial_render_matches_content() {
    let f = fixture();

    assert_eq!(f.raster.labels(), ["1", "2", "3", "4", "5"]);
    assert_eq!(f.raster.size(), (64, 100));

    let centers: Vec<f64> = f
        .raster
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { y, .. } => Some(y - 14.0 / 2.0),
            _ => None,
        })
        .collect();
    assert_eq!(centers, [10.0, 30.0, 50.0, 70.0, 90.0]);

    assert_eq!(f.host.inline_style("padding-left").as_deref(), Some("68px"));
    assert_eq!(f.host.inline_style("background-size").as_deref(), Some("64px auto"));
    assert_eq!(f.host.inline_style("background-attachment").as_deref(), Some("local"));
    assert!(f.host.background_image().is_some_and(|v| v.starts_with("url(\"data:")));
}

#[test]
fn test_burst_collapses_to_one_render() {
    let mut f = fixture();

    for _ in 0..10 {
        f.coordinator.on_input(NODE).unwrap();
        f.coordinator.on_resize(NODE).unwrap();
        assert!(f.coordinator.advance(ms(DEFAULT_QUIET_MS - 1)).is_empty());
    }

    let fired = f.coordinator.advance(ms(1));
    assert_eq!(fired.len(), 1);
    assert_eq!(render_count(&f), 2);
}

#[test]
fn test_spaced_requests_each_render() {
    let mut f = fixture();

    for _ in 0..4 {
        f.coordinator.on_input(NODE).unwrap();
        assert_eq!(f.coordinator.advance(ms(DEFAULT_QUIET_MS + 1)).len(), 1);
    }
    assert_eq!(render_count(&f), 5);
}

#[test]
fn test_render_uses_state_when_it_fires() {
    let mut f = fixture();

    f.coordinator.on_input(NODE).unwrap();
    f.host.set_scroll_height(60.0);
    f.coordinator.advance(ms(10));
    f.coordinator.on_input(NODE).unwrap();
    f.host.set_scroll_height(80.0);

    let fired = f.coordinator.advance(ms(DEFAULT_QUIET_MS));
    let outcome = fired[0].1.as_ref().unwrap();
    assert_eq!(outcome.lines, 4);
    assert_eq!(f.raster.labels(), ["1", "2", "3", "4"]);
}

#[test]
fn test_color_attribute_rerenders_once() {
    let mut f = fixture();

    f.host.set_attribute(ATTR_COLOR, "#123456");
    assert!(f.coordinator.on_attribute_mutation(NODE, ATTR_COLOR).unwrap());

    let fired = f.coordinator.advance(ms(DEFAULT_QUIET_MS));
    assert_eq!(fired.len(), 1);
    assert_eq!(f.raster.last_fill_color().as_deref(), Some("#123456"));

    // Same value reported again: nothing to do.
    assert!(!f.coordinator.on_attribute_mutation(NODE, ATTR_COLOR).unwrap());
    assert!(f.coordinator.advance(ms(DEFAULT_QUIET_MS)).is_empty());
}

#[test]
fn test_untracked_attribute_ignored() {
    let mut f = fixture();

    f.host.set_attribute("data-unrelated", "yes");
    assert!(!f.coordinator.on_attribute_mutation(NODE, "data-unrelated").unwrap());
    assert!(f.coordinator.advance(ms(DEFAULT_QUIET_MS)).is_empty());
    assert_eq!(render_count(&f), 1);
}

#[test]
fn test_own_style_writes_do_not_retrigger() {
    let mut f = fixture();
    let writes = f.host.style_writes();
    assert_eq!(writes, 1);

    // The render's background/padding writes show up as a style mutation.
    assert!(!f.coordinator.on_attribute_mutation(NODE, "style").unwrap());
    assert!(f.coordinator.advance(ms(DEFAULT_QUIET_MS)).is_empty());
}

#[test]
fn test_font_change_rerenders() {
    let mut f = fixture();

    f.host.update_style(|style| {
        style.line_height = "25px".into();
        style.font_size = "18px".into();
    });
    assert!(f.coordinator.on_attribute_mutation(NODE, "style").unwrap());

    let fired = f.coordinator.advance(ms(DEFAULT_QUIET_MS));
    assert_eq!(fired[0].1.as_ref().unwrap().lines, 4);
}

#[test]
fn test_resize_rerenders_without_diff() {
    let mut f = fixture();

    f.host.set_scroll_height(140.0);
    assert!(f.coordinator.on_resize(NODE).unwrap());
    f.coordinator.advance(ms(DEFAULT_QUIET_MS));

    assert_eq!(f.raster.labels(), ["1", "2", "3", "4", "5", "6", "7"]);
    assert_eq!(f.raster.size(), (64, 140));

    // Even an unchanged size renders again.
    assert!(f.coordinator.on_resize(NODE).unwrap());
    assert_eq!(f.coordinator.advance(ms(DEFAULT_QUIET_MS)).len(), 1);
}

#[test]
fn test_repeat_render_is_byte_identical() {
    let mut f = fixture();
    let before = f.host.background_image();

    f.coordinator.on_input(NODE).unwrap();
    let fired = f.coordinator.advance(ms(DEFAULT_QUIET_MS));
    assert_eq!(fired.len(), 1);
    assert_eq!(f.host.background_image(), before);
}

#[test]
fn test_high_density_display() {
    let mut f = fixture();
    f.host.set_device_pixel_ratio(2.0);

    f.coordinator.on_input(NODE).unwrap();
    let fired = f.coordinator.advance(ms(DEFAULT_QUIET_MS));
    let outcome = fired[0].1.as_ref().unwrap();

    assert_eq!((outcome.raster_width, outcome.raster_height), (128, 200));
    assert_eq!(f.host.inline_style("background-size").as_deref(), Some("64px auto"));
    assert!(f.raster.ops().contains(&DrawOp::Font("28px monospace".into())));
}

#[test]
fn test_instances_are_independent() {
    let mut f = fixture();
    let other_host = FakeHost::new();
    other_host.set_scroll_height(20.0);
    let other_raster = RecordingRaster::new();
    f.coordinator
        .attach(NodeKey(2), other_host.clone(), other_raster.clone(), ConfigOverride::default())
        .unwrap();

    f.coordinator.advance(ms(DEFAULT_QUIET_MS));
    assert_eq!(other_raster.labels(), ["1"]);
    assert_eq!(f.raster.labels().len(), 5);
    assert_eq!(render_count(&f), 1);

    f.coordinator.detach(NodeKey(2)).unwrap();
    other_host.set_scroll_height(200.0);
    assert!(!f.coordinator.on_resize(NodeKey(2)).unwrap());
    assert_eq!(other_raster.labels(), ["1"]);
}
