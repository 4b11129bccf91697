//! Integration tests for trellis-tui.
//!
//! These tests exercise the public API from outside the crate, verifying that
//! the schema registry, style cascade, widget lifecycle, and event bus work
//! together through the headless pilot.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use serde_json::json;
use trellis_tui::event::Modifiers;
use trellis_tui::style::parse_declarations;
use trellis_tui::testing::{surface_to_string, Pilot};
use trellis_tui::widgets::Status;
use trellis_tui::*;

// ---------------------------------------------------------------------------
// Schema validation
// ---------------------------------------------------------------------------

#[test]
fn test_invalid_size_reports_one_error() {
    let registry = SchemaRegistry::with_builtins();
    let result = registry.validate("StatusIndicator", &Props::new().with("size", "huge"));
    assert!(!result.success);
    assert!(result.data.is_none());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, "size");
}

#[test]
fn test_defaults_are_filled() {
    let registry = SchemaRegistry::with_builtins();
    let result = registry.validate("LogViewer", &Props::new());
    assert!(result.success);
    let data = result.data.unwrap();
    assert_eq!(data.get_str("variant"), Some("default"));
    assert_eq!(data.get_str("size"), Some("medium"));
    assert_eq!(data.get_f64("maxLines"), Some(100.0));
    assert_eq!(data.get_bool("showHeader"), Some(true));
}

#[test]
fn test_unknown_component_fails() {
    let result = validate(&SchemaRegistry::with_builtins(), "Nope", &Props::new());
    assert!(!result.success);
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn test_construction_rejects_invalid_props() {
    let pilot = Pilot::new(40, 10);
    let err = pilot
        .mount::<StatusIndicator>(Props::new().with("size", "huge").with("status", "zzz"))
        .err()
        .unwrap();
    match err {
        WidgetError::Validation(err) => {
            let mut paths = err.paths();
            paths.sort_unstable();
            assert_eq!(paths, vec!["size", "status"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    // Nothing was left on the surface.
    assert!(pilot.app().surface().borrow().is_empty());
}

// ---------------------------------------------------------------------------
// Style cascade
// ---------------------------------------------------------------------------

#[test]
fn test_resolve_style_is_deterministic() {
    let theme = Theme::dark();
    let table = PartTable::new("Demo", "box")
        .base(|t| StyleRecord::new().fg(t.color("text.primary", "white")))
        .layer(Axis::Variant, "primary", |_| StyleRecord::new().bold(true))
        .layer(Axis::Size, "large", |_| StyleRecord::new().padding(Padding::all(1)));
    let axes = Axes::new()
        .with(Axis::Variant, Some("primary"))
        .with(Axis::Size, Some("large"));
    let first = resolve_style(&theme, &table, &axes);
    let second = resolve_style(&theme, &table, &axes);
    assert_eq!(first, second);
    assert_eq!(first.bold, Some(true));
    assert_eq!(first.padding, Some(Padding::all(1)));
}

#[test]
fn test_style_prop_overrides_cascade() {
    let pilot = Pilot::new(40, 10);
    let w = pilot
        .mount::<StatusIndicator>(Props::new().with("style", "fg: cyan; border: heavy"))
        .unwrap();
    let root = w.root().unwrap();
    let surface = pilot.app().surface().borrow();
    let style = surface.style(root).unwrap();
    let expected = parse_declarations("fg: cyan; border: heavy").unwrap();
    assert_eq!(style.fg, expected.fg);
    assert_eq!(style.border.as_ref().map(|b| b.kind), Some(BorderKind::Heavy));
}

// ---------------------------------------------------------------------------
// StatusIndicator
// ---------------------------------------------------------------------------

#[test]
fn test_status_lifecycle_scenario() {
    let mut pilot = Pilot::new(40, 10);
    let w = pilot
        .mount::<StatusIndicator>(
            Props::new()
                .with("status", "running")
                .with("refreshInterval", 1000),
        )
        .unwrap();
    let indicator = w.element("indicator").unwrap();
    assert_eq!(pilot.content(indicator).as_deref(), Some("RUNNING"));

    pilot.advance(250);
    w.set_status("paused").unwrap();
    assert_eq!(pilot.content(indicator).as_deref(), Some("PAUSED"));
    let transitions = w.transitions().unwrap();
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].from, Status::Running);
    assert_eq!(transitions[0].to, Status::Paused);
    assert!(transitions[0].duration.as_millis() >= 250);

    w.cleanup();
    let surface_renders = pilot.render_count();
    let widget_renders = w.render_count();
    assert_eq!(pilot.advance(2000), 0);
    assert_eq!(pilot.render_count(), surface_renders);
    assert_eq!(w.render_count(), widget_renders);
    assert!(!w.has_timer().unwrap());
}

#[test]
fn test_status_frame_snapshot() {
    let pilot = Pilot::new(24, 6);
    let _w = pilot
        .mount::<StatusIndicator>(Props::new().with("status", "running").with("label", "Build"))
        .unwrap();
    let text = surface_to_string(&pilot.app().surface().borrow());
    insta::assert_snapshot!(text, @r"
    ╭──────────────────────╮
    │ Build                │
    │ ● RUNNING            │
    ╰──────────────────────╯
    ");
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_cleanup_is_idempotent() {
    let pilot = Pilot::new(40, 10);
    let w = pilot.mount::<LogViewer>(Props::new()).unwrap();
    assert!(!pilot.app().surface().borrow().is_empty());
    w.cleanup();
    w.cleanup();
    assert!(w.is_destroyed());
    assert_eq!(w.lifecycle_state(), LifecycleState::Destroyed);
    assert!(pilot.app().surface().borrow().is_empty());
    let destroyed = w
        .history()
        .iter()
        .filter(|t| t.to == LifecycleState::Destroyed)
        .count();
    assert_eq!(destroyed, 1);
}

#[test]
fn test_use_after_cleanup_is_rejected() {
    let pilot = Pilot::new(40, 10);
    let w = pilot.mount::<LogViewer>(Props::new()).unwrap();
    w.cleanup();
    assert!(matches!(
        w.add_log("info", "late"),
        Err(WidgetError::Destroyed { .. })
    ));
    assert!(matches!(
        w.update(Props::new().with("title", "x")),
        Err(WidgetError::Destroyed { .. })
    ));
    assert!(matches!(w.on("log_added", |_| {}), Err(WidgetError::Destroyed { .. })));
    assert!(matches!(w.focus(), Err(WidgetError::Destroyed { .. })));
}

#[test]
fn test_rejected_update_keeps_props() {
    let pilot = Pilot::new(40, 10);
    let w = pilot
        .mount::<LogViewer>(Props::new().with("title", "Build"))
        .unwrap();
    let before = w.props().unwrap();
    let err = w.update(Props::new().with("maxLines", "many")).unwrap_err();
    assert!(matches!(err, WidgetError::Validation(_)));
    assert_eq!(w.props().unwrap(), before);
    assert!(!w.is_destroyed());

    w.update(Props::new().with("title", "Deploy")).unwrap();
    let header = w.element("header").unwrap();
    assert_eq!(pilot.content(header).as_deref(), Some("Deploy (0)"));
}

#[test]
fn test_refresh_interval_cycling() {
    let mut pilot = Pilot::new(40, 10);
    let w = pilot.mount::<StatusIndicator>(Props::new()).unwrap();
    assert!(!w.has_timer().unwrap());
    w.set_refresh_interval(100).unwrap();
    assert!(w.has_timer().unwrap());
    pilot.advance(300);
    assert_eq!(w.with_state(|s| s.ticks).unwrap(), 3);
    w.set_refresh_interval(0).unwrap();
    assert!(!w.has_timer().unwrap());
    pilot.advance(300);
    assert_eq!(w.with_state(|s| s.ticks).unwrap(), 3);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[test]
fn test_listeners_run_in_registration_order() {
    let pilot = Pilot::new(40, 10);
    let w = pilot.mount::<LogViewer>(Props::new()).unwrap();
    let order = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second", "third"] {
        let order = order.clone();
        w.on("log_added", move |_| order.borrow_mut().push(tag)).unwrap();
    }
    w.add_log("warn", "disk almost full").unwrap();
    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn test_off_stops_delivery() {
    let pilot = Pilot::new(40, 10);
    let w = pilot.mount::<LogViewer>(Props::new()).unwrap();
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    let id = w.on("log_added", move |_| *sink.borrow_mut() += 1).unwrap();
    w.add_log("info", "one").unwrap();
    assert!(w.off("log_added", id).unwrap());
    assert!(!w.off("log_added", id).unwrap());
    w.add_log("info", "two").unwrap();
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn test_listener_sees_updated_state() {
    let pilot = Pilot::new(40, 10);
    let w = Rc::new(pilot.mount::<StatusIndicator>(Props::new()).unwrap());
    let seen = Rc::new(RefCell::new(None));
    let sink = seen.clone();
    let handle = Rc::downgrade(&w);
    w.on("status_change", move |event| {
        let now = handle.upgrade().and_then(|w| w.status().ok());
        *sink.borrow_mut() = Some((event.data["to"].clone(), now));
    })
    .unwrap();
    w.set_status("completed").unwrap();
    assert_eq!(
        *seen.borrow(),
        Some((json!("completed"), Some(Status::Completed)))
    );
}

// ---------------------------------------------------------------------------
// App & pilot
// ---------------------------------------------------------------------------

#[test]
fn test_agent_list_keyboard_and_click() {
    let mut pilot = Pilot::new(40, 12);
    let list = pilot
        .mount::<AgentList>(
            Props::from_json(json!({
                "agents": [
                    {"id": "a", "name": "alpha"},
                    {"id": "b", "name": "beta"},
                    {"id": "c", "name": "gamma"}
                ]
            }))
            .unwrap(),
        )
        .unwrap();
    let picked = Rc::new(RefCell::new(Vec::new()));
    let sink = picked.clone();
    list.on("agent_selected", move |e| sink.borrow_mut().push(e.data["id"].clone()))
        .unwrap();

    pilot.focus_next();
    pilot.press_key(Key::Down);
    pilot.press_key(Key::Down);
    pilot.press_key(Key::Enter);
    assert_eq!(list.selected().unwrap().map(|a| a.id), Some("c".to_owned()));

    pilot.click(5, 2);
    assert_eq!(list.selected().unwrap().map(|a| a.id), Some("a".to_owned()));
    assert_eq!(*picked.borrow(), vec![json!("c"), json!("a")]);
}

#[test]
fn test_ctrl_c_quits() {
    let mut pilot = Pilot::new(40, 10);
    assert!(pilot.is_running());
    pilot.press_key_with(Key::Char('c'), Modifiers::CTRL);
    assert!(!pilot.is_running());
}

#[test]
fn test_app_config_from_toml() {
    let config = AppConfig::from_toml_str(
        r#"
        title = "Agents"
        tick-rate-ms = 20
        theme = "light"
        "#,
    )
    .unwrap();
    assert_eq!(config.title.as_deref(), Some("Agents"));
    assert_eq!(config.theme.name(), "light");

    assert!(matches!(
        AppConfig::from_toml_str(r#"theme = "neon""#),
        Err(ConfigError::UnknownTheme(_))
    ));
}
