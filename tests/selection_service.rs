use selection_toolbar::monitor::Rect;
use selection_toolbar::selection::event::{VK_CONTROL, VK_LCONTROL};
use selection_toolbar::selection::{
    HookEvent, KeyEvent, MockHookHandle, MockSelectionHook, MouseButton, MouseEvent,
    OverlayCommand, Point, RecordingOverlay, SelectionEvent, SelectionService, ServiceLifecycle,
    StaticWindowingHost, WheelEvent,
};
use selection_toolbar::{FilterConfig, ToolbarError, TriggerMode};
use std::sync::Arc;
use std::time::{Duration, Instant};

const VK_A: u32 = 0x41;

struct Harness {
    service: SelectionService,
    hook: MockHookHandle,
    overlay: RecordingOverlay,
}

fn harness() -> Harness {
    let (hook, handle) = MockSelectionHook::new();
    let overlay = RecordingOverlay::default();
    let host = StaticWindowingHost::new(vec![Rect::new(0, 0, 1920, 1040)])
        .with_cursor((500.0, 500.0));
    let service = SelectionService::new(Box::new(hook), Arc::new(host), Box::new(overlay.clone()));
    Harness {
        service,
        hook: handle,
        overlay,
    }
}

fn running() -> Harness {
    let mut h = harness();
    h.service.start().expect("start");
    h
}

fn drag(text: &str) -> SelectionEvent {
    SelectionEvent::new(text, "notepad.exe").with_mouse((100.0, 100.0), (300.0, 104.0))
}

/// Show `text` and let the overlay finish loading.
fn show(h: &mut Harness, text: &str) {
    h.service.handle_event(HookEvent::Selection(drag(text)));
    h.service.overlay_ready();
    assert!(h.service.is_overlay_visible());
}

fn shown_texts(overlay: &RecordingOverlay) -> Vec<String> {
    overlay
        .commands()
        .into_iter()
        .filter_map(|c| match c {
            OverlayCommand::Show(request) => Some(request.text),
            _ => None,
        })
        .collect()
}

#[test]
fn start_installs_hook_once() {
    let mut h = harness();
    h.service.start().expect("start");
    assert_eq!(h.service.start(), Err(ToolbarError::AlreadyRunning));
    assert_eq!(h.hook.install_count(), 1);
    assert_eq!(h.service.lifecycle(), ServiceLifecycle::Running);
}

#[test]
fn stop_twice_matches_stop_once() {
    let mut h = running();
    show(&mut h, "hello");

    h.service.stop();
    let after_first = h.service.status();
    h.service.stop();

    assert_eq!(h.service.status(), after_first);
    assert_eq!(h.service.lifecycle(), ServiceLifecycle::Stopped);
    assert!(!h.service.is_overlay_visible());
    assert_eq!(h.hook.uninstall_count(), 1);
}

#[test]
fn service_can_restart_after_stop() {
    let mut h = running();
    h.service.stop();
    h.service.start().expect("restart");
    assert_eq!(h.hook.install_count(), 2);
    assert!(h.hook.emit(HookEvent::Selection(drag("again"))));
    assert_eq!(h.service.pump(), 1);
}

#[test]
fn unsupported_hook_is_permanently_unavailable() {
    let mut h = harness();
    h.hook.set_supported(false);
    assert_eq!(h.service.start(), Err(ToolbarError::CapabilityUnavailable));

    h.hook.set_supported(true);
    assert_eq!(h.service.start(), Err(ToolbarError::CapabilityUnavailable));
    assert_eq!(h.hook.install_count(), 0);
    assert_eq!(h.service.lifecycle(), ServiceLifecycle::Stopped);
}

#[test]
fn failed_install_can_be_retried() {
    let mut h = harness();
    h.hook.set_fail_install(true);
    let err = h.service.start().expect_err("install should fail");
    assert!(matches!(err, ToolbarError::HookStartFailure(ref msg) if msg.contains("refused")));
    assert_eq!(h.service.lifecycle(), ServiceLifecycle::Stopped);

    h.hook.set_fail_install(false);
    h.service.start().expect("retry");
    assert!(h.service.is_running());
}

#[test]
fn wheel_dismisses_overlay() {
    let mut h = running();
    show(&mut h, "hello");
    h.hook.emit(HookEvent::MouseWheel(WheelEvent {
        point: Point::new(10.0, 10.0),
        delta: -120,
    }));
    h.service.pump();
    assert!(!h.service.is_overlay_visible());
    assert_eq!(h.overlay.commands().last(), Some(&OverlayCommand::Hide));
}

#[test]
fn non_modifier_key_dismisses_but_modifier_does_not() {
    let mut h = running();
    show(&mut h, "hello");

    h.service.handle_event(HookEvent::KeyDown(KeyEvent::now(VK_CONTROL)));
    assert!(h.service.is_overlay_visible());

    h.service.handle_event(HookEvent::KeyDown(KeyEvent::now(VK_A)));
    assert!(!h.service.is_overlay_visible());
}

#[test]
fn outside_click_dismisses() {
    let mut h = running();
    show(&mut h, "hello");
    h.service.handle_event(HookEvent::MouseDown(MouseEvent {
        point: Point::new(1900.0, 1000.0),
        button: MouseButton::Left,
    }));
    assert!(!h.service.is_overlay_visible());
}

#[test]
fn dismissal_during_load_cancels_pending_show() {
    let mut h = running();
    h.service.handle_event(HookEvent::Selection(drag("hello")));
    h.service.handle_event(HookEvent::MouseWheel(WheelEvent {
        point: Point::ORIGIN,
        delta: 120,
    }));
    h.service.overlay_ready();

    assert!(!h.service.is_overlay_visible());
    assert_eq!(h.overlay.commands(), vec![OverlayCommand::Create]);
}

#[test]
fn newest_selection_replaces_visible_text() {
    let mut h = running();
    show(&mut h, "first");
    h.service.handle_event(HookEvent::Selection(drag("second")));

    assert_eq!(shown_texts(&h.overlay), vec!["first", "second"]);
    assert_eq!(
        h.service.overlay().current().map(|r| r.text.as_str()),
        Some("second")
    );
}

#[test]
fn blacklisted_program_never_shows() {
    let mut h = running();
    let mut config = FilterConfig::default();
    config.blacklist.insert("Notepad.exe".to_string());
    h.service.update_config(config);

    h.service.handle_event(HookEvent::Selection(drag("hidden")));
    assert!(h.overlay.commands().is_empty());
}

#[test]
fn ctrl_key_gesture_shows_current_selection() {
    let mut h = running();
    h.service.update_config(FilterConfig {
        trigger_mode: TriggerMode::CtrlKey,
        ..FilterConfig::default()
    });
    let listeners = h.hook.listeners().expect("listeners attached");
    assert!(listeners.gesture && listeners.passive);

    h.hook.set_current_selection(Some(drag("polled")));
    let base = Instant::now();
    h.service
        .handle_event(HookEvent::KeyDown(KeyEvent::new(VK_LCONTROL, base)));
    h.service.handle_event(HookEvent::KeyDown(KeyEvent::new(
        VK_LCONTROL,
        base + Duration::from_millis(400),
    )));
    h.service.overlay_ready();

    assert_eq!(shown_texts(&h.overlay), vec!["polled"]);
}

#[test]
fn ctrl_key_released_between_presses_does_not_fire() {
    let mut h = running();
    h.service.update_config(FilterConfig {
        trigger_mode: TriggerMode::CtrlKey,
        ..FilterConfig::default()
    });
    h.hook.set_current_selection(Some(drag("polled")));

    let base = Instant::now();
    h.service
        .handle_event(HookEvent::KeyDown(KeyEvent::new(VK_LCONTROL, base)));
    h.service
        .handle_event(HookEvent::KeyUp(KeyEvent::new(VK_LCONTROL, base)));
    h.service.handle_event(HookEvent::KeyDown(KeyEvent::new(
        VK_LCONTROL,
        base + Duration::from_millis(400),
    )));

    assert!(h.overlay.commands().is_empty());
}

#[test]
fn shortcut_trigger_only_in_shortcut_mode() {
    let mut h = running();
    h.hook.set_current_selection(Some(drag("shortcut")));
    h.service.trigger_shortcut();
    assert!(h.overlay.commands().is_empty());

    h.service.update_config(FilterConfig {
        trigger_mode: TriggerMode::Shortcut,
        ..FilterConfig::default()
    });
    h.service.trigger_shortcut();
    h.service.overlay_ready();
    assert_eq!(shown_texts(&h.overlay), vec!["shortcut"]);
}

#[test]
fn trigger_mode_change_reattaches_listeners() {
    let mut h = running();
    assert!(!h.hook.listeners().expect("attached").passive);

    let shared = h.service.config();
    shared.replace_filter(FilterConfig {
        trigger_mode: TriggerMode::CtrlKey,
        ..FilterConfig::default()
    });
    h.service.pump();

    assert_eq!(h.hook.uninstall_count(), 1);
    assert_eq!(h.hook.install_count(), 2);
    assert!(h.hook.listeners().expect("reattached").gesture);
    assert_eq!(h.service.status().trigger_mode, TriggerMode::CtrlKey);
}

#[test]
fn clipboard_write_requires_running_service() {
    let mut h = harness();
    assert_eq!(
        h.service.write_to_clipboard("copy"),
        Err(ToolbarError::NotRunning)
    );

    h.service.start().expect("start");
    h.service.write_to_clipboard("copy").expect("native write");
    assert_eq!(h.hook.clipboard_writes(), vec!["copy".to_string()]);

    h.hook.set_clipboard_ok(false);
    assert_eq!(
        h.service.write_to_clipboard("copy"),
        Err(ToolbarError::ClipboardWriteFailure)
    );
}

#[test]
fn quit_releases_hook_and_destroys_overlay() {
    let mut h = running();
    show(&mut h, "bye");
    h.service.quit();
    h.service.quit();

    assert_eq!(h.hook.release_count(), 1);
    assert_eq!(h.service.lifecycle(), ServiceLifecycle::Stopped);
    assert_eq!(h.overlay.commands().last(), Some(&OverlayCommand::Destroy));
    assert_eq!(h.service.start(), Err(ToolbarError::CapabilityUnavailable));
}

#[test]
fn pump_timeout_waits_for_first_event() {
    let mut h = running();
    assert_eq!(h.service.pump_timeout(Duration::from_millis(10)), 0);

    let sender_side = h.hook;
    let emitter = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        sender_side.emit(HookEvent::Selection(drag("late")));
        sender_side
    });
    assert_eq!(h.service.pump_timeout(Duration::from_secs(5)), 1);
    emitter.join().expect("emitter thread");
}

#[test]
fn fallback_write_prefers_native_hook() {
    use selection_toolbar::clipboard::{write_with_fallback, ClipboardError};

    let mut h = harness();
    assert!(matches!(
        write_with_fallback(&h.service, "early"),
        Err(ClipboardError::Service(ToolbarError::NotRunning))
    ));

    h.service.start().expect("start");
    write_with_fallback(&h.service, "native").expect("native write");
    assert_eq!(h.hook.clipboard_writes(), vec!["native".to_string()]);
}

#[test]
fn mode_swap_through_config_handle_gates_pushed_selections() {
    let mut h = running();
    h.service.config().replace_filter(FilterConfig {
        filter_mode: selection_toolbar::FilterMode::Whitelist,
        filter_list: vec!["code".to_string()],
        trigger_mode: TriggerMode::CtrlKey,
        ..FilterConfig::default()
    });

    h.service.handle_event(HookEvent::Selection(
        SelectionEvent::new("secret", "keepass.exe").with_mouse((100.0, 100.0), (300.0, 104.0)),
    ));
    h.service.overlay_ready();

    assert!(h.overlay.commands().is_empty());
    assert!(h.hook.listeners().expect("reattached").passive);
    assert_eq!(h.hook.install_count(), 2);
}

#[test]
fn pushed_selection_ignored_in_shortcut_mode() {
    let mut h = running();
    h.service.update_config(FilterConfig {
        trigger_mode: TriggerMode::Shortcut,
        ..FilterConfig::default()
    });
    h.hook.emit(HookEvent::Selection(drag("pushed")));
    assert_eq!(h.service.pump(), 1);
    assert!(h.overlay.commands().is_empty());
}

#[test]
fn invalid_toolbar_sizes_are_ignored() {
    let mut h = running();
    h.service.set_toolbar_size(200.0, 40.0);
    h.service.set_toolbar_size(0.0, 40.0);
    h.service.set_toolbar_size(-1.0, f64::NAN);
    h.service.set_toolbar_size(200.0, f64::INFINITY);
    show(&mut h, "sized");

    let bounds = h.service.overlay().current().map(|r| r.bounds).expect("bounds");
    assert_eq!((bounds.width, bounds.height), (200, 40));
}

#[test]
fn unplaceable_selection_hides_previous_toolbar() {
    let mut h = running();
    show(&mut h, "first");

    let partial = SelectionEvent::new("second", "notepad.exe")
        .with_level(selection_toolbar::selection::PositionLevel::SelDetailed);
    h.service.handle_event(HookEvent::Selection(partial));

    assert!(!h.service.is_overlay_visible());
    assert_eq!(h.overlay.commands().last(), Some(&OverlayCommand::Hide));
    assert_eq!(shown_texts(&h.overlay), vec!["first"]);
}

#[test]
fn selection_without_work_area_hides_previous_toolbar() {
    let (hook, handle) = MockSelectionHook::new();
    let overlay = RecordingOverlay::default();
    let host = StaticWindowingHost::new(Vec::new());
    let mut service =
        SelectionService::new(Box::new(hook), Arc::new(host), Box::new(overlay.clone()));
    service.start().expect("start");
    handle.emit(HookEvent::Selection(drag("nowhere")));
    service.pump();

    assert!(!service.is_overlay_visible());
    assert!(overlay.commands().is_empty());
}
