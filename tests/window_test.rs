mod common;

use common::test_utils::{headless, init_logger};
use flow_gl::{
    Config, ErrorKind,
    native::ObjectKind,
    resources::VertexArray,
    window::{Glfw, HeadlessWindowSystem, Monitor, Window},
};

#[test]
fn init_requests_a_core_context() {
    init_logger();
    let (_glfw, system) = Glfw::headless_with(
        HeadlessWindowSystem::new(),
        Config::default().with_gl_version(4, 1),
    );
    assert_eq!(system.borrow().hints(), Some((4, 1, true)));
}

#[test]
fn monitors_by_index() {
    let (glfw, _system) = Glfw::headless_with(
        HeadlessWindowSystem::with_monitors(&["Left", "Right"]),
        Config::default(),
    );
    let first = Monitor::from_index(&glfw, 0).unwrap();
    assert_eq!(first.name(), "Left");
    assert_eq!(Monitor::primary(&glfw).unwrap(), first);
    assert_eq!(Monitor::from_index(&glfw, 1).unwrap().name(), "Right");

    let err = Monitor::from_index(&glfw, 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Index);
    assert_eq!(err.to_string(), "Monitor 2 does not exist!");
}

#[test]
fn primary_is_the_first_monitor_even_when_names_repeat() {
    let (glfw, system) = Glfw::headless_with(
        HeadlessWindowSystem::with_monitors(&["DELL U2720Q", "DELL U2720Q"]),
        Config::default(),
    );
    let primary = Monitor::primary(&glfw).unwrap();
    assert_eq!(primary.index(), 0);
    assert_eq!(primary, Monitor::from_index(&glfw, 0).unwrap());
    assert_ne!(primary, Monitor::from_index(&glfw, 1).unwrap());

    let window = Window::new(&glfw, "full", (800, 600), Some(&primary)).unwrap();
    let id = window.id().unwrap();
    assert_eq!(system.borrow().window(id).unwrap().monitor, Some(0));
}

#[test]
fn no_primary_without_monitors() {
    let (glfw, _system) = Glfw::headless_with(HeadlessWindowSystem::with_monitors(&[]), Config::default());
    assert_eq!(Monitor::primary(&glfw).unwrap_err().kind(), ErrorKind::Index);
}

#[test]
fn window_creation_applies_context_state() {
    let h = headless();
    let window = Window::new(&h.glfw, "state", (64, 32), None).unwrap();
    let id = window.id().unwrap();
    {
        let system = h.windows.borrow();
        assert_eq!(system.current_context(), Some(id));
        assert_eq!(system.swap_interval(), Some(1));
    }

    window.hide().unwrap();
    assert!(!h.windows.borrow().window(id).unwrap().visible);
    window.show().unwrap();
    window.swap().unwrap();
    window.swap().unwrap();
    let state = h.windows.borrow().window(id).unwrap();
    assert!(state.visible);
    assert_eq!(state.swaps, 2);
    assert_eq!(window.pos().unwrap(), (0, 0));
}

#[test]
fn creation_failure_is_a_window_error() {
    let h = headless();
    h.windows.borrow_mut().fail_next_window();
    let err = Window::new(&h.glfw, "doomed", (10, 10), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Window);
    assert_eq!(h.windows.borrow().window_count(), 0);

    let err = Window::new(&h.glfw, "flat", (0, 10), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Argument);
}

#[test]
fn destroying_a_window_is_idempotent() {
    let h = headless();
    let window = Window::new(&h.glfw, "short-lived", (10, 10), None).unwrap();
    window.destroy();
    window.destroy();
    assert_eq!(h.windows.borrow().window_count(), 0);
    assert!(!window.is_open());
    assert_eq!(window.swap().unwrap_err().kind(), ErrorKind::Argument);
}

#[test]
fn windows_hand_out_their_own_gl_context() {
    let h = headless();
    let window = Window::new(&h.glfw, "gl", (10, 10), None).unwrap();
    let ctx = window.load_gl().unwrap();
    let vao = VertexArray::new(&ctx).unwrap();

    let gl = h.windows.borrow().gl(window.id().unwrap()).unwrap();
    assert!(gl.is_live(ObjectKind::VertexArray, vao.handle().unwrap()));
    assert_eq!(h.gl.live_count(ObjectKind::VertexArray), 0);
}

#[cfg(feature = "python")]
mod python {
    use flow_gl::bindings::PyWindow;
    use pyo3::{
        exceptions::{PyIndexError, PyValueError},
        prelude::*,
    };

    use super::*;
    use crate::common::test_utils::with_gl;

    fn window_id(window: &Bound<'_, PyAny>) -> flow_gl::window::WindowId {
        window.cast::<PyWindow>().unwrap().borrow().0.id().unwrap()
    }

    #[test]
    fn window_is_truthy_until_a_close_is_polled() {
        let h = headless();
        with_gl(|_py, gl| {
            let glfw = gl.getattr("glfw").unwrap();
            let window = glfw.getattr("Window").unwrap().call1(("main", (320, 200))).unwrap();
            assert!(window.is_truthy().unwrap());
            let size: (i32, i32) = window.getattr("size").unwrap().extract().unwrap();
            assert_eq!(size, (320, 200));
            assert_eq!(window.getattr("title").unwrap().extract::<String>().unwrap(), "main");

            h.windows.borrow_mut().request_close(window_id(&window));
            assert!(window.is_truthy().unwrap());
            glfw.getattr("poll").unwrap().call0().unwrap();
            assert!(!window.is_truthy().unwrap());
        });
    }

    #[test]
    fn full_screen_windows_remember_their_monitor() {
        let h = headless();
        with_gl(|py, gl| {
            let glfw = gl.getattr("glfw").unwrap();
            let monitor_class = glfw.getattr("Monitor").unwrap();
            let monitor = monitor_class.call1((0,)).unwrap();
            assert_eq!(monitor.getattr("name").unwrap().extract::<String>().unwrap(), "Headless Monitor");
            let window = glfw
                .getattr("Window")
                .unwrap()
                .call1(("full", vec![800, 600], monitor))
                .unwrap();
            assert_eq!(h.windows.borrow().window(window_id(&window)).unwrap().monitor, Some(0));

            for primary in [monitor_class.call0().unwrap(), monitor_class.call1((-1,)).unwrap()] {
                assert_eq!(primary.getattr("index").unwrap().extract::<usize>().unwrap(), 0);
            }
            let err = monitor_class.call1((3,)).unwrap_err();
            assert!(err.is_instance_of::<PyIndexError>(py), "{err}");
        });
    }

    #[test]
    fn window_size_must_be_a_pair() {
        let h = headless();
        with_gl(|py, gl| {
            let window_class = gl.getattr("glfw").unwrap().getattr("Window").unwrap();
            let err = window_class.call1(("bad", (1,))).unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py), "{err}");
            assert!(err.to_string().contains("got length 1"), "{err}");
        });
        assert_eq!(h.windows.borrow().window_count(), 0);
    }

    #[test]
    fn time_starts_near_zero() {
        let _h = headless();
        with_gl(|_py, gl| {
            let t: f64 = gl.getattr("glfw").unwrap().getattr("time").unwrap().call0().unwrap().extract().unwrap();
            assert!((0.0..5.0).contains(&t));
        });
    }
}
