//! App struct: configuration, input routing, and the async host loop.
//!
//! [`App`] owns the shared [`Env`] (registry, theme, clock, surface) that
//! widgets are constructed with, and drives it: real time advances the
//! [`Scheduler`](crate::timer::Scheduler), terminal input is routed to the
//! surface, and surface changes are flushed to the [`Driver`]. The `headless`
//! constructor runs the same loop without a terminal.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::event::{InputEvent, Key, KeyEvent, Modifiers};
use crate::render::Driver;
use crate::schema::SchemaRegistry;
use crate::style::Theme;
use crate::surface::{HeadlessSurface, Surface, SurfaceHandle};
use crate::timer::Scheduler;
use crate::widget::Env;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Optional window/app title.
    pub title: Option<String>,
    /// How often the host loop advances the clock and flushes.
    pub tick_rate: Duration,
    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            tick_rate: Duration::from_millis(50),
            theme: Theme::dark(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct ConfigFile {
    title: Option<String>,
    tick_rate_ms: Option<u64>,
    /// `"dark"` or `"light"`.
    theme: Option<String>,
    /// Inline theme table; takes precedence over `theme`.
    theme_tokens: Option<toml::Table>,
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the tick rate (builder). Zero is raised to one millisecond.
    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate.max(Duration::from_millis(1));
        self
    }

    /// Set the theme (builder).
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Load a config from TOML.
    ///
    /// ```toml
    /// title = "Agents"
    /// tick-rate-ms = 100
    /// theme = "light"
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(input)?;
        let mut config = Self::new();
        config.title = file.title;
        if let Some(ms) = file.tick_rate_ms {
            config = config.with_tick_rate(Duration::from_millis(ms));
        }
        config.theme = match (file.theme_tokens, file.theme.as_deref()) {
            (Some(table), _) => Theme::from_toml_str(&table.to_string())?,
            (None, None | Some("dark")) => Theme::dark(),
            (None, Some("light")) => Theme::light(),
            (None, Some(other)) => return Err(ConfigError::UnknownTheme(other.to_owned())),
        };
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The main application struct.
///
/// Widgets are built from [`App::env`] and must be kept alive by the caller
/// for as long as they should stay on screen.
pub struct App<W: Write = io::BufWriter<io::Stdout>> {
    env: Env,
    surface: Rc<RefCell<HeadlessSurface>>,
    /// Terminal output driver. `None` in headless mode.
    driver: Option<Driver<W>>,
    config: AppConfig,
    running: bool,
}

impl App {
    /// Create an app writing to the real terminal.
    ///
    /// Queries the terminal size to set the initial surface dimensions.
    pub fn new(config: AppConfig) -> io::Result<Self> {
        let (width, height) = Driver::terminal_size()?;
        Ok(Self::with_driver(config, Driver::stdout(), width, height))
    }

    /// Create an app with no terminal driver.
    pub fn headless(config: AppConfig, width: u16, height: u16) -> Self {
        Self::build(config, None, width, height)
    }
}

impl<W: Write> App<W> {
    /// Create an app flushing to `driver`.
    pub fn with_driver(config: AppConfig, driver: Driver<W>, width: u16, height: u16) -> Self {
        Self::build(config, Some(driver), width, height)
    }

    fn build(config: AppConfig, driver: Option<Driver<W>>, width: u16, height: u16) -> Self {
        let surface = Rc::new(RefCell::new(HeadlessSurface::new(width, height)));
        let env = Env::new(
            Rc::new(SchemaRegistry::with_builtins()),
            Rc::new(config.theme.clone()),
            SurfaceHandle::from_shared(surface.clone()),
            Scheduler::new(),
        );
        Self {
            env,
            surface,
            driver,
            config,
            running: true,
        }
    }

    /// Collaborators for constructing widgets on this app.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// The in-memory surface backing the app.
    pub fn surface(&self) -> &Rc<RefCell<HeadlessSurface>> {
        &self.surface
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn driver(&self) -> Option<&Driver<W>> {
        self.driver.as_ref()
    }

    /// Whether the app has a terminal driver (not headless).
    pub fn has_driver(&self) -> bool {
        self.driver.is_some()
    }

    /// Whether the app should quit.
    pub fn should_quit(&self) -> bool {
        !self.running
    }

    /// Request the app to quit.
    pub fn request_quit(&mut self) {
        self.running = false;
    }

    /// Route one input event. Returns how many widget handlers ran.
    ///
    /// Ctrl+C quits, Tab / Shift+Tab cycle focus between top-level elements,
    /// resizes repaint; everything else goes to the surface.
    pub fn handle_input(&mut self, event: InputEvent) -> usize {
        match event {
            InputEvent::Key(KeyEvent {
                code: Key::Char('c'),
                modifiers,
            }) if modifiers.contains(Modifiers::CTRL) => {
                tracing::debug!("quit requested");
                self.running = false;
                0
            }
            InputEvent::Key(KeyEvent { code: Key::Tab, .. }) => {
                self.cycle_focus(true);
                0
            }
            InputEvent::Key(KeyEvent {
                code: Key::BackTab, ..
            }) => {
                self.cycle_focus(false);
                0
            }
            InputEvent::Resize { width, height } => {
                let mut surface = self.surface.borrow_mut();
                surface.resize(width, height);
                surface.render();
                0
            }
            other => self.env.surface.dispatch(&other),
        }
    }

    /// Move focus to the next (or previous) top-level element.
    pub fn cycle_focus(&mut self, forward: bool) {
        let mut surface = self.surface.borrow_mut();
        let roots = surface.roots().to_vec();
        if roots.is_empty() {
            return;
        }
        // Focus may sit on a descendant; find its top-level ancestor.
        let current = surface.focused().map(|mut id| {
            while let Some(parent) = surface.parent(id) {
                id = parent;
            }
            id
        });
        let position = current.and_then(|id| roots.iter().position(|r| *r == id));
        let next = match (position, forward) {
            (None, true) => 0,
            (None, false) => roots.len() - 1,
            (Some(i), true) => (i + 1) % roots.len(),
            (Some(i), false) => (i + roots.len() - 1) % roots.len(),
        };
        if let Err(err) = surface.focus(roots[next]) {
            tracing::warn!(%err, "focus change failed");
        }
    }

    /// Advance the clock by `dt`, firing due refresh timers, then flush.
    /// Returns the number of timer callbacks that ran.
    pub fn tick(&mut self, dt: Duration) -> io::Result<usize> {
        let fired = self.env.scheduler.advance(dt);
        self.flush()?;
        Ok(fired)
    }

    /// Send pending surface changes to the driver.
    pub fn flush(&mut self) -> io::Result<()> {
        let updates = self.surface.borrow_mut().take_updates();
        if let Some(driver) = self.driver.as_mut() {
            if !updates.is_empty() {
                driver.apply_updates(&updates)?;
                driver.flush()?;
            }
        }
        Ok(())
    }

    /// Drain terminal input without blocking. Headless apps have none.
    fn poll_input(&mut self) -> io::Result<()> {
        if self.driver.is_none() {
            return Ok(());
        }
        while crossterm::event::poll(Duration::ZERO)? {
            if let Ok(event) = InputEvent::try_from(crossterm::event::read()?) {
                self.handle_input(event);
            }
        }
        Ok(())
    }

    /// Run the loop for at most `duration` of real time, or until quit.
    pub async fn run_for(&mut self, duration: Duration) -> io::Result<()> {
        let started = tokio::time::Instant::now();
        let mut last = started;
        let mut ticker = tokio::time::interval(self.config.tick_rate);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        while self.running {
            ticker.tick().await;
            let now = tokio::time::Instant::now();
            self.poll_input()?;
            self.tick(now - last)?;
            last = now;
            if now - started >= duration {
                break;
            }
        }
        Ok(())
    }

    /// Enter the terminal, run until quit, and restore the terminal.
    pub async fn run(&mut self) -> io::Result<()> {
        if let Some(driver) = self.driver.as_mut() {
            driver.enter()?;
        }
        // Everything already on the surface is new to a freshly cleared screen.
        self.surface.borrow_mut().render();
        tracing::debug!(title = ?self.config.title, "app started");
        let result = self.run_for(Duration::MAX).await;
        if let Some(driver) = self.driver.as_mut() {
            driver.leave()?;
        }
        result
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::Props;
    use crate::widget::Widget;
    use crate::widgets::{Status, StatusIndicator};

    fn headless_app() -> App {
        App::headless(AppConfig::new(), 40, 12)
    }

    fn status(app: &App, label: &str) -> Widget<StatusIndicator> {
        Widget::new(
            Props::new().with("label", label).with("status", "running"),
            app.env(),
        )
        .unwrap()
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn headless_app_no_driver() {
        let app = headless_app();
        assert!(!app.has_driver());
        assert!(!app.should_quit());
        assert_eq!(app.surface().borrow().size(), (40, 12));
    }

    // ── Input ────────────────────────────────────────────────────────

    #[test]
    fn ctrl_c_quits() {
        let mut app = headless_app();
        app.handle_input(InputEvent::Key(KeyEvent::new(Key::Char('c'), Modifiers::CTRL)));
        assert!(app.should_quit());
    }

    #[test]
    fn tab_cycles_focus_between_widgets() {
        let mut app = headless_app();
        let a = status(&app, "a");
        let b = status(&app, "b");
        let tab = InputEvent::Key(KeyEvent::plain(Key::Tab));

        app.handle_input(tab.clone());
        assert_eq!(app.surface().borrow().focused(), a.root());
        app.handle_input(tab.clone());
        assert_eq!(app.surface().borrow().focused(), b.root());
        app.handle_input(tab);
        assert_eq!(app.surface().borrow().focused(), a.root());
        app.handle_input(InputEvent::Key(KeyEvent::plain(Key::BackTab)));
        assert_eq!(app.surface().borrow().focused(), b.root());
    }

    #[test]
    fn keys_reach_the_focused_widget() {
        let mut app = headless_app();
        let w = status(&app, "w");
        app.cycle_focus(true);
        let ran = app.handle_input(InputEvent::Key(KeyEvent::plain(Key::Char('p'))));
        assert_eq!(ran, 1);
        assert_eq!(w.status().unwrap(), Status::Paused);
    }

    #[test]
    fn resize_repaints() {
        let mut app = headless_app();
        let _w = status(&app, "w");
        app.handle_input(InputEvent::Resize { width: 60, height: 20 });
        let surface = app.surface().borrow();
        assert_eq!(surface.size(), (60, 20));
        assert_eq!(surface.frame().map(|f| f.bounds().width), Some(60));
    }

    // ── Ticking & flushing ───────────────────────────────────────────

    #[test]
    fn tick_drives_refresh_timers() {
        let mut app = headless_app();
        let w = Widget::<StatusIndicator>::new(Props::new().with("refreshInterval", 100), app.env())
            .unwrap();
        assert_eq!(app.tick(Duration::from_millis(350)).unwrap(), 3);
        assert_eq!(w.with_state(|s| s.ticks).unwrap(), 3);
        assert!(app.surface().borrow_mut().take_updates().is_empty());
    }

    #[test]
    fn flush_writes_changed_cells() {
        let driver = Driver::with_writer(Vec::new());
        let mut app = App::with_driver(AppConfig::new(), driver, 30, 6);
        let _w = Widget::<StatusIndicator>::new(Props::new(), app.env()).unwrap();
        app.flush().unwrap();
        let written = app.driver().map(|d| d.writer().len()).unwrap_or(0);
        assert!(written > 0);
        let bytes = app.driver().map(|d| d.writer().clone()).unwrap_or_default();
        assert!(String::from_utf8_lossy(&bytes).contains('I'));
    }

    #[test]
    fn run_for_advances_the_clock() {
        let mut app = App::headless(AppConfig::new().with_tick_rate(Duration::from_millis(10)), 30, 6);
        let w = Widget::<StatusIndicator>::new(Props::new().with("refreshInterval", 10), app.env())
            .unwrap();
        tokio_test::block_on(app.run_for(Duration::from_millis(60))).unwrap();
        assert!(app.env().scheduler.now() >= Duration::from_millis(60));
        assert!(w.with_state(|s| s.ticks).unwrap() >= 5);
    }

    #[test]
    fn run_for_stops_on_quit() {
        let mut app = headless_app();
        app.request_quit();
        tokio_test::block_on(app.run_for(Duration::from_secs(60))).unwrap();
        assert_eq!(app.env().scheduler.now(), Duration::ZERO);
    }

    // ── AppConfig ────────────────────────────────────────────────────

    #[test]
    fn app_config_defaults() {
        let config = AppConfig::new();
        assert!(config.title.is_none());
        assert_eq!(config.tick_rate, Duration::from_millis(50));
        assert_eq!(config.theme.name(), "dark");
    }

    #[test]
    fn app_config_builder() {
        let config = AppConfig::new()
            .with_title("Agents")
            .with_tick_rate(Duration::ZERO)
            .with_theme(Theme::light());
        assert_eq!(config.title.as_deref(), Some("Agents"));
        assert_eq!(config.tick_rate, Duration::from_millis(1));
        assert_eq!(config.theme.name(), "light");
    }

    #[test]
    fn app_config_from_toml() {
        let config = AppConfig::from_toml_str(
            r#"
            title = "Fleet"
            tick-rate-ms = 100
            theme = "light"
            "#,
        )
        .unwrap();
        assert_eq!(config.title.as_deref(), Some("Fleet"));
        assert_eq!(config.tick_rate, Duration::from_millis(100));
        assert_eq!(config.theme.name(), "light");

        let config = AppConfig::from_toml_str(
            r#"
            [theme-tokens]
            name = "custom"
            [theme-tokens.colors.status]
            running = "bright_green"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme.name(), "custom");
        assert_eq!(config.theme.color("status.running", "green"), "bright_green");

        let err = AppConfig::from_toml_str(r#"theme = "neon""#).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTheme(name) if name == "neon"));
    }
}
