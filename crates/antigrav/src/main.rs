mod environment;
mod logging;

use std::time::Instant;

use antigrav_config::Config;
use antigrav_field::{AnimationHost, DrawList, FrameToken, render};
use color_eyre::eyre::WrapErr;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::Line,
};

use crate::environment::TerminalEnvironment;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::load().wrap_err("loading configuration")?;
    logging::init(&config.log);
    match Config::default_path() {
        Some(path) => log::info!("configuration path: {}", path.display()),
        None => log::info!("no configuration directory, using defaults"),
    }

    let terminal = ratatui::init();
    let result = App::new(config).run(terminal);
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Loaded configuration.
    config: Config,
    /// Terminal seen through the host's environment interface.
    env: TerminalEnvironment,
    /// Triangles drawn by the last frame.
    draw_list: DrawList,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        let env = TerminalEnvironment::new(&config.display);
        Self {
            running: false,
            config,
            env,
            draw_list: DrawList::new(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.env.set_terminal_size(size.width, size.height);

        let mut host = AnimationHost::start(
            &mut self.env,
            self.config.field.clone(),
            StdRng::from_os_rng(),
        );
        self.running = true;
        let result = self.run_loop(&mut terminal, &mut host);

        // Always release mouse capture, even when the loop failed
        host.stop(&mut self.env);
        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        host: &mut AnimationHost<StdRng>,
    ) -> color_eyre::Result<()> {
        while self.running {
            if let Some(token) = self.env.take_due_frame(Instant::now()) {
                terminal.draw(|frame| self.render(frame, host, token))?;
            }
            self.handle_crossterm_events(host)?;
        }
        Ok(())
    }

    /// Runs one animation frame and renders it with the help line.
    fn render(&mut self, frame: &mut Frame, host: &mut AnimationHost<StdRng>, token: FrameToken) {
        let [surface, help] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(self.env.reserved_rows()),
        ])
        .areas(frame.area());

        host.frame_step(&mut self.env, token, &mut self.draw_list);
        render(&self.draw_list, frame, surface, self.env.scale());

        if self.config.display.show_help {
            let color = Color::from(self.config.field.palette.get(0));
            let help_line = Line::from(vec![
                "q".bold().fg(color),
                " quit  ".dark_gray(),
                "move the mouse".bold().fg(color),
                " to scatter".dark_gray(),
            ])
            .centered();
            frame.render_widget(help_line, help);
        }
    }

    /// Reads the crossterm events and forwards them to the host.
    /// Waits no longer than the time left until the next frame.
    fn handle_crossterm_events(&mut self, host: &mut AnimationHost<StdRng>) -> color_eyre::Result<()> {
        if !event::poll(self.env.time_until_frame(Instant::now()))? {
            return Ok(());
        }

        let event = event::read()?;
        if let Event::Resize(cols, rows) = event {
            self.env.set_terminal_size(cols, rows);
        }

        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key, host),
            _ => {
                if let Some(host_event) = self.env.translate(&event) {
                    host.handle_event(&mut self.env, host_event);
                }
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent, host: &mut AnimationHost<StdRng>) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => {
                self.quit(host)
            }
            _ => {}
        }
    }

    /// Stop the animation and leave the main loop.
    fn quit(&mut self, host: &mut AnimationHost<StdRng>) {
        host.stop(&mut self.env);
        self.running = false;
    }
}
