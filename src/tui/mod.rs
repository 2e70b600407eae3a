pub mod widgets;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};
use ratatui::DefaultTerminal;

use crate::grid::grid_action;
use crate::input::{Focus, InputRouter, Key, KeyInput, Modal, Modifiers, Routed};
use crate::model::{reduce, Action, ColorPalette, IdAllocator};
use crate::tps::{color_palette_xml, is_valid_color, parse_color_palette, PaletteXml};
use crate::type_selector::TypeSelector;
use widgets::{PaletteWidget, TypeSelectorWidget};

const HELP: &str =
    "arrows select  shift+arrows move  del remove  a add  e edit  n rename  t type  x discard  w write  q quit";

/// State for the interactive palette editor.
pub struct TuiApp {
    pub palette: ColorPalette,
    ids: IdAllocator,
    router: InputRouter,
    type_selector: TypeSelector,
    text_input: String,
    status: Option<String>,
    path: PathBuf,
    should_quit: bool,
}

impl TuiApp {
    /// Start editing `palette`, saving to `path`.
    pub fn new(palette: ColorPalette, ids: IdAllocator, path: PathBuf) -> Self {
        let type_selector = TypeSelector::new(&palette.type_id);
        Self {
            palette,
            ids,
            router: InputRouter::new(),
            type_selector,
            text_input: String::new(),
            status: None,
            path,
            should_quit: false,
        }
    }

    /// Open a `<color-palette>` fragment file, or start a new palette if it does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        let mut ids = IdAllocator::new();
        let mut palette = ColorPalette::new(&mut ids);
        if path.exists() {
            let xml = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let parsed = match parse_color_palette(&xml) {
                Ok(parsed) => parsed,
                Err(e) => bail!("{}: {e}", path.display()),
            };
            palette = reduce(palette, &parsed.into_action(), &mut ids);
            palette.has_changes = false;
        }
        palette.is_open = true;
        Ok(Self::new(palette, ids, path.to_path_buf()))
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn dispatch(&mut self, action: Action) {
        self.palette = reduce(self.palette.clone(), &action, &mut self.ids);
        self.type_selector.sync(&self.palette.type_id);
    }

    pub fn handle_key(&mut self, input: KeyInput) {
        match self.router.route(input) {
            Routed::Grid(command) => {
                if let Some(action) = grid_action(&self.palette, command) {
                    self.dispatch(action);
                }
            }
            Routed::TypeSelector(key) => {
                if let Some(palette_type) = self.type_selector.handle_key(key) {
                    self.dispatch(Action::SetType(palette_type.id.to_string()));
                }
            }
            Routed::Modal(modal, input) => self.handle_modal(modal, input),
            Routed::Unhandled(input) => self.handle_command(input),
        }
    }

    fn handle_modal(&mut self, modal: Modal, input: KeyInput) {
        match input.key {
            Key::Char(c) if !input.modifiers.ctrl && !input.modifiers.alt => self.text_input.push(c),
            Key::Backspace => {
                self.text_input.pop();
            }
            Key::Escape => self.close_modal(),
            Key::Enter => {
                let text = self.text_input.trim().to_string();
                match modal {
                    Modal::EditHex => {
                        if !is_valid_color(&text) {
                            self.status = Some(format!("'{text}' is not a valid colour"));
                            return;
                        }
                        if let Some(id) = self.palette.selected().map(|c| c.id) {
                            self.dispatch(Action::ChangeColor { id, hex: text });
                        }
                    }
                    Modal::Rename => self.dispatch(Action::Rename(text)),
                }
                self.close_modal();
            }
            _ => {}
        }
    }

    fn handle_command(&mut self, input: KeyInput) {
        match (self.router.focus(), input.key) {
            (Focus::TypeSelector, Key::Char(c @ '1'..='3')) if self.type_selector.is_open() => {
                let index = c as usize - '1' as usize;
                if let Some(palette_type) = self.type_selector.click(index) {
                    self.dispatch(Action::SetType(palette_type.id.to_string()));
                }
            }
            (Focus::TypeSelector, Key::Escape | Key::Tab) => self.focus_grid(),
            (Focus::Grid, Key::Tab) => self.router.set_focus(Focus::TypeSelector),
            (_, Key::Char('q')) => self.should_quit = true,
            (_, Key::Char('a')) => {
                if self.palette.is_full() {
                    self.status = Some("palette is full".to_string());
                } else {
                    self.dispatch(Action::AddColor(None));
                }
            }
            (_, Key::Char('e')) => {
                if let Some(color) = self.palette.selected() {
                    self.text_input = color.hex.clone();
                    self.router.open_modal(Modal::EditHex);
                }
            }
            (_, Key::Char('n')) => {
                self.text_input = self.palette.name.clone();
                self.router.open_modal(Modal::Rename);
            }
            (_, Key::Char('t')) => self.router.set_focus(Focus::TypeSelector),
            (_, Key::Char('x')) => self.dispatch(Action::Discard),
            (_, Key::Char('w')) => {
                self.status = Some(match self.save() {
                    Ok(()) => format!("wrote {}", self.path.display()),
                    Err(e) => format!("{e:#}"),
                });
            }
            _ => {}
        }
    }

    fn focus_grid(&mut self) {
        self.type_selector.blur();
        self.router.set_focus(Focus::Grid);
    }

    fn close_modal(&mut self) {
        self.text_input.clear();
        self.router.close_modal();
    }

    /// Write the palette fragment to the file being edited.
    pub fn save(&self) -> Result<()> {
        let xml = color_palette_xml(&PaletteXml::from(&self.palette));
        std::fs::write(&self.path, xml)
            .with_context(|| format!("failed to write palette to {}", self.path.display()))
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let [header, body, prompt, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(9),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let focus = self.router.focus();
        frame.render_widget(
            TypeSelectorWidget::new(&self.type_selector, focus == Focus::TypeSelector),
            header,
        );
        frame.render_widget(
            PaletteWidget::new(&self.palette, focus == Focus::Grid),
            body,
        );

        if let Some(modal) = self.router.modal() {
            let title = match modal {
                Modal::EditHex => "Colour",
                Modal::Rename => "Name",
            };
            let input = Paragraph::new(format!("{}_", self.text_input))
                .block(Block::bordered().title(title));
            frame.render_widget(input, prompt);
        }

        let footer_text = self.status.as_deref().unwrap_or(HELP);
        frame.render_widget(
            Paragraph::new(footer_text).style(Style::default().fg(Color::DarkGray)),
            footer,
        );
    }
}

/// Convert a crossterm key event into the editor's key model.
fn to_key_input(event: &KeyEvent) -> Option<KeyInput> {
    let key = match event.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Delete => Key::Delete,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };
    let m = event.modifiers;
    Some(KeyInput {
        key,
        modifiers: Modifiers {
            shift: m.contains(KeyModifiers::SHIFT),
            alt: m.contains(KeyModifiers::ALT),
            ctrl: m.contains(KeyModifiers::CONTROL),
            meta: m.contains(KeyModifiers::SUPER) || m.contains(KeyModifiers::META),
        },
    })
}

/// Launch the TUI application.
pub fn run(app: TuiApp) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, app);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, mut app: TuiApp) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| app.draw(frame))?;
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.status = None;
            if let Some(input) = to_key_input(&key) {
                app.handle_key(input);
            }
        }
    }
    Ok(())
}
