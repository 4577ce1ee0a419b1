//! 端末ビューア
//!
//! 行番号 | テキスト | ミニマップ の3ペインとステータス行。
//! マウスはミニマップ領域の押下・ドラッグ・ホイールをミニマップに渡す。

use crate::config::MinimapConfig;
use crate::editor::{EditorSurface, TextView};
use crate::error::{CodemapError, Result, UiError};
use crate::highlight::SyntaxHighlighter;
use crate::minimap::{DragState, Minimap};
use crate::ui::{pointer_from_mouse, LineNumberGutter, MinimapInput, MinimapWidget, TextAreaWidget};
use crossterm::cursor::Show;
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Terminal,
};
use std::io::stdout;
use std::path::Path;
use std::time::Duration;

/// テキストエリア上のホイール1ノッチあたりの行数
const TEXT_WHEEL_LINES: i64 = 3;

/// 各ペインの配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PaneLayout {
    gutter: Rect,
    text: Rect,
    minimap: Rect,
    status: Rect,
}

pub struct TuiApplication {
    title: String,
    view: TextView,
    minimap: Minimap,
    gutter: LineNumberGutter,
    layout: PaneLayout,
    running: bool,
    redraw: bool,
}

impl TuiApplication {
    pub fn new(title: impl Into<String>, text: &str, highlighter: SyntaxHighlighter, config: MinimapConfig) -> Self {
        let mut view = TextView::new(text, highlighter);
        let mut minimap = Minimap::new(config);
        minimap.attach(view.notifier_mut());
        Self {
            title: title.into(),
            view,
            minimap,
            gutter: LineNumberGutter::default(),
            layout: PaneLayout::default(),
            running: true,
            redraw: true,
        }
    }

    /// ファイルを開く（UTF-8 でない部分は置換文字になる）
    pub fn open(path: &Path, highlighter: SyntaxHighlighter, config: MinimapConfig) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        log::info!("opened {} ({} bytes)", path.display(), bytes.len());
        Ok(Self::new(path.display().to_string(), &text, highlighter, config))
    }

    pub fn view(&self) -> &TextView {
        &self.view
    }

    pub fn minimap(&self) -> &Minimap {
        &self.minimap
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<()> {
        enter_terminal()?;

        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend).map_err(|err| terminal_error("terminal init", err))?;
        terminal.hide_cursor().map_err(|err| terminal_error("hide cursor", err))?;

        let loop_result = self.event_loop(&mut terminal);
        let show_cursor_result = terminal.show_cursor().map_err(|err| terminal_error("show cursor", err));
        drop(terminal);
        let cleanup_result = leave_terminal();

        loop_result.and(show_cursor_result).and(cleanup_result)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.running {
            self.render(terminal)?;

            if event::poll(Duration::from_millis(16)).map_err(|err| terminal_error("event poll", err))? {
                let event = event::read().map_err(|err| terminal_error("event read", err))?;
                self.handle_event(event);
            }
        }

        Ok(())
    }

    /// 端末イベントを処理する
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::FocusLost => self.minimap.on_focus_lost(),
            Event::Resize(_, _) => self.redraw = true,
            Event::FocusGained | Event::Paste(_) => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let page = self.view.visible_rows().max(1) as i64;
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.running = false,
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Up | KeyCode::Char('k') => self.view.move_cursor_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.view.move_cursor_by(1),
            KeyCode::PageUp => self.view.move_cursor_by(-page),
            KeyCode::PageDown | KeyCode::Char(' ') => self.view.move_cursor_by(page),
            KeyCode::Home | KeyCode::Char('g') => self.view.move_cursor_to(0),
            KeyCode::End | KeyCode::Char('G') => self.view.move_cursor_to(usize::MAX),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let drag_before = self.minimap.drag_state();
        match pointer_from_mouse(&mouse, self.layout.minimap) {
            Some(MinimapInput::Pointer(pointer)) => {
                self.minimap.handle_pointer(pointer, &mut self.view);
            }
            Some(MinimapInput::Wheel(notches)) => self.minimap.on_wheel(notches, &mut self.view),
            None => match mouse.kind {
                MouseEventKind::ScrollDown => self.view.scroll_by(TEXT_WHEEL_LINES),
                MouseEventKind::ScrollUp => self.view.scroll_by(-TEXT_WHEEL_LINES),
                _ => {}
            },
        }
        // ステータス行のドラッグ表示
        if self.minimap.drag_state() != drag_before {
            self.redraw = true;
        }
    }

    /// 端末サイズからペイン配置を決め、表示行数とミニマップの大きさを合わせる
    pub fn apply_layout(&mut self, area: Rect) {
        let [body, status] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let requested = self.minimap.config().width.min(u32::from(body.width) / 3);
        let minimap_width = self.minimap.resize(requested, u32::from(body.height));
        let minimap_width = minimap_width.min(u32::from(body.width)) as u16;
        let gutter_width = self.gutter.width(self.view.line_count());

        let [gutter, text, minimap] = Layout::horizontal([
            Constraint::Length(gutter_width),
            Constraint::Min(1),
            Constraint::Length(minimap_width),
        ])
        .areas(body);

        self.view.set_visible_rows(text.height as usize);
        let layout = PaneLayout {
            gutter,
            text,
            minimap,
            status,
        };
        if layout != self.layout {
            self.layout = layout;
            self.redraw = true;
        }
    }

    fn render<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let size = terminal.size().map_err(|err| terminal_error("terminal size", err))?;
        self.apply_layout(Rect::new(0, 0, size.width, size.height));

        let repaint = self.minimap.take_repaint_request();
        if !repaint && !self.redraw {
            return Ok(());
        }
        self.redraw = false;

        let frame_data = self.minimap.render(&self.view);
        let layout = self.layout;
        let range = self.view.visible_range();
        let cursor = self.view.cursor_line();
        let status = self.status_line();
        let view = &self.view;
        let gutter = self.gutter;

        terminal
            .draw(|frame| {
                frame.render_widget(gutter.widget(range.start, view.line_count(), cursor), layout.gutter);
                frame.render_widget(
                    TextAreaWidget::new(view.document(), range.clone()).cursor_line(cursor),
                    layout.text,
                );
                frame.render_widget(MinimapWidget::new(&frame_data), layout.minimap);
                frame.render_widget(
                    Paragraph::new(Line::from(status)).style(Style::default().fg(Color::Black).bg(Color::Gray)),
                    layout.status,
                );
            })
            .map_err(|err| terminal_error("render", err))?;
        Ok(())
    }

    fn status_line(&self) -> String {
        let drag = match self.minimap.drag_state() {
            DragState::Dragging => " [drag]",
            DragState::Idle => "",
        };
        format!(
            " {}  L{}/{}{}  q:quit",
            self.title,
            self.view.cursor_line() + 1,
            self.view.line_count(),
            drag
        )
    }
}

fn enter_terminal() -> Result<()> {
    enable_raw_mode().map_err(|err| init_error("enable raw mode", err))?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)
        .map_err(|err| init_error("enter alternate screen", err))?;
    Ok(())
}

fn leave_terminal() -> Result<()> {
    let mut out = stdout();
    execute!(out, DisableFocusChange, DisableMouseCapture, LeaveAlternateScreen)
        .map_err(|err| terminal_error("leave alternate screen", err))?;
    disable_raw_mode().map_err(|err| terminal_error("disable raw mode", err))?;
    Ok(())
}

/// 端末を通常状態に戻す（パニックフック用、エラーは無視する）
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let mut out = stdout();
    let _ = execute!(
        out,
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen,
        Show
    );
}

fn init_error(context: &str, err: impl std::fmt::Display) -> CodemapError {
    CodemapError::Ui(UiError::TerminalInit {
        message: format!("{}: {}", context, err),
    })
}

fn terminal_error(context: &str, err: impl std::fmt::Display) -> CodemapError {
    CodemapError::Ui(UiError::RenderingFailed {
        component: format!("{}: {}", context, err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{MouseButton, MouseEvent};

    fn app(lines: usize) -> TuiApplication {
        let text = (0..lines).map(|n| format!("line {n}")).collect::<Vec<_>>().join("\n");
        let mut app = TuiApplication::new("test", &text, SyntaxHighlighter::plain(), MinimapConfig::for_terminal());
        app.apply_layout(Rect::new(0, 0, 100, 41));
        app
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn setup_failures_are_init_errors() {
        let err = init_error("enable raw mode", "not a tty");
        assert!(matches!(
            err,
            CodemapError::Ui(UiError::TerminalInit { ref message }) if message == "enable raw mode: not a tty"
        ));
        assert!(matches!(
            terminal_error("render", "broken pipe"),
            CodemapError::Ui(UiError::RenderingFailed { .. })
        ));
    }

    #[test]
    fn layout_reserves_minimap_column() {
        let app = app(1_000);
        assert_eq!(app.layout.minimap.width, 20);
        assert_eq!(app.layout.minimap.x, 80);
        assert_eq!(app.layout.text.height, 40);
        assert_eq!(app.view().visible_rows(), 40);
        assert_eq!(app.minimap().geometry().height, 40);
    }

    #[test]
    fn click_and_drag_on_minimap_scroll_the_view() {
        let mut app = app(1_000);
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 85, 20));
        assert_eq!(app.minimap().drag_state(), DragState::Dragging);
        let after_press = app.view().top_line();
        assert!(after_press > 0);

        // 領域外へのドラッグも捕捉中は追従する
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 39));
        assert!(app.view().top_line() > after_press);

        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 10, 39));
        assert_eq!(app.minimap().drag_state(), DragState::Idle);
    }

    #[test]
    fn focus_lost_cancels_drag() {
        let mut app = app(1_000);
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 85, 5));
        app.handle_event(Event::FocusLost);
        assert_eq!(app.minimap().drag_state(), DragState::Idle);
    }

    #[test]
    fn wheel_over_text_scrolls() {
        let mut app = app(1_000);
        app.handle_event(mouse(MouseEventKind::ScrollDown, 30, 5));
        assert_eq!(app.view().top_line(), 3);
    }

    #[test]
    fn keys_move_cursor_and_quit() {
        let mut app = app(1_000);
        app.handle_event(key(KeyCode::Down));
        assert_eq!(app.view().cursor_line(), 1);
        app.handle_event(key(KeyCode::End));
        assert_eq!(app.view().cursor_line(), 999);
        assert_eq!(app.view().top_line(), 960);
        app.handle_event(key(KeyCode::Char('q')));
        assert!(!app.is_running());
    }
}
