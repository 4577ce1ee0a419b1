//! ミニマップ座標マッパー
//!
//! 純粋関数（`render` / `viewport` モジュール）の上に、ドラッグ状態・
//! 編集面への接続・リサイズ・再描画要求を載せたもの。
//!
//! ポインタ操作は2状態の状態機械:
//!
//! * `Idle` - `on_pointer_down` 以外は何もしない
//! * `Dragging` - 押下でポインタを捕捉して即座にスクロール、移動のたびに
//!   スクロール、離す・キャンバス外に出る・フォーカス喪失で `Idle` に戻る
//!
//! 編集面から切り離された（`detach`）状態ではすべての操作が何もしない。

use crate::config::MinimapConfig;
use crate::editor::EditorSurface;
use crate::events::{ChangeEvent, ChangeListener, ChangeNotifier, ListenerId};
use crate::geometry::{MinimapGeometry, PixelRect};
use crate::render::{render, RenderFrame};
use crate::scroll::ScrollCommand;
use crate::viewport::{scroll_command_for_y, viewport_rect};
use std::cell::Cell;
use std::rc::Rc;

/// ドラッグ状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// ポインタイベントの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Move,
    Release,
    Leave,
}

/// キャンバスローカル座標のポインタイベント
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self { kind, x, y }
    }
}

/// 変更通知で再描画フラグを立てるリスナー
struct RepaintListener {
    dirty: Rc<Cell<bool>>,
}

impl ChangeListener for RepaintListener {
    fn on_change(&mut self, _event: &ChangeEvent) {
        self.dirty.set(true);
    }
}

#[derive(Debug)]
pub struct Minimap {
    config: MinimapConfig,
    geometry: MinimapGeometry,
    drag: DragState,
    pointer_captured: bool,
    subscription: Option<ListenerId>,
    dirty: Rc<Cell<bool>>,
}

impl Minimap {
    pub fn new(config: MinimapConfig) -> Self {
        let geometry = config.geometry(config.width, 0);
        Self {
            config,
            geometry,
            drag: DragState::Idle,
            pointer_captured: false,
            subscription: None,
            dirty: Rc::new(Cell::new(true)),
        }
    }

    pub fn config(&self) -> &MinimapConfig {
        &self.config
    }

    pub fn geometry(&self) -> &MinimapGeometry {
        &self.geometry
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// 編集面の変更通知を購読する
    ///
    /// 既に接続済みなら古い購読を外してから付け直す。
    pub fn attach(&mut self, notifier: &mut ChangeNotifier) {
        if let Some(id) = self.subscription.take() {
            notifier.remove_listener(id);
        }
        let id = notifier.add_listener(Box::new(RepaintListener {
            dirty: Rc::clone(&self.dirty),
        }));
        self.subscription = Some(id);
        self.dirty.set(true);
        log::debug!("minimap attached (listener {})", id);
    }

    /// 購読を解除し、ドラッグ中なら破棄する
    pub fn detach(&mut self, notifier: &mut ChangeNotifier) {
        if let Some(id) = self.subscription.take() {
            notifier.remove_listener(id);
            log::debug!("minimap detached (listener {})", id);
        }
        self.end_drag();
    }

    /// 再描画要求を取り出す（取り出すとクリアされる）
    pub fn take_repaint_request(&self) -> bool {
        self.dirty.replace(false)
    }

    pub fn request_repaint(&self) {
        self.dirty.set(true);
    }

    /// キャンバスのサイズ変更。幅は設定の上下限に収め、実際の幅を返す。
    pub fn resize(&mut self, width: u32, height: u32) -> u32 {
        let geometry = self.config.geometry(width, height);
        if geometry != self.geometry {
            log::trace!(
                "minimap resized to {}x{} ({} rows)",
                geometry.width,
                geometry.height,
                geometry.rows()
            );
            self.geometry = geometry;
            self.dirty.set(true);
        }
        self.geometry.width
    }

    /// 現在の描画フレーム
    pub fn render(&self, surface: &dyn EditorSurface) -> RenderFrame {
        if !self.is_attached() {
            return RenderFrame::empty(&self.geometry);
        }
        render(
            surface.document(),
            &surface.scroll_state(),
            &self.geometry,
            &self.config.palette,
        )
    }

    /// 現在のビューポート矩形
    pub fn viewport_rect(&self, surface: &dyn EditorSurface) -> Option<PixelRect> {
        if !self.is_attached() {
            return None;
        }
        viewport_rect(
            surface.document().line_count(),
            &surface.scroll_state(),
            &self.geometry,
        )
    }

    /// Y座標に対応するスクロール指示（発行はしない）
    pub fn scroll_command_for_y(
        &self,
        y: f64,
        surface: &dyn EditorSurface,
    ) -> Option<ScrollCommand> {
        if !self.is_attached() {
            return None;
        }
        scroll_command_for_y(
            y,
            surface.document().line_count(),
            &surface.scroll_state(),
            &self.geometry,
            self.config.center_on_pointer,
        )
    }

    /// 押下: `Idle` → `Dragging`、即座にスクロールする
    pub fn on_pointer_down(
        &mut self,
        y: f64,
        surface: &mut dyn EditorSurface,
    ) -> Option<ScrollCommand> {
        if !self.is_attached() {
            return None;
        }
        if self.drag == DragState::Idle {
            log::debug!("minimap drag started at y={:.1}", y);
        }
        self.drag = DragState::Dragging;
        self.pointer_captured = true;
        self.scroll_to(y, surface)
    }

    /// 移動: `Dragging` 中だけスクロールする
    pub fn on_pointer_drag(
        &mut self,
        y: f64,
        surface: &mut dyn EditorSurface,
    ) -> Option<ScrollCommand> {
        if self.drag != DragState::Dragging || !self.is_attached() {
            return None;
        }
        self.scroll_to(y, surface)
    }

    /// 離す: `Dragging` → `Idle`
    pub fn on_pointer_up(&mut self) {
        self.end_drag();
    }

    /// キャンバス外に出た
    pub fn on_pointer_leave(&mut self) {
        self.end_drag();
    }

    /// フォーカス喪失（ポインタ捕捉の喪失）
    pub fn on_focus_lost(&mut self) {
        self.end_drag();
    }

    /// ホイールは編集面にそのまま転送する
    ///
    /// `notches` は正で下方向。
    pub fn on_wheel(&mut self, notches: i64, surface: &mut dyn EditorSurface) {
        if !self.is_attached() || notches == 0 {
            return;
        }
        let lines = notches.saturating_mul(self.config.wheel_lines as i64);
        surface.scroll_by(lines);
    }

    /// ポインタイベントの振り分け
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        surface: &mut dyn EditorSurface,
    ) -> Option<ScrollCommand> {
        match event.kind {
            PointerKind::Press => self.on_pointer_down(event.y, surface),
            PointerKind::Move => self.on_pointer_drag(event.y, surface),
            PointerKind::Release => {
                self.on_pointer_up();
                None
            }
            PointerKind::Leave => {
                self.on_pointer_leave();
                None
            }
        }
    }

    fn scroll_to(&mut self, y: f64, surface: &mut dyn EditorSurface) -> Option<ScrollCommand> {
        let command = self.scroll_command_for_y(y, &*surface)?;
        surface.set_scroll_position(command.position);
        self.dirty.set(true);
        Some(command)
    }

    fn end_drag(&mut self) {
        if self.drag == DragState::Dragging {
            log::debug!("minimap drag ended");
        }
        self.drag = DragState::Idle;
        self.pointer_captured = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextView;
    use crate::highlight::SyntaxHighlighter;

    fn numbered(lines: usize) -> String {
        (0..lines)
            .map(|n| format!("value_{n} = {n}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn setup(lines: usize) -> (Minimap, TextView) {
        let mut view = TextView::new(&numbered(lines), SyntaxHighlighter::python().unwrap());
        view.set_visible_rows(40);
        let mut minimap = Minimap::new(MinimapConfig::default());
        minimap.resize(120, 200);
        minimap.attach(view.notifier_mut());
        (minimap, view)
    }

    #[test]
    fn idle_ignores_drag() {
        let (mut minimap, mut view) = setup(10_000);
        assert_eq!(minimap.on_pointer_drag(100.0, &mut view), None);
        assert_eq!(view.top_line(), 0);
        assert_eq!(minimap.drag_state(), DragState::Idle);
    }

    #[test]
    fn press_drag_release_cycle() {
        let (mut minimap, mut view) = setup(10_000);

        let pressed = minimap.on_pointer_down(100.0, &mut view).unwrap();
        assert_eq!(minimap.drag_state(), DragState::Dragging);
        assert!(minimap.is_pointer_captured());
        assert_eq!(view.top_line() as u64, pressed.position);

        let dragged = minimap.on_pointer_drag(150.0, &mut view).unwrap();
        assert!(dragged.position > pressed.position);
        assert_eq!(view.top_line() as u64, dragged.position);

        minimap.on_pointer_up();
        assert_eq!(minimap.drag_state(), DragState::Idle);
        assert!(!minimap.is_pointer_captured());
        assert_eq!(minimap.on_pointer_drag(10.0, &mut view), None);
    }

    #[test]
    fn leaving_canvas_ends_drag() {
        let (mut minimap, mut view) = setup(1_000);
        minimap.handle_pointer(PointerEvent::new(PointerKind::Press, 3.0, 50.0), &mut view);
        minimap.handle_pointer(PointerEvent::new(PointerKind::Leave, 3.0, 50.0), &mut view);
        assert_eq!(minimap.drag_state(), DragState::Idle);
    }

    #[test]
    fn detach_mid_drag_returns_to_idle() {
        let (mut minimap, mut view) = setup(1_000);
        minimap.on_pointer_down(20.0, &mut view);
        minimap.detach(view.notifier_mut());

        assert_eq!(minimap.drag_state(), DragState::Idle);
        assert_eq!(view.notifier_mut().listener_count(), 0);
        assert_eq!(minimap.on_pointer_down(150.0, &mut view), None);
        assert!(minimap.render(&view).is_empty());
        assert!(minimap.viewport_rect(&view).is_none());
    }

    #[test]
    fn change_notifications_request_repaint() {
        let (minimap, mut view) = setup(1_000);
        assert!(minimap.take_repaint_request());
        assert!(!minimap.take_repaint_request());

        view.set_scroll_position(10);
        assert!(minimap.take_repaint_request());

        view.set_text("short");
        assert!(minimap.take_repaint_request());
    }

    #[test]
    fn reattach_replaces_subscription() {
        let (mut minimap, mut view) = setup(100);
        minimap.attach(view.notifier_mut());
        assert_eq!(view.notifier_mut().listener_count(), 1);
    }

    #[test]
    fn resize_clamps_width() {
        let mut minimap = Minimap::new(MinimapConfig::default());
        assert_eq!(minimap.resize(10, 100), 60);
        assert_eq!(minimap.resize(500, 100), 240);
        assert_eq!(minimap.geometry().rows(), 50);
    }

    #[test]
    fn wheel_is_forwarded() {
        let (mut minimap, mut view) = setup(1_000);
        minimap.on_wheel(2, &mut view);
        assert_eq!(view.top_line(), 6);
        minimap.on_wheel(-5, &mut view);
        assert_eq!(view.top_line(), 0);
    }

    #[test]
    fn render_is_idempotent() {
        let (minimap, view) = setup(5_000);
        assert_eq!(minimap.render(&view), minimap.render(&view));
    }
}
