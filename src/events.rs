//! 変更通知
//!
//! 編集面の変更（テキスト・スクロール・カーソル）をリスナーに配信する。
//! すべてメインスレッド上で同期的に呼ばれる。

use std::collections::BTreeMap;

/// リスナーの一意識別子
pub type ListenerId = usize;

/// 編集面の変更イベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// テキストが変わった
    TextChanged,
    /// スクロール位置が変わった
    ScrollChanged { position: u64 },
    /// カーソル行が変わった
    CursorMoved { line: usize },
}

/// 変更リスナー
pub trait ChangeListener {
    fn on_change(&mut self, event: &ChangeEvent);

    /// 特定のイベントだけを受け取る場合に上書きする
    fn accepts(&self, event: &ChangeEvent) -> bool {
        let _ = event;
        true
    }
}

impl<F> ChangeListener for F
where
    F: FnMut(&ChangeEvent),
{
    fn on_change(&mut self, event: &ChangeEvent) {
        self(event)
    }
}

/// 変更通知の配信元
///
/// リスナーは登録順に呼ばれる。
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: BTreeMap<ListenerId, Box<dyn ChangeListener>>,
    next_id: ListenerId,
    events_dispatched: usize,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Box<dyn ChangeListener>) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(id, listener);
        id
    }

    /// リスナーを削除（存在しなかった場合は false）
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn notify(&mut self, event: ChangeEvent) {
        for listener in self.listeners.values_mut() {
            if listener.accepts(&event) {
                listener.on_change(&event);
            }
        }
        self.events_dispatched += 1;
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn events_dispatched(&self) -> usize {
        self.events_dispatched
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .field("events_dispatched", &self.events_dispatched)
            .finish()
    }
}
