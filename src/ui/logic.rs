//! 業務ロジック (Update/Dispatch)
//!
//! Action を受けて状態を遷移させ、必要な副作用を Command で返す

use std::time::Instant;

use tracing::{debug, info, warn};

use super::actions::{Action, Command, Mutation};
use super::form::{StockDraft, StockForm};
use super::state::{App, AppMode, ConfirmAction, LoadState, Notification, Severity};
use crate::models::Stock;

impl App {
    /// Action を状態に適用する
    pub fn dispatch(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::Quit => return Some(Command::Quit),
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),

            Action::NextPage => return self.next_page(),
            Action::PrevPage => return self.prev_page(),
            Action::CyclePageSize => return self.cycle_page_size(),
            Action::Reload => return Some(self.request_page(false)),

            Action::StartCreate => self.start_create(),
            Action::StartEdit => self.start_edit(),
            Action::StartDelete => self.start_delete(),

            Action::StartExport => return self.start_export(),
            Action::DismissExportError => self.export_error = None,

            Action::Cancel => self.cancel(),
            Action::Submit => return self.submit(),

            Action::Input(c) => {
                if self.is_form_editable() {
                    self.form.input(c);
                }
            }
            Action::DeleteChar => {
                if self.is_form_editable() {
                    self.form.delete_char();
                }
            }
            Action::NextField => {
                if self.is_form_editable() {
                    self.form.focus_next();
                }
            }
            Action::PrevField => {
                if self.is_form_editable() {
                    self.form.focus_prev();
                }
            }

            Action::PageLoaded { seq, result } => self.page_loaded(seq, result),
            Action::MutationSucceeded(mutation) => return Some(self.mutation_succeeded(mutation)),
            Action::MutationFailed(mutation, message) => self.mutation_failed(mutation, message),
            Action::Exported(result) => self.exported(result),

            Action::Tick(now) => self.expire_notification(now),
        }
        None
    }

    /// 起動時・再読み込み用
    pub fn refresh(&mut self) -> Command {
        self.request_page(false)
    }

    // ============ 一覧取得 ============

    /// 一覧取得を発行する
    ///
    /// `keep_rows` が真なら結果が届くまで現在の行を表示し続ける。
    fn request_page(&mut self, keep_rows: bool) -> Command {
        self.fetch_seq += 1;
        if !keep_rows || !matches!(self.load, LoadState::Loaded(_)) {
            self.load = LoadState::Loading;
        }
        Command::FetchPage {
            seq: self.fetch_seq,
            limit: self.pagination.limit(),
            offset: self.pagination.offset(),
        }
    }

    /// 一覧取得の結果を反映する（古い番号の応答は捨てる）
    fn page_loaded(&mut self, seq: u64, result: Result<Vec<Stock>, String>) {
        if seq != self.fetch_seq {
            debug!(seq, latest = self.fetch_seq, "discarding stale page response");
            return;
        }

        match result {
            Ok(stocks) => {
                if stocks.is_empty() {
                    self.selected_index = 0;
                } else if self.selected_index >= stocks.len() {
                    self.selected_index = stocks.len() - 1;
                }
                self.load = LoadState::Loaded(stocks);
            }
            Err(message) => {
                warn!(%message, "failed to load stocks");
                self.load = LoadState::Failed(message);
            }
        }
    }

    // ============ 選択・ページ送り ============

    /// 選択を上へ
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// 選択を下へ
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.stocks().len() {
            self.selected_index += 1;
        }
    }

    fn next_page(&mut self) -> Option<Command> {
        if !self.has_next_page() {
            return None;
        }
        self.pagination.page += 1;
        self.selected_index = 0;
        Some(self.request_page(false))
    }

    fn prev_page(&mut self) -> Option<Command> {
        if self.pagination.page == 0 {
            return None;
        }
        self.pagination.page -= 1;
        self.selected_index = 0;
        Some(self.request_page(false))
    }

    fn cycle_page_size(&mut self) -> Option<Command> {
        let next = self.pagination.page_size.next();
        self.pagination.set_page_size(next);
        self.selected_index = 0;
        Some(self.request_page(false))
    }

    // ============ ダイアログ ============

    fn is_form_editable(&self) -> bool {
        !self.submitting && matches!(self.mode, AppMode::AddingStock | AppMode::EditingStock(_))
    }

    /// 新規登録を開く
    pub fn start_create(&mut self) {
        if self.mode != AppMode::Normal {
            return;
        }
        self.form = StockForm::new();
        self.mode = AppMode::AddingStock;
    }

    /// 選択行の編集を開く
    pub fn start_edit(&mut self) {
        if self.mode != AppMode::Normal {
            return;
        }
        if let Some(stock) = self.selected_stock().cloned() {
            self.form = StockForm::from_stock(&stock);
            self.mode = AppMode::EditingStock(stock);
        }
    }

    /// 選択行の削除確認を開く
    pub fn start_delete(&mut self) {
        if self.mode != AppMode::Normal {
            return;
        }
        if let Some(stock) = self.selected_stock().cloned() {
            self.mode = AppMode::Confirm(ConfirmAction::Delete(stock));
        }
    }

    /// 送信（送信中は無視）
    fn submit(&mut self) -> Option<Command> {
        if self.submitting {
            return None;
        }

        let command = match self.mode.clone() {
            AppMode::Normal => return None,
            AppMode::AddingStock => {
                let draft = self.validated_form()?;
                Command::Create(draft.to_input(&self.identity))
            }
            AppMode::EditingStock(stock) => {
                // ID が無いレコードは送信しない
                let id = stock.id?;
                let draft = self.validated_form()?;
                Command::Update(id, draft.to_input(&self.identity))
            }
            AppMode::Confirm(ConfirmAction::Delete(stock)) => Command::Delete(stock.id?),
        };

        self.submitting = true;
        Some(command)
    }

    fn validated_form(&mut self) -> Option<StockDraft> {
        match self.form.validate() {
            Ok(draft) => {
                self.form.errors = Default::default();
                Some(draft)
            }
            Err(errors) => {
                self.form.errors = errors;
                None
            }
        }
    }

    fn mutation_succeeded(&mut self, mutation: Mutation) -> Command {
        info!(?mutation, "stock mutation succeeded");
        self.submitting = false;
        self.mode = AppMode::Normal;
        self.form = StockForm::new();
        self.notify(mutation.success_message(), Severity::Success);
        self.request_page(true)
    }

    /// 失敗時はダイアログを開いたまま通知する
    fn mutation_failed(&mut self, mutation: Mutation, message: String) {
        warn!(?mutation, %message, "stock mutation failed");
        self.submitting = false;
        self.notify(
            format!("{}: {}", mutation.failure_prefix(), message),
            Severity::Error,
        );
    }

    // ============ CSV 出力 ============

    fn start_export(&mut self) -> Option<Command> {
        if self.exporting {
            return None;
        }
        self.exporting = true;
        self.export_error = None;
        Some(Command::Export(self.stocks().to_vec()))
    }

    fn exported(&mut self, result: Result<std::path::PathBuf, String>) {
        self.exporting = false;
        match result {
            Ok(path) => self.notify(
                format!("CSVを出力しました: {}", path.display()),
                Severity::Success,
            ),
            Err(message) => self.export_error = Some(message),
        }
    }

    // ============ 共通 ============

    /// ダイアログを閉じる（送信中は閉じない）
    pub fn cancel(&mut self) {
        if self.submitting {
            return;
        }
        self.mode = AppMode::Normal;
        self.form = StockForm::new();
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.notification = Some(Notification {
            message: message.into(),
            severity,
            shown_at: Instant::now(),
        });
    }

    fn expire_notification(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired(now))
        {
            self.notification = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::Identity;
    use crate::ui::state::PageSize;

    fn stock(id: Option<i64>, name: &str) -> Stock {
        Stock {
            id,
            name: name.to_string(),
            sku: None,
            price: Some(100.0),
            quantity: Some(1),
            store_id: None,
            user_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn app() -> App {
        App::new(Identity::default(), PageSize::Ten)
    }

    /// 初回取得を完了させた App
    fn loaded_app(stocks: Vec<Stock>) -> App {
        let mut app = app();
        let Command::FetchPage { seq, .. } = app.refresh() else {
            panic!("expected fetch");
        };
        app.dispatch(Action::PageLoaded {
            seq,
            result: Ok(stocks),
        });
        app
    }

    fn full_page() -> Vec<Stock> {
        (1..=10).map(|i| stock(Some(i), &format!("item-{}", i))).collect()
    }

    #[test]
    fn test_refresh_requests_current_page() {
        let mut app = app();
        assert_eq!(
            app.refresh(),
            Command::FetchPage {
                seq: 1,
                limit: 10,
                offset: 0
            }
        );
        assert_eq!(app.load, LoadState::Loading);
    }

    #[test]
    fn test_stale_page_response_is_discarded() {
        let mut app = app();
        let first = app.refresh();
        let second = app.refresh();
        let (Command::FetchPage { seq: old, .. }, Command::FetchPage { seq: new, .. }) =
            (first, second)
        else {
            panic!("expected fetches");
        };

        app.dispatch(Action::PageLoaded {
            seq: new,
            result: Ok(vec![stock(Some(2), "new")]),
        });
        app.dispatch(Action::PageLoaded {
            seq: old,
            result: Ok(vec![stock(Some(1), "old")]),
        });

        assert_eq!(app.stocks()[0].name, "new");
    }

    #[test]
    fn test_load_failure_and_retry() {
        let mut app = app();
        let Command::FetchPage { seq, .. } = app.refresh() else {
            panic!("expected fetch");
        };
        app.dispatch(Action::PageLoaded {
            seq,
            result: Err("connection refused".to_string()),
        });
        assert_eq!(app.load, LoadState::Failed("connection refused".to_string()));

        let retry = app.dispatch(Action::Reload);
        assert!(matches!(retry, Some(Command::FetchPage { seq: 2, .. })));
        assert_eq!(app.load, LoadState::Loading);
    }

    #[test]
    fn test_paging() {
        let mut app = loaded_app(full_page());
        assert_eq!(app.dispatch(Action::PrevPage), None);

        let next = app.dispatch(Action::NextPage);
        assert!(matches!(
            next,
            Some(Command::FetchPage {
                limit: 10,
                offset: 10,
                ..
            })
        ));
        assert_eq!(app.pagination.page, 1);

        // 満杯でないページの先には進めない
        let mut short = loaded_app(vec![stock(Some(1), "only")]);
        assert_eq!(short.dispatch(Action::NextPage), None);
    }

    #[test]
    fn test_page_size_change_resets_page_index() {
        let mut app = loaded_app(full_page());
        app.dispatch(Action::NextPage);
        assert_eq!(app.pagination.page, 1);

        let command = app.dispatch(Action::CyclePageSize);
        assert_eq!(app.pagination.page, 0);
        assert_eq!(app.pagination.page_size, PageSize::TwentyFive);
        assert!(matches!(
            command,
            Some(Command::FetchPage {
                limit: 25,
                offset: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_create_flow() {
        let mut app = loaded_app(vec![]);
        app.dispatch(Action::StartCreate);
        assert_eq!(app.mode, AppMode::AddingStock);

        // 名前が空なら送信しない
        assert_eq!(app.dispatch(Action::Submit), None);
        assert!(app.form.errors.name.is_some());

        for c in "Pen".chars() {
            app.dispatch(Action::Input(c));
        }
        let command = app.dispatch(Action::Submit);
        let Some(Command::Create(input)) = command else {
            panic!("expected create");
        };
        assert_eq!(input.name, "Pen");
        assert!(input.user_id.is_nil());
        assert!(app.submitting);

        // 送信中の再送信・キャンセルは無視
        assert_eq!(app.dispatch(Action::Submit), None);
        app.dispatch(Action::Cancel);
        assert_eq!(app.mode, AppMode::AddingStock);

        let refetch = app.dispatch(Action::MutationSucceeded(Mutation::Create));
        assert!(matches!(refetch, Some(Command::FetchPage { .. })));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.form, StockForm::new());
        assert_eq!(
            app.notification.as_ref().map(|n| n.message.as_str()),
            Some("商品を登録しました")
        );
    }

    #[test]
    fn test_mutation_failure_keeps_dialog_open() {
        let mut app = loaded_app(vec![stock(Some(5), "Pen")]);
        app.dispatch(Action::StartEdit);
        app.dispatch(Action::Input('!'));
        let command = app.dispatch(Action::Submit);
        assert!(matches!(command, Some(Command::Update(5, _))));

        app.dispatch(Action::MutationFailed(
            Mutation::Update,
            "server responded with 500".to_string(),
        ));
        assert!(matches!(app.mode, AppMode::EditingStock(_)));
        assert!(!app.submitting);
        assert_eq!(app.form.name, "Pen!");
        let notification = app.notification.as_ref().unwrap();
        assert_eq!(notification.severity, Severity::Error);
        assert!(notification.message.starts_with("保存に失敗しました"));
    }

    #[test]
    fn test_mutations_without_id_are_noops() {
        let mut app = loaded_app(vec![stock(None, "ghost")]);

        app.dispatch(Action::StartEdit);
        assert_eq!(app.dispatch(Action::Submit), None);
        assert!(!app.submitting);

        app.dispatch(Action::Cancel);
        app.dispatch(Action::StartDelete);
        assert!(matches!(app.mode, AppMode::Confirm(_)));
        assert_eq!(app.dispatch(Action::Submit), None);
        assert!(!app.submitting);
    }

    #[test]
    fn test_delete_flow() {
        let mut app = loaded_app(vec![stock(Some(1), "a"), stock(Some(2), "b")]);
        app.dispatch(Action::MoveSelectionDown);
        app.dispatch(Action::StartDelete);
        assert_eq!(app.dispatch(Action::Submit), Some(Command::Delete(2)));

        app.dispatch(Action::MutationSucceeded(Mutation::Delete));
        assert_eq!(
            app.notification.as_ref().map(|n| n.message.as_str()),
            Some("削除しました")
        );
        // 再取得中も現在の行は表示したまま
        assert_eq!(app.stocks().len(), 2);
    }

    #[test]
    fn test_export_busy_flag() {
        let mut app = loaded_app(vec![stock(Some(1), "a")]);
        let command = app.dispatch(Action::StartExport);
        assert!(matches!(command, Some(Command::Export(ref rows)) if rows.len() == 1));
        assert!(app.exporting);

        assert_eq!(app.dispatch(Action::StartExport), None);

        app.dispatch(Action::Exported(Err("出力対象の在庫データがありません".to_string())));
        assert!(!app.exporting);
        assert_eq!(
            app.export_error.as_deref(),
            Some("出力対象の在庫データがありません")
        );

        app.dispatch(Action::DismissExportError);
        assert_eq!(app.export_error, None);
    }

    #[test]
    fn test_notification_expires_on_tick() {
        let mut app = app();
        app.notify("削除しました", Severity::Success);
        let shown_at = app.notification.as_ref().unwrap().shown_at;

        app.dispatch(Action::Tick(shown_at + Duration::from_secs(1)));
        assert!(app.notification.is_some());

        app.dispatch(Action::Tick(shown_at + Duration::from_secs(3)));
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_selection_is_clamped_after_reload() {
        let mut app = loaded_app(full_page());
        for _ in 0..9 {
            app.dispatch(Action::MoveSelectionDown);
        }
        assert_eq!(app.selected_index, 9);

        let command = app.dispatch(Action::Reload);
        let Some(Command::FetchPage { seq, .. }) = command else {
            panic!("expected fetch");
        };
        app.dispatch(Action::PageLoaded {
            seq,
            result: Ok(vec![stock(Some(1), "a")]),
        });
        assert_eq!(app.selected_index, 0);
    }
}
