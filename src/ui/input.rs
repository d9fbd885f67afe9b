//! キー入力の対応付け (Input -> Action)
//!
//! 押されたキーを現在のモードに応じた Action に変換する

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::actions::{Action, Command};
use super::state::{App, AppMode};

/// 現在のモードとキーから Action を決める
pub fn get_action(mode: &AppMode, key: KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    match mode {
        AppMode::Normal => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            KeyCode::Char('n') | KeyCode::Right => Some(Action::NextPage),
            KeyCode::Char('p') | KeyCode::Left => Some(Action::PrevPage),
            KeyCode::Char('s') => Some(Action::CyclePageSize),
            KeyCode::Char('r') => Some(Action::Reload),
            KeyCode::Char('a') => Some(Action::StartCreate),
            KeyCode::Char('e') | KeyCode::Enter => Some(Action::StartEdit),
            KeyCode::Char('d') | KeyCode::Delete => Some(Action::StartDelete),
            KeyCode::Char('c') => Some(Action::StartExport),
            KeyCode::Char('x') => Some(Action::DismissExportError),
            _ => None,
        },
        AppMode::AddingStock | AppMode::EditingStock(_) => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::Confirm(_) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(Action::Submit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
    }
}

/// キーイベントを処理し、発生した Command を返す
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Command> {
    get_action(&app.mode, key).and_then(|action| app.dispatch(action))
}

/// ポーリング 1 回分: キーがあれば処理し、毎回 Tick を送る
pub fn handle_poll(app: &mut App, key: Option<KeyEvent>, now: Instant) -> Vec<Command> {
    let mut commands: Vec<Command> = key
        .and_then(|key| handle_key_event(app, key))
        .into_iter()
        .collect();
    commands.extend(app.dispatch(Action::Tick(now)));
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::state::ConfirmAction;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_normal_mode_keys() {
        let mode = AppMode::Normal;
        assert_eq!(get_action(&mode, press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(get_action(&mode, press(KeyCode::Char('c'))), Some(Action::StartExport));
        assert_eq!(get_action(&mode, press(KeyCode::Char('s'))), Some(Action::CyclePageSize));
        assert_eq!(get_action(&mode, press(KeyCode::Right)), Some(Action::NextPage));
        assert_eq!(get_action(&mode, press(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_form_mode_types_letters() {
        let mode = AppMode::AddingStock;
        // 一覧用のショートカットは文字入力になる
        assert_eq!(get_action(&mode, press(KeyCode::Char('q'))), Some(Action::Input('q')));
        assert_eq!(get_action(&mode, press(KeyCode::Tab)), Some(Action::NextField));
        assert_eq!(get_action(&mode, press(KeyCode::BackTab)), Some(Action::PrevField));
        assert_eq!(get_action(&mode, press(KeyCode::Enter)), Some(Action::Submit));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(get_action(&AppMode::AddingStock, ctrl_c), Some(Action::Quit));
    }

    #[test]
    fn test_confirm_mode_keys() {
        let stock = crate::models::Stock {
            id: Some(1),
            name: "Pen".to_string(),
            sku: None,
            price: None,
            quantity: None,
            store_id: None,
            user_id: None,
            created_at: None,
            updated_at: None,
        };
        let mode = AppMode::Confirm(ConfirmAction::Delete(stock));
        assert_eq!(get_action(&mode, press(KeyCode::Char('y'))), Some(Action::Submit));
        assert_eq!(get_action(&mode, press(KeyCode::Esc)), Some(Action::Cancel));
        assert_eq!(get_action(&mode, press(KeyCode::Char('e'))), None);
    }

    #[test]
    fn test_notification_expires_while_typing() {
        use crate::models::Identity;
        use crate::ui::state::{NOTIFICATION_TTL, PageSize, Severity};

        let mut app = App::new(Identity::default(), PageSize::Ten);
        app.dispatch(Action::StartCreate);
        app.notify("商品を登録しました", Severity::Success);
        let shown_at = app.notification.as_ref().unwrap().shown_at;

        let commands = handle_poll(&mut app, Some(press(KeyCode::Char('a'))), shown_at);
        assert!(commands.is_empty());
        assert!(app.notification.is_some());

        handle_poll(&mut app, Some(press(KeyCode::Char('b'))), shown_at + NOTIFICATION_TTL);
        assert!(app.notification.is_none());
        assert_eq!(app.form.name, "ab");
    }
}
