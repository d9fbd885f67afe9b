//! UI モジュール
//!
//! MVI (Model-View-Intent) 構成：
//! - Model (state.rs): App 構造体と画面状態
//! - View (view/): 状態を描画する純粋関数
//! - Intent (actions.rs): キー操作と API 結果を表す Action、副作用を表す Command

pub mod actions;
pub mod effects;
pub mod form;
pub mod input;
pub mod layout;
pub mod logic;
pub mod state;
pub mod view;

pub use effects::run_command;
pub use input::handle_poll;
pub use state::App;
pub use view::render;
