mod api;
mod config;
mod csv;
mod error;
mod export;
mod format;
mod logging;
mod models;
mod storage;
mod ui;

use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::{error, info};

use crate::api::{HttpStockApi, StockApi};
use crate::config::Config;
use crate::storage::FileStockApi;
use crate::ui::actions::Command;
use crate::ui::{App, render};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 接続先を決める。API URL が無ければローカルファイル
fn open_backend(config: &Config) -> Result<Box<dyn StockApi>> {
    match &config.api_url {
        Some(url) => {
            info!(url = %url, "using HTTP backend");
            let api = HttpStockApi::new(url, config.http_timeout)
                .context("HTTP クライアントを作成できませんでした")?;
            Ok(Box::new(api))
        }
        None => {
            let path = config.store_path();
            info!(path = %path.display(), "using file backend");
            let api = FileStockApi::open(&path)
                .with_context(|| format!("{} を読み込めませんでした", path.display()))?;
            Ok(Box::new(api))
        }
    }
}

fn main() -> Result<()> {
    // 設定 (~/.local/share/stockroom/config.toml + STOCKROOM_*)
    let config = Config::load().context("設定を読み込めませんでした")?;

    let log_dir = config.log_dir();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("{} を作成できませんでした", log_dir.display()))?;
    logging::init_logging(&log_dir);
    info!(data_dir = %config.data_dir.display(), "starting stockroom");

    let mut api = open_backend(&config)?;
    let mut app = App::new(config.identity, config.page_size);

    // 端末の準備
    enable_raw_mode().context("raw モードに切り替えられませんでした")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主ループ
    let result = run_app(&mut terminal, &mut app, api.as_mut(), &config.export_dir);

    // 端末を戻す
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "terminated with error");
    }
    info!("stockroom stopped");

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    api: &mut dyn StockApi,
    export_dir: &Path,
) -> Result<()> {
    let mut pending = vec![app.refresh()];

    loop {
        // 副作用を順に実行し、結果を状態へ戻す
        while let Some(command) = pending.pop() {
            if matches!(command, Command::Quit) {
                return Ok(());
            }
            // 読み込み中・送信中の表示を先に出す
            terminal.draw(|f| render(f, app))?;
            if let Some(action) = ui::run_command(command, api, export_dir) {
                pending.extend(app.dispatch(action));
            }
        }

        terminal.draw(|f| render(f, app))?;

        let mut key = None;
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(event) = event::read()? {
                if event.kind == KeyEventKind::Press {
                    key = Some(event);
                }
            }
        }
        pending.extend(ui::handle_poll(app, key, Instant::now()));
    }
}
