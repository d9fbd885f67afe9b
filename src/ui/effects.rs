//! 副作用の実行
//!
//! Command を API / ファイル出力で実行し、結果を Action として返す

use std::path::Path;

use tracing::{debug, error};

use super::actions::{Action, Command, Mutation};
use crate::api::StockApi;
use crate::export;

/// Command を実行する。`Quit` は呼び出し側で処理するため `None`
pub fn run_command(command: Command, api: &mut dyn StockApi, export_dir: &Path) -> Option<Action> {
    let action = match command {
        Command::Quit => return None,
        Command::FetchPage { seq, limit, offset } => {
            debug!(seq, limit, offset, "fetching stock page");
            Action::PageLoaded {
                seq,
                result: api.list(limit, offset).map_err(|e| e.to_string()),
            }
        }
        Command::Create(input) => mutation_result(Mutation::Create, api.create(&input).map(drop)),
        Command::Update(id, input) => {
            mutation_result(Mutation::Update, api.update(id, &input).map(drop))
        }
        Command::Delete(id) => mutation_result(Mutation::Delete, api.delete(id)),
        Command::Export(stocks) => Action::Exported(
            export::export_page(&stocks, export_dir).map_err(|e| {
                error!(error = %e, "csv export failed");
                export::describe(&e)
            }),
        ),
    };
    Some(action)
}

fn mutation_result(mutation: Mutation, result: Result<(), crate::error::ApiError>) -> Action {
    match result {
        Ok(()) => Action::MutationSucceeded(mutation),
        Err(e) => Action::MutationFailed(mutation, e.to_string()),
    }
}
