mod api;
mod cli;
mod commands;
mod config;
mod domain;
mod error_severity;
mod logging;
mod presentation;
mod session;

use anyhow::Result;
use api::error::InfraError;
use config::error::ConfigError;
use domain::error::{DomainError, UploadFailure};
use std::env;

#[tokio::main]
async fn main() {
    logging::init_logging();

    let args: Vec<String> = env::args().collect();
    let machine_output = cli::is_machine_output(&args);

    if let Err(e) = run(&args).await {
        handle_error(e, machine_output);
    }
}

/// アプリケーションのメイン処理
async fn run(args: &[String]) -> Result<()> {
    cli::parse_args(args).await
}

/// エラーハンドリングとユーザーへの表示
///
/// anyhow::Error から元のエラー型を downcast して、
/// エラーの種類に応じた exit code とヒントを決定する。
fn handle_error(error: anyhow::Error, machine_output: bool) {
    let exit_code = determine_exit_code(&error);
    let hint = get_error_hint(&error);

    presentation::output::output_error(&error, exit_code, hint.as_deref(), machine_output);

    std::process::exit(exit_code);
}

/// エラーチェーンから適切な終了コードを決定
fn determine_exit_code(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if let Some(failure) = cause.downcast_ref::<UploadFailure>() {
            return failure.severity().exit_code();
        }

        if let Some(domain_err) = cause.downcast_ref::<DomainError>() {
            return domain_err.severity().exit_code();
        }

        if let Some(infra_err) = cause.downcast_ref::<InfraError>() {
            return infra_err.severity().exit_code();
        }

        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_err.severity().exit_code();
        }
    }

    // 引数エラーなど分類のないエラーはユーザーエラー扱い
    1
}

/// エラーに対するユーザー向けヒントを取得
fn get_error_hint(error: &anyhow::Error) -> Option<String> {
    for cause in error.chain() {
        if let Some(failure) = cause.downcast_ref::<UploadFailure>() {
            return failure.hint().map(str::to_string);
        }

        if let Some(domain_err) = cause.downcast_ref::<DomainError>() {
            return domain_err.hint().map(str::to_string);
        }

        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_err.hint().map(str::to_string);
        }
    }

    None
}
