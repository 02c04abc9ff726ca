/// プレゼンテーション層: コマンド結果の出力
///
/// コマンド実行結果をユーザー向け（人間可読）または
/// 機械向け（JSON）形式で出力する責務を担います。
/// 人間向けモードでは状況説明を stderr、結果JSONを stdout に分けて出力し、
/// パイプで結果だけを受け取れるようにします。
use crate::commands::result::CommandResult;
use crate::config::{APP_CONFIG, BYTES_PER_MB, DisplayMode};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value, json};

/// ヘルプテキストを組み立てる
///
/// 推奨形式・サイズは埋め込み設定（`APP_CONFIG.upload`）から生成する。
pub fn help_text() -> String {
    let upload = &APP_CONFIG.upload;
    let formats = upload
        .advisory_formats
        .iter()
        .map(|f| f.to_uppercase())
        .collect::<Vec<_>>()
        .join(", ");
    let max_mb = upload.advisory_max_file_size / BYTES_PER_MB;

    format!(
        "filejson
Upload a PDF or image and get structured JSON data

Usage:
  filejson [--machine] <command> [args...]

Global Flags:
  --machine        - Output machine-readable JSON to stdout (for scripting)
                     Works for both success and error cases

Available commands:
  upload <file> [--progress]
                   - Upload a file and print the extracted JSON
                     --progress: Show upload progress
                     Supported: {formats} (max {max_mb}MB, advisory)
  config           - Show the effective configuration
  help             - Display this help message

Output:
  Normal mode:   Extracted JSON on stdout, status and errors on stderr
  --machine:     One JSON object on stdout (plus progress lines with --progress)"
    )
}

/// コマンド使用方法を表示する
pub fn print_usage() {
    eprintln!("{}", help_text());
}

/// 表示方法に従って結果JSONを選ぶ
///
/// `Data` は `{ "data": <payload.data> }` に包み直す（`data` 以外のフィールドは落ちる）。
pub fn select_payload(payload: &Value, mode: DisplayMode) -> Value {
    match mode {
        DisplayMode::Raw => payload.clone(),
        DisplayMode::Data => json!({ "data": payload.get("data").cloned().unwrap_or(Value::Null) }),
    }
}

/// 指定インデント幅で整形したJSON文字列を返す
pub fn format_json(value: &Value, indent: usize) -> Result<String> {
    let indent = vec![b' '; indent];
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
    value
        .serialize(&mut serializer)
        .context("Failed to format JSON result")?;
    String::from_utf8(buf).context("Formatted JSON is not valid UTF-8")
}

/// コマンド結果を適切な形式で出力する
///
/// # Output
/// * `machine_output = false`: 人間向けの詳細メッセージ（stderr）と結果JSON（stdout）
/// * `machine_output = true`: 機械可読JSON（stdout）
pub fn output_result(result: &CommandResult, machine_output: bool) -> Result<()> {
    if machine_output {
        output_machine_readable(result)
    } else {
        output_human_readable(result)
    }
}

fn output_human_readable(result: &CommandResult) -> Result<()> {
    match result {
        CommandResult::Upload(r) => {
            eprintln!("{}", result.success_message());
            eprintln!("---");
            eprintln!("Extracted JSON:");
            println!("{}", format_json(&r.result, r.json_indent)?);
        }
        CommandResult::Config(r) => {
            eprintln!("{}:", result.success_message());
            eprintln!("  Endpoint:          {}", r.endpoint);
            eprintln!("  Connect Timeout:   {}s", r.connect_timeout_seconds);
            eprintln!("  Chunk Size:        {} bytes", r.chunk_size);
            eprintln!(
                "  Advisory Max Size: {} bytes ({} MB)",
                r.advisory_max_file_size,
                r.advisory_max_file_size / crate::config::BYTES_PER_MB
            );
            eprintln!("  Advisory Formats:  {}", r.advisory_formats.join(", "));
            eprintln!();
            eprintln!("User configuration ({}):", r.user_config_path);
            eprintln!("  display_mode:      {:?}", r.display_mode);
            eprintln!("  show_progress:     {}", r.show_progress);
            eprintln!("  json_indent:       {}", r.json_indent);
        }
        CommandResult::Help => print_usage(),
    }
    Ok(())
}

fn output_machine_readable(result: &CommandResult) -> Result<()> {
    let mut value = serde_json::to_value(result).context("Failed to serialize command result")?;
    if let Value::Object(map) = &mut value {
        map.insert("success".to_string(), Value::Bool(true));
    }
    println!("{}", value);
    Ok(())
}

/// エラーを出力する
///
/// 人間向けモードではエラーチェーンとヒントを stderr に、
/// 機械向けモードでは JSON エラーオブジェクトを stdout に出力する。
pub fn output_error(error: &anyhow::Error, exit_code: i32, hint: Option<&str>, machine_output: bool) {
    if machine_output {
        let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
        println!(
            "{}",
            json!({
                "success": false,
                "error": error.to_string(),
                "causes": causes,
                "exit_code": exit_code,
                "hint": hint,
            })
        );
        return;
    }

    eprintln!("Error: {}", error);

    let chain: Vec<_> = error.chain().skip(1).collect();
    if !chain.is_empty() {
        eprintln!("\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            eprintln!("  {}: {}", i + 1, cause);
        }
    }

    if let Some(hint) = hint {
        eprintln!("\nHint: {}", hint);
    }
}
