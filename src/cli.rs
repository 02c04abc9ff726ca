use crate::commands;
use crate::presentation::output::{output_result, print_usage};
use anyhow::{Context, Result, bail};

/// 機械可読出力フラグ
const MACHINE_FLAG: &str = "--machine";

/// 進捗表示フラグ（upload 用）
const PROGRESS_FLAG: &str = "--progress";

/// 引数に機械可読出力フラグが含まれているか
pub fn is_machine_output(args: &[String]) -> bool {
    args.iter().skip(1).any(|arg| arg == MACHINE_FLAG)
}

/// CLI引数を解析し、適切なコマンドにディスパッチする
pub async fn parse_args(args: &[String]) -> Result<()> {
    let machine_output = is_machine_output(args);
    let rest: Vec<&str> = args
        .iter()
        .skip(1)
        .map(String::as_str)
        .filter(|arg| *arg != MACHINE_FLAG)
        .collect();

    let Some((command, command_args)) = rest.split_first() else {
        print_usage();
        return Ok(());
    };

    let result = match *command {
        "upload" => {
            let (file_path, show_progress) = parse_upload_args(command_args)?;
            commands::upload::execute(file_path, show_progress, machine_output)
                .await
                .context("Upload command failed")?
        }
        "config" => commands::config::execute()
            .await
            .context("Config command failed")?,
        "help" | "--help" | "-h" => commands::help::execute().await?,
        _ => bail!(
            "Unknown command: '{}'. Use 'help' to see available commands.",
            command
        ),
    };

    output_result(&result, machine_output)
}

/// upload コマンドの引数を解析する
///
/// ファイルパスはちょうど1つ（複数ファイルは受け付けない）。
fn parse_upload_args<'a>(args: &[&'a str]) -> Result<(&'a str, bool)> {
    let mut file_path = None;
    let mut show_progress = false;

    for arg in args {
        match *arg {
            PROGRESS_FLAG => show_progress = true,
            flag if flag.starts_with("--") => {
                bail!("Unknown option for upload: '{}'", flag)
            }
            path => {
                if file_path.is_some() {
                    bail!("Only one file can be uploaded at a time");
                }
                file_path = Some(path);
            }
        }
    }

    let file_path = file_path.context("Please specify a file path for upload command")?;
    Ok((file_path, show_progress))
}
