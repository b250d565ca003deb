// コマンドハンドラー層
// 各CLIコマンドの実装

pub mod apply;
pub mod generate;
pub mod init;
pub mod rollback;
pub mod status;

/// 標準出力へ1行ずつ書き出すログシンク
pub fn stdout_logger() -> impl Fn(&str) + Send + Sync + 'static {
    |line: &str| println!("{}", line)
}
