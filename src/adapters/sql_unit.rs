// SQLファイル形式のマイグレーションユニット
//
// `<name>/up.sql` と `<name>/down.sql` の内容を文単位に分割し、
// 受け取ったトランザクション上で順番に実行します。

use crate::core::error::BoxError;
use crate::services::traits::MigrationUnit;
use async_trait::async_trait;
use sqlx::AnyConnection;

/// SQLスクリプトで定義されたマイグレーションユニット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlMigrationUnit {
    /// マイグレーション名
    pub name: String,
    /// アップグレードSQL
    pub up_sql: String,
    /// ダウングレードSQL
    pub down_sql: String,
}

impl SqlMigrationUnit {
    /// 新しいSqlMigrationUnitを作成
    pub fn new(name: impl Into<String>, up_sql: impl Into<String>, down_sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            up_sql: up_sql.into(),
            down_sql: down_sql.into(),
        }
    }

    async fn execute_script(&self, conn: &mut AnyConnection, script: &str) -> Result<(), BoxError> {
        for statement in split_sql_statements(script) {
            sqlx::query(&statement)
                .execute(&mut *conn)
                .await
                .map_err(|e| format!("{}\nSQL: {}", e, statement))?;
        }
        Ok(())
    }
}

#[async_trait]
impl MigrationUnit for SqlMigrationUnit {
    async fn up(&self, conn: &mut AnyConnection) -> Result<(), BoxError> {
        self.execute_script(conn, &self.up_sql).await
    }

    async fn down(&self, conn: &mut AnyConnection) -> Result<(), BoxError> {
        self.execute_script(conn, &self.down_sql).await
    }
}

/// SQLスクリプトを文単位に分割
///
/// - `;` で区切る（引用符・ドル引用符の中の `;` は無視）
/// - `--` から行末まで、および `/* ... */`（ネスト可）はコメントとして除去
/// - 空の文は返さない
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = sql.char_indices().peekable();
    let mut quote: Option<char> = None;
    let mut dollar_tag: Option<String> = None;
    let mut comment_depth: usize = 0;

    while let Some((i, c)) = chars.next() {
        if comment_depth > 0 {
            if c == '/' && matches!(chars.peek(), Some((_, '*'))) {
                chars.next();
                comment_depth += 1;
            } else if c == '*' && matches!(chars.peek(), Some((_, '/'))) {
                chars.next();
                comment_depth -= 1;
                if comment_depth == 0 {
                    current.push(' ');
                }
            }
            continue;
        }

        if let Some(tag) = dollar_tag.as_deref() {
            if c == '$' && sql[i..].starts_with(tag) {
                current.push_str(tag);
                for _ in 1..tag.chars().count() {
                    chars.next();
                }
                dollar_tag = None;
            } else {
                current.push(c);
            }
            continue;
        }

        if let Some(q) = quote {
            current.push(c);
            if c == q {
                // 連続した引用符はエスケープ
                if matches!(chars.peek(), Some((_, next)) if *next == q) {
                    if let Some((_, next)) = chars.next() {
                        current.push(next);
                    }
                } else {
                    quote = None;
                }
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                current.push(c);
            }
            '-' if matches!(chars.peek(), Some((_, '-'))) => {
                for (_, skipped) in chars.by_ref() {
                    if skipped == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                comment_depth = 1;
            }
            '$' => match dollar_quote_tag(&sql[i..]) {
                Some(tag) => {
                    current.push_str(tag);
                    for _ in 1..tag.chars().count() {
                        chars.next();
                    }
                    dollar_tag = Some(tag.to_string());
                }
                None => current.push(c),
            },
            ';' => {
                push_statement(&mut statements, &current);
                current.clear();
            }
            _ => current.push(c),
        }
    }

    push_statement(&mut statements, &current);
    statements
}

/// `$tag$` 形式のドル引用符の開始タグを検出
fn dollar_quote_tag(rest: &str) -> Option<&str> {
    let end = rest[1..].find('$')?;
    let tag = &rest[..end + 2];
    let inner = &tag[1..tag.len() - 1];
    inner
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        .then_some(tag)
}

fn push_statement(statements: &mut Vec<String>, current: &str) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}
