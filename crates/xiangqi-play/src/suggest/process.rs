//! 外部プロセスによる着手提案
//!
//! 子プロセスの標準入出力で、1行1オブジェクトの JSON をやりとりする。
//!
//! ```text
//! -> {"id":1,"fen":"...","difficulty":"medium","legal_moves":["b2e2",...],"side":"red"}
//! <- {"id":1,"move":"b2e2"}
//! <- {"id":1,"move":null,"error":"..."}
//! ```
//!
//! 応答の `id` は省略できる。タイムアウトで読み捨てられた古い応答は `id` の
//! 不一致で読み飛ばす。`id` のない応答は要求1件に1行ずつ順に返るものとみなし、
//! 中断された要求が残っている間は古い順にその応答として読み捨てる。
//!
//! 要求行の書き込みが途中で中断されても、残りは次の要求の前に送り切る。

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use xiangqi_core::Move;

use super::{MoveSuggester, SuggestionRequest};
use crate::error::SuggestError;

/// 終了要求後にプロセスの終了を待つ時間
pub const PROCESS_QUIT_TIMEOUT: Duration = Duration::from_millis(300);

/// 提案プロセス起動時の設定
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub path: PathBuf,
    pub args: Vec<String>,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    id: u64,
    #[serde(flatten)]
    request: &'a SuggestionRequest,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    id: Option<u64>,
    #[serde(rename = "move", default)]
    mv: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl WireResponse {
    fn into_suggestion(self) -> Result<Option<Move>, SuggestError> {
        match (self.mv, self.error) {
            (Some(text), _) => Move::from_iccs(&text)
                .map(Some)
                .ok_or_else(|| SuggestError::Protocol(format!("invalid move '{text}'"))),
            (None, Some(error)) => Err(SuggestError::Service(error)),
            (None, None) => Ok(None),
        }
    }
}

struct Channel {
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
    next_id: u64,
    /// 送信しきれていない要求行の残り
    pending: Vec<u8>,
    /// 送信済みで応答をまだ読んでいない要求の数
    unanswered: u64,
}

impl Channel {
    /// `pending` を書き切る。
    ///
    /// `write` が返るたびに送信済みの分を取り除くので、この future が途中で
    /// 破棄されても次の呼び出しは続きから送る。
    async fn flush_pending(&mut self) -> Result<(), SuggestError> {
        while !self.pending.is_empty() {
            let written = self.stdin.write(&self.pending).await?;
            if written == 0 {
                return Err(SuggestError::Closed);
            }
            self.pending.drain(..written);
        }
        self.stdin.flush().await?;
        Ok(())
    }

    /// 応答1行を読んだことを記録する
    fn mark_answered(&mut self) {
        self.unanswered = self.unanswered.saturating_sub(1);
    }
}

/// 1本の提案プロセスに対する入出力をカプセル化する。
pub struct ProcessSuggester {
    child: Child,
    channel: Mutex<Channel>,
    label: String,
}

impl ProcessSuggester {
    pub fn spawn(cfg: &ProcessConfig, label: String) -> Result<Self, SuggestError> {
        let mut child = Command::new(&cfg.path)
            .args(&cfg.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SuggestError::Protocol("no stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SuggestError::Protocol("no stdout".to_string()))?;
        info!("{label}: spawned {}", cfg.path.display());

        Ok(Self {
            child,
            channel: Mutex::new(Channel {
                stdin,
                lines: BufReader::new(stdout).lines(),
                next_id: 0,
                pending: Vec::new(),
                unanswered: 0,
            }),
            label,
        })
    }

    /// 標準入力を閉じて終了を待つ。待ちきれなければ kill する。
    pub async fn shutdown(self) {
        let Self {
            mut child,
            channel,
            label,
        } = self;
        drop(channel);
        match tokio::time::timeout(PROCESS_QUIT_TIMEOUT, child.wait()).await {
            Ok(Ok(status)) => debug!("{label}: exited with {status}"),
            Ok(Err(e)) => warn!("{label}: wait failed: {e}"),
            Err(_) => {
                if let Err(e) = child.kill().await {
                    warn!("{label}: kill failed: {e}");
                }
            }
        }
    }
}

#[async_trait]
impl MoveSuggester for ProcessSuggester {
    fn label(&self) -> &str {
        &self.label
    }

    async fn suggest(&self, request: &SuggestionRequest) -> Result<Option<Move>, SuggestError> {
        let mut channel = self.channel.lock().await;
        // 前回の要求行が途中で中断されていれば先に送り切る
        channel.flush_pending().await?;

        channel.next_id += 1;
        let id = channel.next_id;
        let mut line = serde_json::to_string(&WireRequest { id, request })
            .map_err(|e| SuggestError::Protocol(e.to_string()))?;
        debug!("{} <- {line}", self.label);
        line.push('\n');
        channel.pending = line.into_bytes();
        channel.unanswered += 1;
        channel.flush_pending().await?;

        loop {
            let Some(reply) = channel.lines.next_line().await? else {
                return Err(SuggestError::Closed);
            };
            debug!("{} -> {reply}", self.label);
            let reply = reply.trim();
            if reply.is_empty() {
                continue;
            }
            let response = match serde_json::from_str::<WireResponse>(reply) {
                Ok(response) => response,
                Err(e) => {
                    channel.mark_answered();
                    return Err(SuggestError::Protocol(format!("{e}: {reply}")));
                }
            };
            let stale = match response.id {
                Some(rid) => rid != id,
                // この要求より前に中断された要求の応答が残っている
                None => channel.unanswered > 1,
            };
            channel.mark_answered();
            if stale {
                debug!("{}: skipping stale response", self.label);
                continue;
            }
            channel.unanswered = 0;
            return response.into_suggestion();
        }
    }
}
