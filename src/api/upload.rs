//! メディアアップロードモジュール
//!
//! 1リクエスト1ファイルの `multipart/form-data`。ファイルはディスクから
//! チャンク単位でストリーム送信し、HTTPボディに渡したチャンクごとに
//! 進捗を通知する。

use super::ApiClient;
use crate::error::{MonitorError, Result};
use crate::scanner::MediaFile;
use futures::stream::{self, Stream};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::debug;

/// ファイルを載せるマルチパートのフィールド名
pub const UPLOAD_FIELD: &str = "file";

const CHUNK_SIZE: usize = 64 * 1024;

/// 1ファイルをアップロードし、`on_progress(送信済みバイト, 総バイト)` を呼ぶ
#[allow(async_fn_in_trait)]
pub trait MediaUploader {
    async fn upload(&self, file: &MediaFile, on_progress: &mut dyn FnMut(u64, u64)) -> Result<()>;
}

pub struct HttpUploader {
    client: ApiClient,
    path: String,
    max_bytes: u64,
}

impl HttpUploader {
    pub fn new(client: ApiClient, path: impl Into<String>, max_bytes: u64) -> Self {
        Self {
            client,
            path: path.into(),
            max_bytes,
        }
    }

    pub fn url(&self) -> String {
        self.client.url(&self.path)
    }
}

impl MediaUploader for HttpUploader {
    async fn upload(&self, file: &MediaFile, on_progress: &mut dyn FnMut(u64, u64)) -> Result<()> {
        if file.size > self.max_bytes {
            return Err(MonitorError::FileTooLarge {
                file_name: file.file_name.clone(),
                size: file.size,
                limit: self.max_bytes,
            });
        }

        let handle = tokio::fs::File::open(&file.path).await?;
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();

        let part = Part::stream_with_length(
            Body::wrap_stream(chunk_stream(handle, progress_tx)),
            file.size,
        )
        .file_name(file.file_name.clone());
        let form = Form::new().part(UPLOAD_FIELD, part);

        let url = self.url();
        debug!(url = %url, file = %file.file_name, size = file.size, "uploading");

        let request = self.client.http().post(&url).multipart(form).send();
        tokio::pin!(request);

        let total = file.size;
        let response = loop {
            tokio::select! {
                response = &mut request => break response,
                Some(sent) = progress_rx.recv() => on_progress(sent, total),
            }
        };
        while let Ok(sent) = progress_rx.try_recv() {
            on_progress(sent, total);
        }

        response
            .and_then(|r| r.error_for_status())
            .map_err(|e| MonitorError::Upload {
                file_name: file.file_name.clone(),
                reason: e.to_string(),
            })?;

        Ok(())
    }
}

/// ファイル内容のバイトストリーム（チャンクごとに累計を通知）
fn chunk_stream(
    file: tokio::fs::File,
    progress: UnboundedSender<u64>,
) -> impl Stream<Item = std::io::Result<Vec<u8>>> + Send + 'static {
    stream::try_unfold((file, 0u64), move |(mut file, sent)| {
        let progress = progress.clone();
        async move {
            let mut buf = vec![0u8; CHUNK_SIZE];
            let read = file.read(&mut buf).await?;
            if read == 0 {
                return Ok::<_, std::io::Error>(None);
            }
            buf.truncate(read);
            let sent = sent + read as u64;
            // リクエスト完了後は受信側が破棄済み
            let _ = progress.send(sent);
            Ok(Some((buf, (file, sent))))
        }
    })
}
