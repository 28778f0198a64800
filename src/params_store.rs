//! レポート条件の保存
//!
//! レポートで使ったフィルタ条件をディスクに保存し、
//! `report --use-saved` で再読み込みする。

use crate::config::Config;
use crate::error::Result;
use monitor_panel_common::FilterParams;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PARAMS_FILE_NAME: &str = "report-params.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredParams {
    version: u32,
    #[serde(rename = "reportParams")]
    report_params: FilterParams,
}

impl StoredParams {
    const CURRENT_VERSION: u32 = 1;
}

pub struct ParamsStore {
    path: PathBuf,
}

impl ParamsStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(PARAMS_FILE_NAME),
        }
    }

    /// 設定ファイルと同じディレクトリに保存
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(&Config::config_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 保存済みの条件を読み込み
    ///
    /// ファイルがない・読めない・バージョン不一致の場合は `None`。
    pub fn load(&self) -> Option<FilterParams> {
        if !self.path.exists() {
            return None;
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot open saved params");
                return None;
            }
        };

        match serde_json::from_reader::<_, StoredParams>(BufReader::new(file)) {
            Ok(stored) if stored.version == StoredParams::CURRENT_VERSION => Some(stored.report_params),
            Ok(stored) => {
                warn!(version = stored.version, "saved params version mismatch, ignoring");
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "saved params are corrupt, ignoring");
                None
            }
        }
    }

    pub fn save(&self, params: &FilterParams) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let stored = StoredParams {
            version: StoredParams::CURRENT_VERSION,
            report_params: params.clone(),
        };
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(writer, &stored)?;
        debug!(path = %self.path.display(), filters = params.filters().len(), "report params saved");
        Ok(())
    }

    /// 保存済み条件を削除（保存がなければ `false`）
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)?;
        Ok(true)
    }
}
