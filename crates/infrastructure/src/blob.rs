//! 文件系统图片存储。
//!
//! 文件名由应用层生成（uuid + 扩展名），这里只负责落盘；
//! 对外访问走 web 层的静态文件路由。

use std::path::PathBuf;

use application::blob::{BlobError, BlobStore};
use async_trait::async_trait;

pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// 确保根目录存在后返回存储实例。
    pub async fn create(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|err| BlobError::write_failed(err.to_string()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<(), BlobError> {
        let path = self.root.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| BlobError::write_failed(err.to_string()))
    }
}
