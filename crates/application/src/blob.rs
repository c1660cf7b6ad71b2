use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob write failed: {0}")]
    WriteFailed(String),
}

impl BlobError {
    pub fn write_failed(message: impl Into<String>) -> Self {
        Self::WriteFailed(message.into())
    }
}

/// 解码后的图片字节按生成的文件名落盘，之后由静态文件路由对外提供。
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<(), BlobError>;
}
