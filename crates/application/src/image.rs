//! 图片负载解码。
//!
//! 入站图片是一个 base64 信封，可能带 `data:<media-type>;base64,` 前缀。
//! 前缀按枚举结构化匹配（只认三种受支持的类型），解码后的字节再按
//! 魔数嗅探确认真实格式，两道检查都不做字符串替换。

use data_encoding::BASE64;
use domain::DomainError;

const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const GIF87_MAGIC: &[u8] = b"GIF87a";
const GIF89_MAGIC: &[u8] = b"GIF89a";

/// 受支持的图片媒体类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    pub const fn media_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }

    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    pub fn from_media_type(value: &str) -> Option<Self> {
        match value {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// 按文件头魔数识别格式。
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_MAGIC) {
            Some(Self::Png)
        } else if bytes.starts_with(JPEG_MAGIC) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(GIF87_MAGIC) || bytes.starts_with(GIF89_MAGIC) {
            Some(Self::Gif)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

/// 解码图片信封。返回的格式以字节嗅探结果为准。
pub fn decode_image_payload(payload: &str) -> Result<DecodedImage, DomainError> {
    let encoded = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (media_type, encoded) = rest
                .split_once(";base64,")
                .ok_or_else(|| DomainError::invalid_argument("image", "malformed data URI"))?;
            if ImageFormat::from_media_type(media_type).is_none() {
                return Err(DomainError::UnsupportedImageType);
            }
            encoded
        }
        None => payload,
    };

    let bytes = BASE64
        .decode(encoded.as_bytes())
        .map_err(|_| DomainError::invalid_argument("image", "payload is not valid base64"))?;

    let format = ImageFormat::detect(&bytes).ok_or(DomainError::UnsupportedImageType)?;

    Ok(DecodedImage { format, bytes })
}
