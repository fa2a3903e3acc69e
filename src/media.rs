// 该文件是 Koutu （抠图） 项目的一部分。
// src/media.rs - 媒体类型识别
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::Path;

/// 支持的图片扩展名（区分大小写，逐字匹配）
pub const IMAGE_EXTENSIONS: [&str; 14] = [
  "bmp", "dib", "jpeg", "jpg", "jpe", "jp2", "png", "pbm", "pgm", "ppm", "sr", "ras", "tiff",
  "tif",
];

/// 支持的视频扩展名
pub const VIDEO_EXTENSIONS: [&str; 2] = ["avi", "mp4"];

/// 媒体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
  /// 图片文件
  Image,
  /// 视频文件
  Video,
  /// 不支持的文件
  Unsupported,
}

/// 根据路径中最后一个 '.' 之后的扩展名判断媒体类型。
/// 不读取文件内容；没有扩展名的路径视为不支持。
pub fn classify(path: &Path) -> MediaKind {
  let text = path.to_string_lossy();
  let Some(dot) = text.rfind('.') else {
    return MediaKind::Unsupported;
  };

  let extension = &text[dot + 1..];
  if IMAGE_EXTENSIONS.contains(&extension) {
    return MediaKind::Image;
  }
  if VIDEO_EXTENSIONS.contains(&extension) {
    return MediaKind::Video;
  }

  MediaKind::Unsupported
}

/// 取输入文件的基础名（去掉目录与扩展名），用于拼接输出文件名
pub fn base_name(path: &Path) -> String {
  path
    .file_stem()
    .map(|stem| stem.to_string_lossy().into_owned())
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_classify_image_extensions() {
    for extension in IMAGE_EXTENSIONS {
      let path = format!("photo.{}", extension);
      assert_eq!(classify(Path::new(&path)), MediaKind::Image, "{}", path);
    }
  }

  #[test]
  fn test_classify_video_extensions() {
    assert_eq!(classify(Path::new("clip.avi")), MediaKind::Video);
    assert_eq!(classify(Path::new("clip.mp4")), MediaKind::Video);
  }

  #[test]
  fn test_classify_unknown_extension() {
    assert_eq!(classify(Path::new("notes.txt")), MediaKind::Unsupported);
  }

  #[test]
  fn test_classify_missing_extension() {
    assert_eq!(classify(Path::new("Makefile")), MediaKind::Unsupported);
  }

  #[test]
  fn test_classify_is_case_sensitive() {
    assert_eq!(classify(Path::new("photo.JPG")), MediaKind::Unsupported);
    assert_eq!(classify(Path::new("clip.AVI")), MediaKind::Unsupported);
  }

  #[test]
  fn test_classify_uses_last_dot() {
    assert_eq!(classify(Path::new("archive.tar.mp4")), MediaKind::Video);
    assert_eq!(classify(Path::new("photo.jpg.bak")), MediaKind::Unsupported);
  }

  #[test]
  fn test_base_name_strips_directory_and_extension() {
    assert_eq!(base_name(Path::new("/data/in/face.jpg")), "face");
    assert_eq!(base_name(Path::new("clip.avi")), "clip");
  }
}
