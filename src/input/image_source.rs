// 该文件是 Koutu （抠图） 项目的一部分。
// src/input/image_source.rs - 图片输入源
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

use anyhow::{Context, Result};
use image::ImageReader;

use super::Frame;

/// 图片输入源：打开时完整解码，只产出一帧，帧索引恒为 0
pub struct ImageSource {
  frame: Option<Frame>,
}

impl ImageSource {
  pub fn open(path: &Path) -> Result<Self> {
    let image = ImageReader::open(path)
      .with_context(|| format!("无法打开图片文件: {}", path.display()))?
      .decode()
      .with_context(|| format!("无法解码图片文件: {}", path.display()))?
      .to_rgb8();

    Ok(Self {
      frame: Some(Frame { image, index: 0 }),
    })
  }
}

impl Iterator for ImageSource {
  type Item = Result<Frame>;

  fn next(&mut self) -> Option<Self::Item> {
    self.frame.take().map(Ok)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_open_missing_file_fails() {
    assert!(ImageSource::open(Path::new("/no/such/photo.png")).is_err());
  }

  #[test]
  fn test_single_frame_with_index_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dot.png");
    image::RgbImage::from_pixel(8, 8, image::Rgb([255, 0, 0]))
      .save(&path)
      .unwrap();

    let mut source = ImageSource::open(&path).unwrap();
    let frame = source.next().unwrap().unwrap();
    assert_eq!(frame.index, 0);
    assert_eq!(frame.image.dimensions(), (8, 8));
    assert!(source.next().is_none());
  }
}
