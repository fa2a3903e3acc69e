// 该文件是 Koutu （抠图） 项目的一部分。
// src/extract.rs - 检测区域裁剪与落盘
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

use std::path::{Path, PathBuf};

use image::{RgbImage, imageops};
use thiserror::Error;

use crate::detector::DetectionBox;

/// 输出约定：目录、前缀与扩展名，整次运行内固定。
/// 相同输入与相同约定两次运行必须得到相同的输出路径。
#[derive(Debug, Clone)]
pub struct OutputSpec {
  pub directory: PathBuf,
  pub prefix: String,
  pub extension: String,
}

impl OutputSpec {
  pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>, extension: impl Into<String>) -> Self {
    Self {
      directory: directory.into(),
      prefix: prefix.into(),
      extension: extension.into(),
    }
  }

  /// 单个裁剪的输出路径：
  /// 目录 / [前缀_]基础名_帧号_框号扩展名
  pub fn crop_path(&self, base_name: &str, frame_index: u64, box_index: usize) -> PathBuf {
    let mut name = String::new();
    if !self.prefix.is_empty() {
      name.push_str(&self.prefix);
      name.push('_');
    }
    name.push_str(base_name);
    name.push_str(&format!("_{}_{}{}", frame_index, box_index, self.extension));

    self.directory.join(name)
  }
}

#[derive(Error, Debug)]
pub enum ExtractError {
  #[error("无法写出裁剪图像 {}: {source}", .path.display())]
  Write {
    path: PathBuf,
    source: image::ImageError,
  },
}

/// 按检测器返回的顺序裁剪每个检测框并独立写盘。
/// 单个写入失败不会中止其余检测框；逐框返回结果，本调用自身不报错。
pub fn extract_regions(
  frame: &RgbImage,
  boxes: &[DetectionBox],
  spec: &OutputSpec,
  base_name: &str,
  frame_index: u64,
) -> Vec<Result<PathBuf, ExtractError>> {
  boxes
    .iter()
    .enumerate()
    .map(|(box_index, region)| {
      let crop = imageops::crop_imm(frame, region.x, region.y, region.width, region.height).to_image();
      let path = spec.crop_path(base_name, frame_index, box_index);
      match crop.save(&path) {
        Ok(()) => Ok(path),
        Err(source) => Err(ExtractError::Write { path, source }),
      }
    })
    .collect()
}

/// 输出目录存在性检查，运行开始前调用一次
pub fn output_directory_exists(spec: &OutputSpec) -> bool {
  Path::new(&spec.directory).is_dir()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn test_frame() -> RgbImage {
    RgbImage::from_fn(100, 100, |x, y| image::Rgb([x as u8, y as u8, 0]))
  }

  fn box_at(x: u32, y: u32, side: u32) -> DetectionBox {
    DetectionBox {
      x,
      y,
      width: side,
      height: side,
    }
  }

  #[test]
  fn test_crop_path_without_prefix() {
    let spec = OutputSpec::new("/out", "", ".jpg");
    assert_eq!(
      spec.crop_path("face", 0, 1),
      PathBuf::from("/out/face_0_1.jpg")
    );
  }

  #[test]
  fn test_crop_path_with_prefix() {
    let spec = OutputSpec::new("/out", "run7", ".png");
    assert_eq!(
      spec.crop_path("clip", 12, 0),
      PathBuf::from("/out/run7_clip_12_0.png")
    );
  }

  #[test]
  fn test_crop_path_never_collides_within_frame() {
    let spec = OutputSpec::new("/out", "", ".jpg");
    assert_ne!(spec.crop_path("face", 0, 0), spec.crop_path("face", 0, 1));
    assert_ne!(spec.crop_path("face", 0, 1), spec.crop_path("face", 1, 0));
  }

  #[test]
  fn test_extract_writes_one_file_per_box() {
    let dir = tempfile::tempdir().unwrap();
    let spec = OutputSpec::new(dir.path(), "", ".jpg");
    let boxes = [box_at(10, 10, 20), box_at(40, 40, 30)];

    let results = extract_regions(&test_frame(), &boxes, &spec, "face", 0);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|result| result.is_ok()));

    let first = dir.path().join("face_0_0.jpg");
    let second = dir.path().join("face_0_1.jpg");
    assert!(first.is_file());
    assert!(second.is_file());

    let crop = image::open(&second).unwrap();
    assert_eq!(crop.width(), 30);
    assert_eq!(crop.height(), 30);
  }

  #[test]
  fn test_extract_write_failure_does_not_abort_remaining() {
    let dir = tempfile::tempdir().unwrap();
    // 未知扩展名导致每个框都写入失败，但每个框都必须被尝试
    let spec = OutputSpec::new(dir.path(), "", ".nope");
    let boxes = [box_at(0, 0, 10), box_at(10, 10, 10), box_at(20, 20, 10)];

    let results = extract_regions(&test_frame(), &boxes, &spec, "face", 0);
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|result| result.is_err()));
  }

  #[test]
  fn test_extract_uses_frame_index_in_names() {
    let dir = tempfile::tempdir().unwrap();
    let spec = OutputSpec::new(dir.path(), "", ".png");

    let results = extract_regions(&test_frame(), &[box_at(5, 5, 10)], &spec, "clip", 7);
    assert_eq!(results.len(), 1);
    assert_eq!(
      results[0].as_ref().unwrap(),
      &dir.path().join("clip_7_0.png")
    );
  }
}
