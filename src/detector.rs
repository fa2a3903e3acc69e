// 该文件是 Koutu （抠图） 项目的一部分。
// src/detector.rs - 目标检测
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

#[cfg(feature = "cascade_opencv")]
mod cascade;

#[cfg(feature = "cascade_opencv")]
pub use cascade::{CascadeDetector, CascadeLoadError};

use image::{GrayImage, RgbImage, imageops};
use imageproc::contrast::equalize_histogram_mut;
use thiserror::Error;

/// 检测框：源帧像素坐标下的轴对齐矩形（左上角 + 宽高）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionBox {
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
}

/// 多尺度扫描参数，整次运行内固定不变
#[derive(Debug, Clone, Copy)]
pub struct ScanParams {
  /// 尺度步长
  pub scale_factor: f64,
  /// 最小邻居一致数
  pub min_neighbors: i32,
  /// 最小可检测区域边长（像素）
  pub min_size: u32,
  /// 缩放图像而非缩放检测窗口
  pub scale_image: bool,
}

impl Default for ScanParams {
  fn default() -> Self {
    Self {
      scale_factor: 1.1,
      min_neighbors: 3,
      min_size: 50,
      scale_image: true,
    }
  }
}

#[derive(Error, Debug)]
pub enum DetectError {
  #[error("检测器执行失败: {0}")]
  Backend(String),
}

/// 检测能力：输入灰度帧，输出候选矩形。
/// 实现方加载预训练模型并保证结果落在帧边界之内；
/// 同一帧与同一参数的重复调用必须返回相同顺序的相同结果。
pub trait ObjectDetector {
  fn scan(&self, gray: &GrayImage, params: &ScanParams) -> Result<Vec<DetectionBox>, DetectError>;
}

/// 对一帧执行检测：灰度化并做直方图均衡后交给检测器扫描。
/// 没有命中时返回空列表而非错误；输入帧不会被修改。
pub fn detect_regions(
  detector: &dyn ObjectDetector,
  frame: &RgbImage,
) -> Result<Vec<DetectionBox>, DetectError> {
  let mut gray = imageops::grayscale(frame);
  equalize_histogram_mut(&mut gray);

  detector.scan(&gray, &ScanParams::default())
}
