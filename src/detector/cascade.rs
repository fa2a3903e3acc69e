// 该文件是 Koutu （抠图） 项目的一部分。
// src/detector/cascade.rs - OpenCV 级联检测器
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
use std::sync::Mutex;

use image::GrayImage;
use opencv::core::{Mat, Rect, Size, Vector};
use opencv::objdetect::{self, CascadeClassifier};
use opencv::prelude::*;
use thiserror::Error;
use tracing::debug;

use super::{DetectError, DetectionBox, ObjectDetector, ScanParams};

#[derive(Error, Debug)]
pub enum CascadeLoadError {
  #[error("检测器模型文件不存在: {0}")]
  Missing(String),
  #[error("无法加载检测器模型 {0}: {1}")]
  Load(String, opencv::Error),
  #[error("检测器模型为空或无法解析: {0}")]
  Invalid(String),
}

/// 级联分类器封装。模型加载一次后只读使用；
/// detect_multi_scale 需要可变引用，故用互斥锁包住。
pub struct CascadeDetector {
  inner: Mutex<CascadeClassifier>,
}

impl CascadeDetector {
  /// 从模型文件加载级联检测器，加载失败或模型为空视为致命错误
  pub fn load(path: &Path) -> Result<Self, CascadeLoadError> {
    let text = path.to_string_lossy().into_owned();

    if !path.is_file() {
      return Err(CascadeLoadError::Missing(text));
    }

    let classifier =
      CascadeClassifier::new(&text).map_err(|err| CascadeLoadError::Load(text.clone(), err))?;
    if classifier.empty().unwrap_or(true) {
      return Err(CascadeLoadError::Invalid(text));
    }

    debug!("[{}]: 检测器模型加载完成", text);
    Ok(Self {
      inner: Mutex::new(classifier),
    })
  }
}

impl ObjectDetector for CascadeDetector {
  fn scan(&self, gray: &GrayImage, params: &ScanParams) -> Result<Vec<DetectionBox>, DetectError> {
    let mat = Mat::new_rows_cols_with_data(
      gray.height() as i32,
      gray.width() as i32,
      gray.as_raw().as_slice(),
    )
    .map_err(|err| DetectError::Backend(err.to_string()))?;

    let flags = if params.scale_image {
      objdetect::CASCADE_SCALE_IMAGE
    } else {
      0
    };
    let min_size = params.min_size as i32;

    let mut regions = Vector::<Rect>::new();
    let mut classifier = self
      .inner
      .lock()
      .map_err(|_| DetectError::Backend("级联分类器锁已失效".to_string()))?;
    classifier
      .detect_multi_scale(
        &mat,
        &mut regions,
        params.scale_factor,
        params.min_neighbors,
        flags,
        Size::new(min_size, min_size),
        Size::new(0, 0),
      )
      .map_err(|err| DetectError::Backend(err.to_string()))?;

    Ok(
      regions
        .iter()
        .map(|rect| DetectionBox {
          x: rect.x as u32,
          y: rect.y as u32,
          width: rect.width as u32,
          height: rect.height as u32,
        })
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_load_missing_model_fails() {
    let err = CascadeDetector::load(Path::new("/no/such/cascade.xml")).unwrap_err();
    assert!(matches!(err, CascadeLoadError::Missing(_)));
  }
}
