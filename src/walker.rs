// 该文件是 Koutu （抠图） 项目的一部分。
// src/walker.rs - 逐文件检测提取流程
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

use anyhow::Result;
use tracing::{debug, error};

use crate::detector::{ObjectDetector, detect_regions};
use crate::extract::{OutputSpec, extract_regions};
use crate::input::{Frame, ImageSource};
#[cfg(feature = "video_ffmpeg")]
use crate::input::VideoSource;
use crate::media::{self, MediaKind};

/// 一次运行的统计汇总
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
  /// 完成处理的文件数
  pub files: usize,
  /// 被跳过的文件数（类型不支持或解码失败）
  pub skipped: usize,
  /// 读取的帧数
  pub frames: u64,
  /// 检测框总数
  pub detections: usize,
  /// 成功写出的裁剪数
  pub crops_written: usize,
  /// 写出失败的裁剪数
  pub write_failures: usize,
}

/// 逐文件驱动 分类 -> 解码 -> 检测 -> 提取 的单线程流程。
/// 检测器整次运行只读共享；单个文件的失败只记录不中断。
pub struct Walker<'a> {
  detector: &'a dyn ObjectDetector,
  output: OutputSpec,
  write_output: bool,
}

impl<'a> Walker<'a> {
  pub fn new(detector: &'a dyn ObjectDetector, output: OutputSpec, write_output: bool) -> Self {
    Self {
      detector,
      output,
      write_output,
    }
  }

  /// 按给定顺序处理所有输入文件后返回
  pub fn run(&self, files: &[PathBuf]) -> RunStats {
    let mut stats = RunStats::default();
    for path in files {
      self.process_file(path, &mut stats);
    }
    stats
  }

  pub fn process_file(&self, path: &Path, stats: &mut RunStats) {
    match media::classify(path) {
      MediaKind::Unsupported => {
        debug!("[{}]: 文件类型不支持，跳过", path.display());
        stats.skipped += 1;
      }
      MediaKind::Image => match ImageSource::open(path) {
        Ok(source) => {
          debug!("[{}]: 处理图片文件", path.display());
          stats.files += 1;
          self.process_frames(source, &media::base_name(path), stats);
        }
        Err(err) => {
          error!("[{}]: 无法加载图片文件: {:#}", path.display(), err);
          stats.skipped += 1;
        }
      },
      MediaKind::Video => self.process_video(path, stats),
    }
  }

  #[cfg(feature = "video_ffmpeg")]
  fn process_video(&self, path: &Path, stats: &mut RunStats) {
    match VideoSource::open(path) {
      Ok(source) => {
        debug!("[{}]: 处理视频文件", path.display());
        stats.files += 1;
        self.process_frames(source, &media::base_name(path), stats);
        debug!("[{}]: 视频文件处理完毕", path.display());
      }
      Err(err) => {
        error!("[{}]: 无法打开视频文件: {:#}", path.display(), err);
        stats.skipped += 1;
      }
    }
  }

  #[cfg(not(feature = "video_ffmpeg"))]
  fn process_video(&self, path: &Path, stats: &mut RunStats) {
    error!("[{}]: 未编译视频支持（video_ffmpeg），跳过", path.display());
    stats.skipped += 1;
  }

  /// 帧循环：读取失败或无更多数据即视为流结束，这是唯一的终止条件
  fn process_frames<I>(&self, frames: I, base_name: &str, stats: &mut RunStats)
  where
    I: IntoIterator<Item = Result<Frame>>,
  {
    for item in frames {
      let frame = match item {
        Ok(frame) => frame,
        Err(err) => {
          debug!("[{}]: 帧流结束: {:#}", base_name, err);
          break;
        }
      };
      stats.frames += 1;

      let boxes = match detect_regions(self.detector, &frame.image) {
        Ok(boxes) => boxes,
        Err(err) => {
          error!("[{}]: 第 {} 帧检测失败: {}", base_name, frame.index, err);
          break;
        }
      };

      if boxes.is_empty() {
        continue;
      }

      debug!(
        "[{}]: 第 {} 帧检测到 {} 个目标",
        base_name,
        frame.index,
        boxes.len()
      );
      stats.detections += boxes.len();

      if !self.write_output {
        continue;
      }

      for result in extract_regions(&frame.image, &boxes, &self.output, base_name, frame.index) {
        match result {
          Ok(path) => {
            debug!("裁剪已写出: {}", path.display());
            stats.crops_written += 1;
          }
          Err(err) => {
            error!("{}", err);
            stats.write_failures += 1;
          }
        }
      }
    }
  }
}
