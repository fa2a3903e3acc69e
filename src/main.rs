// 该文件是 Koutu （抠图） 项目的一部分。
// src/main.rs - 项目主程序
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

mod args;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::{info, warn};

use koutu::detector::ObjectDetector;
use koutu::extract::{OutputSpec, output_directory_exists};
use koutu::walker::Walker;

fn main() -> Result<()> {
  let args = args::Args::parse();

  let level = if args.verbose {
    tracing::Level::DEBUG
  } else {
    tracing::Level::INFO
  };
  tracing_subscriber::fmt().with_max_level(level).init();

  info!("输入文件数: {}", args.files.len());
  info!("输入目录数: {}", args.directories.len());
  info!("检测器模型: {}", args.detector.display());
  info!("输出目录: {}", args.output_directory.display());
  if !args.prefix.is_empty() {
    info!("输出文件前缀: {}", args.prefix);
  }

  let output = OutputSpec::new(
    args.output_directory.clone(),
    args.prefix.clone(),
    args.extension.clone(),
  );

  // 启动期校验失败直接退出，不处理任何文件
  if !output_directory_exists(&output) {
    bail!("[{}]: 输出目录不存在", args.output_directory.display());
  }
  let detector = load_detector(&args)?;

  if args.recursive || !args.directories.is_empty() {
    warn!("目录输入与递归遍历尚未实现，相关参数将被忽略");
  }

  let walker = Walker::new(detector.as_ref(), output, args.output);
  let stats = walker.run(&args.files);

  info!("处理完成");
  info!("文件: {} 个处理, {} 个跳过", stats.files, stats.skipped);
  info!("帧数: {}", stats.frames);
  info!("检测数: {}", stats.detections);
  if args.output {
    info!(
      "裁剪输出: {} 个成功, {} 个失败",
      stats.crops_written, stats.write_failures
    );
  }

  Ok(())
}

#[cfg(feature = "cascade_opencv")]
fn load_detector(args: &args::Args) -> Result<Box<dyn ObjectDetector>> {
  use anyhow::Context;

  let detector = koutu::detector::CascadeDetector::load(&args.detector)
    .with_context(|| format!("[{}]: 无法加载检测器", args.detector.display()))?;
  info!("[{}]: 检测器加载成功", args.detector.display());

  Ok(Box::new(detector))
}

#[cfg(not(feature = "cascade_opencv"))]
fn load_detector(_args: &args::Args) -> Result<Box<dyn ObjectDetector>> {
  bail!("未启用任何检测器后端，请开启 cascade_opencv 特性")
}
