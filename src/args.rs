// 该文件是 Koutu （抠图） 项目的一部分。
// src/args.rs - 项目参数配置
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

use std::path::PathBuf;

use clap::Parser;

/// Koutu 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 级联检测器模型文件路径
  #[arg(
    short = 'x',
    long,
    value_name = "FILE",
    default_value = "cascades/haarcascade_profileface.xml"
  )]
  pub detector: PathBuf,

  /// 输入文件（图片或视频，可多次指定）
  /// 支持格式:
  /// - 图片: *.bmp, *.jpg, *.jpeg, *.png, *.pgm, *.tiff 等
  /// - 视频: *.avi, *.mp4
  #[arg(short, long = "file", value_name = "FILE")]
  pub files: Vec<PathBuf>,

  /// 输入目录（可多次指定；目录展开尚未实现，参数会被忽略）
  #[arg(short, long = "directory", value_name = "DIRECTORY")]
  pub directories: Vec<PathBuf>,

  /// 输出目录，必须已存在
  #[arg(short = 'u', long, value_name = "DIRECTORY", default_value = ".")]
  pub output_directory: PathBuf,

  /// 输出文件名前缀
  #[arg(short, long, value_name = "PREFIX", default_value = "")]
  pub prefix: String,

  /// 输出文件扩展名（含点号）
  #[arg(short, long, value_name = "EXTENSION", default_value = ".jpg")]
  pub extension: String,

  /// 写出检测结果的裁剪文件
  #[arg(short, long)]
  pub output: bool,

  /// 输出详细日志
  #[arg(short, long)]
  pub verbose: bool,

  /// 递归遍历目录（预留，当前未生效）
  #[arg(short, long)]
  pub recursive: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let args = Args::parse_from(["koutu"]);
    assert_eq!(args.extension, ".jpg");
    assert_eq!(args.output_directory, PathBuf::from("."));
    assert!(args.prefix.is_empty());
    assert!(!args.output);
    assert!(!args.verbose);
    assert!(!args.recursive);
  }

  #[test]
  fn test_repeated_files_accumulate() {
    let args = Args::parse_from(["koutu", "-f", "a.jpg", "-f", "b.avi", "-f", "c.png"]);
    assert_eq!(args.files.len(), 3);
  }
}
