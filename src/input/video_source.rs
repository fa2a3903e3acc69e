// 该文件是 Koutu （抠图） 项目的一部分。
// src/input/video_source.rs - 视频输入源
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
use ffmpeg_next as ffmpeg;
use ffmpeg_next::format::{Pixel, input};
use ffmpeg_next::media::Type;
use ffmpeg_next::software::scaling::{context::Context as ScalingContext, flag::Flags};
use ffmpeg_next::util::frame::video::Video;
use image::RgbImage;

use super::Frame;

/// 视频输入源：按解码顺序逐帧产出，帧索引从 0 递增
pub struct VideoSource {
  input_context: ffmpeg::format::context::Input,
  stream_index: usize,
  decoder: ffmpeg::decoder::Video,
  scaler: ScalingContext,
  frame_index: u64,
  width: u32,
  height: u32,
  finished: bool,
}

impl VideoSource {
  pub fn open(path: &Path) -> Result<Self> {
    ffmpeg::init().context("无法初始化 FFmpeg")?;

    let input_context =
      input(&path).with_context(|| format!("无法打开视频文件: {}", path.display()))?;

    let stream = input_context
      .streams()
      .best(Type::Video)
      .context("找不到视频流")?;
    let stream_index = stream.index();

    let context_decoder = ffmpeg::codec::context::Context::from_parameters(stream.parameters())?;
    let decoder = context_decoder.decoder().video()?;

    let width = decoder.width();
    let height = decoder.height();

    let scaler = ScalingContext::get(
      decoder.format(),
      width,
      height,
      Pixel::RGB24,
      width,
      height,
      Flags::BILINEAR,
    )?;

    Ok(Self {
      input_context,
      stream_index,
      decoder,
      scaler,
      frame_index: 0,
      width,
      height,
      finished: false,
    })
  }

  /// 解码下一帧；数据包读尽并冲洗解码器后返回 None
  fn decode_next(&mut self) -> Result<Option<Video>> {
    loop {
      let mut decoded = Video::empty();
      if self.decoder.receive_frame(&mut decoded).is_ok() {
        return Ok(Some(decoded));
      }

      let mut packet_iter = self.input_context.packets();
      loop {
        match packet_iter.next() {
          Some((stream, packet)) => {
            if stream.index() == self.stream_index {
              self.decoder.send_packet(&packet)?;
              break;
            }
          }
          None => {
            self.decoder.send_eof()?;
            if self.decoder.receive_frame(&mut decoded).is_ok() {
              return Ok(Some(decoded));
            }
            return Ok(None);
          }
        }
      }
    }
  }

  fn to_rgb(&mut self, decoded: &Video) -> Result<RgbImage> {
    let mut rgb_frame = Video::empty();
    self.scaler.run(decoded, &mut rgb_frame)?;

    let data = rgb_frame.data(0);
    let stride = rgb_frame.stride(0);
    let width = self.width as usize;
    let height = self.height as usize;

    // 去掉行对齐填充
    let mut image_data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
      let row_start = y * stride;
      image_data.extend_from_slice(&data[row_start..row_start + width * 3]);
    }

    RgbImage::from_raw(self.width, self.height, image_data)
      .ok_or_else(|| anyhow::anyhow!("无法创建 RGB 图像"))
  }
}

impl Iterator for VideoSource {
  type Item = Result<Frame>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.finished {
      return None;
    }

    match self.decode_next() {
      Ok(Some(decoded)) => {
        let image = match self.to_rgb(&decoded) {
          Ok(image) => image,
          Err(err) => {
            self.finished = true;
            return Some(Err(err));
          }
        };

        let frame = Frame {
          image,
          index: self.frame_index,
        };
        self.frame_index += 1;
        Some(Ok(frame))
      }
      Ok(None) => {
        self.finished = true;
        None
      }
      Err(err) => {
        self.finished = true;
        Some(Err(err))
      }
    }
  }
}
