//! BlazeFace face detector using ONNX Runtime via `ort`.
//!
//! Produces candidate face boxes only; no landmarks, no tracking.

use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::execution_provider::preferred_execution_providers;

/// BlazeFace model input resolution.
const INPUT_SIZE: u32 = 128;

/// Default score floor for a candidate.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

const NMS_IOU_THRESH: f64 = 0.3;

/// Number of BlazeFace anchors (short-range model).
const NUM_ANCHORS: usize = 896;

/// Floats per anchor in the regressor output (box + 6 keypoints).
const REGRESSOR_STRIDE: usize = 16;

pub struct OnnxBlazefaceDetector {
    session: ort::session::Session,
    confidence: f64,
    anchors: Vec<[f32; 2]>,
}

impl OnnxBlazefaceDetector {
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;
        log::info!("Loaded BlazeFace model from {}", model_path.display());
        Ok(Self {
            session,
            confidence,
            anchors: generate_anchors(),
        })
    }
}

impl FaceDetector for OnnxBlazefaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        if frame.is_empty() || frame.channels() < 3 {
            return Ok(Vec::new());
        }
        let fw = frame.width() as f32;
        let fh = frame.height() as f32;

        let input_value = ort::value::Tensor::from_array(preprocess(frame, INPUT_SIZE))?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // regressors: [1, 896, 16], classificators: [1, 896, 1]
        if outputs.len() < 2 {
            return Err(
                format!("BlazeFace model expected 2 outputs, got {}", outputs.len()).into(),
            );
        }
        let regressors = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;
        let reg_data = regressors.as_slice().ok_or("Cannot get regressor slice")?;
        let score_data = scores.as_slice().ok_or("Cannot get score slice")?;

        let mut raw_dets = Vec::new();
        for (i, &raw_score) in score_data.iter().enumerate().take(self.anchors.len()) {
            let score = sigmoid(raw_score);
            if (score as f64) < self.confidence {
                continue;
            }
            let offset = i * REGRESSOR_STRIDE;
            let Some(reg) = reg_data.get(offset..offset + 4) else {
                break;
            };
            let anchor = self.anchors[i];
            let size = INPUT_SIZE as f32;
            let cx = anchor[0] + reg[0] / size;
            let cy = anchor[1] + reg[1] / size;
            let w = reg[2] / size;
            let h = reg[3] / size;

            raw_dets.push(RawDet {
                x1: ((cx - w / 2.0) * fw).max(0.0) as f64,
                y1: ((cy - h / 2.0) * fh).max(0.0) as f64,
                x2: ((cx + w / 2.0) * fw).min(fw) as f64,
                y2: ((cy + h / 2.0) * fh).min(fh) as f64,
                score: score as f64,
            });
        }

        Ok(nms(&mut raw_dets, NMS_IOU_THRESH)
            .iter()
            .map(|d| to_region(d, frame.width(), frame.height()))
            .collect())
    }
}

/// Converts a clamped detection to an integer box inside the frame.
fn to_region(det: &RawDet, frame_w: u32, frame_h: u32) -> Region {
    let x = det.x1 as i32;
    let y = det.y1 as i32;
    let width = ((det.x2 - det.x1) as i32).min(frame_w as i32 - x);
    let height = ((det.y2 - det.y1) as i32).min(frame_h as i32 - y);
    Region::new(x, y, width, height)
}

/// Nearest-neighbour resize to `size × size`, normalised to [0,1] NCHW.
fn preprocess(frame: &Frame, size: u32) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let s = size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));
    for y in 0..s {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }
    tensor
}

/// Short-range anchors: a 16×16 grid with 2 anchors per cell followed by
/// an 8×8 grid with 6.
fn generate_anchors() -> Vec<[f32; 2]> {
    let layers = [(8, 2), (16, 6)]; // (stride, anchors_per_cell)
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);
    for &(stride, per_cell) in &layers {
        let grid = INPUT_SIZE as usize / stride;
        for y in 0..grid {
            for x in 0..grid {
                let cx = (x as f32 + 0.5) / grid as f32;
                let cy = (y as f32 + 0.5) / grid as f32;
                anchors.extend(std::iter::repeat([cx, cy]).take(per_cell));
            }
        }
    }
    anchors
}

#[derive(Clone, Debug)]
struct RawDet {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    score: f64,
}

fn nms(dets: &mut [RawDet], iou_thresh: f64) -> Vec<RawDet> {
    dets.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut keep: Vec<RawDet> = Vec::new();
    for det in dets.iter() {
        if keep.iter().all(|k| bbox_iou(k, det) <= iou_thresh) {
            keep.push(det.clone());
        }
    }
    keep
}

fn bbox_iou(a: &RawDet, b: &RawDet) -> f64 {
    let inter_w = (a.x2.min(b.x2) - a.x1.max(b.x1)).max(0.0);
    let inter_h = (a.y2.min(b.y2) - a.y1.max(b.y1)).max(0.0);
    let inter = inter_w * inter_h;
    if inter == 0.0 {
        return 0.0;
    }
    let area_a = (a.x2 - a.x1) * (a.y2 - a.y1);
    let area_b = (b.x2 - b.x1) * (b.y2 - b.y1);
    inter / (area_a + area_b - inter)
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
