use crate::VisionError;
use image::imageops::FilterType;

/// Fixed input resolution of the pretrained encoder network.
pub const INPUT_SIZE: u32 = 224;

/// Per-channel means subtracted after the RGB→BGR reorder, in BGR order.
/// These are the ImageNet training-set means the encoder was frozen with.
pub const CHANNEL_MEANS_BGR: [f32; 3] = [103.939, 116.779, 123.68];

/// Decode raw image bytes and build the `[1, 3, 224, 224]` NCHW tensor the
/// encoder expects, flattened row-major.
///
/// The encoder was trained in the caffe convention: channels reordered to
/// BGR and the dataset mean subtracted per channel, with pixel values left
/// in the 0..255 range.
pub fn preprocess(image_bytes: &[u8]) -> Result<Vec<f32>, VisionError> {
    let decoded = image::load_from_memory(image_bytes)
        .map_err(|e| VisionError::InvalidImage(e.to_string()))?;

    let resized = decoded
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
        .to_rgb8();

    let plane = (INPUT_SIZE * INPUT_SIZE) as usize;
    let mut tensor = vec![0.0f32; 3 * plane];
    for (x, y, pixel) in resized.enumerate_pixels() {
        let idx = (y * INPUT_SIZE + x) as usize;
        let [r, g, b] = pixel.0;
        tensor[idx] = f32::from(b) - CHANNEL_MEANS_BGR[0];
        tensor[plane + idx] = f32::from(g) - CHANNEL_MEANS_BGR[1];
        tensor[2 * plane + idx] = f32::from(r) - CHANNEL_MEANS_BGR[2];
    }

    Ok(tensor)
}
