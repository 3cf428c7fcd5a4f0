// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// One use case per user action. Each orchestrates the data, ml
// and infra layers and hands a result back to the CLI.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination

// Train a classifier on a folder of class folders
pub mod train_use_case;

// Classify one image (optionally edited first)
pub mod predict_use_case;

// Rotate / mirror an image and save it
pub mod edit_use_case;

// Inspect or delete the stored model
pub mod model_use_case;

#[cfg(test)]
pub(crate) mod fixtures {
    use image::{Rgb, RgbImage};
    use std::path::Path;

    use crate::application::train_use_case::TrainConfig;
    use crate::ml::device::ComputeDevice;

    /// Two colour-coded classes, `per_class` images each.
    pub fn write_training_folder(root: &Path, per_class: usize) {
        for (label, colour) in [("Invasive Species", [200, 30, 30]), ("Native", [30, 200, 30])] {
            let dir = root.join(label);
            std::fs::create_dir_all(&dir).unwrap();
            for i in 0..per_class {
                RgbImage::from_pixel(20, 16, Rgb(colour))
                    .save(dir.join(format!("{i}.png")))
                    .unwrap();
            }
        }
    }

    /// Small, CPU-only configuration that trains in well under a second.
    pub fn tiny_config(data: &Path, model: &Path) -> TrainConfig {
        TrainConfig {
            data_dir:    data.to_string_lossy().to_string(),
            model_dir:   model.to_string_lossy().to_string(),
            image_size:  12,
            hidden_size: 8,
            batch_size:  4,
            epochs:      2,
            device:      ComputeDevice::Cpu,
            ..TrainConfig::default()
        }
    }
}
