use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        loss::CrossEntropyLossConfig,
        pool::{MaxPool2d, MaxPool2dConfig},
        Linear, LinearConfig, Relu,
    },
    prelude::*,
};

use crate::data::preprocessor::CHANNELS;

const CONV1_FILTERS: usize = 32;
const CONV2_FILTERS: usize = 64;

/// Smallest input side that still leaves a 1x1 feature map.
pub const MIN_IMAGE_SIZE: usize = 10;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct PlantCnnConfig {
    pub num_classes: usize,
    #[config(default = 150)]
    pub image_size:  usize,
    #[config(default = 128)]
    pub hidden_size: usize,
}

impl PlantCnnConfig {
    /// Width of the Flatten output feeding the first dense layer.
    pub fn flattened_size(&self) -> usize {
        let side = feature_map_side(self.image_size);
        CONV2_FILTERS * side * side
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> PlantCnn<B> {
        PlantCnn {
            conv1:      Conv2dConfig::new([CHANNELS, CONV1_FILTERS], [3, 3]).init(device),
            conv2:      Conv2dConfig::new([CONV1_FILTERS, CONV2_FILTERS], [3, 3]).init(device),
            pool:       MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
            fc1:        LinearConfig::new(self.flattened_size(), self.hidden_size).init(device),
            fc2:        LinearConfig::new(self.hidden_size, self.num_classes).init(device),
            activation: Relu::new(),
        }
    }
}

/// Side of the last feature map: each stage is a valid 3x3
/// convolution (−2) followed by a 2x2/2 max-pool (÷2, floor).
pub fn feature_map_side(image_size: usize) -> usize {
    let after_first = image_size.saturating_sub(2) / 2;
    after_first.saturating_sub(2) / 2
}

/// Two conv/pool stages, then two dense layers.
///
/// conv(3→32) → relu → pool → conv(32→64) → relu → pool
///   → flatten → dense(hidden) → relu → dense(num_classes)
#[derive(Module, Debug)]
pub struct PlantCnn<B: Backend> {
    conv1:      Conv2d<B>,
    conv2:      Conv2d<B>,
    pool:       MaxPool2d,
    fc1:        Linear<B>,
    fc2:        Linear<B>,
    activation: Relu,
}

impl<B: Backend> PlantCnn<B> {
    /// images: [batch, 3, S, S] → logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.activation.forward(self.conv1.forward(images));
        let x = self.pool.forward(x);
        let x = self.activation.forward(self.conv2.forward(x));
        let x = self.pool.forward(x);

        let x = x.flatten::<2>(1, 3);
        let x = self.activation.forward(self.fc1.forward(x));
        self.fc2.forward(x)
    }

    /// Softmax over classes; each row sums to 1.
    pub fn probabilities(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        burn::tensor::activation::softmax(self.forward(images), 1)
    }

    /// Categorical cross-entropy against integer class targets.
    pub fn forward_loss(
        &self,
        images:  Tensor<B, 4>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(images);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }
}
