mod image_classifier_port;
mod matrix_port;

pub use image_classifier_port::ImageClassifierPort;
pub use matrix_port::MatrixPort;
