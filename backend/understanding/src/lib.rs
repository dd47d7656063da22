pub mod extract;
pub mod ocr;
pub mod recognizer;
pub mod vision;

pub use extract::{clean_block, extract_plate, find_plate};
pub use ocr::{split_blocks, TesseractRecognizer};
pub use recognizer::{InputImage, PlateRecognizer};
pub use vision::{VisionProvider, VisionRecognizer};
